use std::time::Duration;

use rand::rngs::StdRng;
use tracing::debug;

use brain_core::Clock;
use brain_core::generator;
use brain_core::model::{GameKind, GameOutcome, GameResult, GameSettings, MathProblem, Phase, Score};

use super::{GameSession, RoundView, SessionSnapshot, Transition, session_rng};
use crate::error::InputError;

/// Answer arithmetic problems until the countdown runs out.
pub struct MathSprintSession {
    duration: u32,
    countdown_tick: Duration,
    clock: Clock,
    rng: StdRng,
    phase: Phase,
    problem: Option<MathProblem>,
    score: u32,
    ticks: u32,
}

impl MathSprintSession {
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            duration: settings.sprint_seconds(),
            countdown_tick: settings.countdown_tick(),
            clock: Clock::system(),
            rng: session_rng(None),
            phase: Phase::Idle,
            problem: None,
            score: 0,
            ticks: 0,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn problem(&self) -> Option<&MathProblem> {
        self.problem.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Countdown value: the sprint duration minus ticks seen.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.duration.saturating_sub(self.ticks)
    }
}

impl GameSession for MathSprintSession {
    fn kind(&self) -> GameKind {
        GameKind::MathSprint
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self) {
        self.score = 0;
        self.ticks = 0;
        self.problem = Some(generator::math_problem(&mut self.rng));
        self.phase = Phase::Active;
        debug!(duration = self.duration, "math sprint started");
    }

    fn submit(&mut self, input: Option<i64>) -> Result<Transition, InputError> {
        if self.phase != Phase::Active {
            return Err(InputError::NotAccepting { phase: self.phase });
        }
        let value = input.ok_or(InputError::Empty)?;
        let Some(problem) = self.problem else {
            return Err(InputError::NotAccepting { phase: self.phase });
        };

        if !problem.is_answer(value) {
            return Ok(Transition::Rejected);
        }
        self.score = self.score.saturating_add(1);
        self.problem = Some(generator::math_problem(&mut self.rng));
        Ok(Transition::Advanced)
    }

    fn tick_interval(&self) -> Option<Duration> {
        (self.phase == Phase::Active).then_some(self.countdown_tick)
    }

    fn tick(&mut self) -> Transition {
        if self.phase != Phase::Active {
            return Transition::Unchanged;
        }
        self.ticks = self.ticks.saturating_add(1);
        if self.remaining() > 0 {
            return Transition::Advanced;
        }

        self.phase = Phase::Terminal;
        Transition::Ended(GameResult {
            game: GameKind::MathSprint,
            outcome: GameOutcome::TimeUp,
            score: Score::Points(self.score),
            finished_at: self.clock.now(),
        })
    }

    fn snapshot(&self) -> SessionSnapshot {
        let round = match &self.problem {
            Some(problem) => RoundView::Problem {
                lhs: problem.lhs(),
                operation: problem.operation(),
                rhs: problem.rhs(),
            },
            None => RoundView::Empty,
        };
        let mut snapshot = SessionSnapshot::new(GameKind::MathSprint, self.phase, round);
        snapshot.score = self.score;
        snapshot.elapsed_ticks = self.ticks;
        snapshot.elapsed = self
            .countdown_tick
            .checked_mul(self.ticks)
            .unwrap_or(Duration::MAX);
        snapshot.remaining = Some(self.remaining());
        snapshot
    }
}
