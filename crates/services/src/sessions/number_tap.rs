use std::time::Duration;

use rand::rngs::StdRng;
use tracing::debug;

use brain_core::Clock;
use brain_core::generator;
use brain_core::model::{GameKind, GameOutcome, GameResult, GameSettings, Phase, Score, TapGrid};

use super::{GameSession, RoundView, SessionSnapshot, Transition, require_in_range, session_rng};
use crate::error::InputError;

/// Tap `1..=N` in order against a stopwatch.
pub struct NumberTapSession {
    grid_size: u32,
    stopwatch_tick: Duration,
    clock: Clock,
    rng: StdRng,
    phase: Phase,
    grid: Option<TapGrid>,
    next: u32,
    ticks: u32,
}

impl NumberTapSession {
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            grid_size: settings.grid_size(),
            stopwatch_tick: settings.stopwatch_tick(),
            clock: Clock::system(),
            rng: session_rng(None),
            phase: Phase::Idle,
            grid: None,
            next: 1,
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
    pub fn grid(&self) -> Option<&TapGrid> {
        self.grid.as_ref()
    }

    /// Value the next accepted tap must have.
    #[must_use]
    pub fn next_expected(&self) -> u32 {
        self.next
    }

    #[must_use]
    pub fn elapsed_ticks(&self) -> u32 {
        self.ticks
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.stopwatch_tick
            .checked_mul(self.ticks)
            .unwrap_or(Duration::MAX)
    }
}

impl GameSession for NumberTapSession {
    fn kind(&self) -> GameKind {
        GameKind::NumberTap
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self) {
        self.grid = Some(generator::tap_grid(self.grid_size, &mut self.rng));
        self.next = 1;
        self.ticks = 0;
        self.phase = Phase::Active;
        debug!(grid_size = self.grid_size, "number tap started");
    }

    fn submit(&mut self, input: Option<i64>) -> Result<Transition, InputError> {
        if self.phase != Phase::Active {
            return Err(InputError::NotAccepting { phase: self.phase });
        }
        let value = require_in_range(input, 1, i64::from(self.grid_size))?;
        if value != i64::from(self.next) {
            return Ok(Transition::Unchanged);
        }

        let finished = self.next == self.grid_size;
        self.next += 1;
        if !finished {
            return Ok(Transition::Advanced);
        }

        self.phase = Phase::Terminal;
        Ok(Transition::Ended(GameResult {
            game: GameKind::NumberTap,
            outcome: GameOutcome::Won,
            score: Score::Time(self.elapsed()),
            finished_at: self.clock.now(),
        }))
    }

    fn tick_interval(&self) -> Option<Duration> {
        (self.phase == Phase::Active).then_some(self.stopwatch_tick)
    }

    fn tick(&mut self) -> Transition {
        if self.phase != Phase::Active {
            return Transition::Unchanged;
        }
        self.ticks = self.ticks.saturating_add(1);
        Transition::Advanced
    }

    fn snapshot(&self) -> SessionSnapshot {
        let round = match &self.grid {
            Some(grid) => RoundView::Grid {
                tiles: grid.tiles().to_vec(),
                next: self.next,
            },
            None => RoundView::Empty,
        };
        let mut snapshot = SessionSnapshot::new(GameKind::NumberTap, self.phase, round);
        snapshot.elapsed_ticks = self.ticks;
        snapshot.elapsed = self.elapsed();
        snapshot
    }
}
