use std::time::Duration;

use rand::rngs::StdRng;
use tracing::debug;

use brain_core::Clock;
use brain_core::generator;
use brain_core::model::{
    GameKind, GameOutcome, GameResult, GameSettings, Phase, Score, SequenceRound,
};

use super::{
    GameSession, Highlight, RoundView, SessionSnapshot, Transition, require_in_range, session_rng,
};
use crate::error::InputError;

/// Position of the reveal playback. Each digit is lit, then dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RevealCursor {
    index: usize,
    lit: bool,
}

impl RevealCursor {
    const START: RevealCursor = RevealCursor {
        index: 0,
        lit: true,
    };
}

/// Watch a digit sequence, then repeat it. Each cleared round adds a digit.
pub struct MemorySession {
    start_length: usize,
    reveal_on: Duration,
    reveal_off: Duration,
    round_pause: Duration,
    clock: Clock,
    rng: StdRng,
    phase: Phase,
    round: Option<SequenceRound>,
    entered: Vec<u8>,
    level: u32,
    cursor: RevealCursor,
}

impl MemorySession {
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            start_length: settings.memory_start_length(),
            reveal_on: settings.reveal_on(),
            reveal_off: settings.reveal_off(),
            round_pause: settings.round_pause(),
            clock: Clock::system(),
            rng: session_rng(None),
            phase: Phase::Idle,
            round: None,
            entered: Vec::new(),
            level: 1,
            cursor: RevealCursor::START,
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
    pub fn round(&self) -> Option<&SequenceRound> {
        self.round.as_ref()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Digits entered so far in the current round.
    #[must_use]
    pub fn entered(&self) -> &[u8] {
        &self.entered
    }

    fn begin_round(&mut self) {
        let len = generator::memory_length(self.start_length, self.level);
        self.round = Some(generator::memory_sequence(len, &mut self.rng));
        self.entered.clear();
        self.cursor = RevealCursor::START;
        self.phase = Phase::Revealing;
    }

    fn round_len(&self) -> usize {
        self.round.as_ref().map_or(0, SequenceRound::len)
    }

    fn highlight(&self) -> Option<Highlight> {
        if self.phase != Phase::Revealing || !self.cursor.lit {
            return None;
        }
        let digit = self.round.as_ref()?.get(self.cursor.index)?;
        Some(Highlight {
            index: self.cursor.index,
            digit,
        })
    }
}

impl GameSession for MemorySession {
    fn kind(&self) -> GameKind {
        GameKind::MemoryNumbers
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self) {
        self.level = 1;
        self.begin_round();
        debug!(length = self.round_len(), "memory numbers started");
    }

    fn submit(&mut self, input: Option<i64>) -> Result<Transition, InputError> {
        if self.phase != Phase::AwaitingInput {
            return Err(InputError::NotAccepting { phase: self.phase });
        }
        let value = require_in_range(input, 1, 9)?;
        let digit = u8::try_from(value).map_err(|_| InputError::OutOfRange {
            value,
            min: 1,
            max: 9,
        })?;

        let position = self.entered.len();
        self.entered.push(digit);
        let expected = self.round.as_ref().and_then(|round| round.get(position));
        if expected != Some(digit) {
            self.phase = Phase::Terminal;
            return Ok(Transition::Ended(GameResult {
                game: GameKind::MemoryNumbers,
                outcome: GameOutcome::Lost,
                score: Score::Level(self.level),
                finished_at: self.clock.now(),
            }));
        }

        if self.entered.len() == self.round_len() {
            self.phase = Phase::RoundTransition;
            debug!(level = self.level, "memory round cleared");
            return Ok(Transition::RoundComplete);
        }
        Ok(Transition::Advanced)
    }

    fn tick_interval(&self) -> Option<Duration> {
        match self.phase {
            Phase::Revealing if self.cursor.lit => Some(self.reveal_on),
            Phase::Revealing => Some(self.reveal_off),
            Phase::RoundTransition => Some(self.round_pause),
            _ => None,
        }
    }

    fn tick(&mut self) -> Transition {
        match self.phase {
            Phase::Revealing if self.cursor.lit => {
                self.cursor.lit = false;
                Transition::Advanced
            }
            Phase::Revealing => {
                self.cursor.index += 1;
                if self.cursor.index >= self.round_len() {
                    self.entered.clear();
                    self.phase = Phase::AwaitingInput;
                } else {
                    self.cursor.lit = true;
                }
                Transition::Advanced
            }
            Phase::RoundTransition => {
                self.level = self.level.saturating_add(1);
                self.begin_round();
                Transition::Advanced
            }
            _ => Transition::Unchanged,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let round = match &self.round {
            Some(round) => RoundView::Sequence {
                length: round.len(),
                highlighted: self.highlight(),
                entered: self.entered.clone(),
            },
            None => RoundView::Empty,
        };
        let mut snapshot = SessionSnapshot::new(GameKind::MemoryNumbers, self.phase, round);
        snapshot.level = self.level;
        snapshot
    }
}
