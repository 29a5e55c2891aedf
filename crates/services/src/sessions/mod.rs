mod math_sprint;
mod memory;
mod number_tap;
mod pattern;
mod snapshot;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use brain_core::Clock;
use brain_core::model::{GameKind, GameResult, GameSettings, Phase};

use crate::error::InputError;

// Public API of the session subsystem.
pub use math_sprint::MathSprintSession;
pub use memory::MemorySession;
pub use number_tap::NumberTapSession;
pub use pattern::PatternSession;
pub use snapshot::{Feedback, Highlight, RoundView, SessionSnapshot};

//
// ─── TRANSITIONS ───────────────────────────────────────────────────────────────
//

/// What a single `submit` or `tick` did to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Unchanged,
    /// Input was accepted or time moved on; the session is still live.
    Advanced,
    /// A wrong answer that does not end the game.
    Rejected,
    /// The memory sequence was repeated in full; a pause follows.
    RoundComplete,
    /// The session reached `Terminal`. Emitted exactly once per run.
    Ended(GameResult),
}

//
// ─── SESSION TRAIT ─────────────────────────────────────────────────────────────
//

/// Synchronous state machine behind one mini-game.
///
/// Implementations never read the system time or spawn work. Time only moves
/// when the owner calls `tick`, at the cadence reported by `tick_interval`.
pub trait GameSession: Send {
    fn kind(&self) -> GameKind;

    fn phase(&self) -> Phase;

    /// Reset counters, generate the first round and go live.
    ///
    /// Allowed from any phase; calling it twice equals calling it once.
    fn start(&mut self);

    /// Feed one already-parsed value (`None` for empty input).
    ///
    /// # Errors
    ///
    /// Returns `InputError` when the value is ignored. The session is not
    /// modified in that case.
    fn submit(&mut self, input: Option<i64>) -> Result<Transition, InputError>;

    /// Period of the next tick, or `None` when the current phase has no timer.
    fn tick_interval(&self) -> Option<Duration>;

    /// Advance the session by one tick of `tick_interval`.
    fn tick(&mut self) -> Transition;

    fn snapshot(&self) -> SessionSnapshot;
}

/// Build the session for `kind`.
///
/// `seed` pins the RNG for reproducible rounds.
#[must_use]
pub fn new_session(
    kind: GameKind,
    settings: &GameSettings,
    clock: Clock,
    seed: Option<u64>,
) -> Box<dyn GameSession> {
    match kind {
        GameKind::NumberTap => Box::new(
            NumberTapSession::new(settings)
                .with_clock(clock)
                .with_rng(session_rng(seed)),
        ),
        GameKind::MathSprint => Box::new(
            MathSprintSession::new(settings)
                .with_clock(clock)
                .with_rng(session_rng(seed)),
        ),
        GameKind::MemoryNumbers => Box::new(
            MemorySession::new(settings)
                .with_clock(clock)
                .with_rng(session_rng(seed)),
        ),
        GameKind::PatternMatch => Box::new(
            PatternSession::new(settings)
                .with_clock(clock)
                .with_rng(session_rng(seed)),
        ),
    }
}

pub(crate) fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Checks that `input` is present and inside `min..=max`.
pub(crate) fn require_in_range(input: Option<i64>, min: i64, max: i64) -> Result<i64, InputError> {
    let value = input.ok_or(InputError::Empty)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::OutOfRange { value, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_idle_sessions_of_each_kind() {
        let settings = GameSettings::default();
        for kind in GameKind::ALL {
            let session = new_session(kind, &settings, Clock::system(), Some(1));
            assert_eq!(session.kind(), kind);
            assert_eq!(session.phase(), Phase::Idle);
            assert_eq!(session.tick_interval(), None);
        }
    }

    #[test]
    fn range_check() {
        assert_eq!(require_in_range(Some(3), 1, 9), Ok(3));
        assert_eq!(require_in_range(None, 1, 9), Err(InputError::Empty));
        assert_eq!(
            require_in_range(Some(10), 1, 9),
            Err(InputError::OutOfRange {
                value: 10,
                min: 1,
                max: 9
            })
        );
    }
}
