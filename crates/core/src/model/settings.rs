use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("grid size must be between 2 and 100, got {0}")]
    InvalidGridSize(u32),

    #[error("{field} tick must be > 0 ms")]
    ZeroTick { field: &'static str },

    #[error("sprint duration must be > 0")]
    InvalidSprintDuration,

    #[error("memory start length must be between 1 and 50, got {0}")]
    InvalidMemoryStartLength(usize),

    #[error("pattern points must be > 0")]
    InvalidPatternPoints,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated settings, as read from a file or assembled by a shell.
///
/// Missing fields fall back to the stock game defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettingsDraft {
    pub grid_size: u32,
    pub stopwatch_tick_ms: u64,
    pub sprint_seconds: u32,
    pub countdown_tick_ms: u64,
    pub memory_start_length: usize,
    pub reveal_on_ms: u64,
    pub reveal_off_ms: u64,
    pub round_pause_ms: u64,
    pub pattern_points: u32,
}

impl Default for GameSettingsDraft {
    fn default() -> Self {
        Self {
            grid_size: 25,
            stopwatch_tick_ms: 10,
            sprint_seconds: 60,
            countdown_tick_ms: 1_000,
            memory_start_length: 3,
            reveal_on_ms: 800,
            reveal_off_ms: 200,
            round_pause_ms: 500,
            pattern_points: 10,
        }
    }
}

impl GameSettingsDraft {
    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` for out-of-range sizes, zero ticks, a zero
    /// sprint duration or zero pattern points.
    pub fn validate(self) -> Result<GameSettings, SettingsError> {
        if !(2..=100).contains(&self.grid_size) {
            return Err(SettingsError::InvalidGridSize(self.grid_size));
        }
        for (field, value) in [
            ("stopwatch", self.stopwatch_tick_ms),
            ("countdown", self.countdown_tick_ms),
            ("reveal on", self.reveal_on_ms),
            ("reveal off", self.reveal_off_ms),
            ("round pause", self.round_pause_ms),
        ] {
            if value == 0 {
                return Err(SettingsError::ZeroTick { field });
            }
        }
        if self.sprint_seconds == 0 {
            return Err(SettingsError::InvalidSprintDuration);
        }
        if !(1..=50).contains(&self.memory_start_length) {
            return Err(SettingsError::InvalidMemoryStartLength(
                self.memory_start_length,
            ));
        }
        if self.pattern_points == 0 {
            return Err(SettingsError::InvalidPatternPoints);
        }

        Ok(GameSettings {
            grid_size: self.grid_size,
            stopwatch_tick: Duration::from_millis(self.stopwatch_tick_ms),
            sprint_seconds: self.sprint_seconds,
            countdown_tick: Duration::from_millis(self.countdown_tick_ms),
            memory_start_length: self.memory_start_length,
            reveal_on: Duration::from_millis(self.reveal_on_ms),
            reveal_off: Duration::from_millis(self.reveal_off_ms),
            round_pause: Duration::from_millis(self.round_pause_ms),
            pattern_points: self.pattern_points,
        })
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Validated tunables shared by all four games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSettings {
    grid_size: u32,
    stopwatch_tick: Duration,
    sprint_seconds: u32,
    countdown_tick: Duration,
    memory_start_length: usize,
    reveal_on: Duration,
    reveal_off: Duration,
    round_pause: Duration,
    pattern_points: u32,
}

impl GameSettings {
    /// Tiles in the number-tap grid.
    #[must_use]
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    #[must_use]
    pub fn stopwatch_tick(&self) -> Duration {
        self.stopwatch_tick
    }

    /// Countdown start value, in countdown ticks.
    #[must_use]
    pub fn sprint_seconds(&self) -> u32 {
        self.sprint_seconds
    }

    #[must_use]
    pub fn countdown_tick(&self) -> Duration {
        self.countdown_tick
    }

    /// Sequence length at level 1.
    #[must_use]
    pub fn memory_start_length(&self) -> usize {
        self.memory_start_length
    }

    /// How long each digit stays highlighted while revealing.
    #[must_use]
    pub fn reveal_on(&self) -> Duration {
        self.reveal_on
    }

    /// Dark gap after each highlighted digit.
    #[must_use]
    pub fn reveal_off(&self) -> Duration {
        self.reveal_off
    }

    #[must_use]
    pub fn round_pause(&self) -> Duration {
        self.round_pause
    }

    #[must_use]
    pub fn pattern_points(&self) -> u32 {
        self.pattern_points
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: 25,
            stopwatch_tick: Duration::from_millis(10),
            sprint_seconds: 60,
            countdown_tick: Duration::from_secs(1),
            memory_start_length: 3,
            reveal_on: Duration::from_millis(800),
            reveal_off: Duration::from_millis(200),
            round_pause: Duration::from_millis(500),
            pattern_points: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_validates_to_default_settings() {
        let settings = GameSettingsDraft::default().validate().unwrap();
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn rejects_tiny_grid() {
        let draft = GameSettingsDraft {
            grid_size: 1,
            ..GameSettingsDraft::default()
        };
        assert_eq!(draft.validate(), Err(SettingsError::InvalidGridSize(1)));
    }

    #[test]
    fn rejects_zero_ticks() {
        let draft = GameSettingsDraft {
            reveal_off_ms: 0,
            ..GameSettingsDraft::default()
        };
        assert_eq!(
            draft.validate(),
            Err(SettingsError::ZeroTick { field: "reveal off" })
        );
    }

    #[test]
    fn rejects_zero_sprint_and_points() {
        let draft = GameSettingsDraft {
            sprint_seconds: 0,
            ..GameSettingsDraft::default()
        };
        assert_eq!(draft.validate(), Err(SettingsError::InvalidSprintDuration));

        let draft = GameSettingsDraft {
            pattern_points: 0,
            ..GameSettingsDraft::default()
        };
        assert_eq!(draft.validate(), Err(SettingsError::InvalidPatternPoints));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let draft: GameSettingsDraft =
            serde_json::from_str(r#"{ "grid_size": 16, "sprint_seconds": 30 }"#).unwrap();
        let settings = draft.validate().unwrap();
        assert_eq!(settings.grid_size(), 16);
        assert_eq!(settings.sprint_seconds(), 30);
        assert_eq!(settings.stopwatch_tick(), Duration::from_millis(10));
        assert_eq!(settings.memory_start_length(), 3);
    }
}
