use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── GAME KIND ─────────────────────────────────────────────────────────────────
//

/// The four mini-games offered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameKind {
    /// Tap the numbers 1..=N in order as fast as possible.
    NumberTap,
    /// Solve as many arithmetic problems as possible before the countdown ends.
    MathSprint,
    /// Watch a digit sequence, then repeat it.
    MemoryNumbers,
    /// Pick the next term of a number pattern.
    PatternMatch,
}

impl GameKind {
    /// Dashboard order.
    pub const ALL: [GameKind; 4] = [
        GameKind::NumberTap,
        GameKind::MathSprint,
        GameKind::MemoryNumbers,
        GameKind::PatternMatch,
    ];

    /// Stable identifier used by shells for routing.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            GameKind::NumberTap => "numberTap",
            GameKind::MathSprint => "mathSprint",
            GameKind::MemoryNumbers => "memoryNumbers",
            GameKind::PatternMatch => "patternMatch",
        }
    }

    #[must_use]
    pub fn info(self) -> ChallengeInfo {
        match self {
            GameKind::NumberTap => ChallengeInfo {
                kind: self,
                name: "Number Tap",
                description: "Tap numbers 1-25 in order as fast as you can!",
                icon: "🔢",
            },
            GameKind::MathSprint => ChallengeInfo {
                kind: self,
                name: "Math Sprint",
                description: "Solve simple math problems against time!",
                icon: "➕",
            },
            GameKind::MemoryNumbers => ChallengeInfo {
                kind: self,
                name: "Memory Numbers",
                description: "Remember and repeat number sequences!",
                icon: "🧠",
            },
            GameKind::PatternMatch => ChallengeInfo {
                kind: self,
                name: "Pattern Match",
                description: "Complete the number patterns!",
                icon: "🎯",
            },
        }
    }

    /// Whether a lower result is better (timed games).
    #[must_use]
    pub fn minimizes(self) -> bool {
        matches!(self, GameKind::NumberTap)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// Error returned when a challenge id does not name a known game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown challenge id: {raw}")]
pub struct ParseGameKindError {
    pub raw: String,
}

impl FromStr for GameKind {
    type Err = ParseGameKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseGameKindError {
                raw: s.to_string(),
            })
    }
}

//
// ─── CATALOG ENTRY ─────────────────────────────────────────────────────────────
//

/// Dashboard card describing one challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChallengeInfo {
    pub kind: GameKind,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}
