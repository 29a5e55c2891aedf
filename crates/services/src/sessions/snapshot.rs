use serde::Serialize;
use std::time::Duration;

use brain_core::model::{GameKind, GameOutcome, Operation, PatternRule, Phase, Score};

/// Immutable view of a session, rebuilt after every event.
///
/// Hidden answers are never part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub game: GameKind,
    pub phase: Phase,
    pub round: RoundView,
    pub score: u32,
    pub level: u32,
    /// Stopwatch or countdown ticks seen since `start`.
    pub elapsed_ticks: u32,
    pub elapsed: Duration,
    /// Countdown value, for countdown games only.
    pub remaining: Option<u32>,
    pub best: Option<Score>,
    /// One-shot cue for the event that produced this snapshot.
    pub feedback: Option<Feedback>,
    /// Whether a timer is currently armed for the session.
    pub ticking: bool,
    /// Increases by one per published snapshot.
    pub revision: u64,
}

impl SessionSnapshot {
    pub(crate) fn new(game: GameKind, phase: Phase, round: RoundView) -> Self {
        Self {
            game,
            phase,
            round,
            score: 0,
            level: 0,
            elapsed_ticks: 0,
            elapsed: Duration::ZERO,
            remaining: None,
            best: None,
            feedback: None,
            ticking: false,
            revision: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RoundView {
    /// Nothing generated yet.
    Empty,
    Grid {
        tiles: Vec<u32>,
        next: u32,
    },
    Problem {
        lhs: u32,
        operation: Operation,
        rhs: u32,
    },
    Sequence {
        length: usize,
        highlighted: Option<Highlight>,
        entered: Vec<u8>,
    },
    Pattern {
        rule: PatternRule,
        shown: [i64; 3],
        options: [i64; 4],
    },
}

/// Digit currently lit while a memory sequence is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub index: usize,
    pub digit: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Feedback {
    Correct,
    /// Wrong answer that keeps the game going (shake cue).
    Wrong,
    RoundComplete,
    Finished {
        outcome: GameOutcome,
        score: Score,
        new_record: bool,
    },
}
