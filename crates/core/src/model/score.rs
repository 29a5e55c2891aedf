use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::model::GameKind;

/// Result metric of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Score {
    Points(u32),
    Level(u32),
    Time(Duration),
}

impl Score {
    /// True if `self` strictly improves on `other`.
    ///
    /// Times improve downwards, points and levels upwards. Metrics of
    /// different kinds never beat each other.
    #[must_use]
    pub fn beats(&self, other: &Score) -> bool {
        match (self, other) {
            (Score::Points(a), Score::Points(b)) | (Score::Level(a), Score::Level(b)) => a > b,
            (Score::Time(a), Score::Time(b)) => a < b,
            _ => false,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Points(points) => write!(f, "{points} pts"),
            Score::Level(level) => write!(f, "level {level}"),
            Score::Time(time) => write!(f, "{:.2}s", time.as_secs_f64()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOutcome {
    /// Every tile tapped.
    Won,
    /// Wrong answer ended the run.
    Lost,
    /// Countdown reached zero.
    TimeUp,
}

/// What a session reports at its terminal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub game: GameKind,
    pub outcome: GameOutcome,
    pub score: Score,
    pub finished_at: DateTime<Utc>,
}

/// Process-lifetime high-water marks, one per game.
///
/// Owned by whoever hosts the sessions and handed in and out explicitly;
/// nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestScores {
    by_game: HashMap<GameKind, Score>,
}

impl BestScores {
    /// Starts from the baselines the games show before anything is played:
    /// zero points for the scored games, level 1 for memory, and no time for
    /// number tap.
    #[must_use]
    pub fn new() -> Self {
        let mut by_game = HashMap::new();
        by_game.insert(GameKind::MathSprint, Score::Points(0));
        by_game.insert(GameKind::PatternMatch, Score::Points(0));
        by_game.insert(GameKind::MemoryNumbers, Score::Level(1));
        Self { by_game }
    }

    #[must_use]
    pub fn get(&self, game: GameKind) -> Option<Score> {
        self.by_game.get(&game).copied()
    }

    /// Stores `result` if it strictly beats the current best.
    ///
    /// Returns `true` when a new record was set.
    pub fn record(&mut self, result: &GameResult) -> bool {
        let improves = match self.by_game.get(&result.game) {
            Some(best) => result.score.beats(best),
            None => true,
        };
        if improves {
            self.by_game.insert(result.game, result.score);
        }
        improves
    }
}

impl Default for BestScores {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn result(game: GameKind, score: Score) -> GameResult {
        GameResult {
            game,
            outcome: GameOutcome::Lost,
            score,
            finished_at: fixed_now(),
        }
    }

    #[test]
    fn time_improves_downwards() {
        let fast = Score::Time(Duration::from_millis(9_500));
        let slow = Score::Time(Duration::from_millis(12_000));
        assert!(fast.beats(&slow));
        assert!(!slow.beats(&fast));
        assert!(!fast.beats(&fast));
    }

    #[test]
    fn mixed_metrics_never_beat() {
        assert!(!Score::Points(10).beats(&Score::Level(1)));
    }

    #[test]
    fn first_tap_time_is_always_a_record() {
        let mut best = BestScores::new();
        assert_eq!(best.get(GameKind::NumberTap), None);
        assert!(best.record(&result(
            GameKind::NumberTap,
            Score::Time(Duration::from_secs(30))
        )));
        assert!(!best.record(&result(
            GameKind::NumberTap,
            Score::Time(Duration::from_secs(30))
        )));
        assert!(best.record(&result(
            GameKind::NumberTap,
            Score::Time(Duration::from_secs(20))
        )));
        assert_eq!(
            best.get(GameKind::NumberTap),
            Some(Score::Time(Duration::from_secs(20)))
        );
    }

    #[test]
    fn baselines_require_strict_improvement() {
        let mut best = BestScores::new();
        assert!(!best.record(&result(GameKind::MathSprint, Score::Points(0))));
        assert!(!best.record(&result(GameKind::MemoryNumbers, Score::Level(1))));
        assert!(best.record(&result(GameKind::MemoryNumbers, Score::Level(2))));
        assert_eq!(best.get(GameKind::MemoryNumbers), Some(Score::Level(2)));
    }

    #[test]
    fn lower_score_does_not_replace_best() {
        let mut best = BestScores::new();
        assert!(best.record(&result(GameKind::PatternMatch, Score::Points(40))));
        assert!(!best.record(&result(GameKind::PatternMatch, Score::Points(30))));
        assert_eq!(best.get(GameKind::PatternMatch), Some(Score::Points(40)));
    }
}
