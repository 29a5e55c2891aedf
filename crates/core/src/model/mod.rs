mod game;
mod language;
mod phase;
mod round;
mod score;
mod settings;

pub use game::{ChallengeInfo, GameKind, ParseGameKindError};
pub use language::{Language, ParseLanguageError};
pub use phase::Phase;
pub use round::{MathProblem, Operation, PatternRound, PatternRule, SequenceRound, TapGrid};
pub use score::{BestScores, GameOutcome, GameResult, Score};
pub use settings::{GameSettings, GameSettingsDraft, SettingsError};
