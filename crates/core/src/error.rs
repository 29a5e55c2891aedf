use thiserror::Error;

use crate::generator::GenerationError;
use crate::model::{ParseGameKindError, ParseLanguageError, SettingsError};

/// Umbrella error for callers that do not care which core concern failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    GameKind(#[from] ParseGameKindError),
    #[error(transparent)]
    Language(#[from] ParseLanguageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameKind, GameSettingsDraft, Language};

    fn pick(game: &str, language: &str) -> Result<(GameKind, Language), Error> {
        Ok((game.parse()?, language.parse()?))
    }

    #[test]
    fn parse_errors_convert_into_core_error() {
        assert!(pick("mathSprint", "de").is_ok());
        let err = pick("chess", "de").unwrap_err();
        assert!(matches!(err, Error::GameKind(_)));
        assert_eq!(err.to_string(), "unknown challenge id: chess");
        assert!(matches!(pick("numberTap", "xx"), Err(Error::Language(_))));
    }

    #[test]
    fn settings_error_converts() {
        let draft = GameSettingsDraft {
            grid_size: 1,
            ..GameSettingsDraft::default()
        };
        let err: Error = draft.validate().unwrap_err().into();
        assert!(matches!(err, Error::Settings(SettingsError::InvalidGridSize(1))));
    }
}
