use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Languages offered by the language picker.
///
/// Only the selection is modelled; translated strings belong to the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Ja,
    Ko,
    Zh,
    Ru,
    Ar,
    Hi,
}

impl Language {
    /// Picker order.
    pub const ALL: [Language; 12] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::It,
        Language::Pt,
        Language::Ja,
        Language::Ko,
        Language::Zh,
        Language::Ru,
        Language::Ar,
        Language::Hi,
    ];

    /// Two-letter code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Zh => "zh",
            Language::Ru => "ru",
            Language::Ar => "ar",
            Language::Hi => "hi",
        }
    }

    /// English name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
            Language::It => "Italian",
            Language::Pt => "Portuguese",
            Language::Ja => "Japanese",
            Language::Ko => "Korean",
            Language::Zh => "Chinese",
            Language::Ru => "Russian",
            Language::Ar => "Arabic",
            Language::Hi => "Hindi",
        }
    }

    /// Name in the language itself.
    #[must_use]
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::De => "Deutsch",
            Language::It => "Italiano",
            Language::Pt => "Português",
            Language::Ja => "日本語",
            Language::Ko => "한국어",
            Language::Zh => "中文",
            Language::Ru => "Русский",
            Language::Ar => "العربية",
            Language::Hi => "हिन्दी",
        }
    }

    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Language::En => "🇺🇸",
            Language::Es => "🇪🇸",
            Language::Fr => "🇫🇷",
            Language::De => "🇩🇪",
            Language::It => "🇮🇹",
            Language::Pt => "🇵🇹",
            Language::Ja => "🇯🇵",
            Language::Ko => "🇰🇷",
            Language::Zh => "🇨🇳",
            Language::Ru => "🇷🇺",
            Language::Ar => "🇸🇦",
            Language::Hi => "🇮🇳",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: {raw}")]
pub struct ParseLanguageError {
    pub raw: String,
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    /// Accepts a language code or its English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(trimmed) || lang.name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ParseLanguageError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_english() {
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("ja".parse::<Language>().unwrap(), Language::Ja);
        assert_eq!("German".parse::<Language>().unwrap(), Language::De);
        assert_eq!(" PT ".parse::<Language>().unwrap(), Language::Pt);
    }

    #[test]
    fn rejects_unknown_language() {
        assert!("tlh".parse::<Language>().is_err());
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = Language::ALL.iter().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Language::ALL.len());
    }
}
