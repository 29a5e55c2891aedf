//! Screen flow of the shell: pick a language, browse challenges, play one.

use tracing::debug;

use brain_core::model::{ChallengeInfo, GameKind, Language};

use crate::error::NavigationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    LanguageSelect,
    Dashboard,
    Challenge(GameKind),
}

/// Tracks the current screen and chosen language.
#[derive(Debug, Clone)]
pub struct Navigator {
    screen: Screen,
    language: Language,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Starts on the language picker with the default language.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::LanguageSelect,
            language: Language::default(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Challenges listed on the dashboard, in display order.
    #[must_use]
    pub fn catalog(&self) -> Vec<ChallengeInfo> {
        GameKind::ALL.into_iter().map(GameKind::info).collect()
    }

    /// Confirm a language and move on to the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidMove` unless on the language picker.
    pub fn select_language(&mut self, language: Language) -> Result<Screen, NavigationError> {
        self.require_screen(Screen::LanguageSelect, "select a language")?;
        self.language = language;
        self.go(Screen::Dashboard)
    }

    /// # Errors
    ///
    /// Returns `NavigationError::InvalidMove` unless on the dashboard.
    pub fn change_language(&mut self) -> Result<Screen, NavigationError> {
        self.require_screen(Screen::Dashboard, "change language")?;
        self.go(Screen::LanguageSelect)
    }

    /// # Errors
    ///
    /// Returns `NavigationError::InvalidMove` unless on the dashboard.
    pub fn open_challenge(&mut self, kind: GameKind) -> Result<Screen, NavigationError> {
        self.require_screen(Screen::Dashboard, "open a challenge")?;
        self.go(Screen::Challenge(kind))
    }

    /// # Errors
    ///
    /// Returns `NavigationError::InvalidMove` unless a challenge is open.
    pub fn back_to_dashboard(&mut self) -> Result<Screen, NavigationError> {
        if !matches!(self.screen, Screen::Challenge(_)) {
            return Err(self.invalid("go back to the dashboard"));
        }
        self.go(Screen::Dashboard)
    }

    fn require_screen(&self, screen: Screen, action: &'static str) -> Result<(), NavigationError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> NavigationError {
        NavigationError::InvalidMove {
            from: self.screen,
            action,
        }
    }

    fn go(&mut self, screen: Screen) -> Result<Screen, NavigationError> {
        debug!(from = ?self.screen, to = ?screen, "navigate");
        self.screen = screen;
        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_flow() {
        let mut nav = Navigator::new();
        assert_eq!(nav.screen(), Screen::LanguageSelect);

        assert_eq!(nav.select_language(Language::Ja), Ok(Screen::Dashboard));
        assert_eq!(nav.language(), Language::Ja);

        assert_eq!(
            nav.open_challenge(GameKind::MathSprint),
            Ok(Screen::Challenge(GameKind::MathSprint))
        );
        assert_eq!(nav.back_to_dashboard(), Ok(Screen::Dashboard));
        assert_eq!(nav.change_language(), Ok(Screen::LanguageSelect));
        assert_eq!(nav.language(), Language::Ja);
    }

    #[test]
    fn invalid_moves_leave_the_screen_alone() {
        let mut nav = Navigator::new();
        assert_eq!(
            nav.open_challenge(GameKind::NumberTap),
            Err(NavigationError::InvalidMove {
                from: Screen::LanguageSelect,
                action: "open a challenge",
            })
        );
        assert!(nav.back_to_dashboard().is_err());
        assert!(nav.change_language().is_err());
        assert_eq!(nav.screen(), Screen::LanguageSelect);

        nav.select_language(Language::En).unwrap();
        nav.open_challenge(GameKind::PatternMatch).unwrap();
        assert!(nav.select_language(Language::Fr).is_err());
        assert!(nav.open_challenge(GameKind::NumberTap).is_err());
        assert_eq!(nav.screen(), Screen::Challenge(GameKind::PatternMatch));
        assert_eq!(nav.language(), Language::En);
    }

    #[test]
    fn catalog_lists_every_game_in_order() {
        let nav = Navigator::new();
        let kinds: Vec<_> = nav.catalog().into_iter().map(|info| info.kind).collect();
        assert_eq!(kinds, GameKind::ALL.to_vec());
    }
}
