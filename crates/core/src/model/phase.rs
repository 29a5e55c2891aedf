use serde::{Deserialize, Serialize};

/// Coarse lifecycle stage of a game session.
///
/// `Active` is used by games that accept input and tick in one stage. The
/// memory game splits its live stage into `Revealing`, `AwaitingInput` and
/// `RoundTransition`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Revealing,
    AwaitingInput,
    RoundTransition,
    Terminal,
}

impl Phase {
    /// True between `start()` and the terminal transition.
    #[must_use]
    pub fn is_live(self) -> bool {
        !matches!(self, Phase::Idle | Phase::Terminal)
    }

    /// True when `submit` may change state.
    #[must_use]
    pub fn accepts_input(self) -> bool {
        matches!(self, Phase::Active | Phase::AwaitingInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_phases() {
        assert!(!Phase::Idle.is_live());
        assert!(Phase::Active.is_live());
        assert!(Phase::Revealing.is_live());
        assert!(Phase::RoundTransition.is_live());
        assert!(!Phase::Terminal.is_live());
    }

    #[test]
    fn only_active_and_awaiting_accept_input() {
        assert!(Phase::Active.accepts_input());
        assert!(Phase::AwaitingInput.accepts_input());
        assert!(!Phase::Revealing.accepts_input());
        assert!(!Phase::RoundTransition.accepts_input());
    }
}
