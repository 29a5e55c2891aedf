//! Shared error types for the services crate.

use thiserror::Error;

use brain_core::model::Phase;

use crate::navigation::Screen;

/// Input a session refused. The session is left exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("empty input")]
    Empty,
    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
    #[error("{value} is not one of the offered answers")]
    NotOffered { value: i64 },
    #[error("input is not accepted while {phase:?}")]
    NotAccepting { phase: Phase },
}

/// Errors emitted by `SessionDriver`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    #[error("session driver has stopped")]
    Stopped,
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

/// Errors emitted by `Navigator`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("cannot {action} from {from:?}")]
    InvalidMove { from: Screen, action: &'static str },
}
