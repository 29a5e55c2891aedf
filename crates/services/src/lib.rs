#![forbid(unsafe_code)]

pub mod driver;
pub mod error;
pub mod navigation;
pub mod sessions;

pub use brain_core::Clock;

pub use driver::SessionDriver;
pub use error::{DriverError, InputError, NavigationError};
pub use navigation::{Navigator, Screen};
pub use sessions::{
    Feedback, GameSession, Highlight, MathSprintSession, MemorySession, NumberTapSession, PatternSession,
    RoundView, SessionSnapshot, Transition, new_session,
};
