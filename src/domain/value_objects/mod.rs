//! Value Objects
//!
//! Immutable types shared by the domain services.

pub mod markers;
mod mode;

pub use mode::{Mode, ParseModeError};
