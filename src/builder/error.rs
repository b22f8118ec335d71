//! Build errors for the game builder.

use crate::core::RangeError;
use thiserror::Error;

/// Errors that can occur when building a game.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Invalid search range: {0}")]
    InvalidRange(#[from] RangeError),

    #[error("Label for '{role}' is empty")]
    EmptyLabel { role: &'static str },

    #[error("Label '{label}' is used for more than one response")]
    DuplicateLabel { label: String },

    #[error("Minimum confidence {0} is outside [0, 1]")]
    InvalidConfidence(f32),

    #[error("Poll interval must be greater than zero")]
    ZeroInterval,
}
