//! Rule violations and handling strategies.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Ways a round can break its rules
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ViolationError {
    #[error("Maximum steps ({max}) exceeded (current: {current})")]
    MaxStepsExceeded { max: usize, current: usize },

    #[error("Timeout ({timeout:?}) exceeded (elapsed: {elapsed:?})")]
    TimeoutExceeded {
        timeout: Duration,
        elapsed: Duration,
    },

    #[error("Too many unrecognized labels ({current}, limit {max})")]
    TooManyUnrecognized { max: usize, current: usize },

    #[error("Too many low-confidence predictions ({current}, limit {max})")]
    TooManyFiltered { max: usize, current: usize },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// What the round does once a rule is broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationStrategy {
    /// End the round without an answer
    #[default]
    Abandon,

    /// Reset the search and start a fresh round
    Restart,

    /// Keep playing but log a warning
    IgnoreAndLog,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_uses_kebab_case_names() {
        let json = serde_json::to_string(&ViolationStrategy::IgnoreAndLog).unwrap();
        assert_eq!(json, r#""ignore-and-log""#);

        let parsed: ViolationStrategy = serde_json::from_str(r#""restart""#).unwrap();
        assert_eq!(parsed, ViolationStrategy::Restart);
    }

    #[test]
    fn violation_messages_name_the_limit() {
        let err = ViolationError::MaxStepsExceeded { max: 7, current: 8 };
        assert_eq!(err.to_string(), "Maximum steps (7) exceeded (current: 8)");
    }
}
