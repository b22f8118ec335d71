//! Core State trait for round phases.
//!
//! A round moves through a small set of phases. This trait exposes the
//! pure queries the driver needs to decide whether to keep polling.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for phases of a state machine.
///
/// All methods are pure. Phases are plain values; data that changes while
/// a phase is active lives next to the phase, not inside it.
///
/// # Example
///
/// ```rust
/// use gesture_guess::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     On,
///     Broken,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///             Self::Broken => "Broken",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
/// }
///
/// assert!(!Lamp::On.is_final());
/// assert!(Lamp::Broken.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name for display and logging.
    fn name(&self) -> &str;

    /// Terminal phase: no further polling is expected.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Failure phase. Usually final as well, but not enforced.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Waiting,
        Done,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Waiting => "Waiting",
                Self::Done => "Done",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Done)
        }
    }

    #[test]
    fn default_methods_report_non_final_non_error() {
        assert!(!TestState::Waiting.is_final());
        assert!(!TestState::Waiting.is_error());
        assert!(TestState::Done.is_final());
        assert!(!TestState::Done.is_error());
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Waiting.name(), "Waiting");
        assert_eq!(TestState::Done.name(), "Done");
    }
}
