//! Search window over the integer range.
//!
//! `SearchState` is the `{left, right, guess}` triple the engine narrows
//! on every piece of feedback. `SearchRange` is the closed interval a round
//! starts from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest number a default round can land on.
pub const DEFAULT_LOW: i32 = 0;

/// Highest number a default round can land on.
pub const DEFAULT_HIGH: i32 = 100;

/// Errors raised when constructing a [`SearchRange`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Range lower bound {low} is negative")]
    NegativeBound { low: i32 },

    #[error("Range is inverted: low {low} > high {high}")]
    Inverted { low: i32, high: i32 },
}

/// Closed interval `[low, high]` a round searches.
///
/// Bounds are non-negative so that the `-1` invalid-feedback sentinel can
/// never be mistaken for a real guess.
///
/// # Example
///
/// ```rust
/// use gesture_guess::core::SearchRange;
///
/// let range = SearchRange::new(1, 10).unwrap();
/// assert_eq!(range.low(), 1);
/// assert_eq!(range.high(), 10);
///
/// assert!(SearchRange::new(-1, 10).is_err());
/// assert!(SearchRange::new(10, 1).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRange {
    low: i32,
    high: i32,
}

impl SearchRange {
    pub fn new(low: i32, high: i32) -> Result<Self, RangeError> {
        if low < 0 {
            return Err(RangeError::NegativeBound { low });
        }
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> i32 {
        self.low
    }

    pub fn high(&self) -> i32 {
        self.high
    }

    /// Check whether `value` lies inside the range.
    pub fn contains(&self, value: i32) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

impl Default for SearchRange {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }
}

/// Current binary-search window and the candidate answer.
///
/// Invariant: `left <= guess <= right`, and `guess` is always the floor
/// midpoint of `[left, right]`.
///
/// # Example
///
/// ```rust
/// use gesture_guess::core::{SearchRange, SearchState};
///
/// let state = SearchState::initial(SearchRange::default());
/// assert_eq!((state.left, state.right, state.guess), (0, 100, 50));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub left: i32,
    pub right: i32,
    pub guess: i32,
}

impl SearchState {
    /// Fresh window spanning the whole range.
    pub fn initial(range: SearchRange) -> Self {
        Self::window(range.low, range.high)
    }

    /// Window `[left, right]` with its midpoint as the guess.
    pub(crate) fn window(left: i32, right: i32) -> Self {
        Self {
            left,
            right,
            guess: midpoint(left, right),
        }
    }

    /// No candidates remain besides the current guess.
    pub fn is_exhausted(&self) -> bool {
        self.left == self.right
    }

    /// Number of candidates still inside the window.
    pub fn remaining(&self) -> u32 {
        (self.right - self.left) as u32 + 1
    }
}

/// Floor midpoint of a non-negative interval.
pub(crate) fn midpoint(left: i32, right: i32) -> i32 {
    left + (right - left) / 2
}
