//! Core guessing logic.
//!
//! This module contains the pure part of the game:
//! - The search window and its range (`SearchState`, `SearchRange`)
//! - Label conversion into typed `Feedback`
//! - The `GuessEngine` binary search
//! - `State` and `Guard` used by the round driver
//!
//! Nothing here performs I/O or blocks.

mod engine;
mod feedback;
mod guard;
mod search;
mod state;

pub use engine::{GuessEngine, Step, INVALID_GUESS};
pub use feedback::{Feedback, LabelMatcher};
pub use guard::Guard;
pub use search::{RangeError, SearchRange, SearchState, DEFAULT_HIGH, DEFAULT_LOW};
pub use state::State;
