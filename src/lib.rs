//! Gesture Guess: a camera-driven number guessing game.
//!
//! The player thinks of a number. The program guesses, and the player
//! answers with a hand sign that an image classifier reads as
//! `"higher"`, `"lower"` or `"stop"`. Each answer narrows a binary search
//! until the player signals `"stop"`.
//!
//! The crate follows a "pure core, imperative shell" split:
//!
//! - **core**: the `GuessEngine` binary search, typed `Feedback`, and the
//!   `SearchState` window. No I/O, no blocking.
//! - **effects**: classifier providers and the `Round` that polls them
//!   through Stillwater effects.
//! - **enforcement**: round rules (step, time and noise limits).
//! - **game** / **builder** / **config**: the fixed-interval driver and
//!   its construction from code or TOML.
//!
//! # Example
//!
//! ```rust
//! use gesture_guess::core::{GuessEngine, INVALID_GUESS};
//!
//! let mut engine = GuessEngine::new();
//! assert_eq!(engine.guess(), 50);
//!
//! // The number is lower than 50.
//! assert_eq!(engine.interpret_feedback(Some("lower")), 25);
//! // The number is higher than 25.
//! assert_eq!(engine.interpret_feedback(Some("higher")), 37);
//! // A noisy frame changes nothing.
//! assert_eq!(engine.interpret_feedback(Some("thumbs_sideways")), INVALID_GUESS);
//! // Got it.
//! assert_eq!(engine.interpret_feedback(Some("stop")), 37);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod effects;
pub mod enforcement;
pub mod game;

// Re-export commonly used types
pub use builder::{BuildError, GameBuilder};
pub use config::GameConfig;
pub use core::{Feedback, GuessEngine, SearchRange, SearchState, State, INVALID_GUESS};
pub use effects::{Classifier, ClassifierEnv, Prediction, Round, RoundPhase, TickOutcome};
pub use game::Game;
