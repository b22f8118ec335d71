//! Builder API for assembling a game.
//!
//! `GameBuilder` collects the range, label vocabulary, confidence gate,
//! poll interval and round rules, validates them together, and hands back
//! a ready [`Game`](crate::game::Game).

pub mod error;
pub mod game;

pub use error::BuildError;
pub use game::GameBuilder;
