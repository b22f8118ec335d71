//! Effectful side of a round, using Stillwater 0.11.0.
//!
//! The core engine never touches the outside world. This module is the
//! shell around it:
//!
//! - **Classifiers**: sources of `(label, confidence)` predictions
//! - **Rounds**: poll a classifier through an `Effect`, then apply the
//!   result to the engine as a pure state update
//!
//! Following Stillwater conventions, `Round::poll` returns `impl Effect`
//! and reads the classifier from a `ClassifierEnv` environment, so tests
//! swap in a scripted classifier without touching the round.

mod classifier;
mod round;

pub use classifier::{
    Backlog, ChannelClassifier, Classifier, ClassifierEnv, GuessBoard, OracleClassifier, Prediction,
    ScriptedClassifier,
};
pub use round::{Round, RoundError, RoundPhase, RoundSummary, TickOutcome};
