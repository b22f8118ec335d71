//! Classifier providers the round polls for labels.
//!
//! The image model itself is out of reach of this crate: anything that can
//! hand back the latest `(label, confidence)` pair can drive a round.

use crossbeam_channel::{Receiver, TryRecvError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{LabelMatcher, INVALID_GUESS};

/// One classifier output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Label and confidence as shown to the player, e.g. `stop (87%)`.
    pub fn display_text(&self) -> String {
        format!("{} ({:.0}%)", self.label, self.confidence * 100.0)
    }
}

/// Source of predictions, polled once per tick.
pub trait Classifier: Send + Sync {
    /// The most recent prediction, or `None` when there is nothing new.
    fn latest(&self) -> Option<Prediction>;

    /// No prediction will ever arrive again.
    ///
    /// Default implementation returns `false`.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Environment handed to round effects.
#[derive(Clone)]
pub struct ClassifierEnv {
    pub classifier: Arc<dyn Classifier>,
}

impl ClassifierEnv {
    pub fn new<C: Classifier + 'static>(classifier: C) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }
}

impl fmt::Debug for ClassifierEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierEnv").finish_non_exhaustive()
    }
}

/// How a [`ChannelClassifier`] treats predictions queued between polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backlog {
    /// Drain the queue and act on the newest prediction only.
    KeepLatest,
    /// Hand out one queued prediction per poll.
    InOrder,
}

/// Predictions pushed from another thread over a channel.
///
/// A camera pipeline produces far more predictions than a round consumes,
/// so the default [`Backlog::KeepLatest`] drops everything but the newest
/// one and a backlog never replays stale gestures.
///
/// Once every sender is dropped and the queue is drained the classifier
/// reports itself closed.
pub struct ChannelClassifier {
    rx: Receiver<Prediction>,
    backlog: Backlog,
    closed: AtomicBool,
}

impl ChannelClassifier {
    pub fn new(rx: Receiver<Prediction>) -> Self {
        Self {
            rx,
            backlog: Backlog::KeepLatest,
            closed: AtomicBool::new(false),
        }
    }

    /// Consume queued predictions one per poll, e.g. for typed input.
    pub fn in_order(rx: Receiver<Prediction>) -> Self {
        Self {
            rx,
            backlog: Backlog::InOrder,
            closed: AtomicBool::new(false),
        }
    }

    pub fn backlog(&self) -> Backlog {
        self.backlog
    }
}

impl Classifier for ChannelClassifier {
    fn latest(&self) -> Option<Prediction> {
        let mut latest = match self.rx.try_recv() {
            Ok(prediction) => prediction,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed.swap(true, Ordering::SeqCst) {
                    log::debug!("prediction channel disconnected");
                }
                return None;
            }
        };
        if self.backlog == Backlog::KeepLatest {
            while let Ok(newer) = self.rx.try_recv() {
                latest = newer;
            }
        }
        Some(latest)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Fixed sequence of predictions, then `None` forever.
pub struct ScriptedClassifier {
    script: Mutex<VecDeque<Option<Prediction>>>,
}

impl ScriptedClassifier {
    pub fn new(script: impl IntoIterator<Item = Option<Prediction>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Script of confident predictions with the given labels.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(labels.into_iter().map(|l| Some(Prediction::new(l, 1.0))))
    }

    pub fn remaining(&self) -> usize {
        self.script().len()
    }

    fn script(&self) -> MutexGuard<'_, VecDeque<Option<Prediction>>> {
        self.script.lock().unwrap_or_else(|poisoned| {
            log::warn!("scripted classifier lock poisoned, recovering script");
            poisoned.into_inner()
        })
    }
}

impl Classifier for ScriptedClassifier {
    fn latest(&self) -> Option<Prediction> {
        self.script().pop_front().flatten()
    }
}

/// The guess currently shown to the player, shared with an oracle.
#[derive(Clone, Debug)]
pub struct GuessBoard {
    shown: Arc<AtomicI32>,
}

impl GuessBoard {
    pub fn new() -> Self {
        Self {
            shown: Arc::new(AtomicI32::new(INVALID_GUESS)),
        }
    }

    pub fn show(&self, guess: i32) {
        self.shown.store(guess, Ordering::SeqCst);
    }

    pub fn shown(&self) -> Option<i32> {
        match self.shown.load(Ordering::SeqCst) {
            INVALID_GUESS => None,
            guess => Some(guess),
        }
    }
}

impl Default for GuessBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Player stand-in that answers truthfully for a known target.
pub struct OracleClassifier {
    target: i32,
    board: GuessBoard,
    matcher: LabelMatcher,
}

impl OracleClassifier {
    pub fn new(target: i32, board: GuessBoard, matcher: LabelMatcher) -> Self {
        Self {
            target,
            board,
            matcher,
        }
    }
}

impl Classifier for OracleClassifier {
    fn latest(&self) -> Option<Prediction> {
        let shown = self.board.shown()?;
        let label = match shown.cmp(&self.target) {
            std::cmp::Ordering::Greater => &self.matcher.lower,
            std::cmp::Ordering::Less => &self.matcher.higher,
            std::cmp::Ordering::Equal => &self.matcher.stop,
        };
        Some(Prediction::new(label.clone(), 1.0))
    }
}
