//! The guess engine: binary search driven by feedback labels.

use super::feedback::{Feedback, LabelMatcher};
use super::search::{midpoint, SearchRange, SearchState};

/// Returned by [`GuessEngine::interpret_feedback`] for an unrecognized label.
pub const INVALID_GUESS: i32 = -1;

/// Result of applying one piece of feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The window was narrowed; carries the next guess.
    Narrowed(i32),
    /// The current guess was confirmed.
    Correct(i32),
    /// The label was not part of the vocabulary; nothing changed.
    Unrecognized,
}

impl Step {
    /// The guess carried by this step, or [`INVALID_GUESS`].
    pub fn value(&self) -> i32 {
        match self {
            Self::Narrowed(guess) | Self::Correct(guess) => *guess,
            Self::Unrecognized => INVALID_GUESS,
        }
    }
}

/// Owns a [`SearchState`] and advances it on feedback.
///
/// All operations are synchronous and O(1). The engine has no terminal
/// flag: once a round is confirmed the caller simply stops feeding it.
///
/// # Example
///
/// ```rust
/// use gesture_guess::core::GuessEngine;
///
/// let mut engine = GuessEngine::new();
/// assert_eq!(engine.guess(), 50);
///
/// assert_eq!(engine.interpret_feedback(Some("lower")), 25);
/// assert_eq!(engine.interpret_feedback(Some("higher")), 37);
/// assert_eq!(engine.interpret_feedback(Some("stop")), 37);
/// assert_eq!(engine.interpret_feedback(Some("banana")), -1);
///
/// let state = engine.state();
/// assert_eq!((state.left, state.right, state.guess), (25, 50, 37));
/// ```
#[derive(Clone, Debug)]
pub struct GuessEngine {
    range: SearchRange,
    matcher: LabelMatcher,
    state: SearchState,
}

impl Default for GuessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GuessEngine {
    /// Engine over `[0, 100]` with the default label vocabulary.
    pub fn new() -> Self {
        Self::with_config(SearchRange::default(), LabelMatcher::default())
    }

    pub fn with_config(range: SearchRange, matcher: LabelMatcher) -> Self {
        Self {
            range,
            matcher,
            state: SearchState::initial(range),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn guess(&self) -> i32 {
        self.state.guess
    }

    pub fn range(&self) -> SearchRange {
        self.range
    }

    pub fn matcher(&self) -> &LabelMatcher {
        &self.matcher
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Interpret a raw classifier label and return the resulting guess.
    ///
    /// Returns [`INVALID_GUESS`] for labels outside the vocabulary, leaving
    /// the search state untouched.
    pub fn interpret_feedback(&mut self, label: Option<&str>) -> i32 {
        let feedback = self.matcher.parse(label);
        if !feedback.is_recognized() {
            log::debug!("ignoring unrecognized label {label:?}");
        }
        self.apply(feedback).value()
    }

    /// Apply typed feedback to the search.
    pub fn apply(&mut self, feedback: Feedback) -> Step {
        match feedback {
            Feedback::TooHigh => Step::Narrowed(self.narrow_upper()),
            Feedback::TooLow => Step::Narrowed(self.narrow_lower()),
            Feedback::Correct => Step::Correct(self.confirm_correct()),
            Feedback::Unrecognized => Step::Unrecognized,
        }
    }

    /// The hidden number is higher than the guess: raise the lower bound.
    ///
    /// When the midpoint cannot move (`right == left + 1`) the window
    /// collapses onto `right`, the only candidate left above the guess.
    pub fn narrow_lower(&mut self) -> i32 {
        if self.state.is_exhausted() {
            log::debug!("range exhausted at {}, keeping guess", self.state.guess);
            return self.state.guess;
        }

        let previous = self.state.guess;
        let next = SearchState::window(previous, self.state.right);
        self.state = if next.guess == previous {
            SearchState::window(next.right, next.right)
        } else {
            next
        };

        log::trace!(
            "raised lower bound: [{}, {}] guess {}",
            self.state.left,
            self.state.right,
            self.state.guess
        );
        self.state.guess
    }

    /// The hidden number is lower than the guess: drop the upper bound.
    pub fn narrow_upper(&mut self) -> i32 {
        if self.state.is_exhausted() {
            log::debug!("range exhausted at {}, keeping guess", self.state.guess);
            return self.state.guess;
        }

        self.state.right = self.state.guess;
        self.state.guess = midpoint(self.state.left, self.state.right);

        log::trace!(
            "lowered upper bound: [{}, {}] guess {}",
            self.state.left,
            self.state.right,
            self.state.guess
        );
        self.state.guess
    }

    /// The current guess is correct. Never mutates the state.
    pub fn confirm_correct(&self) -> i32 {
        self.state.guess
    }

    /// Restore the full range with its midpoint as the guess.
    pub fn reset(&mut self) {
        self.state = SearchState::initial(self.range);
        log::debug!(
            "search reset to [{}, {}] guess {}",
            self.state.left,
            self.state.right,
            self.state.guess
        );
    }
}
