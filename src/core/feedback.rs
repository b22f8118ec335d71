//! Conversion of raw classifier labels into typed feedback.
//!
//! Labels are matched once at the boundary. Everything past this point
//! works with the closed [`Feedback`] variant.

use serde::{Deserialize, Serialize};

/// Feedback on the current guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    /// The guess is above the hidden number ("lower").
    TooHigh,
    /// The guess is below the hidden number ("higher").
    TooLow,
    /// The guess is the hidden number ("stop").
    Correct,
    /// Label outside the vocabulary, empty, or absent.
    Unrecognized,
}

impl Feedback {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TooHigh => "TooHigh",
            Self::TooLow => "TooLow",
            Self::Correct => "Correct",
            Self::Unrecognized => "Unrecognized",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// Label vocabulary and matching policy.
///
/// Matching is exact on the whole label after optional trimming, and
/// case-insensitive unless `case_sensitive` is set.
///
/// # Example
///
/// ```rust
/// use gesture_guess::core::{Feedback, LabelMatcher};
///
/// let matcher = LabelMatcher::default();
///
/// assert_eq!(matcher.parse(Some("lower")), Feedback::TooHigh);
/// assert_eq!(matcher.parse(Some(" Higher\n")), Feedback::TooLow);
/// assert_eq!(matcher.parse(Some("STOP")), Feedback::Correct);
/// assert_eq!(matcher.parse(Some("stopp")), Feedback::Unrecognized);
/// assert_eq!(matcher.parse(None), Feedback::Unrecognized);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelMatcher {
    pub higher: String,
    pub lower: String,
    pub stop: String,
    pub case_sensitive: bool,
    pub trim: bool,
}

impl Default for LabelMatcher {
    fn default() -> Self {
        Self {
            higher: "higher".to_string(),
            lower: "lower".to_string(),
            stop: "stop".to_string(),
            case_sensitive: false,
            trim: true,
        }
    }
}

impl LabelMatcher {
    /// Classify a raw label. An absent label is [`Feedback::Unrecognized`].
    pub fn parse(&self, label: Option<&str>) -> Feedback {
        let Some(label) = label else {
            return Feedback::Unrecognized;
        };
        let label = self.normalize(label);
        if label.is_empty() {
            return Feedback::Unrecognized;
        }

        if self.matches(label, &self.lower) {
            Feedback::TooHigh
        } else if self.matches(label, &self.higher) {
            Feedback::TooLow
        } else if self.matches(label, &self.stop) {
            Feedback::Correct
        } else {
            Feedback::Unrecognized
        }
    }

    /// Apply the trim policy to a label or vocabulary word.
    pub fn normalize<'a>(&self, label: &'a str) -> &'a str {
        if self.trim {
            label.trim()
        } else {
            label
        }
    }

    /// Vocabulary words in (higher, lower, stop) order.
    pub fn words(&self) -> [&str; 3] {
        [&self.higher, &self.lower, &self.stop]
    }

    fn matches(&self, label: &str, word: &str) -> bool {
        let word = self.normalize(word);
        if self.case_sensitive {
            label == word
        } else {
            label.eq_ignore_ascii_case(word)
        }
    }
}
