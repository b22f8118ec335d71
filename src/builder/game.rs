//! Builder for constructing games.

use crate::builder::error::BuildError;
use crate::core::{Guard, GuessEngine, LabelMatcher, SearchRange, DEFAULT_HIGH, DEFAULT_LOW};
use crate::effects::{ClassifierEnv, Prediction, Round};
use crate::enforcement::RoundRules;
use crate::game::{Game, DEFAULT_POLL_INTERVAL};
use std::time::Duration;

/// Builder for constructing games with a fluent API.
///
/// Every setting has a default; `build` validates the combination.
///
/// # Example
///
/// ```rust
/// use gesture_guess::builder::GameBuilder;
/// use gesture_guess::effects::{ClassifierEnv, ScriptedClassifier};
/// use std::time::Duration;
///
/// let env = ClassifierEnv::new(ScriptedClassifier::from_labels(["lower", "stop"]));
/// let game = GameBuilder::new()
///     .range(0, 100)
///     .poll_interval(Duration::from_millis(500))
///     .min_confidence(0.6)
///     .build(env)
///     .unwrap();
///
/// assert_eq!(game.round().guess(), 50);
/// ```
pub struct GameBuilder {
    low: i32,
    high: i32,
    matcher: LabelMatcher,
    poll_interval: Duration,
    min_confidence: f32,
    rules: RoundRules,
}

impl GameBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
            matcher: LabelMatcher::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            min_confidence: 0.0,
            rules: RoundRules::unlimited(),
        }
    }

    /// Set the closed range the hidden number lies in.
    pub fn range(mut self, low: i32, high: i32) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Set the labels meaning "higher", "lower" and "stop".
    pub fn labels(
        mut self,
        higher: impl Into<String>,
        lower: impl Into<String>,
        stop: impl Into<String>,
    ) -> Self {
        self.matcher.higher = higher.into();
        self.matcher.lower = lower.into();
        self.matcher.stop = stop.into();
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.matcher.case_sensitive = case_sensitive;
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.matcher.trim = trim;
        self
    }

    /// Replace the whole label matcher.
    pub fn matcher(mut self, matcher: LabelMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Ignore predictions below this confidence. Zero disables the gate.
    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn rules(mut self, rules: RoundRules) -> Self {
        self.rules = rules;
        self
    }

    /// Build the game.
    /// Returns an error if any setting is invalid.
    pub fn build(self, env: ClassifierEnv) -> Result<Game, BuildError> {
        let range = SearchRange::new(self.low, self.high)?;
        validate_labels(&self.matcher)?;

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(BuildError::InvalidConfidence(self.min_confidence));
        }
        if self.poll_interval.is_zero() {
            return Err(BuildError::ZeroInterval);
        }

        let engine = GuessEngine::with_config(range, self.matcher);
        let mut round = Round::new(engine, self.rules);
        if self.min_confidence > 0.0 {
            let min = self.min_confidence;
            round = round.with_gate(Guard::new(move |p: &Prediction| p.confidence >= min));
        }

        Ok(Game::new(round, env, self.poll_interval))
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_labels(matcher: &LabelMatcher) -> Result<(), BuildError> {
    let roles = ["higher", "lower", "stop"];
    let mut seen: Vec<String> = Vec::with_capacity(roles.len());

    for (role, word) in roles.into_iter().zip(matcher.words()) {
        let word = matcher.normalize(word);
        if word.is_empty() {
            return Err(BuildError::EmptyLabel { role });
        }

        let key = if matcher.case_sensitive {
            word.to_string()
        } else {
            word.to_ascii_lowercase()
        };
        if seen.contains(&key) {
            return Err(BuildError::DuplicateLabel {
                label: word.to_string(),
            });
        }
        seen.push(key);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RangeError;
    use crate::effects::ScriptedClassifier;

    fn env() -> ClassifierEnv {
        ClassifierEnv::new(ScriptedClassifier::new(Vec::new()))
    }

    #[test]
    fn defaults_build_a_zero_to_hundred_game() {
        let game = GameBuilder::new().build(env()).unwrap();

        assert_eq!(game.round().guess(), 50);
        assert_eq!(game.round().engine().range(), SearchRange::default());
        assert_eq!(game.poll_interval(), Duration::from_secs(3));
    }

    #[test]
    fn builder_rejects_bad_range() {
        let result = GameBuilder::new().range(10, 1).build(env());

        assert!(matches!(
            result,
            Err(BuildError::InvalidRange(RangeError::Inverted { low: 10, high: 1 }))
        ));
    }

    #[test]
    fn builder_rejects_empty_label() {
        let result = GameBuilder::new().labels("up", "  ", "stop").build(env());

        assert!(matches!(
            result,
            Err(BuildError::EmptyLabel { role: "lower" })
        ));
    }

    #[test]
    fn builder_rejects_duplicate_labels_ignoring_case() {
        let result = GameBuilder::new().labels("Up", "up", "stop").build(env());
        assert!(matches!(result, Err(BuildError::DuplicateLabel { .. })));

        let result = GameBuilder::new()
            .labels("Up", "up", "stop")
            .case_sensitive(true)
            .build(env());
        assert!(result.is_ok());
    }

    #[test]
    fn builder_rejects_confidence_out_of_range() {
        let result = GameBuilder::new().min_confidence(1.5).build(env());
        assert!(matches!(result, Err(BuildError::InvalidConfidence(_))));

        let result = GameBuilder::new().min_confidence(f32::NAN).build(env());
        assert!(matches!(result, Err(BuildError::InvalidConfidence(_))));
    }

    #[test]
    fn builder_rejects_zero_interval() {
        let result = GameBuilder::new().poll_interval(Duration::ZERO).build(env());
        assert!(matches!(result, Err(BuildError::ZeroInterval)));
    }

    #[test]
    fn custom_range_and_labels_reach_the_engine() {
        let game = GameBuilder::new()
            .range(1, 10)
            .labels("up", "down", "fist")
            .build(env())
            .unwrap();

        let engine = game.round().engine();
        assert_eq!(engine.guess(), 5);
        assert_eq!(engine.matcher().stop, "fist");
    }
}
