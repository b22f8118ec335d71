//! Fluent construction of round rules.

use crate::enforcement::context::RoundContext;
use crate::enforcement::rules::{CustomCheck, RoundRules};
use crate::enforcement::violations::ViolationStrategy;
use std::time::Duration;

/// Builds [`RoundRules`]. Starts with no limits and the `Abandon` strategy.
#[derive(Default)]
pub struct RulesBuilder {
    rules: RoundRules,
}

impl RulesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow at most `n` narrowing steps per round
    pub fn max_steps(mut self, n: usize) -> Self {
        self.rules.max_steps = Some(n);
        self
    }

    /// Give up on a round that runs longer than `duration`
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.rules.timeout = Some(duration);
        self
    }

    /// Tolerate at most `n` labels outside the vocabulary
    pub fn max_unrecognized(mut self, n: usize) -> Self {
        self.rules.max_unrecognized = Some(n);
        self
    }

    /// Tolerate at most `n` predictions dropped by the confidence gate
    pub fn max_filtered(mut self, n: usize) -> Self {
        self.rules.max_filtered = Some(n);
        self
    }

    /// Require `predicate` to hold; `message` is reported when it doesn't
    pub fn require_pred<F>(mut self, predicate: F, message: String) -> Self
    where
        F: Fn(&RoundContext) -> bool + Send + Sync + 'static,
    {
        self.rules.custom.push(CustomCheck {
            message,
            predicate: Box::new(predicate),
        });
        self
    }

    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.rules.on_violation = strategy;
        self
    }

    pub fn build(self) -> RoundRules {
        self.rules
    }
}
