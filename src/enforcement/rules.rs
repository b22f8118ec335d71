//! Round rules checked with Validation.

use crate::enforcement::context::RoundContext;
use crate::enforcement::violations::{ViolationError, ViolationStrategy};
use std::fmt;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Checked = Validation<(), NonEmptyVec<ViolationError>>;

/// A named predicate the round must keep satisfying.
pub(crate) struct CustomCheck {
    pub(crate) message: String,
    pub(crate) predicate: Box<dyn Fn(&RoundContext) -> bool + Send + Sync>,
}

/// Limits a round must stay within.
///
/// Every limit is optional. A limit of `n` allows exactly `n`: it is broken
/// by the `n + 1`th step, unrecognized label or filtered prediction.
pub struct RoundRules {
    pub(crate) max_steps: Option<usize>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) max_unrecognized: Option<usize>,
    pub(crate) max_filtered: Option<usize>,
    pub(crate) custom: Vec<CustomCheck>,
    pub(crate) on_violation: ViolationStrategy,
}

impl RoundRules {
    /// Rules that never fire.
    pub fn unlimited() -> Self {
        Self {
            max_steps: None,
            timeout: None,
            max_unrecognized: None,
            max_filtered: None,
            custom: Vec::new(),
            on_violation: ViolationStrategy::default(),
        }
    }

    /// Check the round against every rule, reporting all broken ones.
    pub fn enforce(&self, context: &RoundContext) -> Validation<(), NonEmptyVec<ViolationError>> {
        let mut checks = vec![
            within(context.steps, self.max_steps, |max, current| {
                ViolationError::MaxStepsExceeded { max, current }
            }),
            within(context.unrecognized, self.max_unrecognized, |max, current| {
                ViolationError::TooManyUnrecognized { max, current }
            }),
            within(context.filtered, self.max_filtered, |max, current| {
                ViolationError::TooManyFiltered { max, current }
            }),
            self.check_timeout(context),
        ];

        checks.extend(self.custom.iter().map(|check| {
            if (check.predicate)(context) {
                Validation::success(())
            } else {
                Validation::fail(ViolationError::CustomCheckFailed {
                    message: check.message.clone(),
                })
            }
        }));

        Validation::all_vec(checks).map(|_| ())
    }

    fn check_timeout(&self, context: &RoundContext) -> Checked {
        let Some(timeout) = self.timeout else {
            return Validation::success(());
        };
        let elapsed = context.elapsed();
        if elapsed > timeout {
            Validation::fail(ViolationError::TimeoutExceeded { timeout, elapsed })
        } else {
            Validation::success(())
        }
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn max_unrecognized(&self) -> Option<usize> {
        self.max_unrecognized
    }

    pub fn max_filtered(&self) -> Option<usize> {
        self.max_filtered
    }
}

fn within(
    current: usize,
    max: Option<usize>,
    violation: impl FnOnce(usize, usize) -> ViolationError,
) -> Checked {
    match max {
        Some(max) if current > max => Validation::fail(violation(max, current)),
        _ => Validation::success(()),
    }
}

impl Default for RoundRules {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl fmt::Debug for RoundRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let custom: Vec<&str> = self.custom.iter().map(|c| c.message.as_str()).collect();
        f.debug_struct("RoundRules")
            .field("max_steps", &self.max_steps)
            .field("timeout", &self.timeout)
            .field("max_unrecognized", &self.max_unrecognized)
            .field("max_filtered", &self.max_filtered)
            .field("custom", &custom)
            .field("on_violation", &self.on_violation)
            .finish()
    }
}
