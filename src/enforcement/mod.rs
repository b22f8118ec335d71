//! Round rules enforced between polls.
//!
//! A noisy classifier can keep a round alive forever: it flickers between
//! labels, or never shows a recognizable gesture at all. Round rules put
//! limits on that. They check the number of narrowing steps, the wall-clock
//! time and the number of unrecognized labels, plus any custom check.
//!
//! Checks use Stillwater's `Validation` so every broken rule is reported
//! at once rather than only the first.
//!
//! # Example
//!
//! ```rust
//! use gesture_guess::enforcement::{RulesBuilder, RoundRules, ViolationStrategy};
//! use std::time::Duration;
//!
//! let rules: RoundRules = RulesBuilder::new()
//!     .max_steps(7)
//!     .timeout(Duration::from_secs(300))
//!     .on_violation(ViolationStrategy::Restart)
//!     .build();
//!
//! assert_eq!(rules.max_steps(), Some(7));
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::RulesBuilder;
pub use context::RoundContext;
pub use rules::RoundRules;
pub use violations::{ViolationError, ViolationStrategy};
