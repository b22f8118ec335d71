//! Guard predicates for gating input before it reaches the engine.
//!
//! Guards are pure boolean functions. The round driver uses them to drop
//! predictions the classifier is not confident enough about.

use std::fmt;
use std::sync::Arc;

/// Pure predicate over a value of type `T`.
///
/// # Example
///
/// ```rust
/// use gesture_guess::core::Guard;
///
/// let positive = Guard::new(|n: &i32| *n > 0);
///
/// assert!(positive.check(&3));
/// assert!(!positive.check(&-3));
/// ```
pub struct Guard<T: ?Sized> {
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> Guard<T> {
    /// Create a guard from a pure, thread-safe predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check whether the guard lets `value` through.
    pub fn check(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

impl<T: ?Sized> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
