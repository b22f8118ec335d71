//! Context provided to round rule checks.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Progress of the round being checked.
#[derive(Clone, Debug)]
pub struct RoundContext {
    pub round_id: Uuid,
    /// Narrowing steps taken so far.
    pub steps: usize,
    /// Labels that did not match the vocabulary.
    pub unrecognized: usize,
    /// Predictions dropped by the confidence gate.
    pub filtered: usize,
    pub started_at: DateTime<Utc>,
}

impl RoundContext {
    /// Fresh context for a round starting now.
    pub fn start() -> Self {
        Self {
            round_id: Uuid::new_v4(),
            steps: 0,
            unrecognized: 0,
            filtered: 0,
            started_at: Utc::now(),
        }
    }

    /// Calculate elapsed time since the round started (pure)
    pub fn elapsed(&self) -> Duration {
        let now = Utc::now();
        now.signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
