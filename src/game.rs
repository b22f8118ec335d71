//! Game driver: polls the classifier on a fixed interval until a round ends.

use crate::effects::{ClassifierEnv, Round, RoundError, RoundSummary, TickOutcome};
use std::time::Duration;
use stillwater::effect::Effect;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Interval between classifier polls when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// A round plus the classifier it is played against.
///
/// Built with [`GameBuilder`](crate::builder::GameBuilder).
pub struct Game {
    round: Round,
    env: ClassifierEnv,
    poll_interval: Duration,
}

impl Game {
    pub(crate) fn new(round: Round, env: ClassifierEnv, poll_interval: Duration) -> Self {
        Self {
            round,
            env,
            poll_interval,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll until the round is solved or abandoned.
    ///
    /// The first poll happens one interval after the call. Each prediction
    /// is applied in full before the next tick is awaited. `on_tick` sees
    /// every outcome, including idle ticks. A classifier that closes
    /// abandons the round with a final `Closed` outcome.
    ///
    /// Dropping the returned future abandons the round where it stands;
    /// call [`play_again`](Self::play_again) before reusing the game.
    pub async fn play_round<F>(&mut self, mut on_tick: F) -> Result<RoundSummary, RoundError>
    where
        F: FnMut(&Round, &TickOutcome),
    {
        log::info!(
            "round {} started, first guess {}",
            self.round.id(),
            self.round.guess()
        );

        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.round.is_final() {
            ticker.tick().await;
            let outcome = match self.round.poll().run(&self.env).await {
                Ok(prediction) => self.round.apply_prediction(prediction),
                Err(RoundError::SourceClosed { .. }) => self.round.close(),
                Err(err) => return Err(err),
            };
            on_tick(&self.round, &outcome);
        }

        Ok(self.round.summary())
    }

    /// The classifier will never produce again; further rounds are pointless.
    pub fn source_closed(&self) -> bool {
        self.env.classifier.is_closed()
    }

    /// Start a fresh round, e.g. after the player asks to go again.
    pub fn play_again(&mut self) {
        self.round.restart();
    }
}
