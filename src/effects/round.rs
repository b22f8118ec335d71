//! A single round: polls the classifier and feeds the guess engine.

use crate::core::{Guard, GuessEngine, SearchState, State, Step};
use crate::effects::classifier::{ClassifierEnv, Prediction};
use crate::enforcement::{RoundContext, RoundRules, ViolationError, ViolationStrategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stillwater::effect::Effect;
use stillwater::prelude::*;
use stillwater::validation::Validation;
use uuid::Uuid;

/// Errors raised while driving a round
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("Round {round_id} already finished in phase '{phase}'")]
    Finished { round_id: Uuid, phase: String },

    #[error("Round {round_id}: classifier has no more predictions")]
    SourceClosed { round_id: Uuid },
}

/// Lifecycle of a round
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for feedback on the current guess
    Searching,
    /// The player confirmed the guess
    Solved,
    /// A round rule ended the round without an answer
    Abandoned,
}

impl State for RoundPhase {
    fn name(&self) -> &str {
        match self {
            Self::Searching => "Searching",
            Self::Solved => "Solved",
            Self::Abandoned => "Abandoned",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Solved | Self::Abandoned)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Abandoned)
    }
}

/// What happened on one poll
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The classifier had nothing new; the engine was not invoked
    Idle,
    /// The confidence gate dropped the prediction
    Filtered { prediction: Prediction },
    /// The window was narrowed to a new guess
    Guess { prediction: Prediction, guess: i32 },
    /// The label is not part of the vocabulary
    Unrecognized { prediction: Prediction },
    /// The guess was confirmed and the round is over
    Solved { prediction: Prediction, guess: i32 },
    /// A rule was broken and the round gave up
    Abandoned { violations: Vec<ViolationError> },
    /// A rule was broken and the round started over
    Restarted {
        violations: Vec<ViolationError>,
        guess: i32,
    },
    /// The classifier closed and the round gave up
    Closed,
    /// The round was already over; nothing was done
    Finished,
}

/// Result of a round, reported once it is final
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round_id: Uuid,
    pub phase: RoundPhase,
    pub guess: i32,
    pub steps: usize,
    pub unrecognized: usize,
    pub filtered: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// One play-through from reset to a confirmed guess.
pub struct Round {
    engine: GuessEngine,
    phase: RoundPhase,
    gate: Option<Guard<Prediction>>,
    rules: RoundRules,
    context: RoundContext,
}

impl Round {
    /// Start a round on a freshly reset engine
    pub fn new(mut engine: GuessEngine, rules: RoundRules) -> Self {
        engine.reset();
        Self {
            engine,
            phase: RoundPhase::Searching,
            gate: None,
            rules,
            context: RoundContext::start(),
        }
    }

    /// Only act on predictions the guard lets through
    pub fn with_gate(mut self, gate: Guard<Prediction>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn id(&self) -> Uuid {
        self.context.round_id
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn engine(&self) -> &GuessEngine {
        &self.engine
    }

    pub fn state(&self) -> &SearchState {
        self.engine.state()
    }

    pub fn guess(&self) -> i32 {
        self.engine.guess()
    }

    pub fn context(&self) -> &RoundContext {
        &self.context
    }

    pub fn is_final(&self) -> bool {
        self.phase.is_final()
    }

    /// Read the latest prediction from the environment.
    /// After running the effect, call apply_prediction() with its output.
    ///
    /// Fails with `SourceClosed` once the classifier is closed and has
    /// nothing left to hand out.
    pub fn poll(
        &self,
    ) -> impl Effect<Output = Option<Prediction>, Error = RoundError, Env = ClassifierEnv> {
        if self.phase.is_final() {
            return fail(RoundError::Finished {
                round_id: self.id(),
                phase: self.phase.name().to_string(),
            })
            .boxed();
        }

        let round_id = self.id();
        from_fn(move |env: &ClassifierEnv| match env.classifier.latest() {
            Some(prediction) => Ok(Some(prediction)),
            None if env.classifier.is_closed() => Err(RoundError::SourceClosed { round_id }),
            None => Ok(None),
        })
        .boxed()
    }

    /// Apply the output of poll() to the round.
    pub fn apply_prediction(&mut self, prediction: Option<Prediction>) -> TickOutcome {
        if self.phase.is_final() {
            return TickOutcome::Finished;
        }

        let outcome = match prediction {
            Some(prediction) => self.handle_prediction(prediction),
            None => TickOutcome::Idle,
        };

        if self.phase.is_final() {
            return outcome;
        }
        self.enforce_rules(outcome)
    }

    /// Give up because the classifier will never answer again.
    pub fn close(&mut self) -> TickOutcome {
        if self.phase.is_final() {
            return TickOutcome::Finished;
        }

        self.phase = RoundPhase::Abandoned;
        log::info!(
            "round {} abandoned: classifier closed at guess {}",
            self.context.round_id,
            self.engine.guess()
        );
        TickOutcome::Closed
    }

    /// Reset the search and begin a new round with a new id
    pub fn restart(&mut self) {
        self.engine.reset();
        self.context = RoundContext::start();
        self.phase = RoundPhase::Searching;
        log::info!(
            "round {} restarted, first guess {}",
            self.context.round_id,
            self.engine.guess()
        );
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            round_id: self.context.round_id,
            phase: self.phase,
            guess: self.engine.guess(),
            steps: self.context.steps,
            unrecognized: self.context.unrecognized,
            filtered: self.context.filtered,
            started_at: self.context.started_at,
            elapsed_ms: self.context.elapsed().as_millis() as u64,
        }
    }

    fn handle_prediction(&mut self, prediction: Prediction) -> TickOutcome {
        if let Some(gate) = &self.gate {
            if !gate.check(&prediction) {
                self.context.filtered += 1;
                log::debug!("filtered low-confidence {}", prediction.display_text());
                return TickOutcome::Filtered { prediction };
            }
        }

        let feedback = self.engine.matcher().parse(Some(prediction.label.as_str()));
        match self.engine.apply(feedback) {
            Step::Narrowed(guess) => {
                self.context.steps += 1;
                log::debug!(
                    "round {}: {} -> guess {}",
                    self.context.round_id,
                    feedback.name(),
                    guess
                );
                TickOutcome::Guess { prediction, guess }
            }
            Step::Correct(guess) => {
                self.phase = RoundPhase::Solved;
                log::info!(
                    "round {} solved: {} after {} steps",
                    self.context.round_id,
                    guess,
                    self.context.steps
                );
                TickOutcome::Solved { prediction, guess }
            }
            Step::Unrecognized => {
                self.context.unrecognized += 1;
                log::debug!("unrecognized label {:?}", prediction.label);
                TickOutcome::Unrecognized { prediction }
            }
        }
    }

    fn enforce_rules(&mut self, outcome: TickOutcome) -> TickOutcome {
        let violations: Vec<ViolationError> = match self.rules.enforce(&self.context) {
            Validation::Success(_) => return outcome,
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        };

        for violation in &violations {
            log::warn!("round {}: {}", self.context.round_id, violation);
        }

        match self.rules.violation_strategy() {
            ViolationStrategy::Abandon => {
                self.phase = RoundPhase::Abandoned;
                log::info!("round {} abandoned", self.context.round_id);
                TickOutcome::Abandoned { violations }
            }
            ViolationStrategy::Restart => {
                self.restart();
                TickOutcome::Restarted {
                    violations,
                    guess: self.engine.guess(),
                }
            }
            ViolationStrategy::IgnoreAndLog => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::classifier::{ChannelClassifier, ScriptedClassifier};
    use crate::enforcement::RulesBuilder;

    fn confident(label: &str) -> Option<Prediction> {
        Some(Prediction::new(label, 0.95))
    }

    fn round() -> Round {
        Round::new(GuessEngine::new(), RoundRules::unlimited())
    }

    #[test]
    fn phase_state_properties() {
        assert!(!RoundPhase::Searching.is_final());
        assert!(RoundPhase::Solved.is_final());
        assert!(!RoundPhase::Solved.is_error());
        assert!(RoundPhase::Abandoned.is_final());
        assert!(RoundPhase::Abandoned.is_error());
        assert_eq!(RoundPhase::Searching.name(), "Searching");
    }

    #[test]
    fn absent_prediction_is_idle() {
        let mut round = round();

        assert_eq!(round.apply_prediction(None), TickOutcome::Idle);
        assert_eq!(round.guess(), 50);
        assert_eq!(round.context().steps, 0);
    }

    #[test]
    fn feedback_narrows_then_solves() {
        let mut round = round();

        assert_eq!(
            round.apply_prediction(confident("lower")),
            TickOutcome::Guess {
                prediction: Prediction::new("lower", 0.95),
                guess: 25
            }
        );
        assert_eq!(
            round.apply_prediction(confident("higher")),
            TickOutcome::Guess {
                prediction: Prediction::new("higher", 0.95),
                guess: 37
            }
        );
        assert_eq!(
            round.apply_prediction(confident("stop")),
            TickOutcome::Solved {
                prediction: Prediction::new("stop", 0.95),
                guess: 37
            }
        );

        assert_eq!(round.phase(), RoundPhase::Solved);
        assert_eq!(round.context().steps, 2);
        assert_eq!(round.apply_prediction(confident("lower")), TickOutcome::Finished);
        assert_eq!(round.guess(), 37);
    }

    #[test]
    fn unrecognized_label_is_counted_not_applied() {
        let mut round = round();

        let outcome = round.apply_prediction(confident("banana"));
        assert!(matches!(outcome, TickOutcome::Unrecognized { .. }));
        assert_eq!(round.context().unrecognized, 1);
        assert_eq!(round.state(), &SearchState::initial(Default::default()));
    }

    #[test]
    fn gate_filters_low_confidence() {
        let mut round = round().with_gate(Guard::new(|p: &Prediction| p.confidence >= 0.5));

        let outcome = round.apply_prediction(Some(Prediction::new("lower", 0.2)));
        assert!(matches!(outcome, TickOutcome::Filtered { .. }));
        assert_eq!(round.guess(), 50);

        let outcome = round.apply_prediction(Some(Prediction::new("lower", 0.8)));
        assert!(matches!(outcome, TickOutcome::Guess { guess: 25, .. }));
    }

    #[test]
    fn abandon_strategy_ends_the_round() {
        let rules = RulesBuilder::new()
            .max_unrecognized(1)
            .on_violation(ViolationStrategy::Abandon)
            .build();
        let mut round = Round::new(GuessEngine::new(), rules);

        assert!(matches!(
            round.apply_prediction(confident("???")),
            TickOutcome::Unrecognized { .. }
        ));

        match round.apply_prediction(confident("???")) {
            TickOutcome::Abandoned { violations } => {
                assert_eq!(
                    violations,
                    vec![ViolationError::TooManyUnrecognized { max: 1, current: 2 }]
                );
            }
            other => panic!("Expected Abandoned, got {other:?}"),
        }
        assert_eq!(round.phase(), RoundPhase::Abandoned);
        assert!(round.is_final());
    }

    #[test]
    fn restart_strategy_resets_search() {
        let rules = RulesBuilder::new()
            .max_steps(2)
            .on_violation(ViolationStrategy::Restart)
            .build();
        let mut round = Round::new(GuessEngine::new(), rules);
        let first_id = round.id();

        round.apply_prediction(confident("lower"));
        round.apply_prediction(confident("lower"));
        let outcome = round.apply_prediction(confident("lower"));

        assert!(matches!(outcome, TickOutcome::Restarted { guess: 50, .. }));
        assert_eq!(round.phase(), RoundPhase::Searching);
        assert_eq!(round.context().steps, 0);
        assert_ne!(round.id(), first_id);
    }

    #[test]
    fn ignore_strategy_keeps_playing() {
        let rules = RulesBuilder::new()
            .max_steps(0)
            .on_violation(ViolationStrategy::IgnoreAndLog)
            .build();
        let mut round = Round::new(GuessEngine::new(), rules);

        let outcome = round.apply_prediction(confident("lower"));
        assert!(matches!(outcome, TickOutcome::Guess { guess: 25, .. }));
        assert_eq!(round.phase(), RoundPhase::Searching);
    }

    #[test]
    fn filtered_predictions_count_against_the_limit() {
        let rules = RulesBuilder::new().max_filtered(1).build();
        let mut round = Round::new(GuessEngine::new(), rules)
            .with_gate(Guard::new(|p: &Prediction| p.confidence >= 0.5));

        let weak = Some(Prediction::new("lower", 0.1));
        assert!(matches!(
            round.apply_prediction(weak.clone()),
            TickOutcome::Filtered { .. }
        ));
        assert!(matches!(
            round.apply_prediction(weak),
            TickOutcome::Abandoned { .. }
        ));
        assert_eq!(round.summary().filtered, 2);
    }

    #[test]
    fn close_abandons_an_open_round() {
        let mut round = round();
        round.apply_prediction(confident("lower"));

        assert_eq!(round.close(), TickOutcome::Closed);
        assert_eq!(round.phase(), RoundPhase::Abandoned);
        assert_eq!(round.guess(), 25);
        assert_eq!(round.close(), TickOutcome::Finished);
    }

    #[test]
    fn solving_skips_rule_checks() {
        let rules = RulesBuilder::new().max_steps(0).build();
        let mut round = Round::new(GuessEngine::new(), rules);

        let outcome = round.apply_prediction(confident("stop"));
        assert!(matches!(outcome, TickOutcome::Solved { guess: 50, .. }));
    }

    #[test]
    fn new_round_resets_a_used_engine() {
        let mut engine = GuessEngine::new();
        engine.narrow_upper();

        let round = Round::new(engine, RoundRules::unlimited());
        assert_eq!(round.guess(), 50);
    }

    #[test]
    fn summary_reports_progress() {
        let mut round = round();
        round.apply_prediction(confident("higher"));
        round.apply_prediction(confident("nope"));
        round.apply_prediction(confident("stop"));

        let summary = round.summary();
        assert_eq!(summary.round_id, round.id());
        assert_eq!(summary.phase, RoundPhase::Solved);
        assert_eq!(summary.guess, 75);
        assert_eq!(summary.steps, 1);
        assert_eq!(summary.unrecognized, 1);
    }

    #[test]
    fn tick_outcome_serializes_with_tag() {
        let outcome = TickOutcome::Guess {
            prediction: Prediction::new("lower", 0.5),
            guess: 25,
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["outcome"], "guess");
        assert_eq!(json["guess"], 25);
        assert_eq!(json["prediction"]["label"], "lower");
    }

    #[tokio::test]
    async fn poll_reads_from_environment() {
        let mut round = round();
        let env = ClassifierEnv::new(ScriptedClassifier::new(vec![
            None,
            confident("lower"),
            confident("stop"),
        ]));

        let first = round.poll().run(&env).await.unwrap();
        assert_eq!(round.apply_prediction(first), TickOutcome::Idle);

        let second = round.poll().run(&env).await.unwrap();
        assert!(matches!(
            round.apply_prediction(second),
            TickOutcome::Guess { guess: 25, .. }
        ));

        let third = round.poll().run(&env).await.unwrap();
        assert!(matches!(
            round.apply_prediction(third),
            TickOutcome::Solved { guess: 25, .. }
        ));
    }

    #[tokio::test]
    async fn poll_reports_a_closed_channel() {
        let round = round();
        let (tx, rx) = crossbeam_channel::unbounded();
        let env = ClassifierEnv::new(ChannelClassifier::in_order(rx));

        tx.send(Prediction::new("lower", 1.0)).unwrap();
        drop(tx);

        let first = round.poll().run(&env).await.unwrap();
        assert_eq!(first, Some(Prediction::new("lower", 1.0)));

        let second = round.poll().run(&env).await;
        assert!(matches!(second, Err(RoundError::SourceClosed { .. })));
    }

    #[tokio::test]
    async fn poll_fails_once_round_is_final() {
        let mut round = round();
        round.apply_prediction(confident("stop"));

        let env = ClassifierEnv::new(ScriptedClassifier::from_labels(["lower"]));
        let result = round.poll().run(&env).await;

        assert!(matches!(result, Err(RoundError::Finished { .. })));
    }
}
