//! Oracle Round
//!
//! This example plays full rounds against a truthful stand-in player.
//!
//! Key concepts:
//! - Building a game from code with `GameBuilder`
//! - Sharing the displayed guess with the oracle through a `GuessBoard`
//! - Round rules that give up on a noisy classifier
//! - Observing every tick of `play_round`
//!
//! Run with: cargo run --example oracle_round

use gesture_guess::builder::GameBuilder;
use gesture_guess::core::LabelMatcher;
use gesture_guess::effects::{ClassifierEnv, GuessBoard, OracleClassifier, ScriptedClassifier};
use gesture_guess::enforcement::RulesBuilder;
use gesture_guess::TickOutcome;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(20);

#[tokio::main]
async fn main() {
    println!("=== Oracle Round Example ===\n");

    for target in [0, 37, 68, 100] {
        solve_for(target).await;
    }

    give_up_on_noise().await;
}

async fn solve_for(target: i32) {
    println!("Player thinks of {target}");

    let board = GuessBoard::new();
    let oracle = OracleClassifier::new(target, board.clone(), LabelMatcher::default());
    let mut game = GameBuilder::new()
        .poll_interval(TICK)
        .build(ClassifierEnv::new(oracle))
        .expect("default settings are valid");

    board.show(game.round().guess());
    println!("  Computer Guess: {}", game.round().guess());

    let summary = game
        .play_round(|round, outcome| {
            board.show(round.guess());
            match outcome {
                TickOutcome::Guess { prediction, guess } => {
                    println!("  Player: {:<6} -> Computer Guess: {guess}", prediction.label);
                }
                TickOutcome::Solved { guess, .. } => println!("  Player: stop   -> Got it: {guess}"),
                _ => {}
            }
        })
        .await
        .expect("round is open");

    println!("  Solved in {} steps\n", summary.steps);
}

async fn give_up_on_noise() {
    println!("Classifier that never sees a known gesture");

    let noise = ScriptedClassifier::from_labels(["thumbs_sideways", "wave", "peace", "fist"]);
    let mut game = GameBuilder::new()
        .poll_interval(TICK)
        .rules(RulesBuilder::new().max_unrecognized(2).build())
        .build(ClassifierEnv::new(noise))
        .expect("default settings are valid");

    let summary = game
        .play_round(|_, outcome| match outcome {
            TickOutcome::Unrecognized { prediction } => {
                println!("  Didn't catch that: {}", prediction.display_text());
            }
            TickOutcome::Abandoned { violations } => {
                for violation in violations {
                    println!("  Giving up: {violation}");
                }
            }
            _ => {}
        })
        .await
        .expect("round is open");

    println!("  Final phase: {:?}\n", summary.phase);
}
