use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::{unbounded, Sender};
use gesture_guess::config::GameConfig;
use gesture_guess::effects::{
    ChannelClassifier, ClassifierEnv, GuessBoard, OracleClassifier, Prediction, RoundSummary,
    TickOutcome,
};
use gesture_guess::{Game, Round, SearchRange};
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

#[derive(Parser)]
#[command(version, about, long_about = None)] // Reads it from `Cargo.toml`
#[command(propagate_version = true)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Override the poll interval in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    interval_ms: Option<u64>,

    /// Print tick outcomes and round summaries as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play with predictions read from stdin, one `label [confidence]` per line
    Play {
        /// Number of rounds to play
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,
    },
    /// Let a truthful stand-in answer for a known number
    Simulate {
        /// The number the stand-in is thinking of
        #[arg(short, long)]
        target: i32,

        /// Number of rounds to play
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(ms) = cli.interval_ms {
        config.poll.interval_ms = ms;
    }

    let reporter = Reporter { json: cli.json };

    match cli.command {
        Commands::Play { rounds } => play(&config, rounds, &reporter).await,
        Commands::Simulate { target, rounds } => {
            simulate(&config, target, rounds, &reporter).await
        }
    }
}

async fn play(config: &GameConfig, rounds: u32, reporter: &Reporter) -> Result<()> {
    let (tx, rx) = unbounded();
    spawn_stdin_reader(tx);

    let env = ClassifierEnv::new(ChannelClassifier::in_order(rx));
    let mut game = config.builder().build(env).context("building game")?;

    log::info!(
        "think of a number in [{}, {}]; answer with {:?}",
        config.range.low,
        config.range.high,
        config.labels.words()
    );
    run_rounds(&mut game, rounds, reporter, None).await
}

async fn simulate(config: &GameConfig, target: i32, rounds: u32, reporter: &Reporter) -> Result<()> {
    let range = SearchRange::new(config.range.low, config.range.high)?;
    if !range.contains(target) {
        bail!(
            "target {} is outside [{}, {}]",
            target,
            range.low(),
            range.high()
        );
    }

    let board = GuessBoard::new();
    let oracle = OracleClassifier::new(target, board.clone(), config.labels.clone());
    let mut game = config
        .builder()
        .build(ClassifierEnv::new(oracle))
        .context("building game")?;

    run_rounds(&mut game, rounds, reporter, Some(&board)).await
}

async fn run_rounds(
    game: &mut Game,
    rounds: u32,
    reporter: &Reporter,
    board: Option<&GuessBoard>,
) -> Result<()> {
    for n in 1..=rounds {
        if n > 1 {
            game.play_again();
        }

        let first_guess = game.round().guess();
        if let Some(board) = board {
            board.show(first_guess);
        }
        reporter.first_guess(first_guess);

        let on_tick = |round: &Round, outcome: &TickOutcome| {
            if let Some(board) = board {
                board.show(round.guess());
            }
            reporter.tick(outcome);
        };

        let round_id = game.round().id();
        let summary = tokio::select! {
            summary = game.play_round(on_tick) => summary?,
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupted, abandoning round {round_id}");
                return Ok(());
            }
        };
        reporter.summary(&summary)?;

        if game.source_closed() {
            log::info!("input closed after round {n} of {rounds}");
            break;
        }
    }
    Ok(())
}

fn spawn_stdin_reader(tx: Sender<Prediction>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::warn!("failed to read stdin: {err}");
                    break;
                }
            };
            let Some(prediction) = parse_prediction(&line) else {
                continue;
            };
            if tx.send(prediction).is_err() {
                break;
            }
        }
        log::debug!("stdin closed");
    });
}

/// Parse `label [confidence]`. Blank lines carry no prediction.
///
/// A trailing token that is not a finite number is part of the label.
fn parse_prediction(line: &str) -> Option<Prediction> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let scored = line.rsplit_once(char::is_whitespace).and_then(|(label, score)| {
        let confidence = score.parse::<f32>().ok().filter(|c| c.is_finite())?;
        Some(Prediction::new(label.trim_end(), confidence))
    });
    Some(scored.unwrap_or_else(|| Prediction::new(line, 1.0)))
}

struct Reporter {
    json: bool,
}

impl Reporter {
    fn first_guess(&self, guess: i32) {
        if !self.json {
            println!("Computer Guess: {guess}");
        }
    }

    fn tick(&self, outcome: &TickOutcome) {
        if self.json {
            match serde_json::to_string(outcome) {
                Ok(line) => println!("{line}"),
                Err(err) => log::error!("failed to encode tick: {err}"),
            }
            return;
        }

        match outcome {
            TickOutcome::Idle | TickOutcome::Finished => {}
            TickOutcome::Filtered { prediction } => {
                println!("Not sure about {}", prediction.display_text());
            }
            TickOutcome::Guess { prediction, guess } => {
                println!("You said {}", prediction.display_text());
                println!("Computer Guess: {guess}");
            }
            TickOutcome::Unrecognized { prediction } => {
                println!("Didn't catch that: {}", prediction.display_text());
            }
            TickOutcome::Solved { prediction, guess } => {
                println!("You said {}", prediction.display_text());
                println!("Your number is {guess}!");
            }
            TickOutcome::Abandoned { violations } => {
                for violation in violations {
                    println!("Giving up: {violation}");
                }
            }
            TickOutcome::Closed => {
                println!("Out of input, giving up");
            }
            TickOutcome::Restarted { violations, guess } => {
                for violation in violations {
                    println!("Starting over: {violation}");
                }
                println!("Computer Guess: {guess}");
            }
        }
    }

    fn summary(&self, summary: &RoundSummary) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(summary)?);
        } else {
            println!(
                "Round over ({:?}) after {} steps in {:.1}s",
                summary.phase,
                summary.steps,
                summary.elapsed_ms as f64 / 1000.0
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_with_confidence() {
        assert_eq!(
            parse_prediction("lower 0.82"),
            Some(Prediction::new("lower", 0.82))
        );
    }

    #[test]
    fn bare_label_is_fully_confident() {
        assert_eq!(parse_prediction(" stop "), Some(Prediction::new("stop", 1.0)));
    }

    #[test]
    fn label_may_contain_spaces() {
        assert_eq!(
            parse_prediction("thumbs up 0.5"),
            Some(Prediction::new("thumbs up", 0.5))
        );
        assert_eq!(
            parse_prediction("thumbs up"),
            Some(Prediction::new("thumbs up", 1.0))
        );
    }

    #[test]
    fn non_finite_confidence_stays_in_the_label() {
        assert_eq!(
            parse_prediction("lower NaN"),
            Some(Prediction::new("lower NaN", 1.0))
        );
        assert_eq!(
            parse_prediction("higher inf"),
            Some(Prediction::new("higher inf", 1.0))
        );
    }

    #[test]
    fn blank_line_has_no_prediction() {
        assert_eq!(parse_prediction(""), None);
        assert_eq!(parse_prediction("   "), None);
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "gesture-guess",
            "--json",
            "simulate",
            "--target",
            "42",
            "--rounds",
            "2",
        ])
        .unwrap();

        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Simulate {
                target: 42,
                rounds: 2
            }
        ));
    }
}
