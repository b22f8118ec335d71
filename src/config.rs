//! TOML configuration for the game binary.
//!
//! Every section is optional; missing keys fall back to the defaults the
//! builder uses. Validation happens in [`GameBuilder::build`].

use crate::builder::GameBuilder;
use crate::core::{LabelMatcher, DEFAULT_HIGH, DEFAULT_LOW};
use crate::enforcement::{RoundRules, RulesBuilder, ViolationStrategy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub range: RangeConfig,
    pub labels: LabelMatcher,
    pub poll: PollConfig,
    pub rules: RulesConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeConfig {
    pub low: i32,
    pub high: i32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub min_confidence: f32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3_000,
            min_confidence: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub max_steps: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub max_unrecognized: Option<usize>,
    pub max_filtered: Option<usize>,
    pub on_violation: ViolationStrategy,
}

impl RulesConfig {
    pub fn to_rules(&self) -> RoundRules {
        let mut builder = RulesBuilder::new().on_violation(self.on_violation);
        if let Some(max) = self.max_steps {
            builder = builder.max_steps(max);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(max) = self.max_unrecognized {
            builder = builder.max_unrecognized(max);
        }
        if let Some(max) = self.max_filtered {
            builder = builder.max_filtered(max);
        }
        builder.build()
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }

    /// Builder preloaded with these settings.
    pub fn builder(&self) -> GameBuilder {
        GameBuilder::new()
            .range(self.range.low, self.range.high)
            .matcher(self.labels.clone())
            .poll_interval(self.poll_interval())
            .min_confidence(self.poll.min_confidence)
            .rules(self.rules.to_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();

        assert_eq!(config, GameConfig::default());
        assert_eq!(config.range.low, 0);
        assert_eq!(config.range.high, 100);
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert!(!config.labels.case_sensitive);
        assert!(config.labels.trim);
        assert_eq!(config.rules.on_violation, ViolationStrategy::Abandon);
    }

    #[test]
    fn full_config_parses() {
        let raw = r#"
            [range]
            low = 1
            high = 64

            [labels]
            higher = "thumbs_up"
            lower = "thumbs_down"
            stop = "palm"
            case_sensitive = true
            trim = false

            [poll]
            interval_ms = 1500
            min_confidence = 0.75

            [rules]
            max_steps = 12
            timeout_secs = 300
            max_unrecognized = 20
            max_filtered = 30
            on_violation = "ignore-and-log"
        "#;

        let config = GameConfig::from_toml_str(raw).unwrap();

        assert_eq!(config.range.low, 1);
        assert_eq!(config.range.high, 64);
        assert_eq!(config.labels.higher, "thumbs_up");
        assert!(config.labels.case_sensitive);
        assert!(!config.labels.trim);
        assert_eq!(config.poll_interval(), Duration::from_millis(1500));
        assert_eq!(config.poll.min_confidence, 0.75);

        let rules = config.rules.to_rules();
        assert_eq!(rules.max_steps(), Some(12));
        assert_eq!(rules.timeout(), Some(Duration::from_secs(300)));
        assert_eq!(rules.max_unrecognized(), Some(20));
        assert_eq!(rules.max_filtered(), Some(30));
        assert_eq!(rules.violation_strategy(), ViolationStrategy::IgnoreAndLog);
    }

    #[test]
    fn partial_label_section_keeps_other_defaults() {
        let config = GameConfig::from_toml_str("[labels]\nstop = \"fist\"\n").unwrap();

        assert_eq!(config.labels.stop, "fist");
        assert_eq!(config.labels.higher, "higher");
        assert_eq!(config.labels.lower, "lower");
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let result = GameConfig::from_toml_str("[range\nlow = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = GameConfig::from_toml_str("[poll]\ninterval = 10\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GameConfig::load("/nonexistent/gesture-guess.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gesture-guess.toml"));
    }

    #[test]
    fn builder_carries_config_into_game() {
        use crate::effects::{ClassifierEnv, ScriptedClassifier};

        let config = GameConfig::from_toml_str("[range]\nlow = 10\nhigh = 20\n").unwrap();
        let game = config
            .builder()
            .build(ClassifierEnv::new(ScriptedClassifier::new(Vec::new())))
            .unwrap();

        assert_eq!(game.round().guess(), 15);
    }
}
