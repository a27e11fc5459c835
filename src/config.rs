//! Simulation configuration
//!
//! Loads run settings from an optional TOML file. Every field has a default,
//! so an empty file (or no file at all) reproduces the stock 100-iteration
//! run. Command-line flags are applied on top by the binary.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

use crate::models::SimulationParameters;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Parses a log level name, ignoring case.
pub fn parse_log_level(value: &str) -> Result<Level, ConfigError> {
    Level::from_str(value).map_err(|_| ConfigError::InvalidLogLevel(value.to_string()))
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_log_level(&s).map_err(serde::de::Error::custom)
}

/// How runs in a batch draw their random numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamMode {
    /// One stream shared by every run, consumed in run order.
    #[default]
    Continuous,
    /// A separate stream per run, derived from the seed and run index.
    PerRun,
}

impl std::fmt::Display for StreamMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamMode::Continuous => write!(f, "continuous"),
            StreamMode::PerRun => write!(f, "per-run"),
        }
    }
}

/// Files written after a batch completes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// PNG chart of every simulated path.
    pub paths_chart: Option<PathBuf>,
    /// PNG histogram of terminal prices.
    pub histogram_chart: Option<PathBuf>,
    /// JSON summary document.
    pub json: Option<PathBuf>,
}

/// Full run configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub initial_price: f64,
    pub drift: f64,
    pub volatility: f64,
    pub horizon_years: f64,
    pub steps: usize,
    pub path_count: usize,
    /// Number of runs in the batch; 1 is a single run.
    pub iterations: usize,
    /// Fixed seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub stream: StreamMode,
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: Level,
    pub output: OutputConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let params = SimulationParameters::default();
        Self {
            initial_price: params.initial_price,
            drift: params.drift,
            volatility: params.volatility,
            horizon_years: params.horizon_years,
            steps: params.steps,
            path_count: params.path_count,
            iterations: 100,
            seed: None,
            stream: StreamMode::default(),
            log_level: Level::INFO,
            output: OutputConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Simulation inputs. Not validated here; the simulator validates them.
    pub fn parameters(&self) -> SimulationParameters {
        SimulationParameters {
            initial_price: self.initial_price,
            drift: self.drift,
            volatility: self.volatility,
            horizon_years: self.horizon_years,
            steps: self.steps,
            path_count: self.path_count,
        }
    }
}
