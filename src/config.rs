// System
use std::time::Duration;

// Third Party
use clap::{builder::FalseyValueParser, Parser};
use thiserror::Error;
use tracing::Level;

/// How often nodes are checked when nothing else is configured.
pub const DEFAULT_FREQUENCY: &str = "120s";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration {0:?}, expected e.g. 120s or 2m")]
pub struct InvalidDuration(String);

/// Delete Kubernetes nodes whose EC2 instance is no longer running.
#[derive(Parser, Debug, Clone)]
#[command(name = "cleanup", version)]
pub struct Config {
    /// How frequently to check for nodes to cleanup
    #[arg(long, env = "FREQUENCY", default_value = DEFAULT_FREQUENCY, value_parser = parse_duration)]
    pub frequency: Duration,

    /// Only log, don't delete nodes
    #[arg(long = "dry", env = "DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,

    /// AWS region to query, instead of the one found by the default provider chain
    #[arg(long)]
    pub region: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency: Duration::from_secs(120),
            dry_run: false,
            region: None,
            log_level: Level::INFO,
        }
    }
}

/// Parse a duration such as `120s`, `2m` or `1h 30m`. Zero is rejected since the loop can't tick
/// at a zero interval.
pub fn parse_duration(value: &str) -> Result<Duration, InvalidDuration> {
    humantime::parse_duration(value)
        .ok()
        .filter(|duration| !duration.is_zero())
        .ok_or_else(|| InvalidDuration(value.to_string()))
}
