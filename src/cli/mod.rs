//! CLI command implementations for Forage.

pub(crate) mod batch;
pub(crate) mod run;

mod output;

use clap::ValueEnum;
use forage::ConfigError;
use thiserror::Error;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format, one row per run.
    Csv,
}

/// CLI error type.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The arguments produce a configuration that cannot run.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Output could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// Any other argument problem.
    #[error("{0}")]
    Usage(String),
}
