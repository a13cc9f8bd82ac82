//! Error types for Forage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A configuration that cannot drive a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The grid needs at least one cell.
    #[error("grid size must be at least 1")]
    ZeroGridSize,
    /// A probability outside `[0, 1]` or NaN.
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability {
        /// Offending field.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A negative or non-finite energy constant.
    #[error("{name} must be a finite, non-negative energy, got {value}")]
    InvalidEnergy {
        /// Offending field.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Strategies need to see at least their immediate neighbours.
    #[error("vision radius must be at least 1")]
    ZeroVisionRadius,
    /// A prepared grid does not match the configured size.
    #[error("grid has size {actual} but the configuration expects {expected}")]
    GridSizeMismatch {
        /// Configured grid size.
        expected: u16,
        /// Size of the supplied grid.
        actual: u16,
    },
}

/// Failure while writing simulation history to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output file could not be created.
    #[error("failed to create {}: {source}", path.display())]
    Create {
        /// Path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Writing rows failed.
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
}
