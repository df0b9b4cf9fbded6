//! Error types.
//!
//! Configuration and instance errors are fatal at startup; nothing in the
//! optimization loop itself can fail once both have been validated.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error("failed to write results to {path}: {source}")]
    Results {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An ACS parameter is outside its admissible range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("n_ants must be at least 1")]
    NoAnts,

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    NotUnitInterval { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1), got {value}")]
    NotRate { name: &'static str, value: f64 },

    #[error("stagnation limit for local search must be at least 1")]
    ZeroStagnation,

    #[error("runs must be at least 1")]
    NoRuns,
}

/// The instance could not be loaded or is structurally invalid.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("cannot read instance {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("instance must have at least one job and one machine, got {jobs}x{machines}")]
    Empty { jobs: usize, machines: usize },

    #[error("expected {expected} values for {what}, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {what} for job {job}: {value}")]
    Value {
        what: &'static str,
        job: usize,
        value: f64,
    },
}

impl InstanceError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        InstanceError::Parse {
            line,
            message: message.into(),
        }
    }
}
