//! Configuration errors.

use super::error_code::{self, EspressoErrorCode};

/// Errors raised while loading and validating a run configuration.
/// All of them are fatal and reported before any phase runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Relation '{relation}' has no seeds configured")]
    MissingSeeds { relation: String },

    #[error("Unknown scorer '{name}' (expected 'reliability' or 'precision-count')")]
    UnknownScorer { name: String },

    #[error("Relation '{relation}' references unknown mutex relation '{other}'")]
    UnknownRelation { relation: String, other: String },

    #[error("Invalid seed in {path} line {line}: {message}")]
    InvalidSeed {
        path: String,
        line: usize,
        message: String,
    },
}

impl EspressoErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
