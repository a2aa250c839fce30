//! Statistics lookup errors.

use super::error_code::{self, EspressoErrorCode};

/// Errors from the statistics provider.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// No co-occurrence evidence for the requested key. Callers treat this
    /// as zero weight.
    #[error("No co-occurrence evidence for {key}")]
    NotFound { key: String },

    #[error("Co-occurrence matrix is empty")]
    EmptyMatrix,

    #[error("Matrix mixes arities {expected} and {found}")]
    MixedArity { expected: usize, found: usize },
}

impl StatsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl EspressoErrorCode for StatsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::NOT_FOUND,
            _ => error_code::STATS_ERROR,
        }
    }
}
