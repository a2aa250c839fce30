//! Aggregate error for bootstrapping runs.

use super::config_error::ConfigError;
use super::error_code::{self, EspressoErrorCode};
use super::stats_error::StatsError;
use super::storage_error::StorageError;
use crate::types::Role;

/// Errors surfaced by the engine and the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    /// A phase had nothing to score against. The phase promotes nothing.
    #[error("Empty {role} set for {relation} at iteration {iteration}")]
    EmptyCandidateSet {
        relation: String,
        role: Role,
        iteration: u32,
    },

    #[error("Worker for {relation} panicked: {message}")]
    WorkerPanicked { relation: String, message: String },
}

impl BootstrapError {
    pub fn is_empty_candidate_set(&self) -> bool {
        matches!(self, Self::EmptyCandidateSet { .. })
    }
}

impl EspressoErrorCode for BootstrapError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Stats(e) => e.error_code(),
            Self::EmptyCandidateSet { .. } => error_code::EMPTY_CANDIDATE_SET,
            Self::WorkerPanicked { .. } => error_code::WORKER_PANICKED,
        }
    }
}
