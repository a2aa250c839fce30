//! Per-relation bootstrap state and engine options.

use espresso_core::config::{Algorithm, EspressoConfig, ScorerKind};
use espresso_core::constants::{DEFAULT_MATRIX, DEFAULT_MUTEX_THRESHOLD, DEFAULT_TOP_N};
use espresso_core::errors::ConfigError;

/// `Seeded -> PatternPhase -> InstancePhase -> (loop) -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Created,
    Seeded,
    PatternPhase,
    InstancePhase,
    Done,
}

/// Options shared by every relation of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub matrix: String,
    pub n: usize,
    pub keep: bool,
    pub scorer: ScorerKind,
    pub algorithm: Algorithm,
    pub mutex_threshold: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            matrix: DEFAULT_MATRIX.to_string(),
            n: DEFAULT_TOP_N,
            keep: false,
            scorer: ScorerKind::Reliability,
            algorithm: Algorithm::Cpl,
            mutex_threshold: DEFAULT_MUTEX_THRESHOLD,
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &EspressoConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            matrix: config.store.effective_matrix().to_string(),
            n: config.boot.effective_n(),
            keep: config.boot.effective_keep(),
            scorer: config.boot.effective_scorer()?,
            algorithm: config.boot.effective_algorithm(),
            mutex_threshold: config.boot.effective_mutex_threshold(),
        })
    }

    /// Storage namespace for `relation`:
    /// `<matrix>_<relation>_<algorithm>_<scorer>_<keep|nokeep>`.
    pub fn namespace(&self, relation: &str) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.matrix,
            relation,
            self.algorithm.tag(),
            self.scorer.tag(),
            if self.keep { "keep" } else { "nokeep" }
        )
    }
}

/// Mutable state of one relation's engine.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapState {
    pub relation: String,
    pub namespace: String,
    pub arity: usize,
    pub keep: bool,
    pub n: usize,
    pub iteration: u32,
    pub phase: EnginePhase,
}
