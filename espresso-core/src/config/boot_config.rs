//! Bootstrapping options and the enums they select.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MUTEX_THRESHOLD, DEFAULT_START_ITERATION, DEFAULT_STOP_ITERATION, DEFAULT_TOP_N,
};
use crate::errors::ConfigError;

/// Scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScorerKind {
    Reliability,
    PrecisionCount,
}

impl ScorerKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Reliability => "reliability",
            Self::PrecisionCount => "precision-count",
        }
    }

    /// Short tag used in relation namespaces.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Reliability => "rel",
            Self::PrecisionCount => "prec",
        }
    }
}

impl FromStr for ScorerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reliability" => Ok(Self::Reliability),
            "precision-count" | "precision_count" | "precision" => Ok(Self::PrecisionCount),
            _ => Err(ConfigError::UnknownScorer {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-relation Espresso or coupled multi-relation learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Espresso,
    Cpl,
}

impl Algorithm {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Espresso => "esp",
            Self::Cpl => "cpl",
        }
    }
}

/// What the coordinator collects from each relation to build mutex sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutexSource {
    /// Ranked candidates of the current phase before top-N truncation.
    Candidates,
    /// Values actually promoted in the current phase.
    Promotions,
}

/// Options shared by every relation of a run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BootConfig {
    /// Promotions kept per phase. Default: 10.
    pub n: Option<usize>,
    /// Accumulate promotions across all past iterations. Default: false.
    pub keep: Option<bool>,
    /// Clear promotions before iteration 1. Default: false.
    pub reset: Option<bool>,
    /// `reliability` or `precision-count`. Default: reliability.
    pub scorer: Option<String>,
    /// Default: cpl.
    pub algorithm: Option<Algorithm>,
    /// Mutex filter multiplier. Default: 3.0.
    pub mutex_threshold: Option<f64>,
    /// Default: candidates.
    pub mutex_source: Option<MutexSource>,
    /// Worker threads. Default: one per relation.
    pub workers: Option<usize>,
    /// First iteration. Default: 1.
    pub start: Option<u32>,
    /// Last iteration, inclusive. Default: 10.
    pub stop: Option<u32>,
}

impl BootConfig {
    pub fn effective_n(&self) -> usize {
        self.n.unwrap_or(DEFAULT_TOP_N)
    }

    pub fn effective_keep(&self) -> bool {
        self.keep.unwrap_or(false)
    }

    pub fn effective_reset(&self) -> bool {
        self.reset.unwrap_or(false)
    }

    pub fn effective_scorer(&self) -> Result<ScorerKind, ConfigError> {
        match &self.scorer {
            Some(name) => name.parse(),
            None => Ok(ScorerKind::Reliability),
        }
    }

    pub fn effective_algorithm(&self) -> Algorithm {
        self.algorithm.unwrap_or(Algorithm::Cpl)
    }

    pub fn effective_mutex_threshold(&self) -> f64 {
        self.mutex_threshold.unwrap_or(DEFAULT_MUTEX_THRESHOLD)
    }

    pub fn effective_mutex_source(&self) -> MutexSource {
        self.mutex_source.unwrap_or(MutexSource::Candidates)
    }

    pub fn effective_start(&self) -> u32 {
        self.start.unwrap_or(DEFAULT_START_ITERATION)
    }

    pub fn effective_stop(&self) -> u32 {
        self.stop.unwrap_or(DEFAULT_STOP_ITERATION)
    }
}
