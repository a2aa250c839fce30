//! Scorers: strategies that rank candidates against the promoted context.

pub mod precision;
pub mod prior;
pub mod ranking;
pub mod reliability;

use std::sync::Arc;

use espresso_core::config::ScorerKind;
use espresso_core::errors::BootstrapError;
use espresso_core::traits::{PriorScores, StatisticsProvider};
use espresso_core::types::{ArgumentTuple, Pattern, Ranked};

pub use precision::PrecisionCountScorer;
pub use prior::PriorScoreSnapshot;
pub use reliability::ReliabilityScorer;

/// What a scorer knows about the phase it is scoring.
pub struct PhaseContext<'a> {
    pub relation: &'a str,
    pub iteration: u32,
    /// Scores persisted by earlier phases.
    pub prior: &'a dyn PriorScores,
}

/// Ranks candidates. Output is sorted by score descending, ties broken by
/// value ascending. Missing statistics count as zero.
pub trait Scorer: Send + Sync {
    fn kind(&self) -> ScorerKind;

    /// Scores pattern `candidates` against promoted `instances`.
    fn rank_patterns(
        &self,
        instances: &[ArgumentTuple],
        candidates: &[Pattern],
        ctx: &PhaseContext<'_>,
    ) -> Result<Vec<Ranked<Pattern>>, BootstrapError>;

    /// Scores instance `candidates` against promoted `patterns`.
    fn rank_instances(
        &self,
        candidates: &[ArgumentTuple],
        patterns: &[Pattern],
        ctx: &PhaseContext<'_>,
    ) -> Result<Vec<Ranked<ArgumentTuple>>, BootstrapError>;
}

pub fn build_scorer(kind: ScorerKind, stats: Arc<dyn StatisticsProvider>) -> Arc<dyn Scorer> {
    match kind {
        ScorerKind::Reliability => Arc::new(ReliabilityScorer::new(stats)),
        ScorerKind::PrecisionCount => Arc::new(PrecisionCountScorer::new(stats)),
    }
}
