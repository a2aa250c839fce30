//! Precision / overlap-count scorer. Non-recursive; ignores prior scores.

use std::sync::Arc;

use espresso_core::config::ScorerKind;
use espresso_core::errors::BootstrapError;
use espresso_core::traits::StatisticsProvider;
use espresso_core::types::{ArgumentTuple, Pattern, Ranked};

use super::ranking::sort_ranked;
use super::{PhaseContext, Scorer};

pub struct PrecisionCountScorer {
    stats: Arc<dyn StatisticsProvider>,
}

impl PrecisionCountScorer {
    pub fn new(stats: Arc<dyn StatisticsProvider>) -> Self {
        Self { stats }
    }

    /// `Σ_{i∈I} F(i,p) / F(p)`; 0 when `F(p)` is unknown or zero.
    pub fn precision(&self, instances: &[ArgumentTuple], pattern: &Pattern) -> f64 {
        let f_p = self.stats.pattern_frequency(pattern).unwrap_or(0.0);
        if f_p <= 0.0 {
            return 0.0;
        }
        let overlap: f64 = instances
            .iter()
            .map(|i| self.stats.joint_or_zero(i, pattern))
            .sum();
        overlap / f_p
    }

    /// `Σ_{p∈P} F(i,p)`
    pub fn pattern_count(&self, instance: &ArgumentTuple, patterns: &[Pattern]) -> f64 {
        patterns
            .iter()
            .map(|p| self.stats.joint_or_zero(instance, p))
            .sum()
    }
}

impl Scorer for PrecisionCountScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::PrecisionCount
    }

    fn rank_patterns(
        &self,
        instances: &[ArgumentTuple],
        candidates: &[Pattern],
        _ctx: &PhaseContext<'_>,
    ) -> Result<Vec<Ranked<Pattern>>, BootstrapError> {
        let mut ranked: Vec<Ranked<Pattern>> = candidates
            .iter()
            .map(|p| Ranked::new(p.clone(), self.precision(instances, p)))
            .collect();
        sort_ranked(&mut ranked);
        Ok(ranked)
    }

    fn rank_instances(
        &self,
        candidates: &[ArgumentTuple],
        patterns: &[Pattern],
        _ctx: &PhaseContext<'_>,
    ) -> Result<Vec<Ranked<ArgumentTuple>>, BootstrapError> {
        let mut ranked: Vec<Ranked<ArgumentTuple>> = candidates
            .iter()
            .map(|i| Ranked::new(i.clone(), self.pattern_count(i, patterns)))
            .collect();
        sort_ranked(&mut ranked);
        Ok(ranked)
    }
}
