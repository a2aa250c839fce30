//! Espresso reliability scorer.
//!
//! ```text
//! r_p(I, p) = (1/|I|) · Σ_{i∈I} dpmi(i,p) · r_i(i) / maxPMI
//! r_i(i, P) = (1/|P|) · Σ_{p∈P} dpmi(i,p) · r_p(p) / maxPMI
//! ```
//!
//! `r_i` and `r_p` on the right-hand side come from the prior-phase
//! snapshot, never from a live recursive call.

use std::sync::Arc;

use espresso_core::config::ScorerKind;
use espresso_core::errors::BootstrapError;
use espresso_core::traits::{PriorScores, StatisticsProvider};
use espresso_core::types::{ArgumentTuple, Pattern, Ranked, Role};

use super::ranking::sort_ranked;
use super::{PhaseContext, Scorer};

pub struct ReliabilityScorer {
    stats: Arc<dyn StatisticsProvider>,
}

impl ReliabilityScorer {
    pub fn new(stats: Arc<dyn StatisticsProvider>) -> Self {
        Self { stats }
    }

    /// `maxPMI`, or 1 when the matrix has no positive discounted PMI.
    pub fn normalizer(&self) -> f64 {
        let max = self.stats.max_discounted_pmi();
        if max > 0.0 && max.is_finite() {
            max
        } else {
            1.0
        }
    }

    pub fn pattern_reliability(
        &self,
        instances: &[ArgumentTuple],
        pattern: &Pattern,
        prior: &dyn PriorScores,
    ) -> f64 {
        if instances.is_empty() {
            return 0.0;
        }
        let max = self.normalizer();
        let sum: f64 = instances
            .iter()
            .map(|i| {
                self.stats.discounted_pmi_or_zero(i, pattern) * prior.instance_reliability(i) / max
            })
            .sum();
        sum / instances.len() as f64
    }

    pub fn instance_reliability(
        &self,
        instance: &ArgumentTuple,
        patterns: &[Pattern],
        prior: &dyn PriorScores,
    ) -> f64 {
        if patterns.is_empty() {
            return 0.0;
        }
        let max = self.normalizer();
        let sum: f64 = patterns
            .iter()
            .map(|p| {
                self.stats.discounted_pmi_or_zero(instance, p) * prior.pattern_reliability(p) / max
            })
            .sum();
        sum / patterns.len() as f64
    }

    /// Confidence in `instance` weighted by the reliability mass of `patterns`:
    /// `Σ_p dpmi(i,p)·r_p(p) / Σ_p r_p(p)`, 0 when that mass is 0. Not
    /// normalized by the matrix maximum.
    pub fn confidence(
        &self,
        instance: &ArgumentTuple,
        patterns: &[Pattern],
        prior: &dyn PriorScores,
    ) -> f64 {
        let mass: f64 = patterns.iter().map(|p| prior.pattern_reliability(p)).sum();
        if mass == 0.0 {
            return 0.0;
        }
        let weighted: f64 = patterns
            .iter()
            .map(|p| self.stats.discounted_pmi_or_zero(instance, p) * prior.pattern_reliability(p))
            .sum();
        weighted / mass
    }
}

impl Scorer for ReliabilityScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Reliability
    }

    fn rank_patterns(
        &self,
        instances: &[ArgumentTuple],
        candidates: &[Pattern],
        ctx: &PhaseContext<'_>,
    ) -> Result<Vec<Ranked<Pattern>>, BootstrapError> {
        if instances.is_empty() {
            return Err(BootstrapError::EmptyCandidateSet {
                relation: ctx.relation.to_string(),
                role: Role::Instance,
                iteration: ctx.iteration,
            });
        }
        let mut ranked: Vec<Ranked<Pattern>> = candidates
            .iter()
            .map(|p| Ranked::new(p.clone(), self.pattern_reliability(instances, p, ctx.prior)))
            .collect();
        sort_ranked(&mut ranked);
        Ok(ranked)
    }

    fn rank_instances(
        &self,
        candidates: &[ArgumentTuple],
        patterns: &[Pattern],
        ctx: &PhaseContext<'_>,
    ) -> Result<Vec<Ranked<ArgumentTuple>>, BootstrapError> {
        if patterns.is_empty() {
            return Err(BootstrapError::EmptyCandidateSet {
                relation: ctx.relation.to_string(),
                role: Role::Pattern,
                iteration: ctx.iteration,
            });
        }
        let mut ranked: Vec<Ranked<ArgumentTuple>> = candidates
            .iter()
            .map(|i| Ranked::new(i.clone(), self.instance_reliability(i, patterns, ctx.prior)))
            .collect();
        sort_ranked(&mut ranked);
        Ok(ranked)
    }
}
