//! Mutual-exclusion filter between candidate generation and scoring.
//!
//! A candidate survives when
//! `cooc(c, context) > threshold · cooc(c, mutex)`, with
//! `cooc(c, S) = Σ_{s∈S} F(c, s)`. An empty mutex set passes everything.

use espresso_core::constants::DEFAULT_MUTEX_THRESHOLD;
use espresso_core::traits::StatisticsProvider;
use espresso_core::types::{ArgumentTuple, Pattern};

use super::set::MutexSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutexFilter {
    threshold: f64,
}

impl Default for MutexFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MUTEX_THRESHOLD)
    }
}

impl MutexFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Keeps patterns that co-occur with `context` instances more than
    /// `threshold` times as much as with competing instances.
    pub fn filter_patterns(
        &self,
        stats: &dyn StatisticsProvider,
        candidates: Vec<Pattern>,
        context: &[ArgumentTuple],
        mutex: &MutexSet<ArgumentTuple>,
    ) -> Vec<Pattern> {
        if mutex.is_empty() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|p| {
                let own: f64 = context.iter().map(|i| stats.joint_or_zero(i, p)).sum();
                let rival: f64 = mutex.iter().map(|i| stats.joint_or_zero(i, p)).sum();
                own > self.threshold * rival
            })
            .collect()
    }

    /// Keeps instances that co-occur with `context` patterns more than
    /// `threshold` times as much as with competing patterns.
    pub fn filter_instances(
        &self,
        stats: &dyn StatisticsProvider,
        candidates: Vec<ArgumentTuple>,
        context: &[Pattern],
        mutex: &MutexSet<Pattern>,
    ) -> Vec<ArgumentTuple> {
        if mutex.is_empty() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|i| {
                let own: f64 = context.iter().map(|p| stats.joint_or_zero(i, p)).sum();
                let rival: f64 = mutex.iter().map(|p| stats.joint_or_zero(i, p)).sum();
                own > self.threshold * rival
            })
            .collect()
    }
}
