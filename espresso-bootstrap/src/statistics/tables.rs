//! StatisticsTables: in-memory statistics built once per matrix.

use espresso_core::errors::{BootstrapError, StatsError};
use espresso_core::traits::{CooccurrenceSource, StatisticsProvider};
use espresso_core::types::{ArgumentTuple, FrequencyTables, FxHashMap, Pattern};
use rayon::prelude::*;

use super::pmi;

/// Per-pair statistics, precomputed at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairStatistics {
    pub joint: f64,
    pub pmi: f64,
    pub discount: f64,
    pub discounted_pmi: f64,
}

/// Frequencies, PMI, and discount for every pair of one matrix, plus the
/// cached maximum discounted PMI. Read-only once built.
#[derive(Debug, Clone)]
pub struct StatisticsTables {
    total: f64,
    instances: FxHashMap<ArgumentTuple, f64>,
    patterns: FxHashMap<Pattern, f64>,
    pairs: FxHashMap<Pattern, FxHashMap<ArgumentTuple, PairStatistics>>,
    max_discounted_pmi: f64,
}

impl StatisticsTables {
    /// Builds the tables from raw aggregates. Pair statistics are computed
    /// in parallel.
    pub fn from_frequencies(tables: FrequencyTables) -> Result<Self, StatsError> {
        if tables.total <= 0.0 || tables.pairs.is_empty() {
            return Err(StatsError::EmptyMatrix);
        }
        if let Some((first, _)) = tables.instances.first() {
            let expected = first.arity();
            if let Some((odd, _)) = tables.instances.iter().find(|(i, _)| i.arity() != expected) {
                return Err(StatsError::MixedArity {
                    expected,
                    found: odd.arity(),
                });
            }
        }

        let total = tables.total;
        let instances: FxHashMap<ArgumentTuple, f64> = tables.instances.into_iter().collect();
        let patterns: FxHashMap<Pattern, f64> = tables.patterns.into_iter().collect();

        let computed: Vec<(Pattern, ArgumentTuple, PairStatistics)> = tables
            .pairs
            .into_par_iter()
            .map(|(pattern, instance, joint)| {
                let f_i = instances.get(&instance).copied().unwrap_or(joint);
                let f_p = patterns.get(&pattern).copied().unwrap_or(joint);
                let stats = PairStatistics {
                    joint,
                    pmi: pmi::pmi(joint, f_i, f_p, total),
                    discount: pmi::discount(joint, f_i, f_p),
                    discounted_pmi: pmi::discounted_pmi(joint, f_i, f_p, total),
                };
                (pattern, instance, stats)
            })
            .collect();

        // Reduction starts at 0, so the cached maximum is never negative.
        let max_discounted_pmi = computed
            .iter()
            .map(|(_, _, s)| s.discounted_pmi)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        let mut pairs: FxHashMap<Pattern, FxHashMap<ArgumentTuple, PairStatistics>> =
            FxHashMap::default();
        let pair_count = computed.len();
        for (pattern, instance, stats) in computed {
            pairs.entry(pattern).or_default().insert(instance, stats);
        }

        tracing::info!(
            total,
            instances = instances.len(),
            patterns = patterns.len(),
            pairs = pair_count,
            max_discounted_pmi,
            "built statistics tables"
        );

        Ok(Self {
            total,
            instances,
            patterns,
            pairs,
            max_discounted_pmi,
        })
    }

    /// Reads the frequency tables from `source` and builds statistics.
    pub fn load(source: &dyn CooccurrenceSource) -> Result<Self, BootstrapError> {
        let tables = source.frequency_tables()?;
        Ok(Self::from_frequencies(tables)?)
    }

    pub fn pair(&self, instance: &ArgumentTuple, pattern: &Pattern) -> Option<&PairStatistics> {
        self.pairs.get(pattern).and_then(|row| row.get(instance))
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.values().map(FxHashMap::len).sum()
    }

    fn pair_or_not_found(
        &self,
        instance: &ArgumentTuple,
        pattern: &Pattern,
    ) -> Result<&PairStatistics, StatsError> {
        self.pair(instance, pattern).ok_or_else(|| StatsError::NotFound {
            key: format!("{pattern} {instance}"),
        })
    }
}

impl StatisticsProvider for StatisticsTables {
    fn total(&self) -> f64 {
        self.total
    }

    fn instance_frequency(&self, instance: &ArgumentTuple) -> Result<f64, StatsError> {
        self.instances
            .get(instance)
            .copied()
            .ok_or_else(|| StatsError::NotFound {
                key: instance.to_string(),
            })
    }

    fn pattern_frequency(&self, pattern: &Pattern) -> Result<f64, StatsError> {
        self.patterns
            .get(pattern)
            .copied()
            .ok_or_else(|| StatsError::NotFound {
                key: pattern.to_string(),
            })
    }

    fn joint_frequency(
        &self,
        instance: &ArgumentTuple,
        pattern: &Pattern,
    ) -> Result<f64, StatsError> {
        self.pair_or_not_found(instance, pattern).map(|s| s.joint)
    }

    fn pmi(&self, instance: &ArgumentTuple, pattern: &Pattern) -> Result<f64, StatsError> {
        self.pair_or_not_found(instance, pattern).map(|s| s.pmi)
    }

    fn discount(&self, instance: &ArgumentTuple, pattern: &Pattern) -> Result<f64, StatsError> {
        self.pair_or_not_found(instance, pattern).map(|s| s.discount)
    }

    fn discounted_pmi(
        &self,
        instance: &ArgumentTuple,
        pattern: &Pattern,
    ) -> Result<f64, StatsError> {
        self.pair_or_not_found(instance, pattern)
            .map(|s| s.discounted_pmi)
    }

    fn max_discounted_pmi(&self) -> f64 {
        self.max_discounted_pmi
    }
}
