//! Prior-phase reliability scores loaded from persisted promotions.

use espresso_core::errors::StorageError;
use espresso_core::traits::{PriorScores, PromotionStore};
use espresso_core::types::{ArgumentTuple, FxHashMap, IterationFilter, Pattern};

/// Snapshot of promoted scores, bounded by iteration at load time so a
/// phase never sees scores written after it.
#[derive(Debug, Clone, Default)]
pub struct PriorScoreSnapshot {
    instances: FxHashMap<ArgumentTuple, f64>,
    patterns: FxHashMap<Pattern, f64>,
}

impl PriorScoreSnapshot {
    pub fn load(
        store: &dyn PromotionStore,
        relation: &str,
        instance_filter: IterationFilter,
        pattern_filter: IterationFilter,
    ) -> Result<Self, StorageError> {
        let instances = store
            .instances(relation, instance_filter)?
            .into_iter()
            .map(|r| (r.value, r.score))
            .collect();
        let patterns = store
            .patterns(relation, pattern_filter)?
            .into_iter()
            .map(|r| (r.value, r.score))
            .collect();
        Ok(Self {
            instances,
            patterns,
        })
    }

    pub fn with_instance(mut self, instance: ArgumentTuple, score: f64) -> Self {
        self.instances.insert(instance, score);
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern, score: f64) -> Self {
        self.patterns.insert(pattern, score);
        self
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl PriorScores for PriorScoreSnapshot {
    fn instance_reliability(&self, instance: &ArgumentTuple) -> f64 {
        self.instances.get(instance).copied().unwrap_or(0.0)
    }

    fn pattern_reliability(&self, pattern: &Pattern) -> f64 {
        self.patterns.get(pattern).copied().unwrap_or(0.0)
    }
}
