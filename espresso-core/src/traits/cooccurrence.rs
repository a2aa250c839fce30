//! CooccurrenceSource: read-only access to the co-occurrence matrix.

use crate::errors::StorageError;
use crate::types::{ArgumentTuple, CooccurrenceRecord, FrequencyTables, MatrixQuery, Pattern};

/// The external co-occurrence store as the bootstrapper sees it.
///
/// Implementations must be shareable across worker threads; the store is
/// never mutated through this trait.
pub trait CooccurrenceSource: Send + Sync {
    /// Arity of every instance in the matrix, `None` when it is empty.
    fn arity(&self) -> Result<Option<usize>, StorageError>;

    /// Exact lookup of the aggregate weight for a pair.
    fn lookup(
        &self,
        pattern: &Pattern,
        instance: &ArgumentTuple,
    ) -> Result<Option<f64>, StorageError>;

    /// Existence check for a pair.
    fn contains(&self, pattern: &Pattern, instance: &ArgumentTuple) -> Result<bool, StorageError> {
        Ok(self.lookup(pattern, instance)?.is_some())
    }

    /// Partial-match query over `(pattern, arg1..argN)`.
    fn query(&self, query: &MatrixQuery) -> Result<Vec<CooccurrenceRecord>, StorageError>;

    /// Distinct patterns co-occurring with `instance`.
    fn patterns_for_instance(
        &self,
        instance: &ArgumentTuple,
    ) -> Result<Vec<Pattern>, StorageError> {
        let mut patterns: Vec<Pattern> = self
            .query(&MatrixQuery::for_instance(instance))?
            .into_iter()
            .map(|r| r.pattern)
            .collect();
        patterns.sort();
        patterns.dedup();
        Ok(patterns)
    }

    /// Distinct instances co-occurring with `pattern`.
    fn instances_for_pattern(&self, pattern: &Pattern) -> Result<Vec<ArgumentTuple>, StorageError> {
        let mut instances: Vec<ArgumentTuple> = self
            .query(&MatrixQuery::for_pattern(pattern))?
            .into_iter()
            .map(|r| r.instance)
            .collect();
        instances.sort();
        instances.dedup();
        Ok(instances)
    }

    /// Raw aggregates the statistics provider is built from.
    fn frequency_tables(&self) -> Result<FrequencyTables, StorageError>;
}
