//! PromotionStore: append-only, idempotent store of promotions.

use crate::errors::StorageError;
use crate::types::{
    ArgumentTuple, IterationFilter, Pattern, PromotionRecord, Ranked, Role,
};

/// Persisted bootstrap state, partitioned by relation namespace.
///
/// Writers for distinct relations never touch each other's rows, and
/// re-inserting an existing `(relation, role, value)` is a no-op, so
/// implementations need no cross-relation locking.
pub trait PromotionStore: Send + Sync {
    /// Deletes every promotion of `relation`. Returns the number of rows removed.
    fn reset(&self, relation: &str) -> Result<usize, StorageError>;

    /// True when at least one promotion of `role` exists at `iteration`.
    fn has_iteration(&self, relation: &str, role: Role, iteration: u32)
        -> Result<bool, StorageError>;

    /// Inserts records, ignoring values already stored for their relation.
    /// Returns the number of newly stored records.
    fn insert(&self, records: &[PromotionRecord]) -> Result<usize, StorageError>;

    fn instances(
        &self,
        relation: &str,
        filter: IterationFilter,
    ) -> Result<Vec<Ranked<ArgumentTuple>>, StorageError>;

    fn patterns(
        &self,
        relation: &str,
        filter: IterationFilter,
    ) -> Result<Vec<Ranked<Pattern>>, StorageError>;

    /// Full records for `relation` and `role`, ordered by iteration then score.
    fn records(&self, relation: &str, role: Role) -> Result<Vec<PromotionRecord>, StorageError>;

    /// Builds the iteration and value indexes for `(relation, role)`.
    /// Performance only; correctness never depends on it.
    fn ensure_indexes(&self, relation: &str, role: Role) -> Result<(), StorageError>;
}
