//! StorageEngine: the SQLite-backed co-occurrence source and promotion store.

use std::path::Path;

use espresso_core::errors::StorageError;
use espresso_core::traits::{CooccurrenceSource, PromotionStore};
use espresso_core::types::{
    ArgumentTuple, CooccurrenceRecord, FrequencyTables, IterationFilter, MatrixQuery, Pattern,
    PromotionRecord, Ranked, Role,
};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{frequencies, matrix, promotions};

/// One database, one matrix name. Shared by every worker of a run.
pub struct StorageEngine {
    db: DatabaseManager,
    matrix: String,
}

impl StorageEngine {
    pub fn open(path: &Path, matrix: &str, read_pool_size: usize) -> Result<Self, StorageError> {
        let db = DatabaseManager::open(path, read_pool_size)?;
        tracing::debug!(path = %path.display(), matrix, "opened store");
        Ok(Self {
            db,
            matrix: matrix.to_string(),
        })
    }

    pub fn open_in_memory(matrix: &str) -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
            matrix: matrix.to_string(),
        })
    }

    pub fn matrix(&self) -> &str {
        &self.matrix
    }

    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    /// Adds records to the matrix in one transaction, summing weights of
    /// repeated cells. Every record must match the matrix arity.
    pub fn insert_cooccurrences(&self, records: &[CooccurrenceRecord]) -> Result<usize, StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let mut arity = matrix::arity_range(tx, &self.matrix)?.map(|(min, _)| min);
                for record in records {
                    let found = record.instance.arity();
                    match arity {
                        None => arity = Some(found),
                        Some(expected) if expected != found => {
                            return Err(StorageError::MalformedRecord {
                                location: format!("{} {}", record.pattern, record.instance),
                                message: format!("arity {found} differs from matrix arity {expected}"),
                            });
                        }
                        Some(_) => {}
                    }
                    matrix::accumulate(tx, &self.matrix, &record.pattern, &record.instance, record.weight)?;
                }
                frequencies::invalidate(tx, &self.matrix)?;
                Ok(records.len())
            })
        })
    }

    pub fn insert_cooccurrence(
        &self,
        pattern: &Pattern,
        instance: &ArgumentTuple,
        weight: f64,
    ) -> Result<(), StorageError> {
        self.insert_cooccurrences(&[CooccurrenceRecord {
            pattern: pattern.clone(),
            instance: instance.clone(),
            weight,
        }])
        .map(|_| ())
    }

    /// Recomputes the frequency tables unconditionally.
    /// Returns `(record_count, total_weight)`.
    pub fn rebuild_frequencies(&self) -> Result<(i64, f64), StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| frequencies::rebuild(tx, &self.matrix))
        })
    }

    /// Relation namespaces with stored promotions.
    pub fn relations(&self) -> Result<Vec<String>, StorageError> {
        self.db.with_reader(promotions::relations)
    }
}

impl CooccurrenceSource for StorageEngine {
    fn arity(&self) -> Result<Option<usize>, StorageError> {
        let range = self.db.with_reader(|conn| matrix::arity_range(conn, &self.matrix))?;
        match range {
            Some((min, max)) if min != max => Err(StorageError::MalformedRecord {
                location: self.matrix.clone(),
                message: format!("matrix mixes arities {min} and {max}"),
            }),
            Some((arity, _)) => Ok(Some(arity)),
            None => Ok(None),
        }
    }

    fn lookup(
        &self,
        pattern: &Pattern,
        instance: &ArgumentTuple,
    ) -> Result<Option<f64>, StorageError> {
        self.db
            .with_reader(|conn| matrix::lookup(conn, &self.matrix, pattern, instance))
    }

    fn query(&self, query: &MatrixQuery) -> Result<Vec<CooccurrenceRecord>, StorageError> {
        self.db
            .with_reader(|conn| matrix::query(conn, &self.matrix, query))
    }

    /// Rebuilds the cached tables first when the matrix changed since the
    /// last build.
    fn frequency_tables(&self) -> Result<FrequencyTables, StorageError> {
        self.db.with_writer(|conn| {
            if frequencies::is_stale(conn, &self.matrix)? {
                with_immediate_transaction(conn, |tx| frequencies::rebuild(tx, &self.matrix))?;
            }
            frequencies::load(conn, &self.matrix)
        })
    }
}

impl PromotionStore for StorageEngine {
    fn reset(&self, relation: &str) -> Result<usize, StorageError> {
        let removed = self
            .db
            .with_writer(|conn| promotions::delete_relation(conn, relation))?;
        tracing::info!(relation, removed, "reset promotions");
        Ok(removed)
    }

    fn has_iteration(
        &self,
        relation: &str,
        role: Role,
        iteration: u32,
    ) -> Result<bool, StorageError> {
        self.db
            .with_reader(|conn| promotions::has_iteration(conn, relation, role, iteration))
    }

    fn insert(&self, records: &[PromotionRecord]) -> Result<usize, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let mut inserted = 0;
                for record in records {
                    inserted += promotions::insert(tx, record)?;
                }
                Ok(inserted)
            })
        })
    }

    fn instances(
        &self,
        relation: &str,
        filter: IterationFilter,
    ) -> Result<Vec<Ranked<ArgumentTuple>>, StorageError> {
        self.db
            .with_reader(|conn| promotions::select_instances(conn, relation, filter))
    }

    fn patterns(
        &self,
        relation: &str,
        filter: IterationFilter,
    ) -> Result<Vec<Ranked<Pattern>>, StorageError> {
        self.db
            .with_reader(|conn| promotions::select_patterns(conn, relation, filter))
    }

    fn records(&self, relation: &str, role: Role) -> Result<Vec<PromotionRecord>, StorageError> {
        self.db
            .with_reader(|conn| promotions::select_records(conn, relation, role))
    }

    fn ensure_indexes(&self, _relation: &str, role: Role) -> Result<(), StorageError> {
        self.db.with_writer(|conn| promotions::ensure_indexes(conn, role))
    }
}
