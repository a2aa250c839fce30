//! BEGIN IMMEDIATE transactions for batched writes.

use espresso_core::errors::StorageError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `f` inside a BEGIN IMMEDIATE transaction, committing on success and
/// rolling back when `f` fails.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(super::map_sqlite)?;
    let result = f(&tx)?;
    tx.commit().map_err(super::map_sqlite)?;
    Ok(result)
}
