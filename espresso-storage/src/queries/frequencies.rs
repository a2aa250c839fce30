//! Materialized frequency tables: `F_all`, `F(i)`, `F(p)`, `F(i,p)`.

use espresso_core::errors::StorageError;
use espresso_core::types::{FrequencyTables, Pattern};
use rusqlite::{params, Connection, OptionalExtension};

use super::{decode_args, matrix};
use crate::connection::map_sqlite;

/// Stamp of the last build: `(record_count, total)`.
pub fn cached_fingerprint(
    conn: &Connection,
    matrix: &str,
) -> Result<Option<(i64, f64)>, StorageError> {
    conn.query_row(
        "SELECT record_count, total FROM freq_total WHERE matrix = ?1",
        params![matrix],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(map_sqlite)
}

/// True when the cache is missing or was built from a different matrix state.
pub fn is_stale(conn: &Connection, matrix_name: &str) -> Result<bool, StorageError> {
    let current = matrix::fingerprint(conn, matrix_name)?;
    Ok(match cached_fingerprint(conn, matrix_name)? {
        Some((count, total)) => count != current.0 || (total - current.1).abs() > 1e-9,
        None => true,
    })
}

/// Drops the build stamp so the next read rebuilds.
pub fn invalidate(conn: &Connection, matrix: &str) -> Result<(), StorageError> {
    conn.execute("DELETE FROM freq_total WHERE matrix = ?1", params![matrix])
        .map_err(map_sqlite)?;
    Ok(())
}

/// Recomputes every frequency table for `matrix`. Call inside a transaction.
pub fn rebuild(conn: &Connection, matrix_name: &str) -> Result<(i64, f64), StorageError> {
    for table in ["freq_instance", "freq_pattern", "freq_pair", "freq_total"] {
        conn.execute(
            &format!("DELETE FROM {table} WHERE matrix = ?1"),
            params![matrix_name],
        )
        .map_err(map_sqlite)?;
    }

    conn.execute(
        "INSERT INTO freq_instance (matrix, args, freq)
         SELECT matrix, args, SUM(weight) FROM matrix WHERE matrix = ?1 GROUP BY args",
        params![matrix_name],
    )
    .map_err(map_sqlite)?;
    conn.execute(
        "INSERT INTO freq_pattern (matrix, pattern, freq)
         SELECT matrix, pattern, SUM(weight) FROM matrix WHERE matrix = ?1 GROUP BY pattern",
        params![matrix_name],
    )
    .map_err(map_sqlite)?;
    conn.execute(
        "INSERT INTO freq_pair (matrix, pattern, args, freq)
         SELECT matrix, pattern, args, SUM(weight) FROM matrix WHERE matrix = ?1
         GROUP BY pattern, args",
        params![matrix_name],
    )
    .map_err(map_sqlite)?;

    let (count, total) = matrix::fingerprint(conn, matrix_name)?;
    conn.execute(
        "INSERT INTO freq_total (matrix, total, record_count) VALUES (?1, ?2, ?3)",
        params![matrix_name, total, count],
    )
    .map_err(map_sqlite)?;

    tracing::info!(matrix = matrix_name, records = count, total, "rebuilt frequency tables");
    Ok((count, total))
}

/// Reads the materialized tables. Assumes they are fresh.
pub fn load(conn: &Connection, matrix: &str) -> Result<FrequencyTables, StorageError> {
    let total = cached_fingerprint(conn, matrix)?.map_or(0.0, |(_, total)| total);

    let instances = {
        let mut stmt = conn
            .prepare_cached("SELECT args, freq FROM freq_instance WHERE matrix = ?1 ORDER BY args")
            .map_err(map_sqlite)?;
        let rows = stmt
            .query_map(params![matrix], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })
            .map_err(map_sqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite)?;
        rows.into_iter()
            .map(|(args, freq)| Ok((decode_args(&args)?, freq)))
            .collect::<Result<Vec<_>, StorageError>>()?
    };

    let patterns = {
        let mut stmt = conn
            .prepare_cached(
                "SELECT pattern, freq FROM freq_pattern WHERE matrix = ?1 ORDER BY pattern",
            )
            .map_err(map_sqlite)?;
        let rows = stmt
            .query_map(params![matrix], |row| {
                Ok((Pattern::new(row.get::<_, String>(0)?), row.get::<_, f64>(1)?))
            })
            .map_err(map_sqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite)?;
        rows
    };

    let pairs = {
        let mut stmt = conn
            .prepare_cached(
                "SELECT pattern, args, freq FROM freq_pair WHERE matrix = ?1
                 ORDER BY pattern, args",
            )
            .map_err(map_sqlite)?;
        let rows = stmt
            .query_map(params![matrix], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(map_sqlite)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite)?;
        rows.into_iter()
            .map(|(pattern, args, freq)| Ok((Pattern::new(pattern), decode_args(&args)?, freq)))
            .collect::<Result<Vec<_>, StorageError>>()?
    };

    Ok(FrequencyTables {
        total,
        instances,
        patterns,
        pairs,
    })
}
