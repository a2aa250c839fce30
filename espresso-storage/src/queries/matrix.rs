//! Co-occurrence matrix queries.

use espresso_core::errors::StorageError;
use espresso_core::types::{ArgumentTuple, CooccurrenceRecord, MatrixQuery, Pattern};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::{decode_args, encode_args};
use crate::connection::map_sqlite;

/// Adds `weight` to the `(pattern, args)` cell, creating it if absent.
pub fn accumulate(
    conn: &Connection,
    matrix: &str,
    pattern: &Pattern,
    args: &ArgumentTuple,
    weight: f64,
) -> Result<(), StorageError> {
    let args_json = encode_args(args)?;
    conn.prepare_cached(
        "INSERT INTO matrix (matrix, pattern, args, arity, weight)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(matrix, pattern, args) DO UPDATE SET weight = weight + excluded.weight",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            matrix,
            pattern.as_str(),
            args_json,
            args.arity() as i64,
            weight
        ])
    })
    .map_err(map_sqlite)?;
    Ok(())
}

/// Exact lookup of a cell's weight.
pub fn lookup(
    conn: &Connection,
    matrix: &str,
    pattern: &Pattern,
    args: &ArgumentTuple,
) -> Result<Option<f64>, StorageError> {
    let args_json = encode_args(args)?;
    conn.prepare_cached(
        "SELECT weight FROM matrix WHERE matrix = ?1 AND pattern = ?2 AND args = ?3",
    )
    .and_then(|mut stmt| {
        stmt.query_row(params![matrix, pattern.as_str(), args_json], |row| row.get(0))
            .optional()
    })
    .map_err(map_sqlite)
}

/// Partial-match query. A whole instance matches on the encoded tuple;
/// single positions match with `json_extract`.
pub fn query(
    conn: &Connection,
    matrix: &str,
    query: &MatrixQuery,
) -> Result<Vec<CooccurrenceRecord>, StorageError> {
    let mut sql = String::from("SELECT pattern, args, weight FROM matrix WHERE matrix = ?1");
    let mut values: Vec<String> = vec![matrix.to_string()];

    if let Some(pattern) = &query.pattern {
        values.push(pattern.as_str().to_string());
        sql.push_str(&format!(" AND pattern = ?{}", values.len()));
    }

    if let Some(instance) = &query.instance {
        values.push(encode_args(instance)?);
        sql.push_str(&format!(" AND args = ?{}", values.len()));
    }
    for (position, value) in query.bound_args() {
        values.push(value.to_string());
        sql.push_str(&format!(
            " AND json_extract(args, '$[{position}]') = ?{}",
            values.len()
        ));
    }
    sql.push_str(" ORDER BY pattern, args");

    let mut stmt = conn.prepare_cached(&sql).map_err(map_sqlite)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
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
        .map(|(pattern, args, weight)| {
            Ok(CooccurrenceRecord {
                pattern: Pattern::new(pattern),
                instance: decode_args(&args)?,
                weight,
            })
        })
        .collect()
}

/// Smallest and largest arity stored for `matrix`.
pub fn arity_range(
    conn: &Connection,
    matrix: &str,
) -> Result<Option<(usize, usize)>, StorageError> {
    let (min, max): (Option<i64>, Option<i64>) = conn
        .query_row(
            "SELECT MIN(arity), MAX(arity) FROM matrix WHERE matrix = ?1",
            params![matrix],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(map_sqlite)?;
    Ok(match (min, max) {
        (Some(min), Some(max)) => Some((min as usize, max as usize)),
        _ => None,
    })
}

/// Record count and total weight of `matrix`.
pub fn fingerprint(conn: &Connection, matrix: &str) -> Result<(i64, f64), StorageError> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(weight), 0.0) FROM matrix WHERE matrix = ?1",
        params![matrix],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .map_err(map_sqlite)
}
