//! Promoted instance and pattern queries.

use espresso_core::errors::StorageError;
use espresso_core::types::{
    ArgumentTuple, IterationFilter, Pattern, PromotedValue, PromotionRecord, Ranked, Role,
};
use rusqlite::{params, Connection};

use super::{decode_args, encode_args};
use crate::connection::map_sqlite;

fn table(role: Role) -> &'static str {
    match role {
        Role::Instance => "promoted_instances",
        Role::Pattern => "promoted_patterns",
    }
}

fn value_column(role: Role) -> &'static str {
    match role {
        Role::Instance => "args",
        Role::Pattern => "pattern",
    }
}

fn iteration_clause(filter: IterationFilter) -> (&'static str, u32) {
    match filter {
        IterationFilter::Exactly(k) => ("iteration = ?2", k),
        IterationFilter::AtMost(k) => ("iteration <= ?2", k),
        IterationFilter::Before(k) => ("iteration < ?2", k),
    }
}

/// Inserts one record unless its value is already stored for the relation.
/// Returns 1 when a row was written, 0 when it was ignored.
pub fn insert(conn: &Connection, record: &PromotionRecord) -> Result<usize, StorageError> {
    match &record.value {
        PromotedValue::Instance(args) => {
            let args_json = encode_args(args)?;
            conn.prepare_cached(
                "INSERT OR IGNORE INTO promoted_instances (relation, args, arity, iteration, score)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .and_then(|mut stmt| {
                stmt.execute(params![
                    record.relation,
                    args_json,
                    args.arity() as i64,
                    record.iteration,
                    record.score
                ])
            })
            .map_err(map_sqlite)
        }
        PromotedValue::Pattern(pattern) => conn
            .prepare_cached(
                "INSERT OR IGNORE INTO promoted_patterns (relation, pattern, iteration, score)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .and_then(|mut stmt| {
                stmt.execute(params![
                    record.relation,
                    pattern.as_str(),
                    record.iteration,
                    record.score
                ])
            })
            .map_err(map_sqlite),
    }
}

/// Deletes every promotion of `relation` in both tables.
pub fn delete_relation(conn: &Connection, relation: &str) -> Result<usize, StorageError> {
    let mut removed = 0;
    for role in [Role::Instance, Role::Pattern] {
        removed += conn
            .execute(
                &format!("DELETE FROM {} WHERE relation = ?1", table(role)),
                params![relation],
            )
            .map_err(map_sqlite)?;
    }
    Ok(removed)
}

pub fn has_iteration(
    conn: &Connection,
    relation: &str,
    role: Role,
    iteration: u32,
) -> Result<bool, StorageError> {
    conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE relation = ?1 AND iteration = ?2)",
            table(role)
        ),
        params![relation, iteration],
        |row| row.get(0),
    )
    .map_err(map_sqlite)
}

/// Raw `(value, iteration, score)` rows ordered by iteration, then score
/// descending, then value.
fn select_raw(
    conn: &Connection,
    relation: &str,
    role: Role,
    filter: Option<IterationFilter>,
) -> Result<Vec<(String, u32, f64)>, StorageError> {
    let column = value_column(role);
    let (clause, k) = match filter {
        Some(filter) => iteration_clause(filter),
        None => ("iteration >= ?2", 0),
    };
    let sql = format!(
        "SELECT {column}, iteration, score FROM {} WHERE relation = ?1 AND {clause}
         ORDER BY iteration, score DESC, {column}",
        table(role)
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(map_sqlite)?;
    let rows = stmt
        .query_map(params![relation, k], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .map_err(map_sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_sqlite)?;
    Ok(rows)
}

pub fn select_instances(
    conn: &Connection,
    relation: &str,
    filter: IterationFilter,
) -> Result<Vec<Ranked<ArgumentTuple>>, StorageError> {
    select_raw(conn, relation, Role::Instance, Some(filter))?
        .into_iter()
        .map(|(args, _, score)| Ok(Ranked::new(decode_args(&args)?, score)))
        .collect()
}

pub fn select_patterns(
    conn: &Connection,
    relation: &str,
    filter: IterationFilter,
) -> Result<Vec<Ranked<Pattern>>, StorageError> {
    Ok(select_raw(conn, relation, Role::Pattern, Some(filter))?
        .into_iter()
        .map(|(pattern, _, score)| Ranked::new(Pattern::new(pattern), score))
        .collect())
}

/// Every record of `(relation, role)`.
pub fn select_records(
    conn: &Connection,
    relation: &str,
    role: Role,
) -> Result<Vec<PromotionRecord>, StorageError> {
    select_raw(conn, relation, role, None)?
        .into_iter()
        .map(|(value, iteration, score)| {
            let value = match role {
                Role::Instance => PromotedValue::Instance(decode_args(&value)?),
                Role::Pattern => PromotedValue::Pattern(Pattern::new(value)),
            };
            Ok(PromotionRecord {
                relation: relation.to_string(),
                value,
                iteration,
                score,
            })
        })
        .collect()
}

/// Recreates the iteration index for `role`'s table if it was dropped.
pub fn ensure_indexes(conn: &Connection, role: Role) -> Result<(), StorageError> {
    let table = table(role);
    conn.execute_batch(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_iteration ON {table}(relation, iteration DESC);"
    ))
    .map_err(map_sqlite)
}

/// Distinct relation namespaces with at least one promotion.
pub fn relations(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT relation FROM promoted_instances
             UNION SELECT relation FROM promoted_patterns
             ORDER BY relation",
        )
        .map_err(map_sqlite)?;
    let rows = stmt
        .query_map([], |row| row.get(0))
        .map_err(map_sqlite)?
        .collect::<Result<Vec<String>, _>>()
        .map_err(map_sqlite)?;
    Ok(rows)
}
