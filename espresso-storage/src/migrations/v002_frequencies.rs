//! v002: materialized frequency tables.
//!
//! `freq_total` stamps each build with the record count and total weight of
//! the matrix it was built from; a mismatch marks the cache stale.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS freq_total (
    matrix TEXT PRIMARY KEY,
    total REAL NOT NULL,
    record_count INTEGER NOT NULL,
    built_at INTEGER NOT NULL DEFAULT (unixepoch())
);

CREATE TABLE IF NOT EXISTS freq_instance (
    matrix TEXT NOT NULL,
    args TEXT NOT NULL,
    freq REAL NOT NULL,
    PRIMARY KEY (matrix, args)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS freq_pattern (
    matrix TEXT NOT NULL,
    pattern TEXT NOT NULL,
    freq REAL NOT NULL,
    PRIMARY KEY (matrix, pattern)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS freq_pair (
    matrix TEXT NOT NULL,
    pattern TEXT NOT NULL,
    args TEXT NOT NULL,
    freq REAL NOT NULL,
    PRIMARY KEY (matrix, pattern, args)
) WITHOUT ROWID;
"#;
