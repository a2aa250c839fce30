//! v003: promoted instances and patterns.
//!
//! The primary key on `(relation, value)` makes `INSERT OR IGNORE` the
//! write-once rule for promotions.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS promoted_instances (
    relation TEXT NOT NULL,
    args TEXT NOT NULL,
    arity INTEGER NOT NULL,
    iteration INTEGER NOT NULL,
    score REAL NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    PRIMARY KEY (relation, args)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS promoted_patterns (
    relation TEXT NOT NULL,
    pattern TEXT NOT NULL,
    iteration INTEGER NOT NULL,
    score REAL NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    PRIMARY KEY (relation, pattern)
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS idx_promoted_instances_iteration
    ON promoted_instances(relation, iteration DESC);
CREATE INDEX IF NOT EXISTS idx_promoted_patterns_iteration
    ON promoted_patterns(relation, iteration DESC);
"#;
