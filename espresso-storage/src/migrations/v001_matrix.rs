//! v001: co-occurrence matrix.
//!
//! One row per `(matrix, pattern, args)` with the aggregate weight. `args`
//! is a JSON array so positional partial matches can use `json_extract`.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS matrix (
    matrix TEXT NOT NULL,
    pattern TEXT NOT NULL,
    args TEXT NOT NULL,
    arity INTEGER NOT NULL,
    weight REAL NOT NULL,
    PRIMARY KEY (matrix, pattern, args)
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS idx_matrix_args ON matrix(matrix, args);
"#;
