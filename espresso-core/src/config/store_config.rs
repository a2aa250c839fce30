//! Store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DB_FILE, DEFAULT_MATRIX, DEFAULT_READ_POOL_SIZE};

/// Where the co-occurrence matrix and promotions live.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database path. Default: `espresso.db`.
    pub path: Option<PathBuf>,
    /// Matrix name inside the database. Default: `matrix`.
    pub matrix: Option<String>,
    /// Number of read-only connections. Default: 4.
    pub read_pool_size: Option<usize>,
}

impl StoreConfig {
    pub fn effective_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }

    pub fn effective_matrix(&self) -> &str {
        self.matrix.as_deref().unwrap_or(DEFAULT_MATRIX)
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE)
    }
}
