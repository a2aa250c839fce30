//! Storage errors for the co-occurrence and promotion stores.

use super::error_code::{self, EspressoErrorCode};

/// Errors raised by the SQLite-backed stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    /// Transient failure (busy, locked, I/O). Writes are idempotent, so the
    /// affected phase can simply be re-run.
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Migration v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Malformed record at {location}: {message}")]
    MalformedRecord { location: String, message: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl StorageError {
    /// True for failures a caller may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

impl EspressoErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable { .. } => error_code::STORE_UNAVAILABLE,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::MalformedRecord { .. } => error_code::MALFORMED_RECORD,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
