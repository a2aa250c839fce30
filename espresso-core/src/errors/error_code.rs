//! EspressoErrorCode trait and the stable error code strings.

/// Every error enum implements this to expose a stable code string that
/// the CLI prints and maps to an exit status.
pub trait EspressoErrorCode {
    /// Returns the error code string (e.g., "STORE_UNAVAILABLE").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged message: `[ERROR_CODE] message`.
    fn tagged_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const MALFORMED_RECORD: &str = "MALFORMED_RECORD";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const STATS_ERROR: &str = "STATS_ERROR";
pub const EMPTY_CANDIDATE_SET: &str = "EMPTY_CANDIDATE_SET";
pub const WORKER_PANICKED: &str = "WORKER_PANICKED";
