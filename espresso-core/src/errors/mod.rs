//! Error enums, one per subsystem, plus the aggregate `BootstrapError`.

pub mod bootstrap_error;
pub mod config_error;
pub mod error_code;
pub mod stats_error;
pub mod storage_error;

pub use bootstrap_error::BootstrapError;
pub use config_error::ConfigError;
pub use error_code::EspressoErrorCode;
pub use stats_error::StatsError;
pub use storage_error::StorageError;
