//! CLI error type and exit-code mapping.

use espresso_core::errors::{
    BootstrapError, ConfigError, EspressoErrorCode, StatsError, StorageError,
};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

impl CliError {
    /// 2 for configuration errors, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Bootstrap(BootstrapError::Config(_)) => 2,
            _ => 1,
        }
    }
}

impl EspressoErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Stats(e) => e.error_code(),
            Self::Bootstrap(e) => e.error_code(),
        }
    }
}
