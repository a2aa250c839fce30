//! Shared constants.

/// Reliability assigned to every seed instance.
pub const SEED_SCORE: f64 = 1.0;

/// Iteration number seeds are stored under.
pub const SEED_ITERATION: u32 = 0;

/// Promotions kept per phase when `n` is not configured.
pub const DEFAULT_TOP_N: usize = 10;

/// A candidate must co-occur this many times more with its own relation's
/// evidence than with a competing relation's evidence.
pub const DEFAULT_MUTEX_THRESHOLD: f64 = 3.0;

/// Sizes of the random development and test samples drawn from a seed file.
pub const DEFAULT_DEV_SEEDS: usize = 10;
pub const DEFAULT_TEST_SEEDS: usize = 100;

pub const DEFAULT_START_ITERATION: u32 = 1;
pub const DEFAULT_STOP_ITERATION: u32 = 10;

pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_DB_FILE: &str = "espresso.db";
pub const DEFAULT_MATRIX: &str = "matrix";

pub const LOG_ENV_VAR: &str = "ESPRESSO_LOG";
pub const DEFAULT_LOG_FILTER: &str =
    "espresso_core=info,espresso_storage=info,espresso_bootstrap=info,espresso_cli=info";

/// Prefix for environment overrides of config values.
pub const ENV_PREFIX: &str = "ESPRESSO_";
