//! Logging setup shared by the CLI and tests.

pub mod setup;

pub use setup::init_tracing;
