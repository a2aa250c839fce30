//! espresso-core: shared types, traits, errors, configuration, events,
//! and tracing setup for the Espresso relation bootstrapper.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::{EspressoConfig, ScorerKind};
pub use errors::{BootstrapError, ConfigError, EspressoErrorCode, StatsError, StorageError};
pub use types::{ArgumentTuple, Pattern, PromotionRecord, Role};
