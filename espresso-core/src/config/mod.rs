//! Run configuration: store, bootstrapping options, relations, seeds.

pub mod boot_config;
pub mod espresso_config;
pub mod relation_config;
pub mod seeds;
pub mod store_config;

pub use boot_config::{Algorithm, BootConfig, MutexSource, ScorerKind};
pub use espresso_config::{CliOverrides, EspressoConfig};
pub use relation_config::RelationConfig;
pub use seeds::{load_seeds, parse_seeds, split_seeds, write_seeds, SeedSplit};
pub use store_config::StoreConfig;
