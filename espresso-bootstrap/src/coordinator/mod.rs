//! Multi-relation coordination: worker pool, phase barrier, mutex sets.

pub mod executor;
pub mod relation_coordinator;
pub mod report;
pub mod setup;

pub use executor::PhaseExecutor;
pub use relation_coordinator::{CoordinatorOptions, RelationCoordinator};
pub use report::{RoundReport, RunReport};
pub use setup::build_coordinator;
