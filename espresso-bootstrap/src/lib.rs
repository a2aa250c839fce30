//! espresso-bootstrap: statistics, scorers, the per-relation bootstrapping
//! engine, the mutex filter, and the multi-relation coordinator.

pub mod coordinator;
pub mod engine;
pub mod mutex;
pub mod scoring;
pub mod statistics;

pub use coordinator::{build_coordinator, RelationCoordinator, RunReport};
pub use engine::{Bootstrapper, EngineDeps, EngineOptions, PhaseOutcome, RelationSpec};
pub use scoring::{build_scorer, Scorer};
pub use statistics::StatisticsTables;
