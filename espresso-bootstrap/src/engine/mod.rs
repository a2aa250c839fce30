//! Single-relation bootstrapping engine.

pub mod bootstrapper;
pub mod outcome;
pub mod state;

pub use bootstrapper::{Bootstrapper, EngineDeps, RelationSpec};
pub use outcome::{IterationReport, PhaseOutcome, PhaseStatus, StallReason};
pub use state::{BootstrapState, EngineOptions, EnginePhase};
