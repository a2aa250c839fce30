//! BootstrapEventHandler trait, every method a no-op by default.

use super::types::*;

/// Observer for bootstrapping progress.
///
/// Handlers override only the events they need. `Send + Sync` because
/// phases emit from worker threads.
pub trait BootstrapEventHandler: Send + Sync {
    // ---- Run Lifecycle ----
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_run_completed(&self, _event: &RunCompletedEvent) {}

    // ---- Phases ----
    fn on_phase_started(&self, _event: &PhaseStartedEvent) {}
    fn on_phase_completed(&self, _event: &PhaseCompletedEvent) {}
    fn on_relation_stalled(&self, _event: &RelationStalledEvent) {}
    fn on_phase_failed(&self, _event: &PhaseFailedEvent) {}
}
