//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::BootstrapEventHandler;
use super::types::*;

/// Dispatches events to every registered handler in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn BootstrapEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn BootstrapEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A panicking handler is logged and skipped; later handlers still run.
    fn emit<F: Fn(&dyn BootstrapEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked, continuing with remaining handlers");
            }
        }
    }

    pub fn emit_run_started(&self, event: &RunStartedEvent) {
        self.emit(|h| h.on_run_started(event));
    }

    pub fn emit_run_completed(&self, event: &RunCompletedEvent) {
        self.emit(|h| h.on_run_completed(event));
    }

    pub fn emit_phase_started(&self, event: &PhaseStartedEvent) {
        self.emit(|h| h.on_phase_started(event));
    }

    pub fn emit_phase_completed(&self, event: &PhaseCompletedEvent) {
        self.emit(|h| h.on_phase_completed(event));
    }

    pub fn emit_relation_stalled(&self, event: &RelationStalledEvent) {
        self.emit(|h| h.on_relation_stalled(event));
    }

    pub fn emit_phase_failed(&self, event: &PhaseFailedEvent) {
        self.emit(|h| h.on_phase_failed(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
