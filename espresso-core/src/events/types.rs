//! Event payload types for bootstrapping runs.

use crate::types::Role;

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub relations: Vec<String>,
    pub start: u32,
    pub stop: u32,
}

/// Payload for `on_phase_started`.
#[derive(Debug, Clone)]
pub struct PhaseStartedEvent {
    pub relation: String,
    pub role: Role,
    pub iteration: u32,
    pub context_size: usize,
}

/// Payload for `on_phase_completed`.
#[derive(Debug, Clone)]
pub struct PhaseCompletedEvent {
    pub relation: String,
    pub role: Role,
    pub iteration: u32,
    pub candidates: usize,
    pub selected: usize,
    pub inserted: usize,
}

/// Payload for `on_relation_stalled`.
#[derive(Debug, Clone)]
pub struct RelationStalledEvent {
    pub relation: String,
    pub role: Role,
    pub iteration: u32,
    pub reason: String,
}

/// Payload for `on_phase_failed`.
#[derive(Debug, Clone)]
pub struct PhaseFailedEvent {
    pub relation: String,
    pub role: Role,
    pub iteration: u32,
    pub error_code: String,
    pub message: String,
}

/// Payload for `on_run_completed`.
#[derive(Debug, Clone)]
pub struct RunCompletedEvent {
    pub iterations: u32,
    pub promoted: usize,
    pub failed_phases: usize,
    pub duration_ms: u64,
}
