//! Serializable run reports.

use serde::Serialize;

use crate::engine::PhaseOutcome;

/// Both phases of one iteration across every relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    pub iteration: u32,
    pub patterns: Vec<PhaseOutcome>,
    pub instances: Vec<PhaseOutcome>,
}

impl RoundReport {
    pub fn outcomes(&self) -> impl Iterator<Item = &PhaseOutcome> {
        self.patterns.iter().chain(self.instances.iter())
    }

    /// Records newly written this round.
    pub fn promoted(&self) -> usize {
        self.outcomes().map(|o| o.inserted).sum()
    }

    pub fn failed_phases(&self) -> usize {
        self.outcomes().filter(|o| o.is_failed()).count()
    }

    /// True when no relation promoted anything this round.
    pub fn is_idle(&self) -> bool {
        !self.outcomes().any(|o| o.is_promoted())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub relations: Vec<String>,
    pub start: u32,
    pub stop: u32,
    pub seeded: usize,
    pub rounds: Vec<RoundReport>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn promoted(&self) -> usize {
        self.rounds.iter().map(RoundReport::promoted).sum()
    }

    pub fn failed_phases(&self) -> usize {
        self.rounds.iter().map(RoundReport::failed_phases).sum()
    }

    /// Every phase outcome of `relation`, in run order.
    pub fn outcomes_for<'a>(&'a self, relation: &'a str) -> impl Iterator<Item = &'a PhaseOutcome> + 'a {
        self.rounds
            .iter()
            .flat_map(|r| r.patterns.iter().zip(r.instances.iter()))
            .flat_map(|(p, i)| [p, i])
            .filter(move |o| o.relation == relation)
    }
}
