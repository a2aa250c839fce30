//! Phase and iteration outcomes.

use serde::Serialize;

use espresso_core::types::{ArgumentTuple, Pattern, PromotedValue, PromotionRecord, Ranked, Role};

/// Why a phase promoted nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StallReason {
    /// No promoted values of the complementary role to score against.
    EmptyContext,
    /// The matrix offered no unpromoted candidates.
    NoCandidates,
    /// Every candidate was removed by the mutex filter.
    AllFiltered,
}

impl StallReason {
    pub fn describe(self) -> &'static str {
        match self {
            Self::EmptyContext => "empty context",
            Self::NoCandidates => "no candidates",
            Self::AllFiltered => "all candidates filtered by mutex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhaseStatus {
    Promoted,
    Stalled { reason: StallReason },
    Failed { code: String, message: String },
}

/// Result of one pattern or instance phase for one relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseOutcome {
    pub relation: String,
    pub namespace: String,
    pub role: Role,
    pub iteration: u32,
    pub context_size: usize,
    pub mutex_size: usize,
    /// Candidates removed by the mutex filter.
    pub filtered: usize,
    /// Every scored candidate, ranked, before top-N truncation.
    pub candidates: Vec<Ranked<PromotedValue>>,
    /// The top-N records handed to the store.
    pub selected: Vec<PromotionRecord>,
    /// Records actually written (the rest already existed).
    pub inserted: usize,
    pub status: PhaseStatus,
}

impl PhaseOutcome {
    pub fn empty(relation: &str, namespace: &str, role: Role, iteration: u32, status: PhaseStatus) -> Self {
        Self {
            relation: relation.to_string(),
            namespace: namespace.to_string(),
            role,
            iteration,
            context_size: 0,
            mutex_size: 0,
            filtered: 0,
            candidates: Vec::new(),
            selected: Vec::new(),
            inserted: 0,
            status,
        }
    }

    pub fn is_promoted(&self) -> bool {
        matches!(self.status, PhaseStatus::Promoted)
    }

    pub fn is_stalled(&self) -> bool {
        matches!(self.status, PhaseStatus::Stalled { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, PhaseStatus::Failed { .. })
    }

    pub fn candidate_instances(&self) -> Vec<ArgumentTuple> {
        self.candidates
            .iter()
            .filter_map(|r| r.value.as_instance().cloned())
            .collect()
    }

    pub fn candidate_patterns(&self) -> Vec<Pattern> {
        self.candidates
            .iter()
            .filter_map(|r| r.value.as_pattern().cloned())
            .collect()
    }

    pub fn selected_instances(&self) -> Vec<ArgumentTuple> {
        self.selected
            .iter()
            .filter_map(|r| r.value.as_instance().cloned())
            .collect()
    }

    pub fn selected_patterns(&self) -> Vec<Pattern> {
        self.selected
            .iter()
            .filter_map(|r| r.value.as_pattern().cloned())
            .collect()
    }
}

/// One `iterate()` of a single relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationReport {
    pub iteration: u32,
    pub patterns: PhaseOutcome,
    pub instances: PhaseOutcome,
}
