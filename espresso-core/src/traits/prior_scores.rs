//! PriorScores: reliability of values promoted in earlier phases.

use crate::types::{ArgumentTuple, Pattern};

/// Lookup of already-persisted reliability scores. Values never promoted
/// read as 0.
pub trait PriorScores {
    fn instance_reliability(&self, instance: &ArgumentTuple) -> f64;
    fn pattern_reliability(&self, pattern: &Pattern) -> f64;
}

/// Prior scores for a scorer that does not use them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPriorScores;

impl PriorScores for NoPriorScores {
    fn instance_reliability(&self, _instance: &ArgumentTuple) -> f64 {
        0.0
    }

    fn pattern_reliability(&self, _pattern: &Pattern) -> f64 {
        0.0
    }
}
