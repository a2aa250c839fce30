//! StatisticsProvider: frequency and PMI lookups.

use crate::errors::StatsError;
use crate::types::{ArgumentTuple, Pattern};

/// Read-side statistics over an immutable co-occurrence matrix.
///
/// Lookups with no evidence return `StatsError::NotFound`; scorers treat
/// that as zero contribution.
pub trait StatisticsProvider: Send + Sync {
    /// Total weight of the matrix (`F_all`).
    fn total(&self) -> f64;

    /// `F(i)`
    fn instance_frequency(&self, instance: &ArgumentTuple) -> Result<f64, StatsError>;

    /// `F(p)`
    fn pattern_frequency(&self, pattern: &Pattern) -> Result<f64, StatsError>;

    /// `F(i,p)`
    fn joint_frequency(&self, instance: &ArgumentTuple, pattern: &Pattern)
        -> Result<f64, StatsError>;

    /// `log(P(i,p) / (P(i)·P(p)))`
    fn pmi(&self, instance: &ArgumentTuple, pattern: &Pattern) -> Result<f64, StatsError>;

    /// `F(i,p)/(F(i,p)+1) · m/(m+1)` with `m = min(F(i), F(p))`.
    fn discount(&self, instance: &ArgumentTuple, pattern: &Pattern) -> Result<f64, StatsError>;

    /// `pmi · discount`
    fn discounted_pmi(&self, instance: &ArgumentTuple, pattern: &Pattern)
        -> Result<f64, StatsError>;

    /// Maximum discounted PMI over the whole matrix. Computed once.
    fn max_discounted_pmi(&self) -> f64;

    /// `F(i,p)` with missing evidence read as zero.
    fn joint_or_zero(&self, instance: &ArgumentTuple, pattern: &Pattern) -> f64 {
        self.joint_frequency(instance, pattern).unwrap_or(0.0)
    }

    /// Discounted PMI with missing evidence read as zero.
    fn discounted_pmi_or_zero(&self, instance: &ArgumentTuple, pattern: &Pattern) -> f64 {
        self.discounted_pmi(instance, pattern).unwrap_or(0.0)
    }
}
