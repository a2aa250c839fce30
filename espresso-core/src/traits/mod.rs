//! Traits at the seams between the engine and its collaborators.

pub mod cooccurrence;
pub mod prior_scores;
pub mod promotion_store;
pub mod statistics;

pub use cooccurrence::CooccurrenceSource;
pub use prior_scores::{NoPriorScores, PriorScores};
pub use promotion_store::PromotionStore;
pub use statistics::StatisticsProvider;
