//! Statistics provider: frequencies and (discounted) PMI over the matrix.

pub mod pmi;
pub mod tables;

pub use tables::{PairStatistics, StatisticsTables};
