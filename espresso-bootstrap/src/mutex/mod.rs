//! Cross-relation mutual exclusion.

pub mod filter;
pub mod set;

pub use filter::MutexFilter;
pub use set::{MutexGroups, MutexSet};
