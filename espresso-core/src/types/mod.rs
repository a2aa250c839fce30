//! Value types shared by every espresso crate.

pub mod collections;
pub mod matrix;
pub mod promotion;
pub mod values;

pub use collections::{FxHashMap, FxHashSet};
pub use matrix::{CooccurrenceRecord, FrequencyTables, MatrixQuery};
pub use promotion::{IterationFilter, PromotedValue, PromotionRecord, Ranked, Role};
pub use values::{ArgumentTuple, Pattern};
