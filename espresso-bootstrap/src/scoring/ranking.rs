//! Deterministic ranking of scored candidates.

use std::cmp::Ordering;

use espresso_core::types::Ranked;

/// Score descending, then value ascending.
pub fn compare<T: Ord>(a: &Ranked<T>, b: &Ranked<T>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.value.cmp(&b.value))
}

pub fn sort_ranked<T: Ord>(ranked: &mut [Ranked<T>]) {
    ranked.sort_by(compare);
}

/// First `n` entries of an already sorted list.
pub fn top_n<T: Clone>(ranked: &[Ranked<T>], n: usize) -> Vec<Ranked<T>> {
    ranked.iter().take(n).cloned().collect()
}
