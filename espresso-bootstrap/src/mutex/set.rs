//! MutexSet and the static relation exclusion groups.

use std::collections::{BTreeMap, BTreeSet};

/// Items promoted by competing relations. Used only as a filter; never
/// persisted and rebuilt every phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexSet<T: Ord> {
    items: BTreeSet<T>,
    sources: Vec<String>,
}

impl<T: Ord> Default for MutexSet<T> {
    fn default() -> Self {
        Self {
            items: BTreeSet::new(),
            sources: Vec::new(),
        }
    }
}

impl<T: Ord + Clone> MutexSet<T> {
    pub fn new<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self {
            items: items.into_iter().collect(),
            sources: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Relations the items were drawn from.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    fn absorb(&mut self, source: &str, items: &[T]) {
        self.items.extend(items.iter().cloned());
        self.sources.push(source.to_string());
    }
}

/// Static configuration: relation -> relations it is mutually exclusive with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutexGroups {
    partners: BTreeMap<String, Vec<String>>,
}

impl MutexGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `a` and `b` mutually exclusive, in both directions.
    pub fn exclude(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        for (x, y) in [(a, b), (b, a)] {
            let partners = self.partners.entry(x.to_string()).or_default();
            if !partners.iter().any(|p| p == y) {
                partners.push(y.to_string());
                partners.sort();
            }
        }
    }

    pub fn partners(&self, relation: &str) -> &[String] {
        self.partners.get(relation).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Union of every partner's collected items.
    pub fn build<T: Ord + Clone>(
        &self,
        relation: &str,
        collected: &BTreeMap<String, Vec<T>>,
    ) -> MutexSet<T> {
        let mut set = MutexSet::default();
        for partner in self.partners(relation) {
            if let Some(items) = collected.get(partner) {
                set.absorb(partner, items);
            }
        }
        set
    }
}
