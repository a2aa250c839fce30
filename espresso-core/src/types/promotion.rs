//! Promotion records: the unit of persisted bootstrap state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::values::{ArgumentTuple, Pattern};

/// Which side of the instance/pattern bipartite graph a value lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Instance,
    Pattern,
}

impl Role {
    pub fn complement(self) -> Self {
        match self {
            Self::Instance => Self::Pattern,
            Self::Pattern => Self::Instance,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::Pattern => "pattern",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "instance" | "i" => Some(Self::Instance),
            "pattern" | "p" => Some(Self::Pattern),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A promoted value of either role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "role", content = "value", rename_all = "lowercase")]
pub enum PromotedValue {
    Instance(ArgumentTuple),
    Pattern(Pattern),
}

impl PromotedValue {
    pub fn role(&self) -> Role {
        match self {
            Self::Instance(_) => Role::Instance,
            Self::Pattern(_) => Role::Pattern,
        }
    }

    pub fn as_instance(&self) -> Option<&ArgumentTuple> {
        match self {
            Self::Instance(i) => Some(i),
            Self::Pattern(_) => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Self::Pattern(p) => Some(p),
            Self::Instance(_) => None,
        }
    }
}

impl fmt::Display for PromotedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(i) => i.fmt(f),
            Self::Pattern(p) => p.fmt(f),
        }
    }
}

impl From<ArgumentTuple> for PromotedValue {
    fn from(i: ArgumentTuple) -> Self {
        Self::Instance(i)
    }
}

impl From<Pattern> for PromotedValue {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

/// One promotion. Written once per `(relation, role, value)`; later
/// insertions of the same value are ignored by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRecord {
    pub relation: String,
    pub value: PromotedValue,
    pub iteration: u32,
    pub score: f64,
}

impl PromotionRecord {
    pub fn new(
        relation: impl Into<String>,
        value: impl Into<PromotedValue>,
        iteration: u32,
        score: f64,
    ) -> Self {
        Self {
            relation: relation.into(),
            value: value.into(),
            iteration,
            score,
        }
    }

    pub fn role(&self) -> Role {
        self.value.role()
    }
}

/// Iteration predicate used when reading promotions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationFilter {
    /// `iteration == k`
    Exactly(u32),
    /// `iteration <= k`
    AtMost(u32),
    /// `iteration < k`
    Before(u32),
}

impl IterationFilter {
    /// `keep = true` accumulates every round up to `k`; otherwise only round `k`.
    pub fn for_keep(keep: bool, iteration: u32) -> Self {
        if keep {
            Self::AtMost(iteration)
        } else {
            Self::Exactly(iteration)
        }
    }

    pub fn matches(self, iteration: u32) -> bool {
        match self {
            Self::Exactly(k) => iteration == k,
            Self::AtMost(k) => iteration <= k,
            Self::Before(k) => iteration < k,
        }
    }
}

/// A candidate with its score, as produced by a scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub value: T,
    pub score: f64,
}

impl<T> Ranked<T> {
    pub fn new(value: T, score: f64) -> Self {
        Self { value, score }
    }
}
