//! Co-occurrence matrix records, queries, and raw frequency aggregates.

use serde::{Deserialize, Serialize};

use super::values::{ArgumentTuple, Pattern};

/// `(pattern, instance) -> weight`. Read-only for the bootstrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceRecord {
    pub pattern: Pattern,
    pub instance: ArgumentTuple,
    pub weight: f64,
}

/// Partial-match query over `(pattern, arg1..argN)`.
///
/// `instance` matches a whole tuple exactly. `args` matches individual
/// positions, `None` being a wildcard. An empty query scans the matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixQuery {
    pub pattern: Option<Pattern>,
    pub instance: Option<ArgumentTuple>,
    pub args: Vec<Option<String>>,
}

impl MatrixQuery {
    pub fn for_pattern(pattern: &Pattern) -> Self {
        Self {
            pattern: Some(pattern.clone()),
            ..Self::default()
        }
    }

    pub fn for_instance(instance: &ArgumentTuple) -> Self {
        Self {
            instance: Some(instance.clone()),
            ..Self::default()
        }
    }

    /// Restricts argument `position` (0-based) to `value`.
    pub fn with_arg(mut self, position: usize, value: impl Into<String>) -> Self {
        if self.args.len() <= position {
            self.args.resize(position + 1, None);
        }
        self.args[position] = Some(value.into());
        self
    }

    /// Bound argument positions as `(position, value)` pairs.
    pub fn bound_args(&self) -> impl Iterator<Item = (usize, &str)> {
        self.args
            .iter()
            .enumerate()
            .filter_map(|(pos, arg)| arg.as_deref().map(|v| (pos, v)))
    }
}

/// Aggregate weights over the whole matrix: `F_all`, `F(i)`, `F(p)`, `F(i,p)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTables {
    pub total: f64,
    pub instances: Vec<(ArgumentTuple, f64)>,
    pub patterns: Vec<(Pattern, f64)>,
    pub pairs: Vec<(Pattern, ArgumentTuple, f64)>,
}
