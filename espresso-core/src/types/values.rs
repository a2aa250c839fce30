//! Value types for instances and patterns.
//!
//! Both are immutable and compared by value. Ordering is derived so ranked
//! output can break score ties deterministically.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::collections::ArgVec;

/// An ordered, fixed-arity tuple of relation arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentTuple(ArgVec);

impl ArgumentTuple {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    /// Parses one tab-separated line. Returns `None` for an empty line.
    pub fn parse_tab_separated(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        Some(Self::new(line.split('\t')))
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn args(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tab-joined form, the inverse of `parse_tab_separated`.
    pub fn to_tab_separated(&self) -> String {
        self.0.join("\t")
    }
}

impl fmt::Display for ArgumentTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for ArgumentTuple {
    fn from(args: [S; N]) -> Self {
        Self::new(args)
    }
}

/// A textual pattern such as `ARG1 acquired ARG2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(String);

impl Pattern {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl Borrow<str> for Pattern {
    fn borrow(&self) -> &str {
        &self.0
    }
}
