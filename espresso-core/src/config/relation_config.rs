//! Per-relation configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One `[relations.<name>]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelationConfig {
    /// Seed file, one tab-separated tuple per line. Relative paths resolve
    /// against the config file's directory.
    pub seeds: Option<PathBuf>,
    /// Relations this one is mutually exclusive with.
    pub mutex: Vec<String>,
}
