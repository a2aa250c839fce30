//! Top-level run configuration with layered resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BootConfig, RelationConfig, StoreConfig};
use crate::constants::ENV_PREFIX;
use crate::errors::ConfigError;

/// Top-level configuration.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`ESPRESSO_*`)
/// 3. The config file
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EspressoConfig {
    pub store: StoreConfig,
    pub boot: BootConfig,
    pub relations: BTreeMap<String, RelationConfig>,
    /// Directory relative paths resolve against. Set by `load`.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub n: Option<usize>,
    pub keep: Option<bool>,
    pub reset: Option<bool>,
    pub scorer: Option<String>,
    pub start: Option<u32>,
    pub stop: Option<u32>,
}

impl EspressoConfig {
    /// Loads `path`, then applies environment and CLI overrides and validates.
    pub fn load(path: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config: EspressoConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        config.apply_env_overrides();
        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML string without overrides or validation.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    /// Checks everything a run needs before any phase starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relations.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "relations".to_string(),
                message: "at least one relation is required".to_string(),
            });
        }
        self.boot.effective_scorer()?;

        if self.boot.effective_n() == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "boot.n".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        let threshold = self.boot.effective_mutex_threshold();
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::ValidationFailed {
                field: "boot.mutex_threshold".to_string(),
                message: "must be a positive number".to_string(),
            });
        }
        if self.boot.effective_start() > self.boot.effective_stop() {
            return Err(ConfigError::ValidationFailed {
                field: "boot.start".to_string(),
                message: format!(
                    "start {} is after stop {}",
                    self.boot.effective_start(),
                    self.boot.effective_stop()
                ),
            });
        }
        if self.boot.workers == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "boot.workers".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        for (name, relation) in &self.relations {
            if relation.seeds.is_none() {
                return Err(ConfigError::MissingSeeds {
                    relation: name.clone(),
                });
            }
            for other in &relation.mutex {
                if other == name || !self.relations.contains_key(other) {
                    return Err(ConfigError::UnknownRelation {
                        relation: name.clone(),
                        other: other.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Relation names in a stable order.
    pub fn relation_names(&self) -> Vec<String> {
        self.relations.keys().cloned().collect()
    }

    /// Seed path for `relation`, resolved against `base_dir`.
    pub fn seed_path(&self, relation: &str) -> Result<PathBuf, ConfigError> {
        let seeds = self
            .relations
            .get(relation)
            .and_then(|r| r.seeds.as_ref())
            .ok_or_else(|| ConfigError::MissingSeeds {
                relation: relation.to_string(),
            })?;
        Ok(self.resolve(seeds))
    }

    /// Store path resolved against `base_dir`.
    pub fn store_path(&self) -> PathBuf {
        self.resolve(&self.store.effective_path())
    }

    /// Mutex partners of `relation`, made symmetric: if A lists B, B also
    /// excludes A.
    pub fn mutex_partners(&self, relation: &str) -> Vec<String> {
        let mut partners: Vec<String> = self
            .relations
            .get(relation)
            .map(|r| r.mutex.clone())
            .unwrap_or_default();
        for (name, other) in &self.relations {
            if other.mutex.iter().any(|m| m == relation) && !partners.contains(name) {
                partners.push(name.clone());
            }
        }
        partners.sort();
        partners
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Applies `ESPRESSO_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(val) = var("DB") {
            self.store.path = Some(PathBuf::from(val));
        }
        if let Some(val) = var("MATRIX") {
            self.store.matrix = Some(val);
        }
        if let Some(val) = var("N") {
            if let Ok(n) = val.parse() {
                self.boot.n = Some(n);
            }
        }
        if let Some(val) = var("KEEP") {
            if let Some(b) = parse_bool(&val) {
                self.boot.keep = Some(b);
            }
        }
        if let Some(val) = var("RESET") {
            if let Some(b) = parse_bool(&val) {
                self.boot.reset = Some(b);
            }
        }
        if let Some(val) = var("SCORER") {
            self.boot.scorer = Some(val);
        }
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(db) = &cli.db {
            self.store.path = Some(db.clone());
        }
        if cli.n.is_some() {
            self.boot.n = cli.n;
        }
        if cli.keep.is_some() {
            self.boot.keep = cli.keep;
        }
        if cli.reset.is_some() {
            self.boot.reset = cli.reset;
        }
        if let Some(scorer) = &cli.scorer {
            self.boot.scorer = Some(scorer.clone());
        }
        if cli.start.is_some() {
            self.boot.start = cli.start;
        }
        if cli.stop.is_some() {
            self.boot.stop = cli.stop;
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
