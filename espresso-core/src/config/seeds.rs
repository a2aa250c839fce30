//! Seed file loading.

use std::io::Write;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::ConfigError;
use crate::types::ArgumentTuple;

/// Parses seed text: one tab-separated tuple per line, blank lines and
/// `#` comments skipped, duplicates dropped (first occurrence wins).
/// Every tuple must have the same arity.
pub fn parse_seeds(text: &str, origin: &str) -> Result<Vec<ArgumentTuple>, ConfigError> {
    let mut seeds: Vec<ArgumentTuple> = Vec::new();
    let mut arity: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let Some(seed) = ArgumentTuple::parse_tab_separated(line) else {
            continue;
        };
        if seed.iter().any(|arg| arg.trim().is_empty()) {
            return Err(ConfigError::InvalidSeed {
                path: origin.to_string(),
                line: idx + 1,
                message: "empty argument".to_string(),
            });
        }
        match arity {
            None => arity = Some(seed.arity()),
            Some(expected) if expected != seed.arity() => {
                return Err(ConfigError::InvalidSeed {
                    path: origin.to_string(),
                    line: idx + 1,
                    message: format!("arity {} differs from {expected}", seed.arity()),
                });
            }
            Some(_) => {}
        }
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    Ok(seeds)
}

/// Reads and parses a seed file.
pub fn load_seeds(path: &Path) -> Result<Vec<ArgumentTuple>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.display().to_string(),
    })?;
    parse_seeds(&text, &path.display().to_string())
}

/// Disjoint random samples of a seed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSplit {
    pub dev: Vec<ArgumentTuple>,
    pub test: Vec<ArgumentTuple>,
}

/// Draws `dev + test` distinct seeds without replacement and splits them,
/// development sample first. Fails when there are not enough seeds.
pub fn split_seeds<R: Rng + ?Sized>(
    seeds: &[ArgumentTuple],
    dev: usize,
    test: usize,
    rng: &mut R,
) -> Result<SeedSplit, ConfigError> {
    let wanted = dev + test;
    if wanted > seeds.len() {
        return Err(ConfigError::ValidationFailed {
            field: "seeds".to_string(),
            message: format!("cannot sample {wanted} seeds from {}", seeds.len()),
        });
    }
    let mut pool = seeds.to_vec();
    pool.shuffle(rng);
    pool.truncate(wanted);
    let test = pool.split_off(dev);
    Ok(SeedSplit { dev: pool, test })
}

/// Writes seeds in the format [`parse_seeds`] reads.
pub fn write_seeds<W: Write + ?Sized>(seeds: &[ArgumentTuple], out: &mut W) -> std::io::Result<()> {
    for seed in seeds {
        writeln!(out, "{}", seed.to_tab_separated())?;
    }
    Ok(())
}
