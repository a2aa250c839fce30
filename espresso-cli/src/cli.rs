//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use espresso_core::config::CliOverrides;
use espresso_core::constants::{DEFAULT_DEV_SEEDS, DEFAULT_TEST_SEEDS};
use espresso_core::types::Role;

#[derive(Debug, Parser)]
#[command(name = "espresso")]
#[command(version, about = "Semi-supervised relation bootstrapping (Espresso / CPL)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run bootstrapping iterations for every configured relation.
    Bootstrap(BootstrapArgs),
    /// Load extracted instance files into the co-occurrence matrix.
    Ingest(IngestArgs),
    /// Print matrix totals and the maximum discounted PMI.
    Stats(StoreArgs),
    /// Write a relation's promotions as tab-separated rows.
    Export(ExportArgs),
    /// Draw random development and test samples from a seed file.
    Seeds(SeedsArgs),
}

#[derive(Debug, Args)]
pub struct BootstrapArgs {
    /// Run configuration (TOML).
    pub config: PathBuf,
    /// First iteration to run.
    #[arg(long)]
    pub start: Option<u32>,
    /// Last iteration to run, inclusive.
    #[arg(long)]
    pub stop: Option<u32>,
    /// Promotions kept per phase.
    #[arg(long)]
    pub n: Option<usize>,
    /// Accumulate promotions across iterations.
    #[arg(long)]
    pub keep: bool,
    /// Clear stored promotions before iteration 1.
    #[arg(long)]
    pub reset: bool,
    /// `reliability` or `precision-count`.
    #[arg(long)]
    pub scorer: Option<String>,
    /// Database path, overriding the configuration.
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Print the full run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl BootstrapArgs {
    /// Flags left unset do not override the file or environment.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            db: self.db.clone(),
            n: self.n,
            keep: self.keep.then_some(true),
            reset: self.reset.then_some(true),
            scorer: self.scorer.clone(),
            start: self.start,
            stop: self.stop,
        }
    }
}

#[derive(Debug, Args)]
pub struct StoreArgs {
    #[arg(long)]
    pub db: PathBuf,
    /// Matrix name inside the database.
    #[arg(long)]
    pub matrix: String,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Instance files: `weight \t location \t pattern \t argc \t args...`.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Run configuration the promotions were produced with.
    #[arg(long)]
    pub config: PathBuf,
    #[arg(long)]
    pub relation: String,
    /// `instance` or `pattern`.
    #[arg(long, default_value = "instance", value_parser = parse_role)]
    pub role: Role,
    /// Output file; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SeedsArgs {
    /// Seed file to sample from.
    pub input: PathBuf,
    /// Size of the development sample.
    #[arg(long, default_value_t = DEFAULT_DEV_SEEDS)]
    pub dev: usize,
    /// Size of the test sample.
    #[arg(long, default_value_t = DEFAULT_TEST_SEEDS)]
    pub test: usize,
    /// Development sample file; stdout when omitted.
    #[arg(long)]
    pub dev_out: Option<PathBuf>,
    /// Test sample file.
    #[arg(long)]
    pub test_out: PathBuf,
    /// Random seed, for a repeatable split.
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("unknown role '{s}', expected instance or pattern"))
}
