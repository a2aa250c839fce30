//! Subcommand implementations. Each writes its result to `out`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use espresso_bootstrap::{build_coordinator, EngineOptions, RunReport, StatisticsTables};
use espresso_core::config::{load_seeds, split_seeds, write_seeds, EspressoConfig};
use espresso_core::constants::DEFAULT_READ_POOL_SIZE;
use espresso_core::errors::{ConfigError, StorageError};
use espresso_core::events::EventDispatcher;
use espresso_core::traits::{CooccurrenceSource, StatisticsProvider};
use espresso_core::types::Role;
use espresso_storage::export::export_promotions;
use espresso_storage::ingest::ingest_file;
use espresso_storage::StorageEngine;

use crate::cli::{BootstrapArgs, Command, ExportArgs, IngestArgs, SeedsArgs, StoreArgs};
use crate::error::CliError;

pub fn run(command: Command, out: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Bootstrap(args) => bootstrap(&args, out).map(|_| ()),
        Command::Ingest(args) => ingest(&args, out),
        Command::Stats(args) => stats(&args, out),
        Command::Export(args) => export(&args, out),
        Command::Seeds(args) => sample_seeds(&args, out),
    }
}

fn write_err(e: std::io::Error) -> StorageError {
    StorageError::Io {
        path: "<output>".to_string(),
        message: e.to_string(),
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>, StorageError> {
    File::create(path).map(BufWriter::new).map_err(|e| StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn open_store(config: &EspressoConfig) -> Result<StorageEngine, StorageError> {
    StorageEngine::open(
        &config.store_path(),
        config.store.effective_matrix(),
        config.store.effective_read_pool_size(),
    )
}

// ---- bootstrap ----

pub fn bootstrap(args: &BootstrapArgs, out: &mut dyn Write) -> Result<RunReport, CliError> {
    let config = EspressoConfig::load(&args.config, Some(&args.overrides()))?;
    let store = Arc::new(open_store(&config)?);
    let mut coordinator = build_coordinator(
        &config,
        store.clone(),
        store,
        Arc::new(EventDispatcher::new()),
    )?;
    let report = coordinator.run(
        config.boot.effective_reset(),
        config.boot.effective_start(),
        config.boot.effective_stop(),
    )?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)
            .map_err(|e| write_err(e.into()))?;
        writeln!(out).map_err(write_err)?;
    } else {
        write_summary(&report, out).map_err(write_err)?;
    }
    if report.failed_phases() > 0 {
        warn!(failed_phases = report.failed_phases(), "run finished with failed phases");
    }
    Ok(report)
}

fn write_summary(report: &RunReport, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "relation\tpatterns\tinstances\tfailed")?;
    for relation in &report.relations {
        let (mut patterns, mut instances, mut failed) = (0, 0, 0);
        for outcome in report.outcomes_for(relation) {
            match outcome.role {
                Role::Pattern => patterns += outcome.inserted,
                Role::Instance => instances += outcome.inserted,
            }
            if outcome.is_failed() {
                failed += 1;
            }
        }
        writeln!(out, "{relation}\t{patterns}\t{instances}\t{failed}")?;
    }
    Ok(())
}

// ---- ingest ----

pub fn ingest(args: &IngestArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let engine = StorageEngine::open(&args.store.db, &args.store.matrix, DEFAULT_READ_POOL_SIZE)?;
    let mut records = 0;
    for file in &args.files {
        let report = ingest_file(&engine, file)?;
        records += report.records;
        writeln!(out, "{}\t{}\t{}", file.display(), report.records, report.skipped)
            .map_err(write_err)?;
    }
    let (cells, total) = engine.rebuild_frequencies()?;
    info!(files = args.files.len(), records, cells, total, "ingest complete");
    Ok(())
}

// ---- stats ----

pub fn stats(args: &StoreArgs, out: &mut dyn Write) -> Result<(), CliError> {
    if !args.db.exists() {
        return Err(StorageError::Io {
            path: args.db.display().to_string(),
            message: "database does not exist".to_string(),
        }
        .into());
    }
    let engine = StorageEngine::open(&args.db, &args.matrix, DEFAULT_READ_POOL_SIZE)?;
    let tables = engine.frequency_tables()?;
    let (instances, patterns, pairs) = (tables.instances.len(), tables.patterns.len(), tables.pairs.len());
    let arity = engine.arity()?.unwrap_or(0);
    let stats = StatisticsTables::from_frequencies(tables)?;

    let rows = [
        ("matrix", args.matrix.clone()),
        ("arity", arity.to_string()),
        ("total", stats.total().to_string()),
        ("instances", instances.to_string()),
        ("patterns", patterns.to_string()),
        ("pairs", pairs.to_string()),
        ("max_discounted_pmi", stats.max_discounted_pmi().to_string()),
    ];
    for (key, value) in rows {
        writeln!(out, "{key}\t{value}").map_err(write_err)?;
    }
    Ok(())
}

// ---- export ----

pub fn export(args: &ExportArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let config = EspressoConfig::load(&args.config, None)?;
    if !config.relations.contains_key(&args.relation) {
        return Err(ConfigError::ValidationFailed {
            field: "relation".to_string(),
            message: format!("'{}' is not configured", args.relation),
        }
        .into());
    }
    let namespace = EngineOptions::from_config(&config)?.namespace(&args.relation);
    let store = open_store(&config)?;

    let rows = match &args.out {
        Some(path) => export_to_file(&store, &namespace, args.role, path)?,
        None => export_promotions(&store, &namespace, args.role, out)?,
    };
    info!(relation = %args.relation, namespace, rows, "exported promotions");
    Ok(())
}

fn export_to_file(
    store: &StorageEngine,
    namespace: &str,
    role: Role,
    path: &Path,
) -> Result<usize, StorageError> {
    export_promotions(store, namespace, role, &mut create_file(path)?)
}

// ---- seeds ----

pub fn sample_seeds(args: &SeedsArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let seeds = load_seeds(&args.input)?;
    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let split = split_seeds(&seeds, args.dev, args.test, &mut rng)?;

    match &args.dev_out {
        Some(path) => {
            let mut file = create_file(path)?;
            write_seeds(&split.dev, &mut file)
                .and_then(|()| file.flush())
                .map_err(write_err)?;
        }
        None => write_seeds(&split.dev, out).map_err(write_err)?,
    }
    let mut file = create_file(&args.test_out)?;
    write_seeds(&split.test, &mut file)
        .and_then(|()| file.flush())
        .map_err(write_err)?;

    info!(
        input = %args.input.display(),
        seeds = seeds.len(),
        dev = split.dev.len(),
        test = split.test.len(),
        "sampled seeds"
    );
    Ok(())
}
