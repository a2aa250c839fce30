//! CLI tests: argument parsing, exit codes, and a full ingest → bootstrap →
//! export round on a file-backed database.

use std::path::Path;

use clap::Parser;
use espresso_cli::cli::{BootstrapArgs, ExportArgs, IngestArgs, SeedsArgs, StoreArgs};
use espresso_core::config::load_seeds;
use espresso_cli::{run, Cli, CliError, Command};
use espresso_core::types::Role;

const INSTANCES: &str = "\
5\tnews.txt:1\tARG1 acquired ARG2\t2\tGoogle\tYouTube
4\tnews.txt:2\tARG1 acquired ARG2\t2\tFacebook\tInstagram
1\tnews.txt:3\tARG1 bought ARG2\t2\tGoogle\tYouTube

10\tshop.txt:1\tARG1 bought ARG2\t2\tAlice\tCarrot
10\tshop.txt:2\tARG1 likes ARG2\t2\tAlice\tCarrot
";

fn write_project(dir: &Path) {
    std::fs::write(dir.join("instances.tsv"), INSTANCES).unwrap();
    std::fs::write(dir.join("acquired.txt"), "Google\tYouTube\n").unwrap();
    std::fs::write(
        dir.join("espresso.toml"),
        r#"
[store]
path = "boot.db"
matrix = "reverb"

[boot]
n = 1
stop = 1

[relations.acquired]
seeds = "acquired.txt"
"#,
    )
    .unwrap();
}

fn run_to_string(command: Command) -> Result<String, CliError> {
    let mut out = Vec::new();
    run(command, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

// ---- Parsing ----

#[test]
fn test_bootstrap_flags_become_overrides() {
    let cli = Cli::try_parse_from([
        "espresso", "bootstrap", "run.toml", "--start", "2", "--stop", "4", "--keep", "--scorer",
        "precision-count",
    ])
    .unwrap();
    let Command::Bootstrap(args) = cli.command else {
        panic!("expected bootstrap");
    };
    let overrides = args.overrides();
    assert_eq!(overrides.start, Some(2));
    assert_eq!(overrides.stop, Some(4));
    assert_eq!(overrides.keep, Some(true));
    assert_eq!(overrides.reset, None);
    assert_eq!(overrides.scorer.as_deref(), Some("precision-count"));
}

#[test]
fn test_export_role_parsing() {
    let cli = Cli::try_parse_from([
        "espresso", "export", "--config", "run.toml", "--relation", "acquired", "--role", "pattern",
    ])
    .unwrap();
    let Command::Export(args) = cli.command else {
        panic!("expected export");
    };
    assert_eq!(args.role, Role::Pattern);

    assert!(Cli::try_parse_from([
        "espresso", "export", "--config", "run.toml", "--relation", "acquired", "--role", "edge",
    ])
    .is_err());
}

#[test]
fn test_ingest_requires_files() {
    assert!(Cli::try_parse_from(["espresso", "ingest", "--db", "x.db", "--matrix", "m"]).is_err());
}

#[test]
fn test_seeds_sample_sizes_default() {
    let cli = Cli::try_parse_from(["espresso", "seeds", "all.txt", "--test-out", "test.txt"]).unwrap();
    let Command::Seeds(args) = cli.command else {
        panic!("expected seeds");
    };
    assert_eq!((args.dev, args.test), (10, 100));
    assert_eq!(args.dev_out, None);
    assert_eq!(args.rng_seed, None);
}

// ---- Exit codes ----

#[test]
fn test_missing_config_exits_with_two() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = run_to_string(Command::Bootstrap(BootstrapArgs {
        config: dir.path().join("absent.toml"),
        start: None,
        stop: None,
        n: None,
        keep: false,
        reset: false,
        scorer: None,
        db: None,
        json: false,
    }))
    .unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_database_exits_with_one() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = run_to_string(Command::Stats(StoreArgs {
        db: dir.path().join("absent.db"),
        matrix: "reverb".to_string(),
    }))
    .unwrap_err();
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_seeds_sample_larger_than_file_exits_with_two() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("all.txt"), "Google\tYouTube\n").unwrap();
    let err = run_to_string(Command::Seeds(SeedsArgs {
        input: dir.path().join("all.txt"),
        dev: 1,
        test: 1,
        dev_out: None,
        test_out: dir.path().join("test.txt"),
        rng_seed: Some(1),
    }))
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(!dir.path().join("test.txt").exists());
}

// ---- End to end ----

#[test]
fn test_ingest_bootstrap_export() {
    let dir = tempfile::TempDir::new().unwrap();
    write_project(dir.path());
    let db = dir.path().join("boot.db");

    let ingested = run_to_string(Command::Ingest(IngestArgs {
        store: StoreArgs {
            db: db.clone(),
            matrix: "reverb".to_string(),
        },
        files: vec![dir.path().join("instances.tsv")],
    }))
    .unwrap();
    assert!(ingested.ends_with("\t5\t1\n"));

    let stats = run_to_string(Command::Stats(StoreArgs {
        db,
        matrix: "reverb".to_string(),
    }))
    .unwrap();
    assert!(stats.contains("total\t30\n"));
    assert!(stats.contains("pairs\t5\n"));
    assert!(stats.contains("arity\t2\n"));

    let config = dir.path().join("espresso.toml");
    let summary = run_to_string(Command::Bootstrap(BootstrapArgs {
        config: config.clone(),
        start: None,
        stop: None,
        n: None,
        keep: false,
        reset: true,
        scorer: None,
        db: None,
        json: false,
    }))
    .unwrap();
    assert_eq!(summary, "relation\tpatterns\tinstances\tfailed\nacquired\t1\t1\t0\n");

    let patterns = run_to_string(Command::Export(ExportArgs {
        config: config.clone(),
        relation: "acquired".to_string(),
        role: Role::Pattern,
        out: None,
    }))
    .unwrap();
    let lines: Vec<&str> = patterns.lines().collect();
    assert_eq!(lines[0], "iteration\tscore\tpattern");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("1\t"));
    assert!(lines[1].ends_with("\tARG1 acquired ARG2"));

    let out_file = dir.path().join("instances.out");
    run_to_string(Command::Export(ExportArgs {
        config,
        relation: "acquired".to_string(),
        role: Role::Instance,
        out: Some(out_file.clone()),
    }))
    .unwrap();
    let written = std::fs::read_to_string(out_file).unwrap();
    assert!(written.contains("0\t1\tGoogle\tYouTube\n"));
    assert!(written.contains("\tFacebook\tInstagram\n"));
}

#[test]
fn test_export_unknown_relation_is_config_error() {
    let dir = tempfile::TempDir::new().unwrap();
    write_project(dir.path());
    let err = run_to_string(Command::Export(ExportArgs {
        config: dir.path().join("espresso.toml"),
        relation: "born_in".to_string(),
        role: Role::Instance,
        out: None,
    }))
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_seeds_split_into_dev_and_test_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let all: String = (0..30).map(|i| format!("company{i}\tproduct{i}\n")).collect();
    std::fs::write(dir.path().join("all.txt"), all).unwrap();
    let args = |dev_out| SeedsArgs {
        input: dir.path().join("all.txt"),
        dev: 4,
        test: 12,
        dev_out,
        test_out: dir.path().join("test.txt"),
        rng_seed: Some(9),
    };

    let printed = run_to_string(Command::Seeds(args(None))).unwrap();
    assert_eq!(printed.lines().count(), 4);
    let test = load_seeds(&dir.path().join("test.txt")).unwrap();
    assert_eq!(test.len(), 12);

    run_to_string(Command::Seeds(args(Some(dir.path().join("dev.txt"))))).unwrap();
    let dev_text = std::fs::read_to_string(dir.path().join("dev.txt")).unwrap();
    assert_eq!(dev_text, printed);

    let originals = load_seeds(&dir.path().join("all.txt")).unwrap();
    let dev = load_seeds(&dir.path().join("dev.txt")).unwrap();
    assert!(dev.iter().all(|s| !test.contains(s)));
    assert!(dev.iter().chain(&test).all(|s| originals.contains(s)));
}
