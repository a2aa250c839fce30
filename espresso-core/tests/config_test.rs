//! Tests for run configuration loading, overrides, and validation.

use std::collections::BTreeSet;
use std::sync::Mutex;

use espresso_core::config::{
    parse_seeds, split_seeds, write_seeds, Algorithm, CliOverrides, EspressoConfig,
    MutexSource, ScorerKind,
};
use espresso_core::errors::ConfigError;
use espresso_core::types::ArgumentTuple;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Serializes tests that touch process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_espresso_env_vars() {
    for key in [
        "ESPRESSO_DB",
        "ESPRESSO_MATRIX",
        "ESPRESSO_N",
        "ESPRESSO_KEEP",
        "ESPRESSO_RESET",
        "ESPRESSO_SCORER",
    ] {
        std::env::remove_var(key);
    }
}

const BASIC: &str = r#"
[store]
path = "boot.db"
matrix = "reverb"

[boot]
n = 5
keep = true
scorer = "precision-count"

[relations.acquired]
seeds = "seeds/acquired.txt"
mutex = ["born_in"]

[relations.born_in]
seeds = "seeds/born_in.txt"
"#;

// ---- Parsing & defaults ----

#[test]
fn test_from_toml_reads_all_sections() {
    let config = EspressoConfig::from_toml(BASIC).unwrap();
    assert_eq!(config.store.effective_matrix(), "reverb");
    assert_eq!(config.boot.effective_n(), 5);
    assert!(config.boot.effective_keep());
    assert_eq!(config.boot.effective_scorer().unwrap(), ScorerKind::PrecisionCount);
    assert_eq!(config.relation_names(), vec!["acquired", "born_in"]);
    config.validate().unwrap();
}

#[test]
fn test_defaults_when_sections_missing() {
    let config = EspressoConfig::from_toml(
        r#"
[relations.acquired]
seeds = "a.txt"
"#,
    )
    .unwrap();
    assert_eq!(config.boot.effective_n(), 10);
    assert!(!config.boot.effective_keep());
    assert!(!config.boot.effective_reset());
    assert_eq!(config.boot.effective_scorer().unwrap(), ScorerKind::Reliability);
    assert_eq!(config.boot.effective_algorithm(), Algorithm::Cpl);
    assert_eq!(config.boot.effective_mutex_source(), MutexSource::Candidates);
    assert!((config.boot.effective_mutex_threshold() - 3.0).abs() < f64::EPSILON);
    assert_eq!(config.boot.effective_start(), 1);
    assert_eq!(config.boot.effective_stop(), 10);
    assert_eq!(config.store.effective_read_pool_size(), 4);
}

#[test]
fn test_mutex_partners_are_symmetric() {
    let config = EspressoConfig::from_toml(BASIC).unwrap();
    assert_eq!(config.mutex_partners("acquired"), vec!["born_in"]);
    assert_eq!(config.mutex_partners("born_in"), vec!["acquired"]);
}

// ---- Validation ----

#[test]
fn test_unknown_scorer_rejected() {
    let config = EspressoConfig::from_toml(
        r#"
[boot]
scorer = "bayesian"

[relations.acquired]
seeds = "a.txt"
"#,
    )
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownScorer { ref name } if name == "bayesian"));
}

#[test]
fn test_missing_seeds_rejected() {
    let config = EspressoConfig::from_toml(
        r#"
[relations.acquired]
mutex = []
"#,
    )
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingSeeds { ref relation } if relation == "acquired"));
}

#[test]
fn test_unknown_mutex_relation_rejected() {
    let config = EspressoConfig::from_toml(
        r#"
[relations.acquired]
seeds = "a.txt"
mutex = ["founded"]
"#,
    )
    .unwrap();
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::UnknownRelation { .. }
    ));
}

#[test]
fn test_no_relations_rejected() {
    let config = EspressoConfig::from_toml("[boot]\nn = 3\n").unwrap();
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::ValidationFailed { ref field, .. } if field == "relations"
    ));
}

#[test]
fn test_zero_n_and_inverted_bounds_rejected() {
    let mut config = EspressoConfig::from_toml(BASIC).unwrap();
    config.boot.n = Some(0);
    assert!(config.validate().is_err());

    let mut config = EspressoConfig::from_toml(BASIC).unwrap();
    config.boot.start = Some(4);
    config.boot.stop = Some(2);
    assert!(config.validate().is_err());

    let mut config = EspressoConfig::from_toml(BASIC).unwrap();
    config.boot.mutex_threshold = Some(-1.0);
    assert!(config.validate().is_err());
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let err = EspressoConfig::from_toml("[boot\nn = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

// ---- Layered loading ----

#[test]
fn test_load_resolves_paths_and_applies_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_espresso_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("espresso.toml");
    std::fs::write(&path, BASIC).unwrap();

    std::env::set_var("ESPRESSO_N", "7");
    std::env::set_var("ESPRESSO_KEEP", "false");

    let cli = CliOverrides {
        n: Some(2),
        start: Some(3),
        stop: Some(4),
        ..Default::default()
    };
    let config = EspressoConfig::load(&path, Some(&cli)).unwrap();

    // CLI beats env, env beats file.
    assert_eq!(config.boot.effective_n(), 2);
    assert!(!config.boot.effective_keep());
    assert_eq!(config.boot.effective_start(), 3);
    assert_eq!(config.store_path(), dir.path().join("boot.db"));
    assert_eq!(
        config.seed_path("acquired").unwrap(),
        dir.path().join("seeds/acquired.txt")
    );

    clear_espresso_env_vars();
}

#[test]
fn test_load_missing_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let err = EspressoConfig::load(std::path::Path::new("/nonexistent/espresso.toml"), None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn test_override_lookup_ignores_garbage() {
    let mut config = EspressoConfig::from_toml(BASIC).unwrap();
    config.apply_overrides_from(|key| match key {
        "ESPRESSO_N" => Some("lots".to_string()),
        "ESPRESSO_RESET" => Some("yes".to_string()),
        "ESPRESSO_SCORER" => Some("reliability".to_string()),
        _ => None,
    });
    assert_eq!(config.boot.effective_n(), 5);
    assert!(config.boot.effective_reset());
    assert_eq!(config.boot.effective_scorer().unwrap(), ScorerKind::Reliability);
}

// ---- Seeds ----

#[test]
fn test_parse_seeds_skips_comments_and_duplicates() {
    let seeds = parse_seeds(
        "# companies\nGoogle\tYouTube\n\nMicrosoft\tSkype\nGoogle\tYouTube\n",
        "<test>",
    )
    .unwrap();
    assert_eq!(
        seeds,
        vec![
            ArgumentTuple::from(["Google", "YouTube"]),
            ArgumentTuple::from(["Microsoft", "Skype"]),
        ]
    );
}

#[test]
fn test_parse_seeds_rejects_mixed_arity() {
    let err = parse_seeds("Google\tYouTube\nParis\n", "seeds.txt").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSeed { line: 2, .. }));
}

fn numbered_seeds(count: usize) -> Vec<ArgumentTuple> {
    (0..count)
        .map(|i| ArgumentTuple::from([format!("company{i}"), format!("product{i}")]))
        .collect()
}

#[test]
fn test_split_seeds_draws_disjoint_samples() {
    let seeds = numbered_seeds(20);
    let split = split_seeds(&seeds, 3, 7, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(split.dev.len(), 3);
    assert_eq!(split.test.len(), 7);

    let dev: BTreeSet<_> = split.dev.iter().collect();
    let test: BTreeSet<_> = split.test.iter().collect();
    assert!(dev.is_disjoint(&test));
    assert!(split.dev.iter().chain(&split.test).all(|s| seeds.contains(s)));
}

#[test]
fn test_split_seeds_repeats_with_same_rng_seed() {
    let seeds = numbered_seeds(50);
    let a = split_seeds(&seeds, 10, 20, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = split_seeds(&seeds, 10, 20, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_split_seeds_rejects_short_seed_list() {
    let err = split_seeds(&numbered_seeds(5), 10, 100, &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "seeds"));
}

#[test]
fn test_written_seeds_parse_back() {
    let seeds = numbered_seeds(3);
    let mut buf = Vec::new();
    write_seeds(&seeds, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().next(), Some("company0\tproduct0"));
    assert_eq!(parse_seeds(&text, "<written>").unwrap(), seeds);
}

proptest! {
    #[test]
    fn prop_split_uses_every_seed_at_most_once(
        count in 0usize..40,
        dev in 0usize..20,
        test in 0usize..20,
        rng_seed in any::<u64>(),
    ) {
        let seeds = numbered_seeds(count);
        let result = split_seeds(&seeds, dev, test, &mut StdRng::seed_from_u64(rng_seed));
        if dev + test > count {
            prop_assert!(result.is_err());
        } else {
            let split = result.unwrap();
            prop_assert_eq!(split.dev.len(), dev);
            prop_assert_eq!(split.test.len(), test);
            let drawn: BTreeSet<_> = split.dev.iter().chain(&split.test).collect();
            prop_assert_eq!(drawn.len(), dev + test);
        }
    }
}
