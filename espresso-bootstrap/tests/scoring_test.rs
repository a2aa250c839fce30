//! Scorer tests: reliability, precision/count, ranking.

use std::collections::BTreeMap;
use std::sync::Arc;

use espresso_bootstrap::scoring::ranking::{sort_ranked, top_n};
use espresso_bootstrap::scoring::{
    build_scorer, PhaseContext, PrecisionCountScorer, PriorScoreSnapshot, ReliabilityScorer,
    Scorer,
};
use espresso_bootstrap::StatisticsTables;
use espresso_core::config::ScorerKind;
use espresso_core::errors::BootstrapError;
use espresso_core::traits::{NoPriorScores, StatisticsProvider};
use espresso_core::types::{ArgumentTuple, FrequencyTables, Pattern, Ranked, Role};

const ACQUIRED: &str = "ARG1 acquired ARG2";
const BOUGHT: &str = "ARG1 bought ARG2";
const LIKES: &str = "ARG1 likes ARG2";

fn stats(cells: &[(&str, [&str; 2], f64)]) -> Arc<StatisticsTables> {
    let mut instances: BTreeMap<ArgumentTuple, f64> = BTreeMap::new();
    let mut patterns: BTreeMap<Pattern, f64> = BTreeMap::new();
    let mut pairs = Vec::new();
    let mut total = 0.0;
    for (p, args, w) in cells {
        let instance = ArgumentTuple::from(*args);
        *instances.entry(instance.clone()).or_default() += w;
        *patterns.entry(Pattern::from(*p)).or_default() += w;
        pairs.push((Pattern::from(*p), instance, *w));
        total += w;
    }
    let tables = StatisticsTables::from_frequencies(FrequencyTables {
        total,
        instances: instances.into_iter().collect(),
        patterns: patterns.into_iter().collect(),
        pairs,
    })
    .unwrap();
    Arc::new(tables)
}

/// The two acquisition records alone: every PMI is exactly 0.
fn minimal() -> Arc<StatisticsTables> {
    stats(&[
        (ACQUIRED, ["Google", "YouTube"], 5.0),
        (BOUGHT, ["Google", "YouTube"], 1.0),
    ])
}

fn background() -> Arc<StatisticsTables> {
    stats(&[
        (ACQUIRED, ["Google", "YouTube"], 5.0),
        (BOUGHT, ["Google", "YouTube"], 1.0),
        (BOUGHT, ["Alice", "Carrot"], 10.0),
        (LIKES, ["Alice", "Carrot"], 10.0),
    ])
}

fn gy() -> ArgumentTuple {
    ArgumentTuple::from(["Google", "YouTube"])
}

fn seed_prior() -> PriorScoreSnapshot {
    PriorScoreSnapshot::default().with_instance(gy(), 1.0)
}

fn ctx(prior: &PriorScoreSnapshot) -> PhaseContext<'_> {
    PhaseContext {
        relation: "reverb_acquired_esp_rel_nokeep",
        iteration: 1,
        prior,
    }
}

fn patterns(names: &[&str]) -> Vec<Pattern> {
    names.iter().map(|p| Pattern::from(*p)).collect()
}

// ---- Reliability ----

#[test]
fn test_reliability_prefers_stronger_association() {
    let scorer = ReliabilityScorer::new(background());
    let prior = seed_prior();
    let ranked = scorer
        .rank_patterns(&[gy()], &patterns(&[BOUGHT, ACQUIRED]), &ctx(&prior))
        .unwrap();
    assert_eq!(ranked[0].value, Pattern::from(ACQUIRED));
    assert!(ranked[0].score > ranked[1].score);
    // The acquisition pair is the matrix maximum, and the seed scores 1.
    assert!((ranked[0].score - 1.0).abs() < 1e-12);
}

#[test]
fn test_reliability_ties_break_by_value() {
    let scorer = ReliabilityScorer::new(minimal());
    let prior = seed_prior();
    let ranked = scorer
        .rank_patterns(&[gy()], &patterns(&[BOUGHT, ACQUIRED]), &ctx(&prior))
        .unwrap();
    assert_eq!(ranked[0].score, ranked[1].score);
    assert_eq!(ranked[0].value, Pattern::from(ACQUIRED));
    assert_eq!(ranked[1].value, Pattern::from(BOUGHT));
}

#[test]
fn test_normalizer_falls_back_to_one() {
    assert_eq!(ReliabilityScorer::new(minimal()).normalizer(), 1.0);
    let stats = background();
    let max = stats.max_discounted_pmi();
    assert_eq!(ReliabilityScorer::new(stats).normalizer(), max);
}

#[test]
fn test_reliability_averages_over_context() {
    let stats = background();
    let scorer = ReliabilityScorer::new(stats);
    let outsider = ArgumentTuple::from(["Nobody", "Nowhere"]);
    let prior = seed_prior().with_instance(outsider.clone(), 1.0);
    let alone = scorer.pattern_reliability(&[gy()], &Pattern::from(ACQUIRED), &prior);
    let diluted =
        scorer.pattern_reliability(&[gy(), outsider], &Pattern::from(ACQUIRED), &prior);
    assert!((diluted - alone / 2.0).abs() < 1e-12);
}

#[test]
fn test_instance_reliability_uses_prior_pattern_scores() {
    let scorer = ReliabilityScorer::new(background());
    let prior = PriorScoreSnapshot::default().with_pattern(Pattern::from(ACQUIRED), 0.5);
    let score = scorer.instance_reliability(&gy(), &patterns(&[ACQUIRED]), &prior);
    assert!((score - 0.5).abs() < 1e-12);

    // Without a prior score the pattern contributes nothing.
    let none = scorer.instance_reliability(&gy(), &patterns(&[ACQUIRED]), &NoPriorScores);
    assert_eq!(none, 0.0);
}

#[test]
fn test_confidence_weights_by_pattern_mass() {
    let scorer = ReliabilityScorer::new(background());
    let prior = PriorScoreSnapshot::default().with_pattern(Pattern::from(ACQUIRED), 0.25);
    let c = scorer.confidence(&gy(), &patterns(&[ACQUIRED]), &prior);
    // A single pattern's weight cancels: the raw discounted PMI remains.
    let dpmi = background().discounted_pmi(&gy(), &Pattern::from(ACQUIRED)).unwrap();
    assert!((c - dpmi).abs() < 1e-12);
    assert_eq!(
        scorer.confidence(&gy(), &patterns(&[ACQUIRED]), &NoPriorScores),
        0.0
    );
}

#[test]
fn test_confidence_is_not_normalized_by_max_dpmi() {
    let stats = stats(&[
        ("p", ["a", "b"], 5.0),
        ("q", ["a", "b"], 1.0),
        ("q", ["c", "d"], 9.0),
        ("p", ["e", "f"], 1.0),
    ]);
    let ab = ArgumentTuple::from(["a", "b"]);
    let dpmi_p = stats.discounted_pmi(&ab, &Pattern::from("p")).unwrap();
    let dpmi_q = stats.discounted_pmi_or_zero(&ab, &Pattern::from("q"));
    assert!((stats.max_discounted_pmi() - dpmi_p).abs() < 1e-12);
    let scorer = ReliabilityScorer::new(stats);

    let prior = PriorScoreSnapshot::default().with_pattern(Pattern::from("p"), 0.5);
    let c = scorer.confidence(&ab, &patterns(&["p", "q"]), &prior);
    assert!((c - dpmi_p).abs() < 1e-12);
    assert!(c < 1.0);

    let prior = prior.with_pattern(Pattern::from("q"), 1.5);
    let c = scorer.confidence(&ab, &patterns(&["p", "q"]), &prior);
    let expected = (0.5 * dpmi_p + 1.5 * dpmi_q) / 2.0;
    assert!((c - expected).abs() < 1e-12);
}

#[test]
fn test_reliability_empty_context_is_an_error() {
    let scorer = ReliabilityScorer::new(background());
    let prior = seed_prior();
    let err = scorer
        .rank_patterns(&[], &patterns(&[ACQUIRED]), &ctx(&prior))
        .unwrap_err();
    match err {
        BootstrapError::EmptyCandidateSet { role, iteration, .. } => {
            assert_eq!(role, Role::Instance);
            assert_eq!(iteration, 1);
        }
        other => panic!("expected EmptyCandidateSet, got {other:?}"),
    }
    let err = scorer.rank_instances(&[gy()], &[], &ctx(&prior)).unwrap_err();
    assert!(err.is_empty_candidate_set());
}

#[test]
fn test_unknown_pairs_score_zero() {
    let scorer = ReliabilityScorer::new(background());
    let prior = seed_prior();
    let ranked = scorer
        .rank_patterns(&[gy()], &patterns(&["ARG1 sold ARG2"]), &ctx(&prior))
        .unwrap();
    assert_eq!(ranked[0].score, 0.0);
}

// ---- Precision / count ----

#[test]
fn test_precision_is_overlap_over_pattern_frequency() {
    let scorer = PrecisionCountScorer::new(background());
    // F(bought) = 11, overlap with the seed = 1.
    let p = scorer.precision(&[gy()], &Pattern::from(BOUGHT));
    assert!((p - 1.0 / 11.0).abs() < 1e-12);
    assert_eq!(scorer.precision(&[gy()], &Pattern::from(ACQUIRED)), 1.0);
    assert_eq!(scorer.precision(&[gy()], &Pattern::from("ARG1 sold ARG2")), 0.0);
}

#[test]
fn test_pattern_count_sums_joint_weight() {
    let scorer = PrecisionCountScorer::new(background());
    assert_eq!(
        scorer.pattern_count(&gy(), &patterns(&[ACQUIRED, BOUGHT, LIKES])),
        6.0
    );
}

#[test]
fn test_precision_empty_context_scores_zero() {
    let scorer = PrecisionCountScorer::new(background());
    let prior = seed_prior();
    let ranked = scorer
        .rank_patterns(&[], &patterns(&[BOUGHT, ACQUIRED]), &ctx(&prior))
        .unwrap();
    assert!(ranked.iter().all(|r| r.score == 0.0));
    assert_eq!(ranked[0].value, Pattern::from(ACQUIRED));
}

#[test]
fn test_precision_ranks_instances_by_count() {
    let scorer = PrecisionCountScorer::new(background());
    let ac = ArgumentTuple::from(["Alice", "Carrot"]);
    let ranked = scorer
        .rank_instances(&[gy(), ac.clone()], &patterns(&[BOUGHT]), &ctx(&seed_prior()))
        .unwrap();
    assert_eq!(ranked[0], Ranked::new(ac, 10.0));
    assert_eq!(ranked[1], Ranked::new(gy(), 1.0));
}

#[test]
fn test_build_scorer_selects_kind() {
    assert_eq!(
        build_scorer(ScorerKind::Reliability, background()).kind(),
        ScorerKind::Reliability
    );
    assert_eq!(
        build_scorer(ScorerKind::PrecisionCount, background()).kind(),
        ScorerKind::PrecisionCount
    );
}

// ---- Ranking ----

#[test]
fn test_sort_and_truncate() {
    let mut ranked = vec![
        Ranked::new("b", 0.5),
        Ranked::new("c", 0.9),
        Ranked::new("a", 0.5),
        Ranked::new("d", -1.0),
    ];
    sort_ranked(&mut ranked);
    let order: Vec<&str> = ranked.iter().map(|r| r.value).collect();
    assert_eq!(order, vec!["c", "a", "b", "d"]);

    let top = top_n(&ranked, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[1].value, "a");
    assert_eq!(top_n(&ranked, 10).len(), 4);
}
