//! Property tests over ranking and phase selection.

use std::collections::BTreeMap;
use std::sync::Arc;

use espresso_bootstrap::scoring::ranking::{compare, sort_ranked, top_n};
use espresso_bootstrap::scoring::{PhaseContext, PriorScoreSnapshot, ReliabilityScorer, Scorer};
use espresso_bootstrap::StatisticsTables;
use espresso_core::types::{ArgumentTuple, FrequencyTables, Pattern, Ranked};
use proptest::prelude::*;

fn ranked_strategy() -> impl Strategy<Value = Vec<Ranked<String>>> {
    prop::collection::vec(("[a-e]{1,3}", -5.0f64..5.0), 0..30)
        .prop_map(|v| v.into_iter().map(|(s, x)| Ranked::new(s, x)).collect())
}

proptest! {
    #[test]
    fn prop_sorted_output_is_descending_with_value_ties(mut ranked in ranked_strategy()) {
        sort_ranked(&mut ranked);
        for pair in ranked.windows(2) {
            prop_assert!(compare(&pair[0], &pair[1]) != std::cmp::Ordering::Greater);
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].value <= pair[1].value);
            }
        }
    }

    #[test]
    fn prop_sorting_is_order_independent(ranked in ranked_strategy()) {
        let mut forward = ranked.clone();
        let mut backward: Vec<_> = ranked.into_iter().rev().collect();
        sort_ranked(&mut forward);
        sort_ranked(&mut backward);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_top_n_is_a_prefix(mut ranked in ranked_strategy(), n in 0usize..40) {
        sort_ranked(&mut ranked);
        let top = top_n(&ranked, n);
        prop_assert_eq!(top.len(), n.min(ranked.len()));
        prop_assert_eq!(&top[..], &ranked[..top.len()]);
    }

    #[test]
    fn prop_reliability_ranks_every_candidate(
        weights in prop::collection::vec(0.5f64..20.0, 1..8),
    ) {
        let seed = ArgumentTuple::from(["s0", "s1"]);
        let mut instances: BTreeMap<ArgumentTuple, f64> = BTreeMap::new();
        let mut patterns = Vec::new();
        let mut pairs = Vec::new();
        let mut total = 0.0;
        for (k, w) in weights.iter().enumerate() {
            let pattern = Pattern::new(format!("ARG1 p{k} ARG2"));
            let other = ArgumentTuple::from([format!("x{k}"), "y".to_string()]);
            *instances.entry(seed.clone()).or_default() += w;
            *instances.entry(other.clone()).or_default() += 1.0;
            patterns.push((pattern.clone(), w + 1.0));
            pairs.push((pattern.clone(), seed.clone(), *w));
            pairs.push((pattern, other, 1.0));
            total += w + 1.0;
        }
        let candidates: Vec<Pattern> = patterns.iter().map(|(p, _)| p.clone()).collect();
        let stats = StatisticsTables::from_frequencies(FrequencyTables {
            total,
            instances: instances.into_iter().collect(),
            patterns,
            pairs,
        })
        .unwrap();
        let scorer = ReliabilityScorer::new(Arc::new(stats));
        let prior = PriorScoreSnapshot::default().with_instance(seed.clone(), 1.0);
        let ctx = PhaseContext { relation: "r", iteration: 1, prior: &prior };

        let ranked = scorer.rank_patterns(&[seed], &candidates, &ctx).unwrap();
        prop_assert_eq!(ranked.len(), candidates.len());
        prop_assert!(ranked.iter().all(|r| r.score.is_finite()));
        prop_assert!(ranked.iter().all(|r| r.score <= 1.0 + 1e-9));
    }
}
