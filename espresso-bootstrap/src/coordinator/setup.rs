//! Builds a coordinator from a loaded configuration.

use std::sync::Arc;

use tracing::info;

use espresso_core::config::{load_seeds, EspressoConfig};
use espresso_core::errors::BootstrapError;
use espresso_core::events::EventDispatcher;
use espresso_core::traits::{CooccurrenceSource, PromotionStore, StatisticsProvider};

use super::relation_coordinator::{CoordinatorOptions, RelationCoordinator};
use crate::engine::{Bootstrapper, EngineDeps, EngineOptions, RelationSpec};
use crate::mutex::MutexGroups;
use crate::scoring::build_scorer;
use crate::statistics::StatisticsTables;

/// Loads statistics once, reads every relation's seeds, and wires one
/// engine per relation into a coordinator.
pub fn build_coordinator(
    config: &EspressoConfig,
    matrix: Arc<dyn CooccurrenceSource>,
    promotions: Arc<dyn PromotionStore>,
    events: Arc<EventDispatcher>,
) -> Result<RelationCoordinator, BootstrapError> {
    config.validate()?;
    let options = EngineOptions::from_config(config)?;

    let tables = StatisticsTables::load(matrix.as_ref())?;
    info!(
        total = tables.total(),
        pairs = tables.pair_count(),
        "statistics loaded"
    );
    let stats: Arc<dyn StatisticsProvider> = Arc::new(tables);
    let deps = EngineDeps {
        matrix,
        promotions,
        scorer: build_scorer(options.scorer, Arc::clone(&stats)),
        stats,
        events: Arc::clone(&events),
    };

    let mut engines = Vec::new();
    let mut groups = MutexGroups::new();
    for relation in config.relation_names() {
        let seeds = load_seeds(&config.seed_path(&relation)?)?;
        for partner in config.mutex_partners(&relation) {
            groups.exclude(&relation, &partner);
        }
        engines.push(Bootstrapper::new(
            RelationSpec::new(relation, seeds),
            &options,
            deps.clone(),
        )?);
    }

    RelationCoordinator::new(
        engines,
        groups,
        CoordinatorOptions {
            algorithm: options.algorithm,
            mutex_source: config.boot.effective_mutex_source(),
            keep: options.keep,
            workers: config.boot.workers,
        },
        events,
    )
}
