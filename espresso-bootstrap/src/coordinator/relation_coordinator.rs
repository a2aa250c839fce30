//! RelationCoordinator: advances every relation in lockstep.
//!
//! Each round runs the pattern phase of all relations in parallel, waits
//! for all of them, builds the instance-phase mutex sets from what they
//! produced, then does the same for the instance phase. A relation that
//! stalls or fails in a phase does not stop the others.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use espresso_core::config::{Algorithm, MutexSource};
use espresso_core::errors::{BootstrapError, ConfigError};
use espresso_core::events::types::{RunCompletedEvent, RunStartedEvent};
use espresso_core::events::EventDispatcher;
use espresso_core::types::{ArgumentTuple, Role};

use super::executor::PhaseExecutor;
use super::report::{RoundReport, RunReport};
use crate::engine::{Bootstrapper, EnginePhase, PhaseOutcome};
use crate::mutex::{MutexGroups, MutexSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    pub algorithm: Algorithm,
    pub mutex_source: MutexSource,
    pub keep: bool,
    /// Worker threads; `None` means one per relation.
    pub workers: Option<usize>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Cpl,
            mutex_source: MutexSource::Candidates,
            keep: false,
            workers: None,
        }
    }
}

pub struct RelationCoordinator {
    engines: Vec<Bootstrapper>,
    groups: MutexGroups,
    options: CoordinatorOptions,
    executor: PhaseExecutor,
    events: Arc<EventDispatcher>,
}

impl RelationCoordinator {
    pub fn new(
        engines: Vec<Bootstrapper>,
        groups: MutexGroups,
        options: CoordinatorOptions,
        events: Arc<EventDispatcher>,
    ) -> Result<Self, BootstrapError> {
        if engines.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "relations".to_string(),
                message: "at least one relation is required".to_string(),
            }
            .into());
        }
        let executor = PhaseExecutor::new(options.workers.unwrap_or(engines.len()))?;
        Ok(Self {
            engines,
            groups,
            options,
            executor,
            events,
        })
    }

    pub fn engines(&self) -> &[Bootstrapper] {
        &self.engines
    }

    pub fn relation_names(&self) -> Vec<String> {
        self.engines.iter().map(|e| e.relation().to_string()).collect()
    }

    pub fn workers(&self) -> usize {
        self.executor.workers()
    }

    fn enter_phase(&mut self, phase: EnginePhase, iteration: u32) {
        for engine in &mut self.engines {
            engine.enter_phase(phase, iteration);
        }
    }

    fn mutex_enabled(&self) -> bool {
        self.options.algorithm == Algorithm::Cpl && !self.groups.is_empty()
    }

    /// Resets (when allowed) and seeds every relation. Returns seeds written.
    pub fn initialize(&mut self, reset: bool, start: u32) -> Result<usize, BootstrapError> {
        let mut seeded = 0;
        for engine in &mut self.engines {
            seeded += engine.initialize(reset, start)?;
        }
        Ok(seeded)
    }

    /// Runs iterations `start..=stop` for every relation.
    pub fn run(&mut self, reset: bool, start: u32, stop: u32) -> Result<RunReport, BootstrapError> {
        if start == 0 || start > stop {
            return Err(ConfigError::ValidationFailed {
                field: "boot.start".to_string(),
                message: format!("invalid iteration range {start}..={stop}"),
            }
            .into());
        }
        let started = Instant::now();
        let relations = self.relation_names();
        self.events.emit_run_started(&RunStartedEvent {
            relations: relations.clone(),
            start,
            stop,
        });
        info!(
            relations = relations.len(),
            workers = self.workers(),
            start,
            stop,
            algorithm = self.options.algorithm.tag(),
            "run started"
        );

        let seeded = self.initialize(reset, start)?;

        // Instances visible before the first pattern phase.
        let mut instance_pool = BTreeMap::new();
        for engine in &self.engines {
            instance_pool.insert(
                engine.relation().to_string(),
                engine.promoted_instances(start - 1)?,
            );
        }

        let mut rounds = Vec::new();
        for iteration in start..=stop {
            let (round, next_pool) = self.run_round(iteration, &instance_pool);
            info!(
                iteration,
                promoted = round.promoted(),
                failed = round.failed_phases(),
                "round finished"
            );
            rounds.push(round);
            instance_pool = next_pool;
        }
        self.enter_phase(EnginePhase::Done, stop + 1);

        let report = RunReport {
            relations,
            start,
            stop,
            seeded,
            rounds,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        self.events.emit_run_completed(&RunCompletedEvent {
            iterations: stop - start + 1,
            promoted: report.promoted(),
            failed_phases: report.failed_phases(),
            duration_ms: report.duration_ms,
        });
        info!(
            promoted = report.promoted(),
            failed_phases = report.failed_phases(),
            duration_ms = report.duration_ms,
            "run completed"
        );
        Ok(report)
    }

    /// One round. `instance_pool` holds each relation's instances from the
    /// previous round; the returned pool feeds the next one. Engines are left
    /// in the instance phase, pointing at the next iteration.
    pub fn run_round(
        &mut self,
        iteration: u32,
        instance_pool: &BTreeMap<String, Vec<ArgumentTuple>>,
    ) -> (RoundReport, BTreeMap<String, Vec<ArgumentTuple>>) {
        self.enter_phase(EnginePhase::PatternPhase, iteration);
        let instance_mutex = self.mutex_sets(instance_pool);
        let patterns = self
            .executor
            .run_phase(&self.engines, Role::Pattern, iteration, |index, engine| {
                engine.pattern_phase(iteration, instance_mutex[index].as_ref())
            });

        let pattern_pool = self.collect(&patterns, iteration, |engine, outcome| {
            let mut pool = match self.options.mutex_source {
                MutexSource::Candidates => outcome.candidate_patterns(),
                MutexSource::Promotions => outcome.selected_patterns(),
            };
            if self.options.keep {
                pool.extend(engine.promoted_patterns(iteration)?);
            }
            Ok(pool)
        });

        self.enter_phase(EnginePhase::InstancePhase, iteration);
        let pattern_mutex = self.mutex_sets(&pattern_pool);
        let instances = self
            .executor
            .run_phase(&self.engines, Role::Instance, iteration, |index, engine| {
                engine.instance_phase(iteration, pattern_mutex[index].as_ref())
            });

        let next_pool = self.collect(&instances, iteration, |engine, outcome| {
            let mut pool = match self.options.mutex_source {
                MutexSource::Candidates => outcome.candidate_instances(),
                MutexSource::Promotions => outcome.selected_instances(),
            };
            if self.options.keep {
                pool.extend(engine.promoted_instances(iteration)?);
            }
            Ok(pool)
        });
        self.enter_phase(EnginePhase::InstancePhase, iteration + 1);

        (
            RoundReport {
                iteration,
                patterns,
                instances,
            },
            next_pool,
        )
    }

    /// Per-engine mutex sets, in engine order. `None` when the filter is off.
    fn mutex_sets<T: Ord + Clone>(
        &self,
        pool: &BTreeMap<String, Vec<T>>,
    ) -> Vec<Option<MutexSet<T>>> {
        self.engines
            .iter()
            .map(|engine| {
                self.mutex_enabled()
                    .then(|| self.groups.build(engine.relation(), pool))
            })
            .collect()
    }

    /// Gathers what each relation contributes to its partners' mutex sets.
    /// A relation whose history cannot be read contributes nothing.
    fn collect<T, F>(
        &self,
        outcomes: &[PhaseOutcome],
        iteration: u32,
        gather: F,
    ) -> BTreeMap<String, Vec<T>>
    where
        F: Fn(&Bootstrapper, &PhaseOutcome) -> Result<Vec<T>, BootstrapError>,
    {
        let mut pool = BTreeMap::new();
        if !self.mutex_enabled() {
            return pool;
        }
        for (engine, outcome) in self.engines.iter().zip(outcomes) {
            let items = gather(engine, outcome).unwrap_or_else(|e| {
                warn!(
                    relation = %engine.relation(),
                    iteration,
                    error = %e,
                    "could not read promotions for mutex set"
                );
                Vec::new()
            });
            pool.insert(engine.relation().to_string(), items);
        }
        pool
    }
}
