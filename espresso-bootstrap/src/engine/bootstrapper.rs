//! Bootstrapper: one relation's alternating pattern and instance phases.
//!
//! Iteration `k` runs a pattern phase (context: instances of `k-1`) then an
//! instance phase (context: patterns of `k`). With `keep` the context is
//! every promotion up to that iteration instead of only the last one.
//! Phases take `&self`, so a coordinator can run several relations' phases
//! on worker threads while holding the engines by shared reference.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use espresso_core::constants::{SEED_ITERATION, SEED_SCORE};
use espresso_core::errors::{BootstrapError, ConfigError, EspressoErrorCode};
use espresso_core::events::types::{
    PhaseCompletedEvent, PhaseFailedEvent, PhaseStartedEvent, RelationStalledEvent,
};
use espresso_core::events::EventDispatcher;
use espresso_core::traits::{CooccurrenceSource, PromotionStore, StatisticsProvider};
use espresso_core::types::{
    ArgumentTuple, FxHashSet, IterationFilter, Pattern, PromotedValue, PromotionRecord, Ranked,
    Role,
};

use super::outcome::{IterationReport, PhaseOutcome, PhaseStatus, StallReason};
use super::state::{BootstrapState, EngineOptions, EnginePhase};
use crate::mutex::{MutexFilter, MutexSet};
use crate::scoring::ranking::top_n;
use crate::scoring::{PhaseContext, PriorScoreSnapshot, Scorer};

/// Shared services a relation engine reads from and writes to.
#[derive(Clone)]
pub struct EngineDeps {
    pub matrix: Arc<dyn CooccurrenceSource>,
    pub promotions: Arc<dyn PromotionStore>,
    pub stats: Arc<dyn StatisticsProvider>,
    pub scorer: Arc<dyn Scorer>,
    pub events: Arc<EventDispatcher>,
}

/// A relation to bootstrap and its seed instances.
#[derive(Debug, Clone)]
pub struct RelationSpec {
    pub name: String,
    pub seeds: Vec<ArgumentTuple>,
}

impl RelationSpec {
    pub fn new(name: impl Into<String>, seeds: Vec<ArgumentTuple>) -> Self {
        Self {
            name: name.into(),
            seeds,
        }
    }
}

pub struct Bootstrapper {
    state: BootstrapState,
    seeds: Vec<ArgumentTuple>,
    filter: MutexFilter,
    deps: EngineDeps,
}

impl Bootstrapper {
    /// Validates the seeds against the matrix arity. Nothing is written
    /// until [`Bootstrapper::initialize`].
    pub fn new(
        relation: RelationSpec,
        options: &EngineOptions,
        deps: EngineDeps,
    ) -> Result<Self, BootstrapError> {
        let Some(first) = relation.seeds.first() else {
            return Err(ConfigError::MissingSeeds {
                relation: relation.name,
            }
            .into());
        };
        let arity = first.arity();
        if let Some(bad) = relation.seeds.iter().find(|s| s.arity() != arity) {
            return Err(ConfigError::ValidationFailed {
                field: format!("relations.{}.seeds", relation.name),
                message: format!("seed {bad} has arity {}, expected {arity}", bad.arity()),
            }
            .into());
        }
        if let Some(matrix_arity) = deps.matrix.arity()? {
            if matrix_arity != arity {
                return Err(ConfigError::ValidationFailed {
                    field: format!("relations.{}.seeds", relation.name),
                    message: format!("seed arity {arity} does not match matrix arity {matrix_arity}"),
                }
                .into());
            }
        }
        if options.n == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "boot.n".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }

        let state = BootstrapState {
            namespace: options.namespace(&relation.name),
            relation: relation.name,
            arity,
            keep: options.keep,
            n: options.n,
            iteration: 0,
            phase: EnginePhase::Created,
        };
        Ok(Self {
            state,
            seeds: relation.seeds,
            filter: MutexFilter::new(options.mutex_threshold),
            deps,
        })
    }

    pub fn state(&self) -> &BootstrapState {
        &self.state
    }

    /// Records progress made on this engine by a coordinated run.
    pub fn enter_phase(&mut self, phase: EnginePhase, iteration: u32) {
        self.state.phase = phase;
        self.state.iteration = iteration;
    }

    pub fn relation(&self) -> &str {
        &self.state.relation
    }

    pub fn namespace(&self) -> &str {
        &self.state.namespace
    }

    pub fn seeds(&self) -> &[ArgumentTuple] {
        &self.seeds
    }

    /// Optionally clears the namespace, then inserts the seeds at iteration 0
    /// unless they are already present. Returns the number of seeds written.
    ///
    /// A reset is honored only when starting from iteration 1; resuming a
    /// later iteration keeps the stored history.
    pub fn initialize(&mut self, reset: bool, start: u32) -> Result<usize, BootstrapError> {
        let ns = self.state.namespace.as_str();
        if reset {
            if start <= 1 {
                let removed = self.deps.promotions.reset(ns)?;
                info!(relation = %self.state.relation, removed, "reset promotions");
            } else {
                warn!(
                    relation = %self.state.relation,
                    start,
                    "reset ignored: only honored when starting at iteration 1"
                );
            }
        }

        let seeded = if self
            .deps
            .promotions
            .has_iteration(ns, Role::Instance, SEED_ITERATION)?
        {
            debug!(relation = %self.state.relation, "seeds already present");
            0
        } else {
            let records: Vec<PromotionRecord> = self
                .seeds
                .iter()
                .map(|s| PromotionRecord::new(ns, s.clone(), SEED_ITERATION, SEED_SCORE))
                .collect();
            let inserted = self.deps.promotions.insert(&records)?;
            self.deps.promotions.ensure_indexes(ns, Role::Instance)?;
            info!(relation = %self.state.relation, seeds = inserted, "seeded");
            inserted
        };

        self.state.iteration = start.max(1);
        self.state.phase = EnginePhase::Seeded;
        Ok(seeded)
    }

    // ---- Context ----

    /// Promoted instances visible as context at `iteration`.
    pub fn promoted_instances(&self, iteration: u32) -> Result<Vec<ArgumentTuple>, BootstrapError> {
        let filter = IterationFilter::for_keep(self.state.keep, iteration);
        Ok(self
            .deps
            .promotions
            .instances(&self.state.namespace, filter)?
            .into_iter()
            .map(|r| r.value)
            .collect())
    }

    /// Promoted patterns visible as context at `iteration`.
    pub fn promoted_patterns(&self, iteration: u32) -> Result<Vec<Pattern>, BootstrapError> {
        let filter = IterationFilter::for_keep(self.state.keep, iteration);
        Ok(self
            .deps
            .promotions
            .patterns(&self.state.namespace, filter)?
            .into_iter()
            .map(|r| r.value)
            .collect())
    }

    /// The context a phase of `role` scores against: promotions of the
    /// complementary role from `iteration`, or up to it with `keep`.
    pub fn get_candidates_for_phase(
        &self,
        role: Role,
        iteration: u32,
    ) -> Result<Vec<PromotedValue>, BootstrapError> {
        Ok(match role.complement() {
            Role::Instance => self
                .promoted_instances(iteration)?
                .into_iter()
                .map(PromotedValue::Instance)
                .collect(),
            Role::Pattern => self
                .promoted_patterns(iteration)?
                .into_iter()
                .map(PromotedValue::Pattern)
                .collect(),
        })
    }

    // ---- Candidate Generation ----

    /// Patterns co-occurring with any context instance, minus those this
    /// relation promoted before `iteration`. Sorted.
    pub fn generate_pattern_candidates(
        &self,
        context: &[ArgumentTuple],
        iteration: u32,
    ) -> Result<Vec<Pattern>, BootstrapError> {
        let promoted: FxHashSet<Pattern> = self
            .deps
            .promotions
            .patterns(&self.state.namespace, IterationFilter::Before(iteration))?
            .into_iter()
            .map(|r| r.value)
            .collect();
        let mut candidates = BTreeSet::new();
        for instance in context {
            for pattern in self.deps.matrix.patterns_for_instance(instance)? {
                if !promoted.contains(&pattern) {
                    candidates.insert(pattern);
                }
            }
        }
        Ok(candidates.into_iter().collect())
    }

    /// Instances co-occurring with any context pattern, minus those this
    /// relation promoted before `iteration`. Sorted.
    pub fn generate_instance_candidates(
        &self,
        context: &[Pattern],
        iteration: u32,
    ) -> Result<Vec<ArgumentTuple>, BootstrapError> {
        let promoted: FxHashSet<ArgumentTuple> = self
            .deps
            .promotions
            .instances(&self.state.namespace, IterationFilter::Before(iteration))?
            .into_iter()
            .map(|r| r.value)
            .collect();
        let mut candidates = BTreeSet::new();
        for pattern in context {
            for instance in self.deps.matrix.instances_for_pattern(pattern)? {
                if !promoted.contains(&instance) {
                    candidates.insert(instance);
                }
            }
        }
        Ok(candidates.into_iter().collect())
    }

    // ---- Phases ----

    /// Promotes the top-N patterns of `iteration`, scored against the
    /// instances of `iteration - 1`. Candidates that co-occur too strongly
    /// with `mutex` instances are dropped before scoring.
    pub fn pattern_phase(
        &self,
        iteration: u32,
        mutex: Option<&MutexSet<ArgumentTuple>>,
    ) -> Result<PhaseOutcome, BootstrapError> {
        let _span = tracing::info_span!(
            "pattern_phase",
            relation = %self.state.relation,
            iteration
        )
        .entered();

        let Some(previous) = iteration.checked_sub(1) else {
            return Ok(self.stalled(Role::Pattern, iteration, 0, StallReason::EmptyContext));
        };
        let context = self.promoted_instances(previous)?;
        self.deps.events.emit_phase_started(&PhaseStartedEvent {
            relation: self.state.relation.clone(),
            role: Role::Pattern,
            iteration,
            context_size: context.len(),
        });
        if context.is_empty() {
            return Ok(self.stalled(Role::Pattern, iteration, 0, StallReason::EmptyContext));
        }

        let generated = self.generate_pattern_candidates(&context, iteration)?;
        let generated_count = generated.len();
        let mutex_size = mutex.map_or(0, MutexSet::len);
        let candidates = match mutex {
            Some(set) => {
                self.filter
                    .filter_patterns(self.deps.stats.as_ref(), generated, &context, set)
            }
            None => generated,
        };
        let filtered = generated_count - candidates.len();
        debug!(
            context = context.len(),
            candidates = generated_count,
            filtered,
            mutex = mutex_size,
            "pattern candidates"
        );
        if candidates.is_empty() {
            let reason = if generated_count == 0 {
                StallReason::NoCandidates
            } else {
                StallReason::AllFiltered
            };
            let mut outcome = self.stalled(Role::Pattern, iteration, context.len(), reason);
            outcome.mutex_size = mutex_size;
            outcome.filtered = filtered;
            return Ok(outcome);
        }

        let prior = PriorScoreSnapshot::load(
            self.deps.promotions.as_ref(),
            &self.state.namespace,
            IterationFilter::Before(iteration),
            IterationFilter::Before(iteration),
        )?;
        let ctx = PhaseContext {
            relation: &self.state.namespace,
            iteration,
            prior: &prior,
        };
        let ranked = match self.deps.scorer.rank_patterns(&context, &candidates, &ctx) {
            Ok(ranked) => ranked,
            Err(e) if e.is_empty_candidate_set() => {
                return Ok(self.stalled(Role::Pattern, iteration, context.len(), StallReason::EmptyContext));
            }
            Err(e) => return Err(e),
        };

        let mut outcome = self.promote(Role::Pattern, iteration, ranked)?;
        outcome.context_size = context.len();
        outcome.mutex_size = mutex_size;
        outcome.filtered = filtered;
        Ok(outcome)
    }

    /// Promotes the top-N instances of `iteration`, scored against the
    /// patterns promoted in the same iteration.
    pub fn instance_phase(
        &self,
        iteration: u32,
        mutex: Option<&MutexSet<Pattern>>,
    ) -> Result<PhaseOutcome, BootstrapError> {
        let _span = tracing::info_span!(
            "instance_phase",
            relation = %self.state.relation,
            iteration
        )
        .entered();

        let context = self.promoted_patterns(iteration)?;
        self.deps.events.emit_phase_started(&PhaseStartedEvent {
            relation: self.state.relation.clone(),
            role: Role::Instance,
            iteration,
            context_size: context.len(),
        });
        if context.is_empty() {
            return Ok(self.stalled(Role::Instance, iteration, 0, StallReason::EmptyContext));
        }

        let generated = self.generate_instance_candidates(&context, iteration)?;
        let generated_count = generated.len();
        let mutex_size = mutex.map_or(0, MutexSet::len);
        let candidates = match mutex {
            Some(set) => {
                self.filter
                    .filter_instances(self.deps.stats.as_ref(), generated, &context, set)
            }
            None => generated,
        };
        let filtered = generated_count - candidates.len();
        debug!(
            context = context.len(),
            candidates = generated_count,
            filtered,
            mutex = mutex_size,
            "instance candidates"
        );
        if candidates.is_empty() {
            let reason = if generated_count == 0 {
                StallReason::NoCandidates
            } else {
                StallReason::AllFiltered
            };
            let mut outcome = self.stalled(Role::Instance, iteration, context.len(), reason);
            outcome.mutex_size = mutex_size;
            outcome.filtered = filtered;
            return Ok(outcome);
        }

        let prior = PriorScoreSnapshot::load(
            self.deps.promotions.as_ref(),
            &self.state.namespace,
            IterationFilter::Before(iteration),
            IterationFilter::AtMost(iteration),
        )?;
        let ctx = PhaseContext {
            relation: &self.state.namespace,
            iteration,
            prior: &prior,
        };
        let ranked = match self.deps.scorer.rank_instances(&candidates, &context, &ctx) {
            Ok(ranked) => ranked,
            Err(e) if e.is_empty_candidate_set() => {
                return Ok(self.stalled(Role::Instance, iteration, context.len(), StallReason::EmptyContext));
            }
            Err(e) => return Err(e),
        };

        let mut outcome = self.promote(Role::Instance, iteration, ranked)?;
        outcome.context_size = context.len();
        outcome.mutex_size = mutex_size;
        outcome.filtered = filtered;
        Ok(outcome)
    }

    /// Runs both phases of the current iteration without a mutex filter and
    /// advances to the next one. A stalled phase is reported, not an error.
    pub fn iterate(&mut self) -> Result<IterationReport, BootstrapError> {
        if self.state.phase == EnginePhase::Created {
            self.initialize(false, self.state.iteration.max(1))?;
        }
        let iteration = self.state.iteration;

        self.state.phase = EnginePhase::PatternPhase;
        let patterns = self
            .pattern_phase(iteration, None)
            .inspect_err(|e| self.report_failure(Role::Pattern, iteration, e))?;

        self.state.phase = EnginePhase::InstancePhase;
        let instances = self
            .instance_phase(iteration, None)
            .inspect_err(|e| self.report_failure(Role::Instance, iteration, e))?;

        self.state.iteration = iteration + 1;
        Ok(IterationReport {
            iteration,
            patterns,
            instances,
        })
    }

    /// Runs iterations `start..=stop`. Seeds the store first if needed.
    pub fn bootstrap(&mut self, start: u32, stop: u32) -> Result<Vec<IterationReport>, BootstrapError> {
        if start == 0 || start > stop {
            return Err(ConfigError::ValidationFailed {
                field: "boot.start".to_string(),
                message: format!("invalid iteration range {start}..={stop}"),
            }
            .into());
        }
        if self.state.phase == EnginePhase::Created {
            self.initialize(false, start)?;
        }
        self.state.iteration = start;

        let mut reports = Vec::with_capacity((stop - start + 1) as usize);
        while self.state.iteration <= stop {
            reports.push(self.iterate()?);
        }
        self.state.phase = EnginePhase::Done;
        info!(
            relation = %self.state.relation,
            iterations = reports.len(),
            "bootstrap finished"
        );
        Ok(reports)
    }

    /// Logs and emits a failed phase.
    pub fn report_failure(&self, role: Role, iteration: u32, error: &BootstrapError) {
        tracing::error!(
            relation = %self.state.relation,
            %role,
            iteration,
            error = %error,
            "phase failed"
        );
        self.deps.events.emit_phase_failed(&PhaseFailedEvent {
            relation: self.state.relation.clone(),
            role,
            iteration,
            error_code: error.error_code().to_string(),
            message: error.to_string(),
        });
    }

    /// A failed outcome for `error`, as recorded by a coordinator.
    pub fn failed_outcome(&self, role: Role, iteration: u32, error: &BootstrapError) -> PhaseOutcome {
        PhaseOutcome::empty(
            &self.state.relation,
            &self.state.namespace,
            role,
            iteration,
            PhaseStatus::Failed {
                code: error.error_code().to_string(),
                message: error.to_string(),
            },
        )
    }

    // ---- Internals ----

    fn stalled(&self, role: Role, iteration: u32, context_size: usize, reason: StallReason) -> PhaseOutcome {
        warn!(
            relation = %self.state.relation,
            %role,
            iteration,
            reason = reason.describe(),
            "phase stalled"
        );
        self.deps.events.emit_relation_stalled(&RelationStalledEvent {
            relation: self.state.relation.clone(),
            role,
            iteration,
            reason: reason.describe().to_string(),
        });
        let mut outcome = PhaseOutcome::empty(
            &self.state.relation,
            &self.state.namespace,
            role,
            iteration,
            PhaseStatus::Stalled { reason },
        );
        outcome.context_size = context_size;
        outcome
    }

    /// Persists the top-N of `ranked` at `iteration`.
    fn promote<T>(&self, role: Role, iteration: u32, ranked: Vec<Ranked<T>>) -> Result<PhaseOutcome, BootstrapError>
    where
        T: Clone + Into<PromotedValue>,
    {
        let ns = self.state.namespace.as_str();
        let selected: Vec<PromotionRecord> = top_n(&ranked, self.state.n)
            .into_iter()
            .map(|r| PromotionRecord::new(ns, r.value, iteration, r.score))
            .collect();
        for (rank, record) in selected.iter().enumerate() {
            debug!(rank = rank + 1, value = %record.value, score = record.score, "selected");
        }
        let inserted = self.deps.promotions.insert(&selected)?;
        self.deps.promotions.ensure_indexes(ns, role)?;

        info!(
            relation = %self.state.relation,
            %role,
            iteration,
            candidates = ranked.len(),
            selected = selected.len(),
            inserted,
            "phase promoted"
        );
        self.deps.events.emit_phase_completed(&PhaseCompletedEvent {
            relation: self.state.relation.clone(),
            role,
            iteration,
            candidates: ranked.len(),
            selected: selected.len(),
            inserted,
        });

        let candidates: Vec<Ranked<PromotedValue>> = ranked
            .into_iter()
            .map(|r| Ranked::new(r.value.into(), r.score))
            .collect();
        let mut outcome = PhaseOutcome::empty(
            &self.state.relation,
            ns,
            role,
            iteration,
            PhaseStatus::Promoted,
        );
        outcome.candidates = candidates;
        outcome.selected = selected;
        outcome.inserted = inserted;
        Ok(outcome)
    }
}
