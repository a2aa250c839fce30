//! PhaseExecutor: runs one phase of every relation on a rayon pool and
//! waits for all of them before returning.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use espresso_core::errors::{BootstrapError, ConfigError};
use espresso_core::types::Role;

use crate::engine::{Bootstrapper, PhaseOutcome};

pub struct PhaseExecutor {
    pool: rayon::ThreadPool,
}

impl PhaseExecutor {
    pub fn new(workers: usize) -> Result<Self, BootstrapError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("espresso-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::ValidationFailed {
                field: "boot.workers".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `job` for every engine and blocks until all have reported.
    /// Outcomes come back in engine order. An error or a panic in one job
    /// becomes a failed outcome for that relation only.
    pub fn run_phase<F>(
        &self,
        engines: &[Bootstrapper],
        role: Role,
        iteration: u32,
        job: F,
    ) -> Vec<PhaseOutcome>
    where
        F: Fn(usize, &Bootstrapper) -> Result<PhaseOutcome, BootstrapError> + Sync,
    {
        let (tx, rx) = crossbeam_channel::unbounded::<(usize, PhaseOutcome)>();
        let job = &job;
        self.pool.scope(|scope| {
            for (index, engine) in engines.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = match catch_unwind(AssertUnwindSafe(|| job(index, engine))) {
                        Ok(Ok(outcome)) => outcome,
                        Ok(Err(e)) => {
                            engine.report_failure(role, iteration, &e);
                            engine.failed_outcome(role, iteration, &e)
                        }
                        Err(payload) => {
                            let e = BootstrapError::WorkerPanicked {
                                relation: engine.relation().to_string(),
                                message: panic_message(payload.as_ref()),
                            };
                            engine.report_failure(role, iteration, &e);
                            engine.failed_outcome(role, iteration, &e)
                        }
                    };
                    // The receiver outlives the scope.
                    let _ = tx.send((index, outcome));
                });
            }
        });
        drop(tx);

        let mut outcomes: Vec<(usize, PhaseOutcome)> = rx.iter().collect();
        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
