use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::augmented_matrix::{AugmentedMatrix, MatrixStore};
use crate::error::EliminationError;

use super::config::{EngineConfig, MAX_DIMENSION};
use super::phase::{Phase, PhaseTask};
use super::worker::WorkerPool;

/// One executed phase: how many sub-tasks it had and how many workers ran them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseActivation {
    pub pivot: usize,
    pub phase: Phase,
    pub tasks: usize,
    pub activated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EliminationReport {
    pub pool_size: usize,
    pub activations: Vec<PhaseActivation>,
    pub joined_workers: usize,
    /// Worker threads still inside their loop once shutdown returned.
    pub live_workers_after_shutdown: usize,
}

impl EliminationReport {
    pub fn activations_for(&self, pivot: usize) -> impl Iterator<Item = &PhaseActivation> + '_ {
        self.activations
            .iter()
            .filter(move |activation| activation.pivot == pivot)
    }
}

/// Drives forward elimination: for every pivot row, phases A, B and C run
/// in order on a pool spawned once for the whole run.
pub struct Scheduler {
    config: EngineConfig,
}

impl Scheduler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Forward-eliminates `matrix` in place, leaving its coefficient columns
    /// upper-triangular. Pivots are not exchanged; every leading pivot must
    /// be non-zero.
    pub fn eliminate(
        &self,
        matrix: &mut AugmentedMatrix,
    ) -> Result<EliminationReport, EliminationError> {
        let size = matrix.size();
        if size == 0 || size > MAX_DIMENSION {
            return Err(EliminationError::InvalidDimension {
                size,
                max: MAX_DIMENSION,
            });
        }
        let pool_size = self.config.pool_size(size);
        let store = Arc::new(MatrixStore::from_matrix(matrix));
        let pool = WorkerPool::spawn(pool_size, store.clone())?;
        let live = pool.live_counter();

        let schedule = run_schedule(&pool, size);
        let (activations, joined_workers) = settle(schedule, pool.shutdown())?;
        *matrix = reclaim_store(store)?.into_matrix();
        let report = EliminationReport {
            pool_size,
            activations,
            joined_workers,
            live_workers_after_shutdown: live.load(std::sync::atomic::Ordering::SeqCst),
        };
        log::debug!(
            "eliminated {size}x{} system in {} phases",
            size + 1,
            report.activations.len()
        );
        Ok(report)
    }
}

/// Shorthand for `Scheduler::new(*config).eliminate(matrix)`.
pub fn eliminate(
    matrix: &mut AugmentedMatrix,
    config: &EngineConfig,
) -> Result<EliminationReport, EliminationError> {
    Scheduler::new(*config).eliminate(matrix)
}

/// Combines the outcome of the schedule with the outcome of the shutdown that
/// always follows it, keeping both errors when both fail.
fn settle<T>(
    schedule: Result<T, EliminationError>,
    shutdown: Result<usize, EliminationError>,
) -> Result<(T, usize), EliminationError> {
    match (schedule, shutdown) {
        (Ok(activations), Ok(joined)) => Ok((activations, joined)),
        (Err(failure), Ok(_)) | (Ok(_), Err(failure)) => Err(failure),
        (Err(failure), Err(shutdown)) => Err(EliminationError::ShutdownAfterFailure {
            failure: Box::new(failure),
            shutdown: Box::new(shutdown),
        }),
    }
}

// Workers hold the only other clones and have all been joined by now.
fn reclaim_store(store: Arc<MatrixStore>) -> Result<MatrixStore, EliminationError> {
    Arc::try_unwrap(store).map_err(|_| EliminationError::StoreStillShared)
}

fn run_schedule(
    pool: &WorkerPool,
    size: usize,
) -> Result<Vec<PhaseActivation>, EliminationError> {
    let mut activations = Vec::with_capacity(3 * size.saturating_sub(1));
    for pivot in 1..size {
        log::debug!("pivot row {pivot} of {size}");
        for phase in Phase::iter() {
            let task = PhaseTask::new(phase, pivot, size);
            let activated = pool.run_phase(task)?;
            log::trace!(
                "phase {phase} of pivot {pivot}: {} tasks on {activated} workers",
                task.task_count()
            );
            activations.push(PhaseActivation {
                pivot,
                phase,
                tasks: task.task_count(),
                activated,
            });
        }
    }
    Ok(activations)
}
