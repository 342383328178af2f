use crate::augmented_matrix::MatrixStore;

use super::phase::{CellCoordinates, Phase, PhaseTask};

/// Runs the arithmetic of `phase` on one decoded cell. Coordinates are 1-based.
#[inline]
pub fn execute(phase: Phase, at: CellCoordinates, store: &MatrixStore) {
    let (k, j, i) = (at.row - 1, at.column - 1, at.pivot - 1);
    match phase {
        Phase::ComputeMultiplier => {
            store.set_multiplier(k, i, store.augmented(k, i) / store.augmented(i, i));
        }
        Phase::ComputeCorrection => {
            store.set_correction(k, j, i, store.augmented(i, j) * store.multiplier(k, i));
        }
        Phase::ApplyCorrection => {
            store.set_augmented(k, j, store.augmented(k, j) - store.correction(k, j, i));
        }
    }
}

/// Decodes `task_index` within `task` and executes it.
#[inline]
pub fn run_task(task: &PhaseTask, task_index: usize, store: &MatrixStore) {
    execute(task.phase, task.decode(task_index), store)
}
