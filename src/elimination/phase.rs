//! Task decoding for the three elimination phases. Everything here is
//! 1-based, matching the pivot numbering used by the scheduler.

use std::fmt;

use strum_macros::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Phase {
    /// `m[k][i] = M[k][i] / M[i][i]`
    ComputeMultiplier,
    /// `n[k][j][i] = M[i][j] * m[k][i]`
    ComputeCorrection,
    /// `M[k][j] -= n[k][j][i]`
    ApplyCorrection,
}

impl Phase {
    pub fn tag(self) -> char {
        match self {
            Phase::ComputeMultiplier => 'A',
            Phase::ComputeCorrection => 'B',
            Phase::ApplyCorrection => 'C',
        }
    }

    /// Number of sub-tasks this phase has for `pivot` in a system of `size` rows.
    pub fn task_count(self, size: usize, pivot: usize) -> usize {
        match self {
            Phase::ComputeMultiplier => remaining_rows(size, pivot),
            Phase::ComputeCorrection | Phase::ApplyCorrection => remaining_cells(size, pivot),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// 1-based `(row, column, pivot)` triple a sub-task operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoordinates {
    pub row: usize,
    pub column: usize,
    pub pivot: usize,
}

/// Everything a worker needs to decode and run its share of one phase.
/// A copy travels with every start signal, so it is constant for the
/// lifetime of the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTask {
    pub phase: Phase,
    pub pivot: usize,
    pub size: usize,
}

impl PhaseTask {
    pub fn new(phase: Phase, pivot: usize, size: usize) -> Self {
        debug_assert!(pivot >= 1 && pivot < size);
        Self { phase, pivot, size }
    }

    pub fn task_count(&self) -> usize {
        self.phase.task_count(self.size, self.pivot)
    }

    pub fn decode(&self, task_index: usize) -> CellCoordinates {
        match self.phase {
            Phase::ComputeMultiplier => decode_row_task(self.pivot, task_index),
            Phase::ComputeCorrection | Phase::ApplyCorrection => {
                decode_cell_task(self.size, self.pivot, task_index)
            }
        }
    }
}

/// Rows strictly below the pivot.
pub fn remaining_rows(size: usize, pivot: usize) -> usize {
    size - pivot
}

/// Columns `pivot..=size + 1` of the augmented matrix, RHS included.
pub fn row_span(size: usize, pivot: usize) -> usize {
    size + 2 - pivot
}

pub fn remaining_cells(size: usize, pivot: usize) -> usize {
    remaining_rows(size, pivot) * row_span(size, pivot)
}

/// Phase A: one task per row below the pivot. The column is the pivot column.
pub fn decode_row_task(pivot: usize, task_index: usize) -> CellCoordinates {
    CellCoordinates {
        row: pivot + 1 + task_index,
        column: pivot,
        pivot,
    }
}

/// Phases B and C: one task per cell of the trailing submatrix, row-major.
pub fn decode_cell_task(size: usize, pivot: usize, task_index: usize) -> CellCoordinates {
    let span = row_span(size, pivot);
    CellCoordinates {
        row: pivot + 1 + task_index / span,
        column: pivot + task_index % span,
        pivot,
    }
}

/// Largest task count over every phase and pivot, i.e. the default pool size.
pub fn max_task_count(size: usize) -> usize {
    if size < 2 {
        return 0;
    }
    remaining_cells(size, 1)
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use itertools::Itertools;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn phases_run_in_tag_order() {
        assert_eq!(Phase::iter().map(Phase::tag).collect::<String>(), "ABC");
    }

    #[test]
    fn activation_counts_for_four_rows() {
        let counts = (1..4)
            .map(|pivot| {
                Phase::iter()
                    .map(|phase| phase.task_count(4, pivot))
                    .collect_vec()
            })
            .collect_vec();
        assert_eq!(counts, vec![vec![3, 15, 15], vec![2, 8, 8], vec![1, 3, 3]]);
        assert_eq!(max_task_count(4), 15);
        assert_eq!(max_task_count(4), (4 - 1) * (4 + 1));
    }

    #[test]
    fn decode_last_pivot_of_three_rows() {
        let task = PhaseTask::new(Phase::ApplyCorrection, 2, 3);
        assert_eq!(
            (0..task.task_count()).map(|t| task.decode(t)).collect_vec(),
            vec![
                CellCoordinates { row: 3, column: 2, pivot: 2 },
                CellCoordinates { row: 3, column: 3, pivot: 2 },
                CellCoordinates { row: 3, column: 4, pivot: 2 },
            ]
        );
        let task = PhaseTask::new(Phase::ComputeMultiplier, 1, 3);
        assert_eq!(task.decode(1), CellCoordinates { row: 3, column: 1, pivot: 1 });
    }

    #[test]
    fn max_task_count_of_trivial_systems_is_zero() {
        assert_eq!(max_task_count(0), 0);
        assert_eq!(max_task_count(1), 0);
        assert_eq!(max_task_count(2), 3);
    }

    fn size_and_pivot() -> impl Strategy<Value = (usize, usize)> {
        (2usize..=40).prop_flat_map(|size| (Just(size), 1..size))
    }

    proptest! {
        #[test]
        fn cell_tasks_cover_trailing_submatrix_exactly_once((size, pivot) in size_and_pivot()) {
            let task = PhaseTask::new(Phase::ComputeCorrection, pivot, size);
            let decoded = (0..task.task_count()).map(|t| task.decode(t)).collect_vec();
            let distinct: BTreeSet<_> = decoded.iter().map(|c| (c.row, c.column)).collect();
            prop_assert_eq!(distinct.len(), decoded.len());
            let expected: BTreeSet<_> = (pivot + 1..=size)
                .cartesian_product(pivot..=size + 1)
                .collect();
            prop_assert_eq!(distinct, expected);
        }

        #[test]
        fn row_tasks_cover_rows_below_pivot((size, pivot) in size_and_pivot()) {
            let task = PhaseTask::new(Phase::ComputeMultiplier, pivot, size);
            let rows = (0..task.task_count()).map(|t| task.decode(t).row).collect_vec();
            prop_assert_eq!(rows, (pivot + 1..=size).collect_vec());
        }

        #[test]
        fn no_phase_exceeds_the_pool((size, pivot) in size_and_pivot()) {
            for phase in Phase::iter() {
                prop_assert!(phase.task_count(size, pivot) <= max_task_count(size));
            }
        }
    }
}
