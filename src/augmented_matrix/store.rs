use std::sync::atomic::{AtomicU64, Ordering};

use super::matrix::AugmentedMatrix;

// f64 cells shared between workers without locking. Ordering between phases
// comes from the signal channel and the phase latch, so relaxed access is
// enough inside a phase.
struct SharedCells {
    cells: Box<[AtomicU64]>,
}

impl SharedCells {
    fn zeroed(len: usize) -> Self {
        Self::from_values(std::iter::repeat(0.0).take(len))
    }

    fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            cells: values
                .into_iter()
                .map(|value| AtomicU64::new(value.to_bits()))
                .collect(),
        }
    }

    #[inline]
    fn load(&self, offset: usize) -> f64 {
        f64::from_bits(self.cells[offset].load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, offset: usize, value: f64) {
        self.cells[offset].store(value.to_bits(), Ordering::Relaxed)
    }

    fn into_values(self) -> Vec<f64> {
        self.cells
            .into_vec()
            .into_iter()
            .map(|cell| f64::from_bits(cell.into_inner()))
            .collect()
    }
}

/// The augmented matrix plus the multiplier and correction staging buffers,
/// shared by every worker for the duration of one elimination run.
///
/// All indices are 0-based. `multiplier(k, i)` is `m[k][i]` and
/// `correction(k, j, i)` is `n[k][j][i]`.
pub struct MatrixStore {
    size: usize,
    augmented: SharedCells,
    multipliers: SharedCells,
    corrections: SharedCells,
}

impl MatrixStore {
    pub fn from_matrix(matrix: &AugmentedMatrix) -> Self {
        let size = matrix.size();
        Self {
            size,
            augmented: SharedCells::from_values(matrix.cells().iter().copied()),
            multipliers: SharedCells::zeroed(size * size),
            corrections: SharedCells::zeroed(size * (size + 1) * size),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn augmented(&self, row: usize, column: usize) -> f64 {
        self.augmented.load(self.augmented_offset(row, column))
    }

    pub fn set_augmented(&self, row: usize, column: usize, value: f64) {
        self.augmented.store(self.augmented_offset(row, column), value)
    }

    pub fn multiplier(&self, row: usize, pivot: usize) -> f64 {
        self.multipliers.load(self.multiplier_offset(row, pivot))
    }

    pub fn set_multiplier(&self, row: usize, pivot: usize, value: f64) {
        self.multipliers
            .store(self.multiplier_offset(row, pivot), value)
    }

    pub fn correction(&self, row: usize, column: usize, pivot: usize) -> f64 {
        self.corrections
            .load(self.correction_offset(row, column, pivot))
    }

    pub fn set_correction(&self, row: usize, column: usize, pivot: usize, value: f64) {
        self.corrections
            .store(self.correction_offset(row, column, pivot), value)
    }

    pub fn into_matrix(self) -> AugmentedMatrix {
        AugmentedMatrix::from_cells(self.size, self.augmented.into_values())
    }

    fn augmented_offset(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.size && column <= self.size);
        row * (self.size + 1) + column
    }

    fn multiplier_offset(&self, row: usize, pivot: usize) -> usize {
        debug_assert!(row < self.size && pivot < self.size);
        row * self.size + pivot
    }

    fn correction_offset(&self, row: usize, column: usize, pivot: usize) -> usize {
        debug_assert!(row < self.size && column <= self.size && pivot < self.size);
        (row * (self.size + 1) + column) * self.size + pivot
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_the_augmented_matrix() {
        let matrix = AugmentedMatrix::from_rows(vec![
            vec![2.0, 1.0, 5.0],
            vec![4.0, -6.0, -2.0],
        ])
        .unwrap();
        let store = MatrixStore::from_matrix(&matrix);
        assert_eq!(store.augmented(1, 1), -6.0);
        store.set_augmented(1, 2, 0.5);
        let mut expected = matrix.clone();
        expected.set(1, 2, 0.5);
        assert_eq!(store.into_matrix(), expected);
    }

    #[test]
    fn staging_buffers_do_not_alias() {
        let store = MatrixStore::from_matrix(&AugmentedMatrix::zeroes(3));
        let mut value = 1.0;
        for k in 0..3 {
            for j in 0..4 {
                for i in 0..3 {
                    store.set_correction(k, j, i, value);
                    value += 1.0;
                }
            }
        }
        let mut expected = 1.0;
        for k in 0..3 {
            for j in 0..4 {
                for i in 0..3 {
                    assert_eq!(store.correction(k, j, i), expected);
                    expected += 1.0;
                }
            }
        }
        store.set_multiplier(2, 1, -0.25);
        assert_eq!(store.multiplier(2, 1), -0.25);
        assert_eq!(store.multiplier(1, 2), 0.0);
        assert_eq!(store.into_matrix(), AugmentedMatrix::zeroes(3));
    }
}
