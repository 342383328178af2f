use crate::error::EliminationError;

/// Dense `size x (size + 1)` system: coefficients followed by the
/// right-hand side in the last column, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl AugmentedMatrix {
    pub fn zeroes(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * (size + 1)],
        }
    }

    /// Builds the matrix from `size` rows of `size + 1` values each.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, EliminationError> {
        let size = rows.len();
        let expected = size + 1;
        let mut cells = Vec::with_capacity(size * expected);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(EliminationError::RaggedRow {
                    row,
                    expected,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self { size, cells })
    }

    /// Builds the matrix from a square coefficient matrix and its right-hand side.
    pub fn from_system(coefficients: &[Vec<f64>], rhs: &[f64]) -> Result<Self, EliminationError> {
        let size = coefficients.len();
        if rhs.len() != size {
            return Err(EliminationError::RaggedRow {
                row: size,
                expected: size,
                found: rhs.len(),
            });
        }
        let mut matrix = Self::zeroes(size);
        for (row, values) in coefficients.iter().enumerate() {
            if values.len() != size {
                return Err(EliminationError::RaggedRow {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            matrix.row_mut(row)[..size].copy_from_slice(values);
            matrix.set(row, size, rhs[row]);
        }
        Ok(matrix)
    }

    pub(crate) fn from_cells(size: usize, cells: Vec<f64>) -> Self {
        debug_assert_eq!(cells.len(), size * (size + 1));
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn number_of_columns(&self) -> usize {
        self.size + 1
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.cells[self.offset(row, column)]
    }

    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        let offset = self.offset(row, column);
        self.cells[offset] = value;
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.get(row, self.size)
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.number_of_columns();
        &self.cells[row * width..(row + 1) * width]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let width = self.number_of_columns();
        &mut self.cells[row * width..(row + 1) * width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.cells.chunks_exact(self.number_of_columns().max(1))
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// True when every coefficient below the diagonal is within `tolerance` of zero.
    pub fn is_upper_triangular(&self, tolerance: f64) -> bool {
        (0..self.size).all(|column| {
            (column + 1..self.size).all(|row| self.get(row, column).abs() <= tolerance)
        })
    }

    fn offset(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.size && column <= self.size);
        row * (self.size + 1) + column
    }
}
