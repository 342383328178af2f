use crate::augmented_matrix::AugmentedMatrix;
use crate::elimination::MAX_DIMENSION;
use crate::error::EliminationError;

/// Pivots at or below this fraction of the largest coefficient count as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Checks the preconditions the engine relies on: a supported dimension and
/// finite values, and non-vanishing pivots under unpivoted elimination.
///
/// The pivot check replays elimination sequentially on a copy, so it rejects
/// singular systems as well as non-singular ones that would need a row swap.
pub fn validate_system(matrix: &AugmentedMatrix) -> Result<(), EliminationError> {
    let size = matrix.size();
    if size == 0 || size > MAX_DIMENSION {
        return Err(EliminationError::InvalidDimension {
            size,
            max: MAX_DIMENSION,
        });
    }
    for (row, values) in matrix.rows().enumerate() {
        if let Some(column) = values.iter().position(|value| !value.is_finite()) {
            return Err(EliminationError::NonFinite { row, column });
        }
    }
    let scale = matrix
        .rows()
        .flat_map(|row| row[..size].iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let threshold = PIVOT_TOLERANCE * scale;

    let mut work = matrix.clone();
    for i in 0..size {
        let pivot = work.get(i, i);
        if pivot.abs() <= threshold {
            return Err(EliminationError::SingularPivot {
                row: i + 1,
                value: pivot,
            });
        }
        for k in i + 1..size {
            let factor = work.get(k, i) / pivot;
            for j in i..=size {
                let value = work.get(k, j) - work.get(i, j) * factor;
                work.set(k, j, value);
            }
        }
    }
    Ok(())
}
