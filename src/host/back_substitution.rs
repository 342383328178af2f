use crate::augmented_matrix::AugmentedMatrix;

pub struct BackwardsSubstitution {
    pub solution: Vec<f64>,
}

impl BackwardsSubstitution {
    pub fn zero(n: usize) -> Self {
        Self {
            solution: vec![0.0; n],
        }
    }

    /// Turns an upper-triangular augmented matrix into `[I | x]` and keeps `x`.
    /// Returns `None` if a pivot is exactly zero.
    pub fn solve(&mut self, u: &mut AugmentedMatrix) -> Option<()> {
        let n = u.size();
        debug_assert_eq!(self.solution.len(), n);
        let mut i = n;
        while i > 0 {
            i -= 1;
            let diag = u.get(i, i);
            if diag == 0.0 {
                return None;
            }
            let x = u.rhs(i) / diag;
            u.set(i, n, x);
            u.set(i, i, 1.0);
            for k in 0..i {
                let updated = u.rhs(k) - u.get(k, i) * x;
                u.set(k, n, updated);
                u.set(k, i, 0.0);
            }
            self.solution[i] = x;
        }
        // whatever rounding residue elimination left below the diagonal
        for j in 0..n {
            for k in j + 1..n {
                u.set(k, j, 0.0);
            }
        }
        Some(())
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;
    use crate::elimination::{eliminate, EngineConfig};
    use crate::test_support::{diagonally_dominant_system, three_row_system};

    #[test]
    fn solves_three_row_scenario() {
        let mut matrix = three_row_system();
        eliminate(&mut matrix, &EngineConfig::default()).unwrap();
        let mut solver = BackwardsSubstitution::zero(3);
        solver.solve(&mut matrix).unwrap();
        for (x, expected) in solver.solution.iter().zip([1.0, 1.0, 2.0]) {
            assert!((x - expected).abs() < 1e-6, "{:?}", solver.solution);
        }
        assert_eq!(
            matrix.rows().map(|row| row[..3].to_vec()).collect_vec(),
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn solution_satisfies_original_system() {
        for size in [2, 3, 6, 10] {
            let original = diagonally_dominant_system(size);
            let mut matrix = original.clone();
            eliminate(&mut matrix, &EngineConfig::default()).unwrap();
            let mut solver = BackwardsSubstitution::zero(size);
            solver.solve(&mut matrix).unwrap();
            for row in original.rows() {
                let lhs: f64 = row[..size]
                    .iter()
                    .zip(&solver.solution)
                    .map(|(a, x)| a * x)
                    .sum();
                assert!(
                    (lhs - row[size]).abs() < 1e-8 * (1.0 + row[size].abs()),
                    "size {size}: {lhs} != {}",
                    row[size]
                );
            }
        }
    }

    #[test]
    fn zero_pivot_has_no_solution() {
        let mut matrix =
            AugmentedMatrix::from_rows(vec![vec![1.0, 1.0, 2.0], vec![0.0, 0.0, 0.0]]).unwrap();
        let mut solver = BackwardsSubstitution::zero(2);
        assert!(solver.solve(&mut matrix).is_none());
    }
}
