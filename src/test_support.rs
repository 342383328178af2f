use rand::Rng;

use crate::augmented_matrix::AugmentedMatrix;

pub fn three_row_system() -> AugmentedMatrix {
    AugmentedMatrix::from_rows(vec![
        vec![2.0, 1.0, 1.0, 5.0],
        vec![4.0, -6.0, 0.0, -2.0],
        vec![-2.0, 7.0, 2.0, 9.0],
    ])
    .unwrap()
}

// Strict diagonal dominance keeps every unpivoted leading pivot away from zero.
pub fn diagonally_dominant_system(size: usize) -> AugmentedMatrix {
    let mut rng = rand::thread_rng();
    let mut matrix = AugmentedMatrix::zeroes(size);
    for row in 0..size {
        let mut off_diagonal = 0.0;
        for column in 0..size {
            if column != row {
                let value: f64 = rng.gen_range(-1.0..1.0);
                off_diagonal += value.abs();
                matrix.set(row, column, value);
            }
        }
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        matrix.set(row, row, sign * (off_diagonal + rng.gen_range(1.0..2.0)));
        matrix.set(row, size, rng.gen_range(-10.0..10.0));
    }
    matrix
}
