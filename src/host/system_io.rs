use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use itertools::Itertools;

use crate::augmented_matrix::AugmentedMatrix;
use crate::elimination::MAX_DIMENSION;

/// Parses `n`, then `n * n` coefficients row by row, then the `n` right-hand
/// side values. Tokens are whitespace-delimited; anything after the last
/// right-hand side value is ignored.
pub fn parse_system(input: &str) -> Result<AugmentedMatrix> {
    let mut tokens = input.split_whitespace();
    let size: usize = match tokens.next() {
        Some(token) => token
            .parse()
            .with_context(|| format!("reading matrix size from {token:?}"))?,
        None => bail!("input is empty, expected the matrix size"),
    };
    ensure!(
        size > 0 && size <= MAX_DIMENSION,
        "invalid matrix size {size}, expected a value in 1..={MAX_DIMENSION}"
    );

    let mut next_value = |what: &str| -> Result<f64> {
        let token = tokens
            .next()
            .with_context(|| format!("input ended before {what}"))?;
        token
            .parse()
            .with_context(|| format!("reading {what} from {token:?}"))
    };

    let mut matrix = AugmentedMatrix::zeroes(size);
    for row in 0..size {
        for column in 0..size {
            let value = next_value(&format!("coefficient ({row}, {column})"))?;
            matrix.set(row, column, value);
        }
    }
    for row in 0..size {
        let value = next_value(&format!("right-hand side value {row}"))?;
        matrix.set(row, size, value);
    }
    Ok(matrix)
}

/// Writes one line per row: the coefficients followed by the right-hand side.
pub fn write_system(matrix: &AugmentedMatrix, writer: &mut impl Write) -> Result<()> {
    for row in matrix.rows() {
        writeln!(writer, "{}", row.iter().join(" ")).context("writing matrix row")?;
    }
    writer.flush().context("flushing matrix output")?;
    Ok(())
}

pub fn read_system_file(path: &Path) -> Result<AugmentedMatrix> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("could not open input file {}", path.display()))?;
    parse_system(&input).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_system_file(path: &Path, matrix: &AugmentedMatrix) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not open output file {}", path.display()))?;
    write_system(matrix, &mut BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn parses_coefficients_then_rhs() {
        let matrix = parse_system("3\n2 1 1\n4 -6 0\n-2 7 2\n5 -2 9\n").unwrap();
        assert_eq!(
            matrix.rows().map(|row| row.to_vec()).collect_vec(),
            vec![
                vec![2.0, 1.0, 1.0, 5.0],
                vec![4.0, -6.0, 0.0, -2.0],
                vec![-2.0, 7.0, 2.0, 9.0],
            ]
        );
    }

    #[test]
    fn missing_rhs_is_an_error() {
        let err = parse_system("2\n1 0\n0 1\n3").unwrap_err();
        assert!(format!("{err:#}").contains("right-hand side value 1"), "{err:#}");
    }

    #[test]
    fn bad_tokens_are_reported() {
        assert!(parse_system("").is_err());
        assert!(parse_system("0").is_err());
        assert!(parse_system("two 1 2").is_err());
        let err = parse_system("1\nx 2").unwrap_err();
        assert!(format!("{err:#}").contains("coefficient (0, 0)"), "{err:#}");
    }

    #[test]
    fn writes_one_row_per_line() {
        let matrix =
            AugmentedMatrix::from_rows(vec![vec![1.0, 0.0, 1.5], vec![0.0, 1.0, -2.0]]).unwrap();
        let mut out = Vec::new();
        write_system(&matrix, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 0 1.5\n0 1 -2\n");
    }
}
