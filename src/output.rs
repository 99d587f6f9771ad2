use crate::Result;
use kernels::{CsrMatrix, FeatureMatrix, Preprocessed};
use ndarray::Array2;
use std::collections::BTreeMap;
use std::io::Write;

/// Writes a matrix in its own layout: tab separated rows when dense, `row col value`
/// triplets after a `#shape` line when sparse
pub fn write_matrix<W: Write>(out: &mut W, matrix: &FeatureMatrix) -> Result<()> {
    match matrix {
        FeatureMatrix::Dense(dense) => write_dense(out, dense),
        FeatureMatrix::Sparse(sparse) => write_sparse(out, sparse),
    }
}

pub fn write_dense<W: Write>(out: &mut W, matrix: &Array2<f64>) -> Result<()> {
    for row in matrix.rows() {
        let line = row
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn write_sparse<W: Write>(out: &mut W, matrix: &CsrMatrix) -> Result<()> {
    let (rows, cols) = matrix.shape();
    writeln!(out, "#shape\t{}\t{}", rows, cols)?;
    for (row, col, value) in matrix.triplets() {
        writeln!(out, "{}\t{}\t{}", row, col, value)?;
    }
    Ok(())
}

/// One line per surviving k-mer: the decoded label then `sequence:count` pairs
pub fn write_leaves<W: Write>(
    out: &mut W,
    leaves: &BTreeMap<Vec<u8>, BTreeMap<usize, usize>>,
    coding: &Preprocessed,
) -> Result<()> {
    for (label, counts) in leaves {
        let counts = counts
            .iter()
            .map(|(seq, count)| format!("{}:{}", seq, count))
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(out, ">{}\t{}", coding.decode(label), counts)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernels::Layout;

    #[test]
    fn dense_rows_are_tab_separated() {
        let matrix = FeatureMatrix::from_rows(vec![vec![(1, 2.0)], vec![(0, 0.5)]], 3, Layout::Dense);
        let mut out = Vec::new();
        write_matrix(&mut out, &matrix).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\t2\t0\n0.5\t0\t0\n");
    }

    #[test]
    fn sparse_triplets_follow_shape() {
        let matrix = FeatureMatrix::from_rows(vec![vec![], vec![(2, 1.0), (0, 3.0)]], 3, Layout::Sparse);
        let mut out = Vec::new();
        write_matrix(&mut out, &matrix).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "#shape\t2\t3\n1\t0\t3\n1\t2\t1\n");
    }
}
