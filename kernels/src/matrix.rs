//! Assembly of per-sequence feature vectors into dense or compressed sparse row
//! matrices, and Gram matrices over them.
use crate::error::Error;
use crate::Result;
use ndarray::Array2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Requested representation of an output matrix
pub enum Layout {
    /// `ndarray` dense array
    Dense,
    /// Compressed sparse rows
    Sparse,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Sparse
    }
}

/// Compressed Sparse Row (CSR) matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    shape: (usize, usize),
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Empty matrix of the given shape
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            row_ptr: vec![0; shape.0 + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds the matrix from `(column, value)` lists, one per row.  Columns within a row
    /// are sorted, duplicates summed and zeros dropped.
    pub fn from_rows(rows: Vec<Vec<(usize, f64)>>, ncols: usize) -> Self {
        let mut matrix = Self::new((rows.len(), ncols));
        matrix.row_ptr.clear();
        matrix.row_ptr.push(0);

        for mut row in rows {
            row.sort_by_key(|(col, _)| *col);
            let start = matrix.col_idx.len();
            for (col, value) in row {
                debug_assert!(col < ncols);
                if matrix.col_idx.len() > start && matrix.col_idx.last() == Some(&col) {
                    if let Some(last) = matrix.values.last_mut() {
                        *last += value;
                    }
                } else {
                    matrix.col_idx.push(col);
                    matrix.values.push(value);
                }
            }
            // summed duplicates can cancel out
            let mut i = start;
            while i < matrix.values.len() {
                if matrix.values[i] == 0.0 {
                    matrix.values.remove(i);
                    matrix.col_idx.remove(i);
                } else {
                    i += 1;
                }
            }
            matrix.row_ptr.push(matrix.col_idx.len());
        }
        matrix
    }

    /// Extracts the non-zero entries of a dense array
    pub fn from_dense(dense: &Array2<f64>) -> Self {
        let rows = dense
            .outer_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, value)| **value != 0.0)
                    .map(|(col, value)| (col, *value))
                    .collect()
            })
            .collect();
        Self::from_rows(rows, dense.ncols())
    }

    /// Dense copy
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros(self.shape);
        for (row, col, value) in self.triplets() {
            dense[[row, col]] = value;
        }
        dense
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Value at `(row, col)`, zero when not stored
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row)
            .find(|(c, _)| *c == col)
            .map_or(0.0, |(_, value)| value)
    }

    /// Stored `(column, value)` pairs of one row
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// All stored entries as `(row, column, value)` in row major order
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.shape.0).flat_map(move |row| self.row(row).map(move |(col, value)| (row, col, value)))
    }

    /// Inner product of two rows
    fn row_dot(&self, a: usize, b: usize) -> f64 {
        let mut left = self.row(a).peekable();
        let mut right = self.row(b).peekable();
        let mut sum = 0.0;
        while let (Some((ca, va)), Some((cb, vb))) = (left.peek().copied(), right.peek().copied()) {
            if ca == cb {
                sum += va * vb;
                left.next();
                right.next();
            } else if ca < cb {
                left.next();
            } else {
                right.next();
            }
        }
        sum
    }

    /// Gram matrix `X * X^T` of the rows
    pub fn gram(&self) -> Array2<f64> {
        let n = self.shape.0;
        let mut gram = Array2::zeros((n, n));
        for i in 0..n {
            for j in i..n {
                let value = self.row_dot(i, j);
                gram[[i, j]] = value;
                gram[[j, i]] = value;
            }
        }
        gram
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Feature or kernel matrix in either representation
pub enum FeatureMatrix {
    /// Dense rows
    Dense(Array2<f64>),
    /// Compressed sparse rows
    Sparse(CsrMatrix),
}

impl FeatureMatrix {
    /// Assembles sparse rows into the requested layout
    pub fn from_rows(rows: Vec<Vec<(usize, f64)>>, ncols: usize, layout: Layout) -> Self {
        let sparse = CsrMatrix::from_rows(rows, ncols);
        match layout {
            Layout::Sparse => FeatureMatrix::Sparse(sparse),
            Layout::Dense => FeatureMatrix::Dense(sparse.to_dense()),
        }
    }

    /// Layout of this matrix
    pub fn layout(&self) -> Layout {
        match self {
            FeatureMatrix::Dense(_) => Layout::Dense,
            FeatureMatrix::Sparse(_) => Layout::Sparse,
        }
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        match self {
            FeatureMatrix::Dense(dense) => dense.dim(),
            FeatureMatrix::Sparse(sparse) => sparse.shape(),
        }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        match self {
            FeatureMatrix::Dense(dense) => dense.iter().filter(|v| **v != 0.0).count(),
            FeatureMatrix::Sparse(sparse) => sparse.nnz(),
        }
    }

    /// Dense copy
    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            FeatureMatrix::Dense(dense) => dense.clone(),
            FeatureMatrix::Sparse(sparse) => sparse.to_dense(),
        }
    }

    /// Sparse copy
    pub fn to_sparse(&self) -> CsrMatrix {
        match self {
            FeatureMatrix::Dense(dense) => CsrMatrix::from_dense(dense),
            FeatureMatrix::Sparse(sparse) => sparse.clone(),
        }
    }

    /// Converts into `layout`
    pub fn into_layout(self, layout: Layout) -> Self {
        match (self, layout) {
            (FeatureMatrix::Sparse(sparse), Layout::Dense) => FeatureMatrix::Dense(sparse.to_dense()),
            (FeatureMatrix::Dense(dense), Layout::Sparse) => {
                FeatureMatrix::Sparse(CsrMatrix::from_dense(&dense))
            }
            (matrix, _) => matrix,
        }
    }

    /// Gram matrix of the rows, kept in the same layout
    pub fn gram(&self) -> Self {
        match self {
            FeatureMatrix::Dense(dense) => FeatureMatrix::Dense(dense.dot(&dense.t())),
            FeatureMatrix::Sparse(sparse) => {
                FeatureMatrix::Sparse(CsrMatrix::from_dense(&sparse.gram()))
            }
        }
    }
}

/// Normalizes a kernel so that `K[i, j] = K[i, j] / sqrt(K[i, i] * K[j, j])` and the
/// diagonal is one.  Pairs with a zero diagonal entry are left as they are.
pub fn normalize_kernel(kernel: &Array2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = kernel.dim();
    if rows != cols {
        return Err(Error::NotSquare(rows, cols));
    }

    let mut normalized = kernel.clone();
    for i in 0..rows {
        for j in (i + 1)..rows {
            let q = (kernel[[i, i]] * kernel[[j, j]]).sqrt();
            if q > 0.0 {
                normalized[[i, j]] = kernel[[i, j]] / q;
                normalized[[j, i]] = normalized[[i, j]];
            }
        }
    }
    normalized.diag_mut().fill(1.0);
    Ok(normalized)
}
