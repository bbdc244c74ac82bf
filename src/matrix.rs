//! Sparse matrix storage in compressed-row form and the linear-operator
//! abstraction consumed by the solver.
//!
//! Krylov-subspace methods such as BiCGSTAB never need direct access to the
//! individual elements of a matrix. Their fundamental operation is the
//! matrix-vector product, so the algorithm is written against the
//! [`LinearOperator`] trait rather than a concrete storage type. This
//! "matrix-free" approach keeps the solver generic and lets the same code be
//! tested on small, easily verifiable operators and deployed on large sparse
//! systems without change.
//!
//! The primary concrete implementation is [`CsrMatrix`], which stores the
//! nonzero values row by row:
//!
//! - `row_pointers`: length `rows + 1`; `row_pointers[i]` is the index of
//!   the first nonzero of row `i`, and `row_pointers[rows]` equals `nnz`.
//! - `column_indices`: one column index per nonzero, each in `[0, cols)`.
//! - `values`: the nonzero values, aligned with `column_indices`.
//!
//! A matrix is built once ([`CsrMatrix::try_from_csr`] or
//! [`CsrMatrix::try_from_triplets`]), normalized with
//! [`CsrMatrix::compress`], and then treated as read-only for the lifetime
//! of a solve: no mutating accessor exists after compression.

use crate::error::SolverError;
use crate::vector::Vector;
use num_traits::Float;

/// Represents a linear operator that can be applied to a vector.
///
/// This trait provides an abstraction for the matrix-vector product, which
/// is the only capability BiCGSTAB requires from the system matrix. The
/// result is written into a caller-provided buffer so that the solver can
/// reuse the same scratch vector across iterations without reallocating.
pub trait LinearOperator<T: Float> {
    /// Returns the number of rows of the operator.
    fn nrows(&self) -> usize;

    /// Returns the number of columns of the operator.
    fn ncols(&self) -> usize;

    /// Computes `y = A * x`, overwriting `y`.
    ///
    /// Fails with [`SolverError::DimensionMismatch`] if `x.len() != ncols()`
    /// or `y.len() != nrows()`.
    fn apply(&self, x: &Vector<T>, y: &mut Vector<T>) -> Result<(), SolverError>;
}

/// Delegating implementation so the solver can take operators by reference.
impl<T: Float, O: LinearOperator<T> + ?Sized> LinearOperator<T> for &O {
    #[inline]
    fn nrows(&self) -> usize {
        (**self).nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        (**self).ncols()
    }

    #[inline]
    fn apply(&self, x: &Vector<T>, y: &mut Vector<T>) -> Result<(), SolverError> {
        (**self).apply(x, y)
    }
}

/// A sparse matrix in compressed-row storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    rows: usize,
    cols: usize,
    row_pointers: Vec<usize>,
    column_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Float> CsrMatrix<T> {
    /// Builds a matrix from raw CRS arrays, validating the layout.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::MalformedInput`] if:
    /// - `row_pointers.len() != rows + 1`, or it does not start at 0,
    /// - `row_pointers` is not monotonically non-decreasing,
    /// - `row_pointers[rows]` does not equal the number of nonzeros,
    /// - `column_indices` and `values` have different lengths,
    /// - any column index is outside `[0, cols)`.
    ///
    /// On any of these the matrix is never constructed. Within a row the
    /// column indices need not be sorted and may repeat; call
    /// [`CsrMatrix::compress`] to normalize before solving.
    pub fn try_from_csr(
        rows: usize,
        cols: usize,
        row_pointers: Vec<usize>,
        column_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, SolverError> {
        if rows == 0 || cols == 0 {
            return Err(SolverError::MalformedInput(format!(
                "matrix dimensions must be positive, got {rows} x {cols}"
            )));
        }
        if row_pointers.len() != rows + 1 {
            return Err(SolverError::MalformedInput(format!(
                "row_pointers has length {}, expected rows + 1 = {}",
                row_pointers.len(),
                rows + 1
            )));
        }
        if row_pointers[0] != 0 {
            return Err(SolverError::MalformedInput(format!(
                "row_pointers must start at 0, got {}",
                row_pointers[0]
            )));
        }
        if let Some(i) = (0..rows).find(|&i| row_pointers[i] > row_pointers[i + 1]) {
            return Err(SolverError::MalformedInput(format!(
                "row_pointers is not monotonically non-decreasing at row {i}"
            )));
        }
        if column_indices.len() != values.len() {
            return Err(SolverError::MalformedInput(format!(
                "column_indices has length {} but values has length {}",
                column_indices.len(),
                values.len()
            )));
        }
        if row_pointers[rows] != values.len() {
            return Err(SolverError::MalformedInput(format!(
                "row_pointers ends at {} but there are {} nonzeros",
                row_pointers[rows],
                values.len()
            )));
        }
        if let Some(&j) = column_indices.iter().find(|&&j| j >= cols) {
            return Err(SolverError::MalformedInput(format!(
                "column index {j} is out of range for {cols} columns"
            )));
        }

        Ok(Self {
            rows,
            cols,
            row_pointers,
            column_indices,
            values,
        })
    }

    /// Builds a matrix from coordinate-format `(row, col, value)` triplets.
    ///
    /// The triplets may appear in any order and may repeat a position;
    /// duplicates accumulate by summation once [`CsrMatrix::compress`] runs.
    /// This is the conversion used when the input arrives as an unordered
    /// list of entries rather than pre-assembled CRS arrays.
    pub fn try_from_triplets(
        rows: usize,
        cols: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self, SolverError> {
        if rows == 0 || cols == 0 {
            return Err(SolverError::MalformedInput(format!(
                "matrix dimensions must be positive, got {rows} x {cols}"
            )));
        }
        for &(r, c, _) in triplets {
            if r >= rows || c >= cols {
                return Err(SolverError::MalformedInput(format!(
                    "triplet position ({r}, {c}) is out of range for a {rows} x {cols} matrix"
                )));
            }
        }

        // Counting sort by row: one pass to size each row, one to place.
        let mut row_pointers = vec![0usize; rows + 1];
        for &(r, _, _) in triplets {
            row_pointers[r + 1] += 1;
        }
        for i in 0..rows {
            row_pointers[i + 1] += row_pointers[i];
        }

        let nnz = triplets.len();
        let mut column_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        let mut next = row_pointers.clone();
        for &(r, c, v) in triplets {
            let slot = next[r];
            column_indices[slot] = c;
            values[slot] = v;
            next[r] += 1;
        }

        Ok(Self {
            rows,
            cols,
            row_pointers,
            column_indices,
            values,
        })
    }

    /// Normalizes the matrix into its compressed state: within each row the
    /// entries are sorted by column and duplicate columns are merged by
    /// summation, so a matrix built from unsorted triplets behaves
    /// identically to one built from pre-sorted, pre-summed input.
    ///
    /// Idempotent: compressing an already-compressed matrix is a no-op.
    pub fn compress(&mut self) {
        let mut row_pointers = Vec::with_capacity(self.rows + 1);
        let mut column_indices = Vec::with_capacity(self.column_indices.len());
        let mut values = Vec::with_capacity(self.values.len());
        row_pointers.push(0);

        let mut row_entries: Vec<(usize, T)> = Vec::new();
        for i in 0..self.rows {
            let start = self.row_pointers[i];
            let end = self.row_pointers[i + 1];

            row_entries.clear();
            row_entries.extend(
                self.column_indices[start..end]
                    .iter()
                    .copied()
                    .zip(self.values[start..end].iter().copied()),
            );
            row_entries.sort_by_key(|&(col, _)| col);

            // Duplicate (row, col) entries accumulate rather than overwrite.
            let mut entries = row_entries.iter().copied();
            if let Some((mut cur_col, mut cur_val)) = entries.next() {
                for (col, val) in entries {
                    if col == cur_col {
                        cur_val = cur_val + val;
                    } else {
                        column_indices.push(cur_col);
                        values.push(cur_val);
                        cur_col = col;
                        cur_val = val;
                    }
                }
                column_indices.push(cur_col);
                values.push(cur_val);
            }
            row_pointers.push(column_indices.len());
        }

        self.row_pointers = row_pointers;
        self.column_indices = column_indices;
        self.values = values;
    }

    /// Returns the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Returns the number of stored nonzero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Computes `y = A * x` in O(nnz) time, overwriting `y`.
    ///
    /// Rows with no stored nonzeros produce `y[i] = 0`.
    pub fn multiply(&self, x: &Vector<T>, y: &mut Vector<T>) -> Result<(), SolverError> {
        if x.len() != self.cols {
            return Err(SolverError::DimensionMismatch {
                expected: self.cols,
                actual: x.len(),
            });
        }
        if y.len() != self.rows {
            return Err(SolverError::DimensionMismatch {
                expected: self.rows,
                actual: y.len(),
            });
        }

        let xs = x.as_slice();
        let ys = y.as_mut_slice();
        for i in 0..self.rows {
            let start = self.row_pointers[i];
            let end = self.row_pointers[i + 1];
            let mut acc = T::zero();
            for k in start..end {
                acc = acc + self.values[k] * xs[self.column_indices[k]];
            }
            ys[i] = acc;
        }
        Ok(())
    }
}

impl<T: Float> LinearOperator<T> for CsrMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn apply(&self, x: &Vector<T>, y: &mut Vector<T>) -> Result<(), SolverError> {
        self.multiply(x, y)
    }
}
