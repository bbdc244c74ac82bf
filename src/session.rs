//! End-to-end orchestration of a single solve.
//!
//! A [`SolveSession`] wires the pieces together: it builds and compresses
//! the [`CsrMatrix`] from raw CRS arrays, wraps the right-hand side, runs
//! the configured solver, and then recomputes the true residual
//! `||A*x - b||` independently of the solver's internal estimate as an
//! external sanity check. The caller receives everything in a
//! [`SolveReport`] and decides for itself whether a non-converged status is
//! fatal; the session never terminates the process.

use crate::algorithms::bicgstab::SolverStatus;
use crate::error::SolverError;
use crate::matrix::CsrMatrix;
use crate::solvers::{self, SolverConfig};
use crate::vector::Vector;
use num_traits::Float;

/// Everything a caller needs to know about a completed solve.
#[derive(Debug, Clone)]
pub struct SolveReport<T> {
    /// Number of matrix rows.
    pub rows: usize,
    /// Number of matrix columns.
    pub cols: usize,
    /// Number of stored nonzeros after compression.
    pub nnz: usize,
    /// Number of completed solver iterations.
    pub iterations: usize,
    /// How the solver terminated.
    pub status: SolverStatus,
    /// The solver's own final relative residual estimate.
    pub error_estimate: T,
    /// The independently recomputed residual norm `||A*x - b||`.
    pub residual_norm: T,
    /// The solution vector (best-effort on a non-converged status).
    pub x: Vector<T>,
}

/// Orchestrates matrix construction, the solve, and the residual check.
#[derive(Debug, Clone, Default)]
pub struct SolveSession {
    config: SolverConfig,
}

impl SolveSession {
    /// Creates a session with the given solver configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Builds the matrix from raw CRS arrays and solves `A * x = b`.
    ///
    /// # Errors
    ///
    /// [`SolverError::MalformedInput`] if the CRS arrays are invalid (the
    /// matrix is never constructed in that case) or the matrix is not
    /// square; [`SolverError::DimensionMismatch`] if `b` does not match the
    /// row count. Non-convergence is reported via [`SolveReport::status`],
    /// not as an error.
    pub fn solve<T: Float>(
        &self,
        rows: usize,
        cols: usize,
        row_pointers: Vec<usize>,
        column_indices: Vec<usize>,
        values: Vec<T>,
        b: Vec<T>,
    ) -> Result<SolveReport<T>, SolverError> {
        let mut matrix =
            CsrMatrix::try_from_csr(rows, cols, row_pointers, column_indices, values)?;
        matrix.compress();

        let b = Vector::from_vec(b);
        let solution = solvers::solve(&matrix, &b, &self.config)?;

        if solution.status != SolverStatus::Converged {
            log::warn!(
                "solver stopped after {} iterations without converging: {}",
                solution.iterations,
                solution.status
            );
        }

        // Recompute ||A*x - b|| from scratch rather than trusting the
        // solver's recursively updated residual.
        let mut residual = Vector::zeros(rows);
        matrix.multiply(&solution.x, &mut residual)?;
        residual.sub_assign(&b)?;
        let residual_norm = residual.norm_l2();

        Ok(SolveReport {
            rows,
            cols,
            nnz: matrix.nnz(),
            iterations: solution.iterations,
            status: solution.status,
            error_estimate: solution.error_estimate,
            residual_norm,
            x: solution.x,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_reports_independent_residual() {
        // A = [4 1; 1 3], b = [1, 2].
        let session = SolveSession::new(SolverConfig::new(1e-10, 100));
        let report = session
            .solve(
                2,
                2,
                vec![0, 2, 4],
                vec![0, 1, 0, 1],
                vec![4.0, 1.0, 1.0, 3.0],
                vec![1.0, 2.0],
            )
            .unwrap();

        assert_eq!(report.status, SolverStatus::Converged);
        assert_eq!((report.rows, report.cols, report.nnz), (2, 2, 4));
        assert!(report.residual_norm < 1e-8);
        // x = [1/11, 7/11]
        assert!((report.x[0] - 1.0 / 11.0).abs() < 1e-8);
        assert!((report.x[1] - 7.0 / 11.0).abs() < 1e-8);
    }

    #[test]
    fn test_session_rejects_malformed_input_before_solving() {
        let session = SolveSession::default();
        let err = session
            .solve(2, 2, vec![0, 3, 2], vec![0, 1], vec![1.0, 1.0], vec![1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, SolverError::MalformedInput(_)));
    }

    #[test]
    fn test_session_surfaces_non_convergence_as_status() {
        let session = SolveSession::new(SolverConfig::new(1e-6, 0));
        let report = session
            .solve(
                1,
                1,
                vec![0, 1],
                vec![0],
                vec![2.0],
                vec![4.0],
            )
            .unwrap();
        assert_eq!(report.status, SolverStatus::MaxIterationsReached);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.x.as_slice(), &[0.0]);
        // With x = 0 the true residual is exactly ||b||.
        assert!((report.residual_norm - 4.0).abs() < 1e-15);
    }
}
