//! This module provides the high-level, validated API for solving a linear
//! system with the kernels in [`crate::algorithms`].

use crate::algorithms::bicgstab::{BicgstabSolution, bicgstab};
use crate::error::SolverError;
use crate::matrix::LinearOperator;
use crate::vector::Vector;
use num_traits::Float;

/// Stopping criteria for the iterative solver.
///
/// The configuration is kept in `f64` regardless of the kernel's element
/// type; [`solve`] converts the tolerance to the working precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Relative residual threshold, `||r|| / ||b||`, below which the solve
    /// is considered converged.
    pub tolerance: f64,
    /// Upper bound on the number of iterations; the sole bound on the
    /// solver's runtime.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 1000,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration with the given stopping criteria.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

/// Solves `A * x = b` with unpreconditioned BiCGSTAB.
///
/// Validates that the operator is square and that `b` matches its row count,
/// then runs the kernel. Non-convergence is *not* an error: inspect
/// [`BicgstabSolution::status`] to decide whether the returned iterate is
/// acceptable.
///
/// # Errors
///
/// - [`SolverError::MalformedInput`] if the operator is not square.
/// - [`SolverError::DimensionMismatch`] if `b.len()` differs from the
///   operator's row count.
pub fn solve<T, O>(
    operator: &O,
    b: &Vector<T>,
    config: &SolverConfig,
) -> Result<BicgstabSolution<T>, SolverError>
where
    T: Float,
    O: LinearOperator<T>,
{
    if operator.nrows() != operator.ncols() {
        return Err(SolverError::MalformedInput(format!(
            "operator must be square, got {} x {}",
            operator.nrows(),
            operator.ncols()
        )));
    }
    if b.len() != operator.nrows() {
        return Err(SolverError::DimensionMismatch {
            expected: operator.nrows(),
            actual: b.len(),
        });
    }

    let tolerance = T::from(config.tolerance).unwrap_or_else(T::epsilon);
    bicgstab(operator, b, tolerance, config.max_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::bicgstab::SolverStatus;
    use crate::matrix::CsrMatrix;

    #[test]
    fn test_solve_validates_square_operator() {
        let a: CsrMatrix<f64> =
            CsrMatrix::try_from_csr(2, 3, vec![0, 0, 0], vec![], vec![]).unwrap();
        let b = Vector::zeros(2);
        let err = solve(&a, &b, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::MalformedInput(_)));
    }

    #[test]
    fn test_solve_validates_rhs_length() {
        let a: CsrMatrix<f64> =
            CsrMatrix::try_from_csr(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0]).unwrap();
        let b = Vector::zeros(3);
        let err = solve(&a, &b, &SolverConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SolverError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_solve_identity() {
        let mut a =
            CsrMatrix::try_from_triplets(3, 3, &[(0, 0, 1.0), (1, 1, 1.0), (2, 2, 1.0)])
                .unwrap();
        a.compress();
        let b = Vector::from_vec(vec![1.0, -2.0, 3.0]);

        let solution = solve(&a, &b, &SolverConfig::default()).unwrap();
        assert_eq!(solution.status, SolverStatus::Converged);
        for i in 0..3 {
            assert!((solution.x[i] - b[i]).abs() < 1e-10);
        }
    }
}
