//! Unpreconditioned BiCGSTAB (Biconjugate Gradient Stabilized) kernel.
//!
//! BiCGSTAB solves `A * x = b` for general (non-symmetric) square systems
//! using only matrix-vector products with `A`, making it suitable for large
//! sparse matrices where factorization is impractical. This implementation
//! follows the standard unpreconditioned recurrence with a fixed shadow
//! residual, starting from `x0 = 0`.
//!
//! Three properties of the kernel are part of its contract:
//!
//! - It never aborts: every outcome, including breakdown of the recurrence
//!   and exhaustion of the iteration budget, is reported as a
//!   [`SolverStatus`] on a successful return, together with the last valid
//!   iterate. The caller decides whether a non-converged status is fatal.
//! - Both convergence checks (the half-step check on `s` and the final check
//!   on `r`) use the same criterion, relative to the norm of `b`.
//! - All scratch vectors are allocated once before the loop; the iterations
//!   themselves perform no allocation.

use super::breakdown_tolerance;
use crate::error::SolverError;
use crate::matrix::LinearOperator;
use crate::vector::Vector;
use num_traits::Float;

/// The termination state of a BiCGSTAB run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// The relative residual dropped below the configured tolerance.
    Converged,
    /// The iteration budget was exhausted before meeting the tolerance. The
    /// returned iterate is the best available, not a converged solution.
    MaxIterationsReached,
    /// An iteration-defining inner product became numerically zero (the
    /// shadow residual lost its coupling with the residual), so the next
    /// iterate is undefined. Distinct from plain non-convergence.
    Breakdown,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStatus::Converged => write!(f, "converged"),
            SolverStatus::MaxIterationsReached => write!(f, "maximum iterations reached"),
            SolverStatus::Breakdown => write!(f, "breakdown"),
        }
    }
}

/// The outcome of a BiCGSTAB run.
///
/// Produced once per solve and immutable thereafter. On `Breakdown` or
/// `MaxIterationsReached`, `x` holds the last valid iterate rather than an
/// uninitialized buffer.
#[derive(Debug, Clone)]
pub struct BicgstabSolution<T> {
    /// The approximate solution (best-effort on failure).
    pub x: Vector<T>,
    /// The number of completed iterations.
    pub iterations: usize,
    /// The final relative residual estimate, `||r|| / ||b||` (or the
    /// `s`-based estimate when the half-step check triggered).
    pub error_estimate: T,
    /// How the iteration terminated.
    pub status: SolverStatus,
}

/// Runs unpreconditioned BiCGSTAB from `x0 = 0`.
///
/// The operator is consumed only through [`LinearOperator::apply`], so `A`
/// need not be concretely materialized. Dimension validation against `b` is
/// performed by the caller ([`crate::solvers::solve`]); the kernel itself
/// only propagates mismatches surfaced by the vector operations.
///
/// If `||b|| = 0`, `x = 0` solves the system exactly and the kernel reports
/// immediate convergence rather than dividing by the zero norm.
pub fn bicgstab<T, O>(
    operator: &O,
    b: &Vector<T>,
    tolerance: T,
    max_iterations: usize,
) -> Result<BicgstabSolution<T>, SolverError>
where
    T: Float,
    O: LinearOperator<T>,
{
    let n = b.len();
    let mut x = Vector::zeros(n);

    let b_norm = b.norm_l2();
    if b_norm == T::zero() {
        return Ok(BicgstabSolution {
            x,
            iterations: 0,
            error_estimate: T::zero(),
            status: SolverStatus::Converged,
        });
    }

    // r0 = b - A*x0 = b since x0 = 0. The shadow residual r_hat stays fixed
    // at r0 for the whole run.
    let mut r = b.clone();
    let r_hat = b.clone();

    let mut rho = T::one();
    let mut alpha = T::one();
    let mut omega = T::one();

    let mut p = Vector::zeros(n);
    let mut v = Vector::zeros(n);
    let mut s = Vector::zeros(n);
    let mut t = Vector::zeros(n);

    let eps = breakdown_tolerance::<T>();
    let mut rel_residual = r.norm_l2() / b_norm;

    for k in 1..=max_iterations {
        let rho_next = r_hat.dot(&r)?;
        if rho_next.abs() <= eps {
            return Ok(BicgstabSolution {
                x,
                iterations: k - 1,
                error_estimate: rel_residual,
                status: SolverStatus::Breakdown,
            });
        }

        // p = r + beta * (p - omega * v)
        let beta = (rho_next / rho) * (alpha / omega);
        p.axpy(-omega, &v)?;
        p.scale(beta);
        p.add_assign(&r)?;

        operator.apply(&p, &mut v)?;

        let r_hat_v = r_hat.dot(&v)?;
        if r_hat_v.abs() <= eps {
            return Ok(BicgstabSolution {
                x,
                iterations: k - 1,
                error_estimate: rel_residual,
                status: SolverStatus::Breakdown,
            });
        }
        alpha = rho_next / r_hat_v;

        // s = r - alpha * v, the half-step residual. Converging here saves
        // one matrix-vector product.
        s.copy_from(&r)?;
        s.axpy(-alpha, &v)?;
        let s_estimate = s.norm_l2() / b_norm;
        if s_estimate <= tolerance {
            x.axpy(alpha, &p)?;
            return Ok(BicgstabSolution {
                x,
                iterations: k,
                error_estimate: s_estimate,
                status: SolverStatus::Converged,
            });
        }

        operator.apply(&s, &mut t)?;

        let t_dot_t = t.dot(&t)?;
        if t_dot_t.abs() <= eps {
            return Ok(BicgstabSolution {
                x,
                iterations: k - 1,
                error_estimate: s_estimate,
                status: SolverStatus::Breakdown,
            });
        }
        omega = t.dot(&s)? / t_dot_t;

        x.axpy(alpha, &p)?;
        x.axpy(omega, &s)?;

        // r = s - omega * t
        r.copy_from(&s)?;
        r.axpy(-omega, &t)?;

        rel_residual = r.norm_l2() / b_norm;
        if rel_residual <= tolerance {
            return Ok(BicgstabSolution {
                x,
                iterations: k,
                error_estimate: rel_residual,
                status: SolverStatus::Converged,
            });
        }

        rho = rho_next;
    }

    Ok(BicgstabSolution {
        x,
        iterations: max_iterations,
        error_estimate: rel_residual,
        status: SolverStatus::MaxIterationsReached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::CsrMatrix;

    fn diagonal(entries: &[f64]) -> CsrMatrix<f64> {
        let n = entries.len();
        let triplets: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, &v)| (i, i, v))
            .collect();
        let mut m = CsrMatrix::try_from_triplets(n, n, &triplets).unwrap();
        m.compress();
        m
    }

    #[test]
    fn test_one_by_one_system() {
        let a = diagonal(&[2.0]);
        let b = Vector::from_vec(vec![4.0]);

        let solution = bicgstab(&a, &b, 1e-6, 1000).unwrap();
        assert_eq!(solution.status, SolverStatus::Converged);
        assert!(solution.iterations <= 1);
        assert!((solution.x[0] - 2.0).abs() < 1e-10);
        assert!(solution.error_estimate < 1e-10);
    }

    #[test]
    fn test_diagonal_system() {
        let a = diagonal(&[1.0, 2.0, 3.0]);
        let b = Vector::from_vec(vec![1.0, 4.0, 9.0]);

        let solution = bicgstab(&a, &b, 1e-6, 1000).unwrap();
        assert_eq!(solution.status, SolverStatus::Converged);
        assert!(solution.iterations <= 10);
        let expected = [1.0, 2.0, 3.0];
        for (i, &e) in expected.iter().enumerate() {
            assert!(
                (solution.x[i] - e).abs() < 1e-5,
                "x[{i}] = {} but expected {e}",
                solution.x[i]
            );
        }
    }

    #[test]
    fn test_skew_symmetric_breakdown() {
        // A = [0 1; -1 0] with b = [1, 0]: r_hat . (A*b) = b . (A*b) = 0 for
        // any skew-symmetric A, so the alpha denominator vanishes in the
        // first iteration. The kernel must report Breakdown, not divide.
        let mut a =
            CsrMatrix::try_from_triplets(2, 2, &[(0, 1, 1.0), (1, 0, -1.0)]).unwrap();
        a.compress();
        let b = Vector::from_vec(vec![1.0, 0.0]);

        let solution = bicgstab(&a, &b, 1e-6, 1000).unwrap();
        assert_eq!(solution.status, SolverStatus::Breakdown);
        assert_eq!(solution.iterations, 0);
        // The last valid iterate is x0 = 0.
        assert_eq!(solution.x.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn test_shadow_residual_orthogonality_breakdown() {
        // With b = e1 the half-step residual always has s[0] = 0 exactly
        // (s[0] = b[0] - alpha * v[0] with alpha = rho / (r_hat . v) and
        // r_hat = b). Choosing row 0 of A so that it also annihilates s
        // (a12 * a21 + a13 * a31 = 0) gives t[0] = 0, hence r[0] = 0 after
        // the first full iteration: rho = r_hat . r vanishes at the start
        // of the second iteration and the kernel must stop there.
        //
        //     A = [1  1 -1]        b = [1, 0, 0]
        //         [1  2  0]
        //         [1  0  3]
        let mut a = CsrMatrix::try_from_triplets(
            3,
            3,
            &[
                (0, 0, 1.0),
                (0, 1, 1.0),
                (0, 2, -1.0),
                (1, 0, 1.0),
                (1, 1, 2.0),
                (2, 0, 1.0),
                (2, 2, 3.0),
            ],
        )
        .unwrap();
        a.compress();
        let b = Vector::from_vec(vec![1.0, 0.0, 0.0]);

        let solution = bicgstab(&a, &b, 1e-6, 1000).unwrap();
        assert_eq!(solution.status, SolverStatus::Breakdown);
        // One full iteration completed before rho vanished; the iterate
        // from that iteration is x1 = [1, -5/13, -5/13].
        assert_eq!(solution.iterations, 1);
        let expected = [1.0, -5.0 / 13.0, -5.0 / 13.0];
        for (i, &e) in expected.iter().enumerate() {
            assert!(
                (solution.x[i] - e).abs() < 1e-12,
                "x[{i}] = {} but expected {e}",
                solution.x[i]
            );
        }
    }

    #[test]
    fn test_zero_iteration_budget() {
        let a = diagonal(&[2.0, 2.0]);
        let b = Vector::from_vec(vec![1.0, 1.0]);

        let solution = bicgstab(&a, &b, 1e-6, 0).unwrap();
        assert_eq!(solution.status, SolverStatus::MaxIterationsReached);
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x.as_slice(), &[0.0, 0.0]);
        // With x = 0 the relative residual is exactly 1.
        assert!((solution.error_estimate - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_rhs_is_trivially_converged() {
        let a = diagonal(&[1.0, 2.0]);
        let b = Vector::zeros(2);

        let solution = bicgstab(&a, &b, 1e-6, 1000).unwrap();
        assert_eq!(solution.status, SolverStatus::Converged);
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x.as_slice(), &[0.0, 0.0]);
        assert_eq!(solution.error_estimate, 0.0);
    }

    #[test]
    fn test_nonsymmetric_system() {
        // [4 1; 1 3] shifted off-symmetry: [4 1; 2 3], b chosen so x = [1, 2].
        let mut a = CsrMatrix::try_from_triplets(
            2,
            2,
            &[(0, 0, 4.0), (0, 1, 1.0), (1, 0, 2.0), (1, 1, 3.0)],
        )
        .unwrap();
        a.compress();
        let b = Vector::from_vec(vec![6.0, 8.0]);

        let solution = bicgstab(&a, &b, 1e-10, 1000).unwrap();
        assert_eq!(solution.status, SolverStatus::Converged);
        assert!((solution.x[0] - 1.0).abs() < 1e-8);
        assert!((solution.x[1] - 2.0).abs() < 1e-8);
    }
}
