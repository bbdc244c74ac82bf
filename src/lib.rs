//! Sparse linear system solving with unpreconditioned BiCGSTAB.
//!
//! This crate solves `A * x = b` for large sparse, square, real-valued
//! systems. The matrix is stored in compressed-row form ([`CsrMatrix`]) and
//! the solution is computed iteratively with the Biconjugate Gradient
//! Stabilized method, a Krylov-subspace algorithm that needs nothing from
//! the matrix beyond its action on a vector.
//!
//! ## Structure
//!
//! The solver is written against the [`LinearOperator`] trait, so any
//! multiply-capable object can stand in for the matrix. [`CsrMatrix`] is
//! the concrete implementation: built once from raw CRS arrays or
//! coordinate triplets, normalized with [`CsrMatrix::compress`] (rows
//! sorted by column, duplicate entries summed), and read-only afterwards.
//! [`SolveSession`] wires everything together and cross-checks the result
//! by recomputing the residual norm independently of the solver.
//!
//! Non-convergence is a reported outcome, not an error: the solver always
//! returns its best iterate together with a [`SolverStatus`], and the
//! caller decides what to do with a `Breakdown` or `MaxIterationsReached`
//! result.
//!
//! ## Example
//!
//! Solve a small tridiagonal system:
//!
//! ```rust
//! use sparse_bicgstab::{CsrMatrix, SolverConfig, SolverStatus, Vector, solve};
//!
//! // A = [ 2 -1  0]
//! //     [-1  2 -1]
//! //     [ 0 -1  2]
//! let mut a = CsrMatrix::<f64>::try_from_triplets(
//!     3,
//!     3,
//!     &[
//!         (0, 0, 2.0), (0, 1, -1.0),
//!         (1, 0, -1.0), (1, 1, 2.0), (1, 2, -1.0),
//!         (2, 1, -1.0), (2, 2, 2.0),
//!     ],
//! )
//! .unwrap();
//! a.compress();
//!
//! let b = Vector::from_vec(vec![1.0, 0.0, 1.0]);
//! let solution = solve(&a, &b, &SolverConfig::default()).unwrap();
//!
//! assert_eq!(solution.status, SolverStatus::Converged);
//! // The exact solution is [1, 1, 1].
//! for i in 0..3 {
//!     assert!((solution.x[i] - 1.0).abs() < 1e-5);
//! }
//! ```

// Declare the modules that form the crate's API structure.
pub mod algorithms;
pub mod error;
pub mod matrix;
pub mod session;
pub mod solvers;
pub mod utils;
pub mod vector;

// Re-export the main API for convenient access.
pub use algorithms::bicgstab::{BicgstabSolution, SolverStatus};
pub use error::SolverError;
pub use matrix::{CsrMatrix, LinearOperator};
pub use session::{SolveReport, SolveSession};
pub use solvers::{SolverConfig, solve};
pub use vector::Vector;
