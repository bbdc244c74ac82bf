//! This module defines the custom error types for the library.
//!
//! All failure conditions that can arise while building a sparse matrix or
//! running the solver are centralized in a single enum: [`SolverError`].
//! Using the [`thiserror`] crate allows us to create idiomatic error types
//! with minimal boilerplate.
//!
//! Note that non-convergence is deliberately *not* an error: `Breakdown` and
//! `MaxIterationsReached` are reported through
//! [`crate::algorithms::bicgstab::SolverStatus`] on a successful return,
//! together with the best available iterate. Only contract violations that
//! prevent a solve from being attempted at all surface as `SolverError`.

use thiserror::Error;

/// Represents all possible errors that can occur while assembling a system
/// or invoking the solver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The CRS arrays do not describe a valid sparse matrix. Detected during
    /// construction, before any solve is attempted; the matrix is never
    /// built in this case.
    #[error("Malformed CRS input: {0}")]
    MalformedInput(String),

    /// Two operands of a vector or matrix-vector operation have incompatible
    /// lengths. This is a programming-contract violation and is always
    /// surfaced; operands are never silently truncated or padded.
    #[error("Dimension mismatch: expected length {expected}, got {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },
}
