//! Low-level iterative kernels and the numerical helpers they share.
//!
//! The module currently contains a single algorithm, [`bicgstab`], exposed
//! through the high-level API in [`crate::solvers`]. Use the kernel directly
//! only when fine-grained control over the iteration is required.

use num_traits::Float;

pub mod bicgstab;

/// The threshold below which an iteration-defining inner product is treated
/// as numerically zero.
///
/// BiCGSTAB divides by three such scalars per iteration (rho, r_hat . v, and
/// t . t); when one of them falls below this threshold the next iterate is
/// undefined and the kernel reports
/// [`bicgstab::SolverStatus::Breakdown`] instead of dividing.
#[inline]
pub fn breakdown_tolerance<T: Float>() -> T {
    T::epsilon() * T::epsilon()
}
