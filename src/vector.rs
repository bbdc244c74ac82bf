//! A thin owned dense vector used for right-hand sides, solutions, and the
//! solver's scratch buffers.
//!
//! The BiCGSTAB inner loop performs a handful of level-1 operations (axpy,
//! dot product, Euclidean norm) on the same set of work vectors at every
//! iteration. [`Vector`] therefore exposes *in-place* operations on an owned
//! buffer: once the solver has allocated its scratch vectors, no further
//! allocation happens inside the loop.
//!
//! Every binary operation validates that the operand lengths match and fails
//! with [`SolverError::DimensionMismatch`] otherwise; operands are never
//! silently truncated or padded.

use crate::error::SolverError;
use num_traits::Float;

/// A fixed-length, owned sequence of real numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Float> Vector<T> {
    /// Creates a vector of length `n` filled with zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    /// Wraps an existing buffer without copying.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a read-only view of the underlying buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable view of the underlying buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the vector and returns the underlying buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Checks that `other` has the same length as `self`.
    #[inline]
    fn check_len(&self, other: &Self) -> Result<(), SolverError> {
        if self.len() != other.len() {
            return Err(SolverError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }

    /// Overwrites `self` with the contents of `other`.
    pub fn copy_from(&mut self, other: &Self) -> Result<(), SolverError> {
        self.check_len(other)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Elementwise addition: `self += other`.
    pub fn add_assign(&mut self, other: &Self) -> Result<(), SolverError> {
        self.check_len(other)?;
        for (y, &x) in self.data.iter_mut().zip(other.data.iter()) {
            *y = *y + x;
        }
        Ok(())
    }

    /// Elementwise subtraction: `self -= other`.
    pub fn sub_assign(&mut self, other: &Self) -> Result<(), SolverError> {
        self.check_len(other)?;
        for (y, &x) in self.data.iter_mut().zip(other.data.iter()) {
            *y = *y - x;
        }
        Ok(())
    }

    /// Scales every element: `self *= alpha`.
    pub fn scale(&mut self, alpha: T) {
        for y in self.data.iter_mut() {
            *y = *y * alpha;
        }
    }

    /// The axpy kernel: `self += alpha * x`.
    pub fn axpy(&mut self, alpha: T, x: &Self) -> Result<(), SolverError> {
        self.check_len(x)?;
        for (y, &xi) in self.data.iter_mut().zip(x.data.iter()) {
            *y = *y + alpha * xi;
        }
        Ok(())
    }

    /// The inner product `self . other`.
    pub fn dot(&self, other: &Self) -> Result<T, SolverError> {
        self.check_len(other)?;
        let mut acc = T::zero();
        for (&a, &b) in self.data.iter().zip(other.data.iter()) {
            acc = acc + a * b;
        }
        Ok(acc)
    }

    /// The Euclidean norm `sqrt(sum(x_i^2))`.
    pub fn norm_l2(&self) -> T {
        let mut acc = T::zero();
        for &a in &self.data {
            acc = acc + a * a;
        }
        acc.sqrt()
    }
}

impl<T> std::ops::Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axpy_and_norm() {
        let mut y: Vector<f64> = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        let x = Vector::from_vec(vec![2.0, 0.0, -1.0]);

        y.axpy(2.0, &x).unwrap();
        assert_eq!(y.as_slice(), &[5.0, 2.0, 1.0]);

        // norm of [3, 4] is 5
        let v = Vector::from_vec(vec![3.0_f64, 4.0]);
        assert!((v.norm_l2() - 5.0).abs() < 1e-15);
    }

    #[test]
    fn test_dot_product() {
        let a: Vector<f64> = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        let b = Vector::from_vec(vec![4.0, -5.0, 6.0]);
        assert_eq!(a.dot(&b).unwrap(), 12.0);
    }

    #[test]
    fn test_add_sub_scale() {
        let mut a: Vector<f64> = Vector::from_vec(vec![1.0, 2.0]);
        let b = Vector::from_vec(vec![3.0, 5.0]);

        a.add_assign(&b).unwrap();
        assert_eq!(a.as_slice(), &[4.0, 7.0]);

        a.sub_assign(&b).unwrap();
        assert_eq!(a.as_slice(), &[1.0, 2.0]);

        a.scale(-2.0);
        assert_eq!(a.as_slice(), &[-2.0, -4.0]);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let mut a: Vector<f64> = Vector::zeros(3);
        let b = Vector::zeros(2);

        let err = a.axpy(1.0, &b).unwrap_err();
        assert_eq!(
            err,
            SolverError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert!(a.dot(&b).is_err());
        assert!(a.copy_from(&b).is_err());
    }
}
