//! Kernel trait definition

use ndarray::ArrayView1;

/// Kernel function trait
///
/// Computes the similarity K(x, y) of two dense feature vectors of equal
/// length. Callers check lengths; implementations may assume they match.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;
}
