//! Polynomial kernel implementation
//!
//! K(x, y) = (x^T y + offset)^degree
//!
//! The degree is a real exponent, so fractional degrees are accepted; a negative
//! base with a fractional degree yields NaN exactly as `f64::powf` does.

use crate::core::KernelSpec;
use crate::kernel::Kernel;
use crate::linalg;
use ndarray::ArrayView1;

/// Polynomial kernel with parameters `[offset = 0, degree = 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialKernel {
    /// Constant added to the dot product
    pub offset: f64,
    /// Exponent applied to the shifted dot product
    pub degree: f64,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel
    pub fn new(offset: f64, degree: f64) -> Self {
        Self { offset, degree }
    }

    /// Read parameters from a kernel specification
    pub fn from_spec(spec: &KernelSpec) -> Self {
        Self::new(spec.param(0, 0.0), spec.param(1, 1.0))
    }
}

impl Default for PolynomialKernel {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (linalg::dot(x, y) + self.offset).powf(self.degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KernelKind;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_default_is_dot_product() {
        let kernel = PolynomialKernel::default();
        let x = array![1.0, 2.0];
        let y = array![3.0, 4.0];
        assert_relative_eq!(kernel.compute(x.view(), y.view()), 11.0);
    }

    #[test]
    fn test_polynomial_kernel_computation() {
        let spec = KernelSpec::new(KernelKind::Polynomial, vec![1.0, 2.0]);
        let kernel = PolynomialKernel::from_spec(&spec);

        // Dot product: 1*2 + 2*1 = 4
        // Kernel: (4 + 1)² = 25
        let x = array![1.0, 2.0];
        let y = array![2.0, 1.0];
        assert_relative_eq!(kernel.compute(x.view(), y.view()), 25.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_kernel_orthogonal_vectors() {
        let kernel = PolynomialKernel::new(2.0, 3.0);
        let x = array![1.0, 0.0];
        let y = array![0.0, 1.0];

        // (0 + 2)³ = 8
        assert_relative_eq!(kernel.compute(x.view(), y.view()), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_kernel_symmetry() {
        let kernel = PolynomialKernel::new(0.5, 2.5);
        let x = array![0.3, 1.2, 2.0];
        let y = array![1.0, 0.1, 0.7];
        assert_eq!(
            kernel.compute(x.view(), y.view()),
            kernel.compute(y.view(), x.view())
        );
    }
}
