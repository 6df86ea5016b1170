//! Sigmoid (Tanh) Kernel Implementation
//!
//! K(x, y) = tanh(slope * <x, y> / n + intercept)
//!
//! where n is the vector length. Dividing the dot product by the
//! dimensionality keeps the tanh argument in a usable range as the number of
//! features grows. Output is bounded in [-1, 1]. The kernel is not positive
//! semi-definite for every parameter choice, so the solver may see eta >= 0
//! for some pairs and skip them.

use crate::core::KernelSpec;
use crate::kernel::traits::Kernel;
use crate::linalg;
use ndarray::ArrayView1;

/// Sigmoid kernel with parameters `[slope = 1, intercept = 0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidKernel {
    /// Scaling of the length-normalized dot product
    pub slope: f64,
    /// Offset inside the tanh
    pub intercept: f64,
}

impl SigmoidKernel {
    /// Creates a new Sigmoid kernel with specified parameters
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Read parameters from a kernel specification
    pub fn from_spec(spec: &KernelSpec) -> Self {
        Self::new(spec.param(0, 1.0), spec.param(1, 0.0))
    }
}

impl Default for SigmoidKernel {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Kernel for SigmoidKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let n = x.len();
        if n == 0 {
            return self.intercept.tanh();
        }

        (self.slope * linalg::dot(x, y) / n as f64 + self.intercept).tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KernelKind;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_sigmoid_kernel_defaults() {
        let spec = KernelSpec::new(KernelKind::Sigmoid, vec![]);
        assert_eq!(SigmoidKernel::from_spec(&spec), SigmoidKernel::new(1.0, 0.0));
    }

    #[test]
    fn test_sigmoid_divides_by_length() {
        let kernel = SigmoidKernel::new(2.0, -0.5);
        let x = array![1.0, 2.0];
        let y = array![3.0, 1.0];

        // dot = 5, n = 2 -> tanh(2 * 5 / 2 - 0.5) = tanh(4.5)
        assert_relative_eq!(kernel.compute(x.view(), y.view()), 4.5_f64.tanh(), epsilon = 1e-12);
    }

    #[test]
    fn test_sigmoid_kernel_bounded() {
        let kernel = SigmoidKernel::new(10.0, 3.0);
        let x = array![100.0, -50.0, 25.0];
        let y = array![-75.0, 80.0, 10.0];
        let value = kernel.compute(x.view(), y.view());
        assert!((-1.0..=1.0).contains(&value));
    }

    #[test]
    fn test_sigmoid_empty_vectors() {
        let kernel = SigmoidKernel::new(1.0, 0.25);
        let empty = Array1::<f64>::zeros(0);
        assert_relative_eq!(kernel.compute(empty.view(), empty.view()), 0.25_f64.tanh());
    }
}
