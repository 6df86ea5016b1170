//! Fourier kernel implementation

use crate::core::KernelSpec;
use crate::kernel::Kernel;
use ndarray::ArrayView1;

/// Fourier (Dirichlet) kernel with parameters `[order = 1]`
///
/// Per dimension the term is `sin(order + 0.5) * d / sin(d / 2)` where
/// `d = x_i - y_i`, or its limit `2 * sin(order + 0.5)` when `d == 0`. The
/// kernel value is the product of the per-dimension terms. Empty vectors give 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierKernel {
    pub order: f64,
}

impl FourierKernel {
    pub fn new(order: f64) -> Self {
        Self { order }
    }

    /// Read parameters from a kernel specification
    pub fn from_spec(spec: &KernelSpec) -> Self {
        Self::new(spec.param(0, 1.0))
    }

    fn term(&self, d: f64) -> f64 {
        let scale = (self.order + 0.5).sin();
        if d.abs() > 0.0 {
            scale * d / (d * 0.5).sin()
        } else {
            scale * 2.0
        }
    }
}

impl Default for FourierKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for FourierKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        x.iter()
            .zip(y.iter())
            .map(|(a, b)| self.term(a - b))
            .reduce(|prod, z| prod * z)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_identical_vectors() {
        let kernel = FourierKernel::new(1.0);
        let x = array![0.3, -2.0, 5.0];
        let term = 1.5_f64.sin() * 2.0;

        assert_relative_eq!(kernel.compute(x.view(), x.view()), term.powi(3), epsilon = 1e-12);
    }

    #[test]
    fn test_product_across_dimensions() {
        let kernel = FourierKernel::new(2.0);
        let x = array![1.0, 0.0];
        let y = array![0.0, 0.0];

        let scale = 2.5_f64.sin();
        let first = scale * 1.0 / 0.5_f64.sin();
        let second = scale * 2.0;

        // Terms are multiplied, not summed
        assert_relative_eq!(kernel.compute(x.view(), y.view()), first * second, epsilon = 1e-12);
    }

    #[test]
    fn test_single_dimension_is_first_term() {
        let kernel = FourierKernel::default();
        let x = array![0.4];
        let y = array![1.0];
        let d: f64 = -0.6;
        let expected = 1.5_f64.sin() * d / (d * 0.5).sin();

        assert_relative_eq!(kernel.compute(x.view(), y.view()), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let kernel = FourierKernel::new(0.5);
        let x = array![0.1, 0.9, -0.4];
        let y = array![0.7, -0.2, 0.3];
        assert_relative_eq!(
            kernel.compute(x.view(), y.view()),
            kernel.compute(y.view(), x.view()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_vectors() {
        let kernel = FourierKernel::default();
        let empty = Array1::<f64>::zeros(0);
        assert_eq!(kernel.compute(empty.view(), empty.view()), 0.0);
    }
}
