//! Decision-function evaluation
//!
//! f(x) = Σ αᵢ·yᵢ·K(svᵢ, x) + B over the support vectors. The linear kernel
//! uses the precomputed weight vector instead (f(x) = x·W + B); Gaussian and
//! radial kernels use the vectorized distance expansion against all support
//! vectors at once.

use super::TrainedModel;
use crate::core::{KernelKind, Label, Result, SVMError};
use crate::kernel::{self, GaussianKernel, RadialKernel};
use crate::linalg;
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, CowArray};

impl TrainedModel {
    /// Raw decision values for every row of `x`
    ///
    /// Applies the model's normalization first when one is attached.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        if !self.trained {
            return Err(SVMError::ModelNotTrained);
        }
        if x.ncols() != self.n_features() {
            return Err(SVMError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let x = match &self.normalization {
            Some(normalization) => CowArray::from(normalization.apply(x)?),
            None => CowArray::from(x),
        };
        let x = x.view();

        let coef = &self.alpha * &self.support_labels;
        let scores = match self.kernel.kind {
            KernelKind::Linear => x.dot(&self.weights),
            KernelKind::Gaussian => {
                let gaussian = GaussianKernel::from_spec(&self.kernel);
                linalg::pairwise_squared_distances(x, self.support_vectors.view())
                    .mapv(|d| gaussian.apply_to_squared_distance(d))
                    .dot(&coef)
            }
            KernelKind::Radial => {
                let radial = RadialKernel::from_spec(&self.kernel);
                linalg::pairwise_squared_distances(x, self.support_vectors.view())
                    .mapv(|d| radial.apply_to_squared_distance(d))
                    .dot(&coef)
            }
            KernelKind::Unknown => return Err(SVMError::UnknownKernel),
            _ => {
                debug!(
                    "Evaluating {} kernel against {} support vectors",
                    self.kernel.kind,
                    self.n_support_vectors()
                );
                let kernel = kernel::build(&self.kernel)?;
                let k = Array2::from_shape_fn(
                    (x.nrows(), self.n_support_vectors()),
                    |(i, s)| kernel.compute(self.support_vectors.row(s), x.row(i)),
                );
                k.dot(&coef)
            }
        };

        Ok(scores + self.bias)
    }

    /// Labels for every row of `x`: the model's category when the score
    /// exceeds `threshold`, otherwise 0
    pub fn classify(&self, x: ArrayView2<f64>, threshold: f64) -> Result<Array1<Label>> {
        let category = self.category;
        Ok(self
            .predict(x)?
            .mapv(|score| if score > threshold { category } else { 0 }))
    }

    /// Misclassified rows of `x` against multi-category ground truth
    pub fn errors(
        &self,
        x: ArrayView2<f64>,
        truth: ArrayView1<Label>,
        threshold: f64,
    ) -> Result<usize> {
        if truth.len() != x.nrows() {
            return Err(SVMError::DimensionMismatch {
                expected: x.nrows(),
                actual: truth.len(),
            });
        }
        let predicted = self.classify(x, threshold)?;
        Ok(count_errors(predicted.view(), truth, self.category))
    }
}

/// Count mismatches between `predicted` and `truth` binarized to
/// `{category, 0}`
///
/// Only the overlapping prefix of the two vectors is compared.
pub fn count_errors(
    predicted: ArrayView1<Label>,
    truth: ArrayView1<Label>,
    category: Label,
) -> usize {
    predicted
        .iter()
        .zip(truth.iter())
        .filter(|(&p, &t)| {
            let expected = if t == category { category } else { 0 };
            p != expected
        })
        .count()
}
