//! Utility functions for SVM operations

/// Feature scaling utilities
pub mod scaling {
    use crate::core::{Result, SVMError};
    use log::warn;
    use ndarray::{Array1, Array2, ArrayView2, Axis};

    /// Per-feature min/max scaling to [0, 1]
    ///
    /// Fitted on the training matrix and applied to every input as
    /// (value - min) / (max - min). Features that are constant in the training
    /// data map to 0.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Normalization {
        pub min: Array1<f64>,
        pub max: Array1<f64>,
    }

    impl Normalization {
        /// Create from explicit per-feature bounds
        pub fn new(min: Array1<f64>, max: Array1<f64>) -> Result<Self> {
            if min.len() != max.len() {
                return Err(SVMError::DimensionMismatch {
                    expected: min.len(),
                    actual: max.len(),
                });
            }
            Ok(Self { min, max })
        }

        /// Compute per-feature bounds from training data
        pub fn fit(x: ArrayView2<f64>) -> Result<Self> {
            if x.nrows() == 0 || x.ncols() == 0 {
                return Err(SVMError::EmptyDataset);
            }

            let min = x.fold_axis(Axis(0), f64::INFINITY, |&a, &b| a.min(b));
            let max = x.fold_axis(Axis(0), f64::NEG_INFINITY, |&a, &b| a.max(b));

            let constant = min
                .iter()
                .zip(max.iter())
                .filter(|(lo, hi)| lo == hi)
                .count();
            if constant > 0 {
                warn!("{constant} constant feature(s) will normalize to 0");
            }

            Ok(Self { min, max })
        }

        /// Number of features the bounds cover
        pub fn n_features(&self) -> usize {
            self.min.len()
        }

        /// Scale every row of `x`
        pub fn apply(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
            if x.ncols() != self.n_features() {
                return Err(SVMError::DimensionMismatch {
                    expected: self.n_features(),
                    actual: x.ncols(),
                });
            }

            let mut scaled = x.to_owned();
            for mut row in scaled.rows_mut() {
                for (j, value) in row.iter_mut().enumerate() {
                    let range = self.max[j] - self.min[j];
                    *value = if range == 0.0 {
                        0.0
                    } else {
                        (*value - self.min[j]) / range
                    };
                }
            }
            Ok(scaled)
        }
    }

    /// Convenience function: fit and transform in one step
    pub fn fit_transform(x: ArrayView2<f64>) -> Result<(Array2<f64>, Normalization)> {
        let normalization = Normalization::fit(x)?;
        let scaled = normalization.apply(x)?;
        Ok((scaled, normalization))
    }
}

/// Label inspection utilities
pub mod validation {
    use crate::core::Label;
    use ndarray::ArrayView1;

    /// Number of categories, i.e. the largest label present
    pub fn category_count(labels: ArrayView1<Label>) -> usize {
        labels.iter().copied().max().unwrap_or(0)
    }

    /// Examples per label value, indexed `0..=category_count`
    pub fn label_histogram(labels: ArrayView1<Label>) -> Vec<usize> {
        let mut counts = vec![0; category_count(labels) + 1];
        for &label in labels.iter() {
            counts[label] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::scaling::*;
    use super::validation::*;
    use crate::core::SVMError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_normalization_fit() {
        let x = array![[1.0, -2.0], [3.0, 4.0], [2.0, 0.0]];
        let norm = Normalization::fit(x.view()).unwrap();

        assert_eq!(norm.min, array![1.0, -2.0]);
        assert_eq!(norm.max, array![3.0, 4.0]);
    }

    #[test]
    fn test_normalization_negative_columns() {
        let x = array![[-5.0], [-3.0], [-4.0]];
        let norm = Normalization::fit(x.view()).unwrap();

        assert_eq!(norm.min, array![-5.0]);
        assert_eq!(norm.max, array![-3.0]);
    }

    #[test]
    fn test_apply_scales_to_unit_range() {
        let x = array![[1.0, -2.0], [3.0, 4.0], [2.0, 1.0]];
        let (scaled, _) = fit_transform(x.view()).unwrap();

        assert_relative_eq!(scaled[[0, 0]], 0.0);
        assert_relative_eq!(scaled[[1, 0]], 1.0);
        assert_relative_eq!(scaled[[2, 0]], 0.5);
        assert_relative_eq!(scaled[[2, 1]], 0.5);
    }

    #[test]
    fn test_constant_feature_maps_to_zero() {
        let x = array![[7.0, 1.0], [7.0, 2.0]];
        let (scaled, _) = fit_transform(x.view()).unwrap();
        assert_eq!(scaled.column(0).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_apply_outside_training_range() {
        let norm = Normalization::new(array![0.0], array![10.0]).unwrap();
        let scaled = norm.apply(array![[20.0], [-5.0]].view()).unwrap();
        assert_relative_eq!(scaled[[0, 0]], 2.0);
        assert_relative_eq!(scaled[[1, 0]], -0.5);
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let norm = Normalization::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();
        assert!(matches!(
            norm.apply(array![[1.0, 2.0, 3.0]].view()),
            Err(SVMError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert!(Normalization::new(array![0.0], array![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_fit_empty() {
        let x = ndarray::Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            Normalization::fit(x.view()),
            Err(SVMError::EmptyDataset)
        ));
    }

    #[test]
    fn test_category_count_and_histogram() {
        let labels = array![0, 2, 1, 2, 0, 0];
        assert_eq!(category_count(labels.view()), 2);
        assert_eq!(label_histogram(labels.view()), vec![3, 1, 2]);

        let background = array![0, 0];
        assert_eq!(category_count(background.view()), 0);
    }
}
