//! High-level API for Support Vector Machine operations
//!
//! This module wraps the solver in a builder, trains one model per category
//! (one-vs-rest) and combines the per-category models into a multiclass
//! classifier.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rsmo::api::SVM;
//! use rsmo::core::KernelSpec;
//! use rsmo::data::{Delimiter, LabeledDataset};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = LabeledDataset::from_file("train.txt", Delimiter::Tab)?;
//!
//! let model = SVM::new(KernelSpec::gaussian(1.0))
//!     .with_c(1.0)
//!     .with_tolerance(0.001)
//!     .with_normalization(true)
//!     .train_one_vs_rest(dataset.features.view(), dataset.labels.view())?;
//!
//! let predicted = model.classify(dataset.features.view())?;
//! # Ok(())
//! # }
//! ```

use crate::core::{KernelSpec, Label, Result, SVMError, SolverConfig};
use crate::model::{count_errors, TrainedModel};
use crate::solver::SmoSolver;
use crate::utils::scaling::{self, Normalization};
use crate::utils::validation;
use log::{info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, CowArray, Ix2};
use rayon::prelude::*;

/// High-level SVM interface with builder pattern
#[derive(Debug, Clone)]
pub struct SVM {
    kernel: KernelSpec,
    config: SolverConfig,
    normalize: bool,
    parallel: bool,
}

impl SVM {
    /// Create an SVM with the given kernel and default solver parameters
    pub fn new(kernel: KernelSpec) -> Self {
        Self {
            kernel,
            config: SolverConfig::default(),
            normalize: false,
            parallel: false,
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set KKT tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the number of unchanged sweeps required for convergence
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    /// Seed partner selection for reproducible training
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Fit min/max normalization on the training data
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Train one-vs-rest categories on the rayon thread pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn kernel(&self) -> &KernelSpec {
        &self.kernel
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solver configuration for one category
    ///
    /// Each category draws partners from its own stream seeded with
    /// base seed + category.
    fn config_for(&self, category: Label) -> SolverConfig {
        SolverConfig {
            seed: self
                .config
                .seed
                .map(|seed| seed.wrapping_add(category as u64)),
            ..self.config.clone()
        }
    }

    /// Training data as seen by the solver, normalized when enabled
    fn prepare<'a>(
        &self,
        x: ArrayView2<'a, f64>,
    ) -> Result<(CowArray<'a, f64, Ix2>, Option<Normalization>)> {
        if !self.normalize {
            return Ok((CowArray::from(x), None));
        }
        let (scaled, normalization) = scaling::fit_transform(x)?;
        Ok((CowArray::from(scaled), Some(normalization)))
    }

    /// Train a binary model separating `category` from every other label
    pub fn train(
        &self,
        x: ArrayView2<f64>,
        labels: ArrayView1<Label>,
        category: Label,
    ) -> Result<TrainedModel> {
        let (data, normalization) = self.prepare(x)?;
        let model = SmoSolver::train(
            data.view(),
            labels,
            &self.kernel,
            &self.config_for(category),
            category,
        )?;
        Ok(model.with_normalization(normalization))
    }

    /// Train one model per category `1..=K`, where K is the largest label
    pub fn train_one_vs_rest(
        &self,
        x: ArrayView2<f64>,
        labels: ArrayView1<Label>,
    ) -> Result<MultiClassModel> {
        let categories = validation::category_count(labels);
        if categories == 0 {
            return Err(SVMError::InvalidDataset(
                "No positive category labels present".to_string(),
            ));
        }

        info!(
            "Training {} one-vs-rest models ({}), examples per label {:?}",
            categories,
            if self.parallel { "parallel" } else { "round-robin" },
            validation::label_histogram(labels)
        );

        let (data, normalization) = self.prepare(x)?;
        let data = data.view();

        let models = if self.parallel {
            (1..=categories)
                .into_par_iter()
                .map(|category| {
                    SmoSolver::train(
                        data,
                        labels,
                        &self.kernel,
                        &self.config_for(category),
                        category,
                    )
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            self.round_robin(data, labels, categories)?
        };

        Ok(MultiClassModel::new(models, normalization))
    }

    /// Step every category's solver in turn until all have converged
    fn round_robin(
        &self,
        x: ArrayView2<f64>,
        labels: ArrayView1<Label>,
        categories: usize,
    ) -> Result<Vec<TrainedModel>> {
        let mut solvers = (1..=categories)
            .map(|category| {
                SmoSolver::setup(x, labels, &self.kernel, &self.config_for(category), category)
                    .map(Some)
            })
            .collect::<Result<Vec<_>>>()?;
        let mut models: Vec<Option<TrainedModel>> = vec![None; categories];
        let mut remaining = categories;

        while remaining > 0 {
            for (slot, model) in solvers.iter_mut().zip(models.iter_mut()) {
                let converged = match slot.as_mut() {
                    Some(solver) => solver.step(),
                    None => continue,
                };
                if converged {
                    *model = slot.take().map(SmoSolver::generate);
                    remaining -= 1;
                }
            }
        }

        Ok(models.into_iter().flatten().collect())
    }

    /// Train a single category when given, otherwise one-vs-rest
    ///
    /// A category outside `1..=K` (K the largest label) falls back to
    /// one-vs-rest.
    pub fn train_categories(
        &self,
        x: ArrayView2<f64>,
        labels: ArrayView1<Label>,
        category: Option<Label>,
    ) -> Result<MultiClassModel> {
        let categories = validation::category_count(labels);
        match category {
            Some(category) if (1..=categories).contains(&category) => {
                let model = self.train(x, labels, category)?;
                let normalization = model.normalization.clone();
                Ok(MultiClassModel::new(vec![model], normalization))
            }
            Some(category) => {
                warn!(
                    "Category {category} is outside 1..={categories}, training one-vs-rest instead"
                );
                self.train_one_vs_rest(x, labels)
            }
            None => self.train_one_vs_rest(x, labels),
        }
    }
}

/// Set of per-category binary models combined by argmax
#[derive(Debug, Clone, PartialEq)]
pub struct MultiClassModel {
    models: Vec<TrainedModel>,
    normalization: Option<Normalization>,
}

impl MultiClassModel {
    /// Combine binary models, attaching `normalization` to each of them
    pub fn new(models: Vec<TrainedModel>, normalization: Option<Normalization>) -> Self {
        let models = models
            .into_iter()
            .map(|model| model.with_normalization(normalization.clone()))
            .collect();
        Self {
            models,
            normalization,
        }
    }

    pub fn models(&self) -> &[TrainedModel] {
        &self.models
    }

    pub fn normalization(&self) -> Option<&Normalization> {
        self.normalization.as_ref()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Categories of the contained models, in order
    pub fn categories(&self) -> Vec<Label> {
        self.models.iter().map(|model| model.category).collect()
    }

    /// Decision values, one column per model
    pub fn scores(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let mut scores = Array2::zeros((x.nrows(), self.models.len()));
        for (mut column, model) in scores.axis_iter_mut(Axis(1)).zip(self.models.iter()) {
            column.assign(&model.predict(x)?);
        }
        Ok(scores)
    }

    /// Category with the highest score above 0 for every row, 0 if none
    pub fn classify(&self, x: ArrayView2<f64>) -> Result<Array1<Label>> {
        self.classify_with_threshold(x, 0.0)
    }

    /// Category with the highest score above `threshold`, 0 if none
    pub fn classify_with_threshold(
        &self,
        x: ArrayView2<f64>,
        threshold: f64,
    ) -> Result<Array1<Label>> {
        let scores = self.scores(x)?;
        let labels = scores
            .rows()
            .into_iter()
            .map(|row| {
                let mut best_score = threshold;
                let mut best = 0;
                for (score, model) in row.iter().zip(self.models.iter()) {
                    if *score > best_score {
                        best_score = *score;
                        best = model.category;
                    }
                }
                best
            })
            .collect();
        Ok(labels)
    }

    /// Per-model error counts and metrics against multi-category truth
    pub fn evaluate(
        &self,
        x: ArrayView2<f64>,
        truth: ArrayView1<Label>,
    ) -> Result<Vec<CategoryEvaluation>> {
        if truth.len() != x.nrows() {
            return Err(SVMError::DimensionMismatch {
                expected: x.nrows(),
                actual: truth.len(),
            });
        }

        self.models
            .iter()
            .map(|model| {
                let predicted = model.classify(x, 0.0)?;
                Ok(CategoryEvaluation {
                    category: model.category,
                    errors: count_errors(predicted.view(), truth, model.category),
                    metrics: EvaluationMetrics::from_labels(
                        predicted.view(),
                        truth,
                        model.category,
                    ),
                })
            })
            .collect()
    }

    /// Get model information for every category
    pub fn info(&self) -> Vec<ModelInfo> {
        self.models.iter().map(ModelInfo::from).collect()
    }
}

/// Evaluation of one category's binary model
#[derive(Debug, Clone)]
pub struct CategoryEvaluation {
    pub category: Label,
    pub errors: usize,
    pub metrics: EvaluationMetrics,
}

/// Detailed evaluation metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Confusion counts for `category` against everything else
    pub fn from_labels(
        predicted: ArrayView1<Label>,
        truth: ArrayView1<Label>,
        category: Label,
    ) -> Self {
        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;

        for (&pred, &actual) in predicted.iter().zip(truth.iter()) {
            match (pred == category, actual == category) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        Self::new(tp, tn, fp, fn_)
    }

    /// FP + FN
    pub fn errors(&self) -> usize {
        self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub category: Label,
    pub kernel: KernelSpec,
    pub n_support_vectors: usize,
    pub n_features: usize,
    pub bias: f64,
    pub c: f64,
    pub tolerance: f64,
    pub passes: usize,
    pub max_passes: usize,
    pub normalized: bool,
}

impl From<&TrainedModel> for ModelInfo {
    fn from(model: &TrainedModel) -> Self {
        Self {
            category: model.category,
            kernel: model.kernel.clone(),
            n_support_vectors: model.n_support_vectors(),
            n_features: model.n_features(),
            bias: model.bias,
            c: model.c,
            tolerance: model.tolerance,
            passes: model.passes,
            max_passes: model.max_passes,
            normalized: model.normalization.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KernelKind;
    use ndarray::array;

    /// Three well separated clusters labelled 1, 2, 3 plus background points
    fn clusters() -> (Array2<f64>, Array1<Label>) {
        let x = array![
            [0.0, 5.0],
            [0.3, 5.2],
            [-0.2, 4.8],
            [5.0, 0.0],
            [5.3, 0.2],
            [4.8, -0.3],
            [-5.0, -5.0],
            [-5.2, -4.7],
            [-4.8, -5.3],
            [0.0, 0.0],
            [0.2, -0.1]
        ];
        let labels = array![1, 1, 1, 2, 2, 2, 3, 3, 3, 0, 0];
        (x, labels)
    }

    #[test]
    fn test_svm_builder_pattern() {
        let svm = SVM::new(KernelSpec::gaussian(2.0))
            .with_c(2.0)
            .with_tolerance(0.01)
            .with_max_passes(10)
            .with_seed(7)
            .with_normalization(true)
            .with_parallel(true);

        assert_eq!(svm.config().c, 2.0);
        assert_eq!(svm.config().tolerance, 0.01);
        assert_eq!(svm.config().max_passes, 10);
        assert_eq!(svm.config().seed, Some(7));
        assert_eq!(svm.kernel().kind, KernelKind::Gaussian);
        assert!(svm.normalize);
        assert!(svm.parallel);
    }

    #[test]
    fn test_one_vs_rest_matches_single_category_training() {
        let (x, labels) = clusters();
        let svm = SVM::new(KernelSpec::gaussian(1.0)).with_seed(99);

        let multi = svm.train_one_vs_rest(x.view(), labels.view()).unwrap();
        assert_eq!(multi.categories(), vec![1, 2, 3]);

        for (k, model) in multi.models().iter().enumerate() {
            let single = svm.train(x.view(), labels.view(), k + 1).unwrap();
            assert_eq!(model, &single);
        }
    }

    #[test]
    fn test_parallel_matches_round_robin() {
        let (x, labels) = clusters();
        let svm = SVM::new(KernelSpec::linear()).with_seed(5);

        let sequential = svm.train_one_vs_rest(x.view(), labels.view()).unwrap();
        let parallel = svm
            .clone()
            .with_parallel(true)
            .train_one_vs_rest(x.view(), labels.view())
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_multiclass_classify() {
        let (x, labels) = clusters();
        let model = SVM::new(KernelSpec::gaussian(1.0))
            .with_seed(3)
            .train_one_vs_rest(x.view(), labels.view())
            .unwrap();

        let probe = array![[0.1, 5.1], [5.1, 0.1], [-5.0, -4.9]];
        assert_eq!(model.classify(probe.view()).unwrap(), array![1, 2, 3]);

        let scores = model.scores(probe.view()).unwrap();
        assert_eq!(scores.dim(), (3, 3));
    }

    #[test]
    fn test_argmax_defaults_to_background() {
        let (x, labels) = clusters();
        let model = SVM::new(KernelSpec::gaussian(1.0))
            .with_seed(3)
            .train_one_vs_rest(x.view(), labels.view())
            .unwrap();

        // An unreachable threshold leaves every row at category 0
        let predicted = model
            .classify_with_threshold(x.view(), f64::INFINITY)
            .unwrap();
        assert!(predicted.iter().all(|&label| label == 0));
    }

    #[test]
    fn test_normalized_training() {
        let (x, labels) = clusters();
        let scaled_x = x.mapv(|v| v * 100.0 + 1000.0);
        let model = SVM::new(KernelSpec::gaussian(0.3))
            .with_seed(8)
            .with_normalization(true)
            .train_one_vs_rest(scaled_x.view(), labels.view())
            .unwrap();

        assert!(model.normalization().is_some());
        assert!(model
            .models()
            .iter()
            .all(|m| m.normalization.as_ref() == model.normalization()));

        let predicted = model.classify(scaled_x.view()).unwrap();
        let errors = predicted
            .iter()
            .zip(labels.iter())
            .filter(|(p, t)| p != t)
            .count();
        assert!(errors <= 2, "{errors} misclassified");
    }

    #[test]
    fn test_train_categories_single() {
        let (x, labels) = clusters();
        let svm = SVM::new(KernelSpec::linear()).with_seed(1);
        let model = svm
            .train_categories(x.view(), labels.view(), Some(2))
            .unwrap();
        assert_eq!(model.categories(), vec![2]);
    }

    #[test]
    fn test_train_categories_out_of_range_falls_back() {
        let x = array![[0.0, 0.0], [1.0, 1.0], [3.0, 0.0], [3.2, 0.1]];
        let labels = array![0, 1, 2, 2];
        let svm = SVM::new(KernelSpec::linear()).with_seed(4);
        let one_vs_rest = svm.train_one_vs_rest(x.view(), labels.view()).unwrap();

        for category in [Some(0), Some(3), Some(7)] {
            let model = svm
                .train_categories(x.view(), labels.view(), category)
                .unwrap();
            assert_eq!(model.categories(), vec![1, 2]);
            assert_eq!(model, one_vs_rest);
        }
    }

    #[test]
    fn test_background_only_rejected() {
        let x = array![[1.0], [2.0]];
        let labels = array![0, 0];
        assert!(matches!(
            SVM::new(KernelSpec::linear()).train_one_vs_rest(x.view(), labels.view()),
            Err(SVMError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_evaluate_reports_every_category() {
        let (x, labels) = clusters();
        let model = SVM::new(KernelSpec::gaussian(1.0))
            .with_seed(4)
            .train_one_vs_rest(x.view(), labels.view())
            .unwrap();

        let report = model.evaluate(x.view(), labels.view()).unwrap();
        assert_eq!(report.len(), 3);
        for entry in &report {
            assert_eq!(entry.errors, entry.metrics.errors());
            let m = &entry.metrics;
            assert_eq!(
                m.true_positives + m.true_negatives + m.false_positives + m.false_negatives,
                x.nrows()
            );
        }
    }

    #[test]
    fn test_evaluation_metrics() {
        let metrics = EvaluationMetrics::new(10, 5, 2, 3);

        assert_eq!(metrics.accuracy(), 0.75); // (10+5)/(10+5+2+3)
        assert_eq!(metrics.precision(), 10.0 / 12.0); // 10/(10+2)
        assert_eq!(metrics.recall(), 10.0 / 13.0); // 10/(10+3)
        assert!(metrics.f1_score() > 0.0);
        assert_eq!(metrics.specificity(), 5.0 / 7.0); // 5/(5+2)
        assert_eq!(metrics.errors(), 5);
    }

    #[test]
    fn test_metrics_from_labels() {
        let predicted = array![1, 1, 0, 0, 1];
        let truth = array![1, 2, 1, 0, 1];
        let metrics = EvaluationMetrics::from_labels(predicted.view(), truth.view(), 1);
        assert_eq!(metrics, EvaluationMetrics::new(2, 1, 1, 1));
    }

    #[test]
    fn test_model_info() {
        let (x, labels) = clusters();
        let model = SVM::new(KernelSpec::linear())
            .with_seed(2)
            .train(x.view(), labels.view(), 1)
            .unwrap();

        let info = ModelInfo::from(&model);
        assert_eq!(info.category, 1);
        assert_eq!(info.n_features, 2);
        assert_eq!(info.n_support_vectors, model.n_support_vectors());
        assert!(!info.normalized);
    }
}
