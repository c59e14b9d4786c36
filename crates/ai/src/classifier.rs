use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boosted_trees::BoostedTrees;
use crate::nearest_centroid::NearestCentroid;
use crate::softmax_regression::SoftmaxRegression;

/// Failure while running a loaded model on one request.
///
/// Transient by contract: the request fails, the process keeps serving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("non-finite {stage} value at position {index}")]
    NonFinite { stage: &'static str, index: usize },

    #[error("class index {index} out of range ({classes} classes)")]
    UnknownClass { index: usize, classes: usize },

    #[error("probability distribution has {actual} entries, expected {expected}")]
    DistributionWidth { expected: usize, actual: usize },

    #[error("model produced no class scores")]
    NoScores,

    #[error("malformed model: {0}")]
    MalformedModel(String),
}

/// A trained classifier over scaled feature vectors.
///
/// Only top-class prediction is mandatory. Models that can also produce a class
/// probability distribution expose it through [`Classifier::as_probabilistic`];
/// callers probe for it and treat `None` as "no ranking available", not as an error.
pub trait Classifier: Send + Sync + core::fmt::Debug {
    /// Width of the feature vector the model was trained on.
    fn n_features(&self) -> usize;

    fn n_classes(&self) -> usize;

    /// Index of the single most likely class.
    fn predict_top(&self, features: &[f64]) -> Result<usize, InferenceError>;

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        None
    }
}

/// Optional capability: per-class probabilities, indexed by class.
pub trait ProbabilisticClassifier: Classifier {
    fn predict_distribution(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Serialized classifier, tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    SoftmaxRegression(SoftmaxRegression),
    GradientBoostedTrees(BoostedTrees),
    NearestCentroid(NearestCentroid),
}

impl ClassifierArtifact {
    /// Structural checks that make inference panic-free.
    pub fn check(&self) -> Result<(), String> {
        match self {
            ClassifierArtifact::SoftmaxRegression(m) => m.check(),
            ClassifierArtifact::GradientBoostedTrees(m) => m.check(),
            ClassifierArtifact::NearestCentroid(m) => m.check(),
        }
    }

    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ClassifierArtifact::SoftmaxRegression(m) => Box::new(m),
            ClassifierArtifact::GradientBoostedTrees(m) => Box::new(m),
            ClassifierArtifact::NearestCentroid(m) => Box::new(m),
        }
    }
}

pub(crate) fn ensure_width(features: &[f64], expected: usize) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::FeatureCount {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_finite(values: &[f64], stage: &'static str) -> Result<(), InferenceError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(InferenceError::NonFinite { stage, index }),
        None => Ok(()),
    }
}

/// Index of the largest score; the first one wins on ties.
pub(crate) fn argmax(scores: &[f64]) -> Result<usize, InferenceError> {
    if scores.is_empty() {
        return Err(InferenceError::NoScores);
    }
    ensure_finite(scores, "score")?;
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    Ok(best)
}

/// Numerically stable softmax.
pub(crate) fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Check a row-major matrix is non-empty, rectangular and finite; returns its width.
pub(crate) fn check_matrix(rows: &[Vec<f64>], name: &str) -> Result<usize, String> {
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| format!("{name} must have at least one row"))?;
    if width == 0 {
        return Err(format!("{name} rows must not be empty"));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(format!(
                "{name} row {i} has {} columns, expected {width}",
                row.len()
            ));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(format!("{name} row {i} contains non-finite values"));
        }
    }
    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_of_equal_scores() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]).unwrap(), 1);
        assert_eq!(argmax(&[-3.0]).unwrap(), 0);
    }

    #[test]
    fn argmax_rejects_empty_and_non_finite_scores() {
        assert_eq!(argmax(&[]).unwrap_err(), InferenceError::NoScores);
        assert!(matches!(
            argmax(&[0.1, f64::NAN]).unwrap_err(),
            InferenceError::NonFinite { index: 1, .. }
        ));
    }

    #[test]
    fn softmax_sums_to_one_and_keeps_order() {
        let p = softmax(&[1000.0, 1001.0, 999.0]);
        let sum: f64 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(p[1] > p[0] && p[0] > p[2]);
    }

    #[test]
    fn check_matrix_reports_ragged_rows() {
        let err = check_matrix(&[vec![1.0, 2.0], vec![3.0]], "coefficients").unwrap_err();
        assert_eq!(err, "coefficients row 1 has 1 columns, expected 2");
        assert_eq!(check_matrix(&[vec![1.0, 2.0]], "centroids").unwrap(), 2);
        assert!(check_matrix(&[], "centroids").is_err());
    }

    #[test]
    fn artifact_kind_tag_selects_model() {
        let json = r#"{
            "kind": "nearest_centroid",
            "centroids": [[0.0, 0.0], [1.0, 1.0]]
        }"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert!(matches!(artifact, ClassifierArtifact::NearestCentroid(_)));
        artifact.check().unwrap();

        let model = artifact.into_classifier();
        assert_eq!(model.n_classes(), 2);
        assert!(model.as_probabilistic().is_none());
        assert_eq!(model.predict_top(&[0.9, 0.8]).unwrap(), 1);
    }

    #[test]
    fn unknown_kind_fails_to_deserialize() {
        let json = r#"{"kind": "random_forest", "trees": []}"#;
        assert!(serde_json::from_str::<ClassifierArtifact>(json).is_err());
    }
}
