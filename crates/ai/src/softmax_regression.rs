use serde::{Deserialize, Serialize};

use crate::classifier::{
    Classifier, InferenceError, ProbabilisticClassifier, argmax, check_matrix, ensure_finite,
    ensure_width, softmax,
};

/// Multinomial logistic regression.
///
/// Model:
/// - `logit[c] = intercepts[c] + Σ coefficients[c][i] * x[i]`
/// - top class = argmax of logits
/// - probabilities = softmax of logits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxRegression {
    /// One row per class, one column per feature.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl SoftmaxRegression {
    pub fn new(coefficients: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Self {
        Self {
            coefficients,
            intercepts,
        }
    }

    pub fn check(&self) -> Result<(), String> {
        check_matrix(&self.coefficients, "coefficients")?;
        if self.intercepts.len() != self.coefficients.len() {
            return Err(format!(
                "{} intercepts for {} classes",
                self.intercepts.len(),
                self.coefficients.len()
            ));
        }
        if self.intercepts.iter().any(|v| !v.is_finite()) {
            return Err("intercepts contain non-finite values".to_string());
        }
        Ok(())
    }

    fn logits(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        ensure_width(features, self.n_features())?;
        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| b + row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>())
            .collect())
    }
}

impl Classifier for SoftmaxRegression {
    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn n_classes(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_top(&self, features: &[f64]) -> Result<usize, InferenceError> {
        argmax(&self.logits(features)?)
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        Some(self)
    }
}

impl ProbabilisticClassifier for SoftmaxRegression {
    fn predict_distribution(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let logits = self.logits(features)?;
        ensure_finite(&logits, "logit")?;
        Ok(softmax(&logits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class() -> SoftmaxRegression {
        SoftmaxRegression::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]], vec![0.0, 0.5])
    }

    #[test]
    fn top_class_is_largest_logit() {
        let model = two_class();
        assert_eq!(model.predict_top(&[2.0, 0.0]).unwrap(), 0);
        assert_eq!(model.predict_top(&[0.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn distribution_agrees_with_top_class() {
        let model = two_class();
        let p = model.predict_distribution(&[2.0, 0.0]).unwrap();
        assert_eq!(p.len(), 2);
        assert!(p[0] > p[1]);
        assert!(((p[0] + p[1]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_feature_width_is_an_inference_error() {
        let err = two_class().predict_top(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            InferenceError::FeatureCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn check_rejects_intercept_mismatch() {
        let model = SoftmaxRegression::new(vec![vec![1.0], vec![2.0]], vec![0.0]);
        assert_eq!(model.check().unwrap_err(), "1 intercepts for 2 classes");
    }
}
