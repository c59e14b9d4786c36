use serde::{Deserialize, Serialize};

use crate::classifier::{InferenceError, ensure_finite, ensure_width};

/// Per-feature affine transform applied before classification.
///
/// Must be the exact transform fitted at training time; the parameters travel
/// with the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl FeatureScaler {
    pub fn standard(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        FeatureScaler::Standard { mean, scale }
    }

    pub fn min_max(min: Vec<f64>, scale: Vec<f64>) -> Self {
        FeatureScaler::MinMax { min, scale }
    }

    pub fn n_features(&self) -> usize {
        match self {
            FeatureScaler::Standard { scale, .. } | FeatureScaler::MinMax { scale, .. } => {
                scale.len()
            }
        }
    }

    pub fn check(&self) -> Result<(), String> {
        let (offset, scale, offset_name) = match self {
            FeatureScaler::Standard { mean, scale } => (mean, scale, "mean"),
            FeatureScaler::MinMax { min, scale } => (min, scale, "min"),
        };
        if scale.is_empty() {
            return Err("scaler has no features".to_string());
        }
        if offset.len() != scale.len() {
            return Err(format!(
                "{} {offset_name} values for {} scale values",
                offset.len(),
                scale.len()
            ));
        }
        if offset.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err("scaler parameters contain non-finite values".to_string());
        }
        if let FeatureScaler::Standard { scale, .. } = self {
            if let Some(i) = scale.iter().position(|s| *s == 0.0) {
                return Err(format!("scale for feature {i} is zero"));
            }
        }
        Ok(())
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        ensure_width(features, self.n_features())?;
        ensure_finite(features, "input")?;

        let scaled: Vec<f64> = match self {
            FeatureScaler::Standard { mean, scale } => features
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            FeatureScaler::MinMax { min, scale } => features
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };

        ensure_finite(&scaled, "scaled")?;
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_scaler_centres_and_divides() {
        let scaler = FeatureScaler::standard(vec![10.0, 0.0], vec![2.0, 0.5]);
        scaler.check().unwrap();
        assert_eq!(scaler.transform(&[14.0, 1.0]).unwrap(), vec![2.0, 2.0]);
    }

    #[test]
    fn min_max_scaler_multiplies_then_shifts() {
        let scaler = FeatureScaler::min_max(vec![-0.5, 0.0], vec![0.1, 0.01]);
        scaler.check().unwrap();
        let out = scaler.transform(&[10.0, 50.0]).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-12);
        assert!((out[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn check_rejects_zero_standard_scale() {
        let scaler = FeatureScaler::standard(vec![0.0, 0.0], vec![1.0, 0.0]);
        assert_eq!(scaler.check().unwrap_err(), "scale for feature 1 is zero");
    }

    #[test]
    fn check_rejects_length_mismatch() {
        let scaler = FeatureScaler::min_max(vec![0.0], vec![1.0, 1.0]);
        assert_eq!(
            scaler.check().unwrap_err(),
            "1 min values for 2 scale values"
        );
    }

    #[test]
    fn transform_rejects_non_finite_input_and_output() {
        let scaler = FeatureScaler::standard(vec![0.0], vec![1e-300]);
        assert!(matches!(
            scaler.transform(&[f64::INFINITY]).unwrap_err(),
            InferenceError::NonFinite { stage: "input", .. }
        ));
        assert!(matches!(
            scaler.transform(&[1e300]).unwrap_err(),
            InferenceError::NonFinite { stage: "scaled", .. }
        ));
    }

    #[test]
    fn deserializes_sklearn_style_parameters() {
        let json = r#"{"kind": "standard", "mean": [1.0, 2.0], "scale": [3.0, 4.0]}"#;
        let scaler: FeatureScaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.n_features(), 2);
    }
}
