use serde::{Deserialize, Serialize};
use thiserror::Error;

use cropwise_core::{SoilParameter, ValidationReport};

use crate::classifier::InferenceError;

/// One entry of the confidence ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCrop {
    pub label: String,
    /// Percentage in \[0, 100\].
    pub confidence: f64,
}

impl RankedCrop {
    pub fn display_label(&self) -> String {
        capitalize(&self.label)
    }
}

/// Outcome of a successful prediction.
///
/// This is an insight for display, not stored anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Decoded crop label, as the label decoder spells it.
    pub label: String,

    /// Category from the lookup table, or `"unknown"`.
    pub category: String,

    /// Top classes by probability, descending, at most three. Empty when the
    /// classifier has no probability output.
    pub ranking: Vec<RankedCrop>,
}

impl PredictionResult {
    /// Label with its first letter capitalized.
    pub fn display_label(&self) -> String {
        capitalize(&self.label)
    }

    pub fn has_ranking(&self) -> bool {
        !self.ranking.is_empty()
    }
}

/// Why a prediction request produced no result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// N, P or K left at zero. Carries the empty fields in canonical order.
    #[error("incomplete input: nitrogen, phosphorus and potassium must all be filled in")]
    IncompleteInput { missing: Vec<SoilParameter> },

    /// Plausibility warnings were raised; every one is carried.
    #[error("implausible input: {0}")]
    ImplausibleInput(ValidationReport),

    /// Model artifacts failed to load; permanent for the process.
    #[error("prediction unavailable: model artifacts failed to load")]
    ModelUnavailable,

    /// The scaler or classifier failed on this request only.
    #[error("inference failed: {0}")]
    InferenceFailure(String),
}

impl From<InferenceError> for PredictionError {
    fn from(err: InferenceError) -> Self {
        PredictionError::InferenceFailure(err.to_string())
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_uppercases_first_and_lowercases_rest() {
        assert_eq!(capitalize("rice"), "Rice");
        assert_eq!(capitalize("RICE"), "Rice");
        assert_eq!(capitalize("kidneyBeans"), "Kidneybeans");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn inference_errors_become_failures_with_message() {
        let err: PredictionError = InferenceError::UnknownClass {
            index: 9,
            classes: 3,
        }
        .into();
        assert_eq!(
            err,
            PredictionError::InferenceFailure("class index 9 out of range (3 classes)".to_string())
        );
    }

    #[test]
    fn result_serializes_for_display_layers() {
        let result = PredictionResult {
            label: "rice".to_string(),
            category: "cereal".to_string(),
            ranking: vec![RankedCrop {
                label: "rice".to_string(),
                confidence: 74.9,
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "rice");
        assert_eq!(json["ranking"][0]["confidence"], 74.9);
        assert_eq!(result.display_label(), "Rice");
        assert!(result.has_ranking());
    }
}
