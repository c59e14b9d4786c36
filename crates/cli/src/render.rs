//! Plain-text views of prediction outcomes.

use std::fmt::Write;

use cropwise_ai::{PredictionError, PredictionResult};
use cropwise_core::DomainError;

pub const INCOMPLETE: &str = "Please fill in all soil parameters.";
pub const IMPLAUSIBLE: &str = "Implausible input detected!";
pub const REALISTIC_HINT: &str = "Please enter more realistic values to get an accurate prediction.";
pub const UNAVAILABLE: &str = "Prediction unavailable: the model failed to load.";

pub fn render(outcome: &Result<PredictionResult, PredictionError>) -> String {
    match outcome {
        Ok(result) => render_result(result),
        Err(e) => render_error(e),
    }
}

pub fn render_result(result: &PredictionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recommended crop: {}", result.display_label());
    let _ = writeln!(out, "Category: {}", result.category);

    if result.has_ranking() {
        let _ = writeln!(out, "\nTop recommendations:");
        for entry in &result.ranking {
            let _ = writeln!(
                out,
                "  - {} with {:.2}% confidence",
                entry.display_label(),
                entry.confidence
            );
        }
    }
    out
}

pub fn render_error(err: &PredictionError) -> String {
    let mut out = String::new();
    match err {
        PredictionError::IncompleteInput { missing } => {
            let names: Vec<&str> = missing.iter().map(|p| p.label()).collect();
            let _ = writeln!(out, "{INCOMPLETE} Missing: {}.", names.join(", "));
        }
        PredictionError::ImplausibleInput(report) => {
            let _ = writeln!(out, "{IMPLAUSIBLE}");
            for warning in report {
                let _ = writeln!(out, "  -> {warning}");
            }
            let _ = writeln!(out, "{REALISTIC_HINT}");
        }
        PredictionError::ModelUnavailable => {
            let _ = writeln!(out, "{UNAVAILABLE}");
        }
        PredictionError::InferenceFailure(reason) => {
            let _ = writeln!(out, "Prediction failed for this input: {reason}");
        }
    }
    out
}

/// Form values the sample constructor refused (out of bounds, not finite).
pub fn render_form_error(err: &DomainError) -> String {
    format!("Invalid input: {err}\n")
}
