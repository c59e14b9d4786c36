//! Prediction orchestration: gating policy, then scale → classify → decode → rank.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use cropwise_core::{RequestId, SoilSample};

use crate::bundle::ModelBundle;
use crate::classifier::InferenceError;
use crate::labels::LabelDecoder;
use crate::result::{PredictionError, PredictionResult, RankedCrop};

/// Upper bound on the confidence ranking length.
pub const MAX_RANKED: usize = 3;

/// Predict a crop for `sample` with the default ranking length.
///
/// Gating, first match wins:
/// 1. N, P or K exactly zero → [`PredictionError::IncompleteInput`]
/// 2. any plausibility warning → [`PredictionError::ImplausibleInput`]
/// 3. no bundle → [`PredictionError::ModelUnavailable`]
///
/// Otherwise runs inference; failures surface as [`PredictionError::InferenceFailure`].
pub fn predict(
    sample: &SoilSample,
    bundle: Option<&ModelBundle>,
) -> Result<PredictionResult, PredictionError> {
    predict_top_k(sample, bundle, MAX_RANKED)
}

/// Like [`predict`], with the ranking capped at `min(top_k, MAX_RANKED)` entries.
pub fn predict_top_k(
    sample: &SoilSample,
    bundle: Option<&ModelBundle>,
    top_k: usize,
) -> Result<PredictionResult, PredictionError> {
    let missing = sample.missing_macronutrients();
    if !missing.is_empty() {
        return Err(PredictionError::IncompleteInput { missing });
    }

    let report = sample.validate();
    if !report.is_empty() {
        return Err(PredictionError::ImplausibleInput(report));
    }

    let Some(bundle) = bundle else {
        return Err(PredictionError::ModelUnavailable);
    };

    Ok(infer(sample, bundle, top_k.min(MAX_RANKED))?)
}

fn infer(
    sample: &SoilSample,
    bundle: &ModelBundle,
    top_k: usize,
) -> Result<PredictionResult, InferenceError> {
    let scaled = bundle.scaler().transform(&sample.features())?;
    let classifier = bundle.classifier();

    let class = classifier.predict_top(&scaled)?;
    let label = bundle.labels().decode(class)?.to_string();
    let category = bundle.categories().lookup(&label).to_string();

    let ranking = match classifier.as_probabilistic() {
        Some(model) => rank(&model.predict_distribution(&scaled)?, bundle.labels(), top_k)?,
        None => Vec::new(),
    };

    Ok(PredictionResult {
        label,
        category,
        ranking,
    })
}

/// Highest probabilities first; ties keep ascending class order.
fn rank(
    probabilities: &[f64],
    labels: &LabelDecoder,
    top_k: usize,
) -> Result<Vec<RankedCrop>, InferenceError> {
    if probabilities.len() != labels.len() {
        return Err(InferenceError::DistributionWidth {
            expected: labels.len(),
            actual: probabilities.len(),
        });
    }
    if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
        return Err(InferenceError::NonFinite {
            stage: "probability",
            index,
        });
    }

    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| {
        probabilities[b]
            .total_cmp(&probabilities[a])
            .then(a.cmp(&b))
    });

    order
        .into_iter()
        .take(top_k)
        .map(|class| {
            Ok(RankedCrop {
                label: labels.decode(class)?.to_string(),
                confidence: (probabilities[class] * 100.0).clamp(0.0, 100.0),
            })
        })
        .collect()
}

/// Request-facing predictor holding the process-wide bundle.
///
/// Whether the bundle loaded is decided once, at construction. A predictor built
/// from a failed load answers every request with
/// [`PredictionError::ModelUnavailable`] and never retries. Cloning shares the
/// same bundle.
#[derive(Debug, Clone)]
pub struct CropPredictor {
    bundle: Option<Arc<ModelBundle>>,
    top_k: usize,
}

impl CropPredictor {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self {
            bundle: Some(bundle),
            top_k: MAX_RANKED,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            bundle: None,
            top_k: MAX_RANKED,
        }
    }

    /// Build from the outcome of a load attempt, logging a failure once.
    pub fn from_load<E>(outcome: Result<Arc<ModelBundle>, E>) -> Self
    where
        E: core::fmt::Display,
    {
        match outcome {
            Ok(bundle) => {
                info!(
                    classes = bundle.labels().len(),
                    ranking = bundle.supports_ranking(),
                    "model bundle ready"
                );
                Self::new(bundle)
            }
            Err(e) => {
                error!(error = %e, "model artifacts failed to load; predictions disabled");
                Self::unavailable()
            }
        }
    }

    /// Ranking length, clamped to `1..=MAX_RANKED`.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.clamp(1, MAX_RANKED);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn is_available(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn bundle(&self) -> Option<&Arc<ModelBundle>> {
        self.bundle.as_ref()
    }

    pub fn predict(&self, sample: &SoilSample) -> Result<PredictionResult, PredictionError> {
        let request_id = RequestId::new();
        let span = tracing::info_span!("predict", request = %request_id);
        let _enter = span.enter();

        let outcome = predict_top_k(sample, self.bundle.as_deref(), self.top_k);
        match &outcome {
            Ok(result) => info!(
                label = %result.label,
                category = %result.category,
                ranked = result.ranking.len(),
                "prediction succeeded"
            ),
            Err(PredictionError::InferenceFailure(msg)) => {
                warn!(error = %msg, "inference failed")
            }
            Err(e) => debug!(reason = %e, "prediction rejected"),
        }
        outcome
    }
}
