//! Process-wide, load-once model bundle.

use std::sync::{Arc, OnceLock};

use tracing::error;

use cropwise_ai::{CropPredictor, ModelBundle};

use crate::artifacts::{ArtifactPaths, LoadError, load};

/// Lazily loads the model bundle on first use and memoizes the outcome.
///
/// A failed load is remembered too: later calls return the same error without
/// touching the filesystem again, even if the files appear in the meantime.
#[derive(Debug)]
pub struct BundleCell {
    paths: ArtifactPaths,
    cell: OnceLock<Result<Arc<ModelBundle>, LoadError>>,
}

impl BundleCell {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            cell: OnceLock::new(),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Whether a load has been attempted yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<ModelBundle>, LoadError> {
        self.cell
            .get_or_init(|| {
                let outcome = load(&self.paths).map(Arc::new);
                if let Err(e) = &outcome {
                    error!(error = %e, "model artifacts failed to load; predictions disabled");
                }
                outcome
            })
            .clone()
    }

    /// Predictor sharing this cell's bundle (loading it if needed), ranking at
    /// most `top_k` crops (clamped to `1..=MAX_RANKED`).
    pub fn predictor(&self, top_k: usize) -> CropPredictor {
        let predictor = match self.get() {
            Ok(bundle) => CropPredictor::new(bundle),
            Err(_) => CropPredictor::unavailable(),
        };
        predictor.with_top_k(top_k)
    }
}
