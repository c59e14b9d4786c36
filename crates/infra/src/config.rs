//! Configuration loading from the process environment.

use std::path::PathBuf;

use tracing::{debug, warn};

use cropwise_ai::MAX_RANKED;

use crate::artifacts::ArtifactPaths;

pub const ARTIFACT_DIR_VAR: &str = "CROPWISE_ARTIFACT_DIR";
pub const CLASSIFIER_PATH_VAR: &str = "CROPWISE_CLASSIFIER_PATH";
pub const SCALER_PATH_VAR: &str = "CROPWISE_SCALER_PATH";
pub const LABELS_PATH_VAR: &str = "CROPWISE_LABELS_PATH";
pub const CATEGORIES_PATH_VAR: &str = "CROPWISE_CATEGORIES_PATH";
pub const TOP_K_VAR: &str = "CROPWISE_TOP_K";

pub const DEFAULT_ARTIFACT_DIR: &str = "./artifacts";

/// Snapshot of configuration values consumed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub artifacts: ArtifactPaths,
    /// Confidence ranking length, `1..=MAX_RANKED`.
    pub top_k: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactPaths::in_dir(DEFAULT_ARTIFACT_DIR),
            top_k: MAX_RANKED,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                debug!(key, "not set; using default");
            }
            value
        };

        let dir = get(ARTIFACT_DIR_VAR).unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string());
        let mut artifacts = ArtifactPaths::in_dir(&dir);
        for (key, slot) in [
            (CLASSIFIER_PATH_VAR, &mut artifacts.classifier),
            (SCALER_PATH_VAR, &mut artifacts.scaler),
            (LABELS_PATH_VAR, &mut artifacts.labels),
            (CATEGORIES_PATH_VAR, &mut artifacts.categories),
        ] {
            if let Some(path) = get(key) {
                *slot = PathBuf::from(path);
            }
        }

        let top_k = match get(TOP_K_VAR) {
            None => MAX_RANKED,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(k) => k.clamp(1, MAX_RANKED),
                Err(e) => {
                    warn!(key = TOP_K_VAR, value = %raw, error = %e, "invalid value; using default");
                    MAX_RANKED
                }
            },
        };

        Self { artifacts, top_k }
    }
}
