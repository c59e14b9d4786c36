//! Filesystem loading of model artifacts.
//!
//! All four artifacts are JSON documents produced by the training pipeline. Loading
//! is all-or-nothing: either a fully checked [`ModelBundle`] comes back, or a single
//! [`LoadError`] naming the artifact that failed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use cropwise_ai::{
    ArtifactKind, CategoryTable, ClassifierArtifact, FeatureScaler, LabelDecoder, ModelBundle,
};

pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const LABELS_FILE: &str = "label_encoder.json";
pub const CATEGORIES_FILE: &str = "crop_categories.json";

/// Where each artifact lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub scaler: PathBuf,
    pub labels: PathBuf,
    pub categories: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join(CLASSIFIER_FILE),
            scaler: dir.join(SCALER_FILE),
            labels: dir.join(LABELS_FILE),
            categories: dir.join(CATEGORIES_FILE),
        }
    }

    pub fn path(&self, artifact: ArtifactKind) -> &Path {
        match artifact {
            ArtifactKind::Classifier => &self.classifier,
            ArtifactKind::Scaler => &self.scaler,
            ArtifactKind::LabelDecoder => &self.labels,
            ArtifactKind::Categories => &self.categories,
        }
    }
}

/// What went wrong with one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("file not found")]
    Missing,

    #[error("unreadable: {0}")]
    Unreadable(String),

    #[error("corrupt artifact: {0}")]
    Corrupt(String),

    #[error("incompatible schema: {0}")]
    IncompatibleSchema(String),
}

/// Loading the model bundle failed; no partial bundle exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {artifact} from {}: {failure}", .path.display())]
pub struct LoadError {
    pub artifact: ArtifactKind,
    pub path: PathBuf,
    pub failure: LoadFailure,
}

impl LoadError {
    pub fn new(artifact: ArtifactKind, path: impl Into<PathBuf>, failure: LoadFailure) -> Self {
        Self {
            artifact,
            path: path.into(),
            failure,
        }
    }
}

/// Read, parse and cross-check all artifacts.
pub fn load(paths: &ArtifactPaths) -> Result<ModelBundle, LoadError> {
    let classifier: ClassifierArtifact = read_artifact(ArtifactKind::Classifier, &paths.classifier)?;
    let scaler: FeatureScaler = read_artifact(ArtifactKind::Scaler, &paths.scaler)?;
    let labels: LabelDecoder = read_artifact(ArtifactKind::LabelDecoder, &paths.labels)?;
    let categories: CategoryTable = read_artifact(ArtifactKind::Categories, &paths.categories)?;

    let bundle = ModelBundle::from_artifacts(classifier, scaler, labels, categories).map_err(
        |e| {
            LoadError::new(
                e.artifact,
                paths.path(e.artifact),
                LoadFailure::IncompatibleSchema(e.reason),
            )
        },
    )?;

    info!(
        classes = bundle.labels().len(),
        categories = bundle.categories().len(),
        ranking = bundle.supports_ranking(),
        "model artifacts loaded"
    );
    Ok(bundle)
}

fn read_artifact<T: DeserializeOwned>(artifact: ArtifactKind, path: &Path) -> Result<T, LoadError> {
    debug!(%artifact, path = %path.display(), "reading artifact");

    let bytes = fs::read(path).map_err(|e| {
        let failure = match e.kind() {
            io::ErrorKind::NotFound => LoadFailure::Missing,
            _ => LoadFailure::Unreadable(e.to_string()),
        };
        LoadError::new(artifact, path, failure)
    })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| LoadError::new(artifact, path, LoadFailure::Corrupt(e.to_string())))
}
