use serde::{Deserialize, Serialize};
use thiserror::Error;

use cropwise_core::FEATURE_COUNT;

use crate::category::CategoryTable;
use crate::classifier::{Classifier, ClassifierArtifact};
use crate::labels::LabelDecoder;
use crate::scaler::FeatureScaler;

/// The four pre-built inputs a bundle is assembled from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    LabelDecoder,
    Categories,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Classifier,
        ArtifactKind::Scaler,
        ArtifactKind::LabelDecoder,
        ArtifactKind::Categories,
    ];
}

impl core::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::LabelDecoder => "label decoder",
            ArtifactKind::Categories => "category table",
        })
    }
}

/// An artifact deserialized fine but cannot be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incompatible {artifact} artifact: {reason}")]
pub struct SchemaError {
    pub artifact: ArtifactKind,
    pub reason: String,
}

impl SchemaError {
    pub fn new(artifact: ArtifactKind, reason: impl Into<String>) -> Self {
        Self {
            artifact,
            reason: reason.into(),
        }
    }
}

/// Classifier, scaler, label decoder and category table, checked for mutual
/// compatibility.
///
/// Built once per process and shared read-only (typically behind an `Arc`);
/// nothing mutates it after construction.
#[derive(Debug)]
pub struct ModelBundle {
    classifier: Box<dyn Classifier>,
    scaler: FeatureScaler,
    labels: LabelDecoder,
    categories: CategoryTable,
}

impl ModelBundle {
    /// Assemble a bundle from a classifier implementation.
    ///
    /// Fails if the scaler or classifier width differs from the sample width, or if
    /// classifier and label decoder disagree on the number of classes.
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: FeatureScaler,
        labels: LabelDecoder,
        categories: CategoryTable,
    ) -> Result<Self, SchemaError> {
        scaler
            .check()
            .map_err(|reason| SchemaError::new(ArtifactKind::Scaler, reason))?;
        labels
            .check()
            .map_err(|reason| SchemaError::new(ArtifactKind::LabelDecoder, reason))?;

        if scaler.n_features() != FEATURE_COUNT {
            return Err(SchemaError::new(
                ArtifactKind::Scaler,
                format!(
                    "scaler covers {} features, samples carry {FEATURE_COUNT}",
                    scaler.n_features()
                ),
            ));
        }
        if classifier.n_features() != FEATURE_COUNT {
            return Err(SchemaError::new(
                ArtifactKind::Classifier,
                format!(
                    "classifier expects {} features, samples carry {FEATURE_COUNT}",
                    classifier.n_features()
                ),
            ));
        }
        if classifier.n_classes() != labels.len() {
            return Err(SchemaError::new(
                ArtifactKind::Classifier,
                format!(
                    "classifier has {} classes but the label decoder has {}",
                    classifier.n_classes(),
                    labels.len()
                ),
            ));
        }

        Ok(Self {
            classifier,
            scaler,
            labels,
            categories,
        })
    }

    /// Assemble a bundle from a serialized classifier, checking its structure first.
    pub fn from_artifacts(
        classifier: ClassifierArtifact,
        scaler: FeatureScaler,
        labels: LabelDecoder,
        categories: CategoryTable,
    ) -> Result<Self, SchemaError> {
        classifier
            .check()
            .map_err(|reason| SchemaError::new(ArtifactKind::Classifier, reason))?;
        Self::new(classifier.into_classifier(), scaler, labels, categories)
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn labels(&self) -> &LabelDecoder {
        &self.labels
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Whether predictions from this bundle carry a confidence ranking.
    pub fn supports_ranking(&self) -> bool {
        self.classifier.as_probabilistic().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nearest_centroid::NearestCentroid;
    use crate::softmax_regression::SoftmaxRegression;

    fn scaler() -> FeatureScaler {
        FeatureScaler::standard(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT])
    }

    fn regression(classes: usize) -> SoftmaxRegression {
        SoftmaxRegression::new(
            vec![vec![0.1; FEATURE_COUNT]; classes],
            vec![0.0; classes],
        )
    }

    #[test]
    fn assembles_compatible_artifacts() {
        let bundle = ModelBundle::new(
            Box::new(regression(2)),
            scaler(),
            LabelDecoder::new(["maize", "rice"]),
            CategoryTable::new(),
        )
        .unwrap();

        assert_eq!(bundle.labels().len(), 2);
        assert!(bundle.supports_ranking());
    }

    #[test]
    fn class_count_mismatch_blames_classifier() {
        let err = ModelBundle::new(
            Box::new(regression(3)),
            scaler(),
            LabelDecoder::new(["maize", "rice"]),
            CategoryTable::new(),
        )
        .unwrap_err();

        assert_eq!(err.artifact, ArtifactKind::Classifier);
        assert_eq!(
            err.to_string(),
            "incompatible classifier artifact: classifier has 3 classes but the label decoder has 2"
        );
    }

    #[test]
    fn scaler_width_must_match_sample() {
        let err = ModelBundle::new(
            Box::new(regression(2)),
            FeatureScaler::standard(vec![0.0; 4], vec![1.0; 4]),
            LabelDecoder::new(["maize", "rice"]),
            CategoryTable::new(),
        )
        .unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Scaler);
    }

    #[test]
    fn from_artifacts_checks_classifier_structure() {
        let broken = ClassifierArtifact::NearestCentroid(NearestCentroid::new(vec![
            vec![0.0; FEATURE_COUNT],
            vec![0.0; 2],
        ]));
        let err = ModelBundle::from_artifacts(
            broken,
            scaler(),
            LabelDecoder::new(["maize", "rice"]),
            CategoryTable::new(),
        )
        .unwrap_err();

        assert_eq!(err.artifact, ArtifactKind::Classifier);
        assert!(err.reason.contains("row 1"));
    }

    #[test]
    fn centroid_bundle_has_no_ranking() {
        let model = NearestCentroid::new(vec![vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]]);
        let bundle = ModelBundle::new(
            Box::new(model),
            scaler(),
            LabelDecoder::new(["maize", "rice"]),
            CategoryTable::new(),
        )
        .unwrap();
        assert!(!bundle.supports_ranking());
    }
}
