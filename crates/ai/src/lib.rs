//! `cropwise-ai`
//!
//! **Responsibility:** crop inference boundary.
//!
//! - Model abstractions: classifier (with an optional probability capability),
//!   feature scaler, label decoder, category table.
//! - [`ModelBundle`]: the loaded, read-only set of those four, shared by every request.
//! - [`predict`] / [`CropPredictor`]: the gating policy and inference sequence.
//!
//! This crate never touches the filesystem; artifacts arrive already deserialized.

pub mod boosted_trees;
pub mod bundle;
pub mod category;
pub mod classifier;
pub mod labels;
pub mod nearest_centroid;
pub mod predictor;
pub mod result;
pub mod scaler;
pub mod softmax_regression;

pub use boosted_trees::{BoostedTrees, Tree, TreeNode};
pub use bundle::{ArtifactKind, ModelBundle, SchemaError};
pub use category::{CategoryTable, UNKNOWN_CATEGORY};
pub use classifier::{Classifier, ClassifierArtifact, InferenceError, ProbabilisticClassifier};
pub use labels::LabelDecoder;
pub use nearest_centroid::NearestCentroid;
pub use predictor::{CropPredictor, MAX_RANKED, predict, predict_top_k};
pub use result::{PredictionError, PredictionResult, RankedCrop, capitalize};
pub use scaler::FeatureScaler;
pub use softmax_regression::SoftmaxRegression;
