use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, InferenceError, check_matrix, ensure_width};

/// Nearest-centroid classifier (Euclidean distance).
///
/// Has no probability output, so predictions made with it carry no ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroid {
    /// One row per class, one column per feature.
    pub centroids: Vec<Vec<f64>>,
}

impl NearestCentroid {
    pub fn new(centroids: Vec<Vec<f64>>) -> Self {
        Self { centroids }
    }

    pub fn check(&self) -> Result<(), String> {
        check_matrix(&self.centroids, "centroids").map(|_| ())
    }
}

impl Classifier for NearestCentroid {
    fn n_features(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    fn n_classes(&self) -> usize {
        self.centroids.len()
    }

    fn predict_top(&self, features: &[f64]) -> Result<usize, InferenceError> {
        ensure_width(features, self.n_features())?;

        let mut best: Option<(usize, f64)> = None;
        for (class, centroid) in self.centroids.iter().enumerate() {
            let dist: f64 = centroid
                .iter()
                .zip(features)
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            if !dist.is_finite() {
                return Err(InferenceError::NonFinite {
                    stage: "distance",
                    index: class,
                });
            }
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((class, dist));
            }
        }
        best.map(|(class, _)| class).ok_or(InferenceError::NoScores)
    }
}
