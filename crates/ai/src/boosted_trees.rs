use serde::{Deserialize, Serialize};

use crate::classifier::{
    Classifier, InferenceError, ProbabilisticClassifier, argmax, ensure_finite, ensure_width,
    softmax,
};

/// Gradient-boosted decision trees for multi-class classification.
///
/// Model:
/// - every tree belongs to one class and contributes its leaf value to that
///   class's raw score
/// - raw score = `base_scores[c]` (or 0) + Σ leaves of class `c` trees
/// - top class = argmax of raw scores; probabilities = softmax of raw scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedTrees {
    pub n_features: usize,
    pub n_classes: usize,
    #[serde(default)]
    pub base_scores: Vec<f64>,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub class: usize,
    /// Root at index 0. Children always sit after their parent.
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Tree {
    fn check(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.class >= n_classes {
            return Err(format!(
                "tree class {} out of range ({n_classes} classes)",
                self.class
            ));
        }
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!("node {i} splits on unknown feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {i} points to invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {i} has a non-finite value"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    fn evaluate(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let mut idx = 0;
        // Forward-only children bound the walk by the node count.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).copied().ok_or_else(|| {
                        InferenceError::MalformedModel(format!("unknown feature {feature}"))
                    })?;
                    idx = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(InferenceError::MalformedModel(format!(
                        "missing tree node {idx}"
                    )));
                }
            }
        }
        Err(InferenceError::MalformedModel(
            "tree walk did not reach a leaf".to_string(),
        ))
    }
}

impl BoostedTrees {
    pub fn check(&self) -> Result<(), String> {
        if self.n_features == 0 || self.n_classes == 0 {
            return Err("n_features and n_classes must be positive".to_string());
        }
        if !self.base_scores.is_empty() && self.base_scores.len() != self.n_classes {
            return Err(format!(
                "{} base scores for {} classes",
                self.base_scores.len(),
                self.n_classes
            ));
        }
        if self.base_scores.iter().any(|v| !v.is_finite()) {
            return Err("base scores contain non-finite values".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features, self.n_classes)
                .map_err(|reason| format!("tree {i}: {reason}"))?;
        }
        Ok(())
    }

    fn raw_scores(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        ensure_width(features, self.n_features)?;
        let mut scores = if self.base_scores.is_empty() {
            vec![0.0; self.n_classes]
        } else {
            self.base_scores.clone()
        };
        for tree in &self.trees {
            let leaf = tree.evaluate(features)?;
            let slot = scores.get_mut(tree.class).ok_or(InferenceError::UnknownClass {
                index: tree.class,
                classes: self.n_classes,
            })?;
            *slot += leaf;
        }
        Ok(scores)
    }
}

impl Classifier for BoostedTrees {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_top(&self, features: &[f64]) -> Result<usize, InferenceError> {
        argmax(&self.raw_scores(features)?)
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        Some(self)
    }
}

impl ProbabilisticClassifier for BoostedTrees {
    fn predict_distribution(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let scores = self.raw_scores(features)?;
        ensure_finite(&scores, "raw score")?;
        Ok(softmax(&scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(class: usize, feature: usize, threshold: f64, left: f64, right: f64) -> Tree {
        Tree {
            class,
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: left },
                TreeNode::Leaf { value: right },
            ],
        }
    }

    fn ensemble() -> BoostedTrees {
        BoostedTrees {
            n_features: 2,
            n_classes: 2,
            base_scores: vec![0.1, 0.0],
            trees: vec![stump(0, 0, 0.5, 1.0, -1.0), stump(1, 1, 0.5, -1.0, 1.0)],
        }
    }

    #[test]
    fn leaves_accumulate_per_class() {
        let model = ensemble();
        model.check().unwrap();

        assert_eq!(model.raw_scores(&[0.0, 0.0]).unwrap(), vec![1.1, -1.0]);
        assert_eq!(model.predict_top(&[0.0, 0.0]).unwrap(), 0);
        assert_eq!(model.predict_top(&[1.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let model = ensemble();
        assert_eq!(model.raw_scores(&[0.5, 0.5]).unwrap(), vec![1.1, -1.0]);
    }

    #[test]
    fn distribution_is_softmax_of_raw_scores() {
        let model = ensemble();
        let p = model.predict_distribution(&[1.0, 1.0]).unwrap();
        assert!(p[1] > p[0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn check_rejects_backward_child_pointer() {
        let mut model = ensemble();
        model.trees[0].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 0.5,
            left: 0,
            right: 2,
        };
        let err = model.check().unwrap_err();
        assert_eq!(err, "tree 0: node 0 points to invalid child 0");
    }

    #[test]
    fn check_rejects_unknown_feature_and_class() {
        let mut model = ensemble();
        model.trees[1] = stump(1, 7, 0.5, 0.0, 0.0);
        assert!(model.check().unwrap_err().contains("unknown feature 7"));

        let mut model = ensemble();
        model.trees[1].class = 2;
        assert!(model.check().unwrap_err().contains("tree class 2 out of range"));
    }

    #[test]
    fn nodes_deserialize_from_tagged_json() {
        let json = r#"{
            "n_features": 1,
            "n_classes": 1,
            "trees": [{
                "class": 0,
                "nodes": [
                    {"type": "split", "feature": 0, "threshold": 1.0, "left": 1, "right": 2},
                    {"type": "leaf", "value": 0.25},
                    {"type": "leaf", "value": 0.75}
                ]
            }]
        }"#;
        let model: BoostedTrees = serde_json::from_str(json).unwrap();
        model.check().unwrap();
        assert!(model.base_scores.is_empty());
        assert_eq!(model.raw_scores(&[2.0]).unwrap(), vec![0.75]);
    }
}
