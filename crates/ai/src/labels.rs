use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::classifier::InferenceError;

/// Maps class indices produced by the classifier back to crop labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn decode(&self, index: usize) -> Result<&str, InferenceError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(InferenceError::UnknownClass {
                index,
                classes: self.classes.len(),
            })
    }

    pub fn check(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("label decoder has no classes".to_string());
        }
        let mut seen = HashSet::new();
        for (i, label) in self.classes.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(format!("class {i} has a blank label"));
            }
            if !seen.insert(label.as_str()) {
                return Err(format!("duplicate class label {label:?}"));
            }
        }
        Ok(())
    }
}
