// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Labeled example store for few-shot classification
//!
//! Examples live in memory for the lifetime of the process only. Each new
//! example triggers a full k-NN refit once at least two distinct labels
//! have been seen; before that no classifier exists.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use super::knn::{KnnClassifier, KnnError, DEFAULT_NEIGHBORS};

/// A feature vector with the label the user gave it
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    pub features: Vec<f32>,
    pub label: String,
}

/// Append-only example collection plus the classifier derived from it
#[derive(Debug)]
pub struct ExampleStore {
    k: usize,
    examples: Vec<LabeledExample>,
    classifier: Option<Arc<KnnClassifier>>,
}

impl Default for ExampleStore {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

impl ExampleStore {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            examples: Vec::new(),
            classifier: None,
        }
    }

    /// Append an example and refit when two or more classes are known
    ///
    /// Examples whose dimension differs from the stored ones are rejected
    /// without touching the store.
    pub fn add_example(&mut self, features: Vec<f32>, label: impl Into<String>) -> Result<(), KnnError> {
        if let Some(first) = self.examples.first() {
            if first.features.len() != features.len() {
                return Err(KnnError::DimensionMismatch {
                    expected: first.features.len(),
                    actual: features.len(),
                });
            }
        }

        self.examples.push(LabeledExample {
            features,
            label: label.into(),
        });

        if self.distinct_labels() < 2 {
            return Ok(());
        }

        let (features, labels): (Vec<Vec<f32>>, Vec<String>) = self
            .examples
            .iter()
            .map(|e| (e.features.clone(), e.label.clone()))
            .unzip();

        let classifier = KnnClassifier::fit(self.k, &features, &labels)?;
        info!(
            "Retrained k-NN classifier on {} examples ({} classes)",
            classifier.len(),
            self.distinct_labels()
        );
        self.classifier = Some(Arc::new(classifier));
        Ok(())
    }

    /// Current classifier, `None` until two classes have been labeled
    pub fn classifier(&self) -> Option<Arc<KnnClassifier>> {
        self.classifier.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }

    /// Distinct labels seen so far, sorted
    pub fn labels(&self) -> Vec<String> {
        self.examples
            .iter()
            .map(|e| e.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    fn distinct_labels(&self) -> usize {
        self.examples
            .iter()
            .map(|e| e.label.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}
