// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! k-nearest-neighbor classifier
//!
//! Brute-force Euclidean k-NN with uniform weights. The model is rebuilt
//! from scratch on every `fit`; there is no incremental update.

use ndarray::{Array2, ArrayView1, Axis};
use std::collections::BTreeMap;
use thiserror::Error;

/// Number of neighbors used by the few-shot classifier
pub const DEFAULT_NEIGHBORS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum KnnError {
    #[error("Cannot fit a classifier without examples")]
    NoExamples,

    #[error("k must be at least 1")]
    InvalidK,

    #[error("Feature count mismatch: {features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Dimension mismatch: expected {expected}D, got {actual}D")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Fitted k-NN model
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    /// One row per training example
    features: Array2<f32>,
    labels: Vec<String>,
}

impl KnnClassifier {
    /// Fit over `features` (rows) and their `labels`
    ///
    /// All rows must have the same length.
    pub fn fit(k: usize, features: &[Vec<f32>], labels: &[String]) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK);
        }
        if features.is_empty() {
            return Err(KnnError::NoExamples);
        }
        if features.len() != labels.len() {
            return Err(KnnError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }

        let dim = features[0].len();
        let mut flat = Vec::with_capacity(features.len() * dim);
        for row in features {
            if row.len() != dim {
                return Err(KnnError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }

        let features = Array2::from_shape_vec((labels.len(), dim), flat).map_err(|_| {
            KnnError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            }
        })?;

        Ok(Self {
            k,
            features,
            labels: labels.to_vec(),
        })
    }

    /// Predict the label of `query` by majority vote among the nearest examples
    ///
    /// Uses `min(k, n_examples)` neighbors. Ties between labels go to the
    /// lexicographically smallest one.
    pub fn predict(&self, query: &[f32]) -> Result<&str, KnnError> {
        if query.len() != self.dimension() {
            return Err(KnnError::DimensionMismatch {
                expected: self.dimension(),
                actual: query.len(),
            });
        }

        let query = ArrayView1::from(query);
        let mut distances: Vec<(usize, f32)> = self
            .features
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(i, row)| {
                let diff = &row - &query;
                (i, diff.dot(&diff))
            })
            .collect();

        // Stable: equal distances keep insertion order
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut votes: BTreeMap<&str, usize> = BTreeMap::new();
        for &(i, _) in distances.iter().take(self.effective_k()) {
            *votes.entry(self.labels[i].as_str()).or_insert(0) += 1;
        }

        // BTreeMap iterates in label order, so the first maximum wins ties
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in votes {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((label, count));
            }
        }

        best.map(|(label, _)| label).ok_or(KnnError::NoExamples)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Neighbors actually consulted per prediction
    pub fn effective_k(&self) -> usize {
        self.k.min(self.labels.len())
    }

    pub fn dimension(&self) -> usize {
        self.features.ncols()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
