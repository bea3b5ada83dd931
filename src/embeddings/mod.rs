// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Joint image/caption embedding assembly
//!
//! Each half of a [`JointEmbedding`] is L2-normalized on its own and the two
//! are concatenated into a single `1 x (Di + Dt)` matrix, which is what gets
//! persisted and returned to clients.

use anyhow::{anyhow, Result};
use ndarray::Array2;

use crate::vision::JointEmbedding;

/// Scale `vector` to unit length in place; zero vectors are left untouched
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Normalize both halves and concatenate them along the feature axis
pub fn combine(embedding: JointEmbedding) -> Result<Array2<f32>> {
    let JointEmbedding {
        mut image,
        mut text,
    } = embedding;

    if image.is_empty() || text.is_empty() {
        return Err(anyhow!(
            "Empty embedding from encoder (image: {}, text: {})",
            image.len(),
            text.len()
        ));
    }

    l2_normalize(&mut image);
    l2_normalize(&mut text);

    let mut combined = image;
    combined.extend_from_slice(&text);
    let cols = combined.len();
    Array2::from_shape_vec((1, cols), combined).map_err(|e| anyhow!(e))
}

/// Nested rows for JSON responses
pub fn to_rows(matrix: &Array2<f32>) -> Vec<Vec<f32>> {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}
