// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embed response types

use serde::{Deserialize, Serialize};

/// Payload returned when an embedding record does not exist
pub const EMBEDDING_NOT_FOUND: &str = "Embedding file not found";

/// Response to `POST /upload/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadImageResponse {
    pub status: String,
    pub filename: String,
}

/// Response to `POST /embed/`
///
/// # Example
/// ```json
/// {
///   "filename": "beach.jpg",
///   "embedding_file": "embedding_004.bin",
///   "matrix": [[0.01, -0.03, ...]]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    /// Image the embedding was computed for
    pub filename: String,
    /// Record name under the embeddings directory
    pub embedding_file: String,
    /// `1 x (Di + Dt)` matrix, image half first
    pub matrix: Vec<Vec<f32>>,
}

/// Response to `GET /embed_matrix/`
///
/// A missing record is a normal response carrying `error`, not an HTTP error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EmbedMatrixResponse {
    Found {
        filename: String,
        matrix: Vec<Vec<f32>>,
    },
    NotFound {
        error: String,
    },
}

impl EmbedMatrixResponse {
    pub fn not_found() -> Self {
        EmbedMatrixResponse::NotFound {
            error: EMBEDDING_NOT_FOUND.to_string(),
        }
    }
}
