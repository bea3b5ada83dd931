// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! File-backed persistence: uploaded images, captions and embedding records
//!
//! All stores assume a single writer process. Within one process the
//! caption and embedding stores serialize their writes behind a mutex.

pub mod captions;
pub mod embedding_store;
pub mod uploads;

use thiserror::Error;

pub use captions::CaptionStore;
pub use embedding_store::{EmbeddingStore, EMBEDDING_EXTENSION};
pub use uploads::UploadStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}
