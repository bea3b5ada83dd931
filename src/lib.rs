// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod storage;
pub mod version;
pub mod vision;

pub use api::{create_classifier_app, create_embedder_app, ApiError, ClassifierState, EmbedderState};
pub use classifier::{ExampleStore, KnnClassifier};
pub use storage::{CaptionStore, EmbeddingStore, UploadStore};
pub use vision::{ImageEncoder, JointEmbedding, JointEncoder};
