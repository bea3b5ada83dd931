// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Few-shot classification: labeled example store and k-NN model

pub mod knn;
pub mod store;

pub use knn::{KnnClassifier, KnnError, DEFAULT_NEIGHBORS};
pub use store::{ExampleStore, LabeledExample};
