// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding store numbering and persistence across reopen

use fabstir_vision_lab::storage::{EmbeddingStore, EMBEDDING_EXTENSION};
use ndarray::{array, Array2};

#[tokio::test]
async fn test_numbering_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let store = EmbeddingStore::open(dir.path()).await.unwrap();
    assert_eq!(store.save(&array![[1.0f32]]).await.unwrap(), "embedding_001.bin");
    assert_eq!(store.save(&array![[2.0f32]]).await.unwrap(), "embedding_002.bin");
    drop(store);

    let reopened = EmbeddingStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.next_sequence().await, 3);
    assert_eq!(
        reopened.save(&array![[3.0f32]]).await.unwrap(),
        "embedding_003.bin"
    );
    assert_eq!(
        reopened.load("embedding_001.bin").await.unwrap(),
        Some(array![[1.0f32]])
    );
}

#[tokio::test]
async fn test_numbering_grows_past_three_digits() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("embedding_999.bin"), b"")
        .await
        .unwrap();

    let store = EmbeddingStore::open(dir.path()).await.unwrap();
    assert_eq!(
        store.save(&array![[0.5f32]]).await.unwrap(),
        format!("embedding_1000.{}", EMBEDDING_EXTENSION)
    );
}

#[tokio::test]
async fn test_concurrent_saves_get_distinct_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = std::sync::Arc::new(EmbeddingStore::open(dir.path()).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let matrix: Array2<f32> = Array2::from_elem((1, 4), i as f32);
            store.save(&matrix).await.unwrap()
        }));
    }

    let mut names = Vec::new();
    for handle in handles {
        names.push(handle.await.unwrap());
    }
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 8);
    assert_eq!(store.next_sequence().await, 9);
}

#[tokio::test]
async fn test_wide_matrix_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = EmbeddingStore::open(dir.path()).await.unwrap();

    let values: Vec<f32> = (0..1024).map(|i| (i as f32).sin()).collect();
    let matrix = Array2::from_shape_vec((1, 1024), values).unwrap();

    let name = store.save(&matrix).await.unwrap();
    assert_eq!(store.load(&name).await.unwrap(), Some(matrix));
}
