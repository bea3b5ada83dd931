// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sequentially numbered embedding records
//!
//! Records are named `embedding_NNN.bin` (at least three digits). The next
//! number is found by scanning the directory once on open; after that the
//! store owns the counter. Another process writing the same directory can
//! still collide with it.

use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::StorageError;

/// File extension of persisted embedding records
pub const EMBEDDING_EXTENSION: &str = "bin";

const RECORD_PREFIX: &str = "embedding_";

/// On-disk form of one embedding matrix
#[derive(Debug, Serialize, Deserialize)]
struct StoredMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

#[derive(Debug)]
pub struct EmbeddingStore {
    dir: PathBuf,
    /// Sequence number handed to the next `save`
    next_sequence: Mutex<u64>,
}

impl EmbeddingStore {
    /// Open the store, creating the directory and picking up existing numbering
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let max = scan_max_sequence(&dir).await?;
        info!(
            "Embedding store at {} (highest existing record: {})",
            dir.display(),
            max
        );

        Ok(Self {
            dir,
            next_sequence: Mutex::new(max + 1),
        })
    }

    /// Persist `matrix` under the next sequence number and return its record name
    pub async fn save(&self, matrix: &Array2<f32>) -> Result<String, StorageError> {
        let mut next = self.next_sequence.lock().await;

        let name = record_name(*next);
        let stored = StoredMatrix {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
            values: matrix.iter().copied().collect(),
        };
        let bytes = bincode::serialize(&stored)?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        *next += 1;
        debug!("Saved {} ({}x{})", name, stored.rows, stored.cols);
        Ok(name)
    }

    /// Load a record by name; `None` if no such record exists
    ///
    /// Names that are not plain file names are treated as missing.
    pub async fn load(&self, name: &str) -> Result<Option<Array2<f32>>, StorageError> {
        if !is_plain_file_name(name) {
            return Ok(None);
        }

        let bytes = match tokio::fs::read(self.dir.join(name)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredMatrix = bincode::deserialize(&bytes)?;
        let matrix = Array2::from_shape_vec((stored.rows, stored.cols), stored.values)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(Some(matrix))
    }

    /// Sequence number the next `save` will use
    pub async fn next_sequence(&self) -> u64 {
        *self.next_sequence.lock().await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Record name for a sequence number, zero-padded to three digits
pub fn record_name(sequence: u64) -> String {
    format!("{}{:03}.{}", RECORD_PREFIX, sequence, EMBEDDING_EXTENSION)
}

/// Highest sequence number among records in `dir` (0 when there are none)
pub async fn scan_max_sequence(dir: &Path) -> Result<u64, StorageError> {
    let pattern = Regex::new(&format!(
        r"^{}(\d+)\.{}$",
        RECORD_PREFIX, EMBEDDING_EXTENSION
    ))
    .map_err(|e| StorageError::InvalidPath(e.to_string()))?;

    let mut max = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(seq) = pattern
            .captures(name)
            .and_then(|c| c[1].parse::<u64>().ok())
        {
            max = max.max(seq);
        }
    }
    Ok(max)
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}
