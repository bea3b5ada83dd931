// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caption map persisted as a flat JSON object (`filename -> caption`)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::StorageError;

/// File name of the caption map inside the data directory
pub const CAPTIONS_FILE: &str = "captions.json";

#[derive(Debug)]
pub struct CaptionStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl CaptionStore {
    /// Open the store in `data_dir`, creating the directory if needed
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(data_dir.as_ref()).await?;
        Ok(Self {
            path: data_dir.as_ref().join(CAPTIONS_FILE),
            write_lock: Mutex::new(()),
        })
    }

    /// Insert or replace the caption for `filename`
    pub async fn upsert(&self, filename: &str, caption: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut captions = self.read().await?;
        captions.insert(filename.to_string(), caption.to_string());

        let json = serde_json::to_vec_pretty(&captions)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Caption stored for {} ({} total)", filename, captions.len());
        Ok(())
    }

    pub async fn get(&self, filename: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read().await?.remove(filename))
    }

    pub async fn all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        self.read().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}
