// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Uploaded image store
//!
//! Files are written verbatim under the upload directory, keyed by the
//! client-supplied file name. Re-uploading a name overwrites it.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::StorageError;

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Storage key for a client-supplied name: its final path component
    pub fn storage_key(name: &str) -> Result<String, StorageError> {
        let key = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StorageError::InvalidPath(name.to_string()))?;
        Ok(key.to_string())
    }

    /// Write `bytes` under `name`, returning the key it was stored as
    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let key = Self::storage_key(name)?;
        let path = self.dir.join(&key);
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        Ok(key)
    }

    /// Path of a stored upload; `name` must already be a plain key
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let key = Self::storage_key(name)?;
        if key != name {
            return Err(StorageError::InvalidPath(name.to_string()));
        }
        Ok(self.dir.join(key))
    }

    /// Path of a stored upload, failing with `NotFound` if it does not exist
    pub async fn existing(&self, name: &str) -> Result<PathBuf, StorageError> {
        let path = self.resolve(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(StorageError::NotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all regular files in the store, sorted
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
