// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Both services read their settings from environment variables (a `.env`
//! file is loaded first by the binary). Unset variables fall back to the
//! defaults below.

use std::env;

use crate::classifier::DEFAULT_NEIGHBORS;
use crate::vision::{ClipModelPaths, CLIP_CONTEXT_LENGTH};

/// Default HTTP body limit for uploads (64 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Configuration for the few-shot classifier service
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Directory uploaded images are stored in (default: uploads)
    pub upload_dir: String,
    /// ResNet-50 ONNX model file
    pub model_path: String,
    /// Name of the model's image input tensor (default: input)
    pub input_name: String,
    /// Neighbors consulted by the k-NN classifier (default: 3)
    pub neighbors: usize,
    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,
}

impl ClassifierConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upload_dir: env_or("UPLOAD_DIR", &defaults.upload_dir),
            model_path: env_or("RESNET_MODEL_PATH", &defaults.model_path),
            input_name: env_or("RESNET_INPUT_NAME", &defaults.input_name),
            neighbors: env_parse_or("KNN_NEIGHBORS", defaults.neighbors),
            max_upload_bytes: env_parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.upload_dir.trim().is_empty() {
            return Err("upload_dir cannot be empty".to_string());
        }
        if self.input_name.trim().is_empty() {
            return Err("input_name cannot be empty".to_string());
        }
        if self.neighbors == 0 {
            return Err("neighbors must be at least 1".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            model_path: "./models/resnet50-onnx/model.onnx".to_string(),
            input_name: "input".to_string(),
            neighbors: DEFAULT_NEIGHBORS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Configuration for the caption embedding service
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Directory uploaded images are stored in (default: uploads)
    pub upload_dir: String,
    /// Directory holding captions.json (default: data)
    pub data_dir: String,
    /// Directory embedding records are written to (default: embeddings)
    pub embeddings_dir: String,
    /// CLIP vision tower, text tower and tokenizer
    pub clip: ClipModelPaths,
    /// Token context length for captions (default: 77)
    pub context_length: usize,
    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,
}

impl EmbedderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upload_dir: env_or("UPLOAD_DIR", &defaults.upload_dir),
            data_dir: env_or("DATA_DIR", &defaults.data_dir),
            embeddings_dir: env_or("EMBEDDINGS_DIR", &defaults.embeddings_dir),
            clip: ClipModelPaths {
                vision_model: env_or("CLIP_VISION_MODEL_PATH", &defaults.clip.vision_model),
                text_model: env_or("CLIP_TEXT_MODEL_PATH", &defaults.clip.text_model),
                tokenizer: env_or("CLIP_TOKENIZER_PATH", &defaults.clip.tokenizer),
            },
            context_length: env_parse_or("CLIP_CONTEXT_LENGTH", defaults.context_length),
            max_upload_bytes: env_parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("upload_dir", &self.upload_dir),
            ("data_dir", &self.data_dir),
            ("embeddings_dir", &self.embeddings_dir),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} cannot be empty", field));
            }
        }
        if self.context_length < 2 {
            return Err("context_length must be at least 2".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            data_dir: "data".to_string(),
            embeddings_dir: "embeddings".to_string(),
            clip: ClipModelPaths {
                vision_model: "./models/clip-vit-base-patch32-onnx/vision_model.onnx".to_string(),
                text_model: "./models/clip-vit-base-patch32-onnx/text_model.onnx".to_string(),
                tokenizer: "./models/clip-vit-base-patch32-onnx/tokenizer.json".to_string(),
            },
            context_length: CLIP_CONTEXT_LENGTH,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
