// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encoder capabilities the HTTP handlers depend on
//!
//! Handlers only see these traits, so the ONNX backends can be swapped
//! (or replaced by deterministic encoders in tests) without touching them.

use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;

/// Turns an image into a fixed-length feature vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageEncoder: Send + Sync {
    /// Extract the feature vector for `image`
    async fn encode(&self, image: &DynamicImage) -> Result<Vec<f32>>;

    /// Length of the vectors returned by `encode`
    fn dimension(&self) -> usize;

    /// Model name reported by the health endpoint
    fn name(&self) -> String;
}

/// Raw (not yet normalized) outputs of a joint vision-language model
#[derive(Debug, Clone, PartialEq)]
pub struct JointEmbedding {
    pub image: Vec<f32>,
    pub text: Vec<f32>,
}

/// Embeds an image and a caption into a shared space in one call
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JointEncoder: Send + Sync {
    async fn encode_pair(&self, image: &DynamicImage, text: &str) -> Result<JointEmbedding>;

    fn name(&self) -> String;
}
