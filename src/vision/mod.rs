// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Image loading, format detection and cropping
//! - ResNet-50 feature extraction for few-shot classification
//! - CLIP image/caption embeddings
//!
//! Models run through ONNX Runtime on CUDA when available, else CPU.

pub mod clip;
pub mod encoder;
pub mod image_utils;
pub mod onnx_session;
pub mod preprocessing;
pub mod resnet;

pub use clip::{ClipModelPaths, OnnxClipModel, CLIP_CONTEXT_LENGTH};
pub use encoder::{ImageEncoder, JointEmbedding, JointEncoder};
pub use image_utils::{crop_region, decode_image_bytes, detect_format, load_rgb_image, CropBox, ImageError, ImageInfo};
pub use onnx_session::{load_session, ExecutionDevice};
pub use resnet::OnnxResnetEncoder;
