// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ResNet-50 feature extractor (ONNX)
//!
//! Wraps an ImageNet-pretrained ResNet-50 exported to ONNX. The first model
//! output, flattened, is used as the feature vector (1000 logits for the
//! stock torchvision export).

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::vision::encoder::ImageEncoder;
use crate::vision::onnx_session::{load_session, ExecutionDevice};
use crate::vision::preprocessing::{preprocess_for_resnet, RESNET_INPUT_SIZE};

/// ONNX-based image feature extractor
#[derive(Clone)]
pub struct OnnxResnetEncoder {
    /// ONNX Runtime session (wrapped in Arc<Mutex> for thread-safe shared access)
    session: Arc<Mutex<Session>>,

    /// Name of the image input tensor
    input_name: String,

    /// Square input resolution
    input_size: u32,

    /// Length of the flattened output
    dimension: usize,

    device: ExecutionDevice,
}

impl std::fmt::Debug for OnnxResnetEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxResnetEncoder")
            .field("input_name", &self.input_name)
            .field("input_size", &self.input_size)
            .field("dimension", &self.dimension)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl OnnxResnetEncoder {
    /// Load the model and probe its output dimension with a blank image
    ///
    /// # Errors
    /// Returns error if the model cannot be loaded or the probe inference fails.
    pub fn new(model_path: impl AsRef<Path>, input_name: impl Into<String>) -> Result<Self> {
        let (session, device) = load_session(model_path.as_ref())?;
        let mut encoder = Self {
            session: Arc::new(Mutex::new(session)),
            input_name: input_name.into(),
            input_size: RESNET_INPUT_SIZE,
            dimension: 0,
            device,
        };

        let probe = DynamicImage::new_rgb8(RESNET_INPUT_SIZE, RESNET_INPUT_SIZE);
        encoder.dimension = encoder
            .run(&probe)
            .context("ResNet validation inference failed")?
            .len();

        info!(
            "✅ ResNet feature extractor ready ({} dims on {})",
            encoder.dimension, encoder.device
        );
        Ok(encoder)
    }

    fn run(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let tensor = preprocess_for_resnet(image, self.input_size);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ResNet session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            self.input_name.as_str() => Value::from_array(tensor)?
        ])?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        Ok(output.iter().copied().collect())
    }

    pub fn device(&self) -> ExecutionDevice {
        self.device
    }
}

#[async_trait]
impl ImageEncoder for OnnxResnetEncoder {
    async fn encode(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let features = self.run(image)?;
        debug!("Extracted {} features", features.len());
        Ok(features)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> String {
        "resnet50".to_string()
    }
}
