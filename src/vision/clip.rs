// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CLIP joint vision-language encoder (ONNX)
//!
//! Uses the split CLIP export: one ONNX graph for the vision tower
//! (`pixel_values` → `image_embeds`) and one for the text tower
//! (`input_ids` [+ `attention_mask`] → `text_embeds`). The projected
//! embedding must be the first output of each graph.
//!
//! Captions are tokenized with the model's `tokenizer.json`, padded and
//! truncated to a fixed context length (77 for ViT-B/32).

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::vision::encoder::{JointEmbedding, JointEncoder};
use crate::vision::onnx_session::{load_session, ExecutionDevice};
use crate::vision::preprocessing::{preprocess_for_clip, CLIP_INPUT_SIZE};

/// Default CLIP text context length
pub const CLIP_CONTEXT_LENGTH: usize = 77;

/// Paths to the three files making up a CLIP export
#[derive(Debug, Clone)]
pub struct ClipModelPaths {
    pub vision_model: String,
    pub text_model: String,
    pub tokenizer: String,
}

/// ONNX-based CLIP model
#[derive(Clone)]
pub struct OnnxClipModel {
    vision_session: Arc<Mutex<Session>>,
    text_session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,

    /// Whether the text graph takes an `attention_mask` input
    text_takes_mask: bool,

    context_length: usize,
    device: ExecutionDevice,
}

impl std::fmt::Debug for OnnxClipModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClipModel")
            .field("context_length", &self.context_length)
            .field("text_takes_mask", &self.text_takes_mask)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl OnnxClipModel {
    /// Load both towers and the tokenizer
    ///
    /// # Errors
    /// Returns error if any file is missing or invalid.
    pub fn new(paths: &ClipModelPaths, context_length: usize) -> Result<Self> {
        let tokenizer_path = Path::new(&paths.tokenizer);
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let (vision_session, device) = load_session(Path::new(&paths.vision_model))?;
        let (text_session, _) = load_session(Path::new(&paths.text_model))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        let mut padding = tokenizer.get_padding().cloned().unwrap_or_default();
        padding.strategy = PaddingStrategy::Fixed(context_length);
        tokenizer.with_padding(Some(padding));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: context_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        let text_takes_mask = text_session
            .inputs
            .iter()
            .any(|input| input.name == "attention_mask");

        info!(
            "✅ CLIP model loaded on {} (context length {}, attention mask: {})",
            device, context_length, text_takes_mask
        );

        Ok(Self {
            vision_session: Arc::new(Mutex::new(vision_session)),
            text_session: Arc::new(Mutex::new(text_session)),
            tokenizer: Arc::new(tokenizer),
            text_takes_mask,
            context_length,
            device,
        })
    }

    /// Image embedding as returned by the vision tower (not normalized)
    pub fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let pixel_values = preprocess_for_clip(image, CLIP_INPUT_SIZE);

        let mut session = self
            .vision_session
            .lock()
            .map_err(|_| anyhow::anyhow!("CLIP vision session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "pixel_values" => Value::from_array(pixel_values)?
        ])?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract image embedding")?;
        Ok(output.iter().copied().collect())
    }

    /// Text embedding as returned by the text tower (not normalized)
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) = self.tokenize(text)?;

        let mut session = self
            .text_session
            .lock()
            .map_err(|_| anyhow::anyhow!("CLIP text session lock poisoned"))?;

        let embedding = if self.text_takes_mask {
            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)?,
                "attention_mask" => Value::from_array(attention_mask)?
            ])?;
            let output = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract text embedding")?;
            output.iter().copied().collect()
        } else {
            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)?
            ])?;
            let output = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract text embedding")?;
            output.iter().copied().collect()
        };

        Ok(embedding)
    }

    /// Tokenize into `[1, context_length]` id and mask tensors
    fn tokenize(&self, text: &str) -> Result<(Array2<i64>, Array2<i64>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        debug!(
            "Tokenized caption into {} tokens",
            attention_mask.iter().sum::<i64>()
        );

        let input_ids = Array2::from_shape_vec((1, input_ids.len()), input_ids)
            .context("Failed to create input_ids array")?;
        let attention_mask = Array2::from_shape_vec((1, attention_mask.len()), attention_mask)
            .context("Failed to create attention_mask array")?;
        Ok((input_ids, attention_mask))
    }

    pub fn device(&self) -> ExecutionDevice {
        self.device
    }
}

#[async_trait]
impl JointEncoder for OnnxClipModel {
    async fn encode_pair(&self, image: &DynamicImage, text: &str) -> Result<JointEmbedding> {
        Ok(JointEmbedding {
            image: self.embed_image(image)?,
            text: self.embed_text(text)?,
        })
    }

    fn name(&self) -> String {
        "clip-vit-base-patch32".to_string()
    }
}
