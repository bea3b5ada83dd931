// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::api::{
    create_classifier_app, create_embedder_app, start_server, ClassifierState, EmbedderState,
};
use crate::classifier::ExampleStore;
use crate::config::{ClassifierConfig, EmbedderConfig};
use crate::storage::{CaptionStore, EmbeddingStore, UploadStore};
use crate::vision::{OnnxClipModel, OnnxResnetEncoder};

/// Arguments shared by both services
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

/// Run the few-shot classifier service
pub async fn serve_classifier(args: ServeArgs) -> Result<()> {
    let config = ClassifierConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("Invalid classifier configuration: {}", e))?;
    let addr = args.socket_addr()?;

    let uploads = UploadStore::open(&config.upload_dir).await?;
    info!("📂 Upload directory: {}", uploads.dir().display());

    info!("🧠 Loading ResNet-50 from {}", config.model_path);
    let encoder = OnnxResnetEncoder::new(&config.model_path, config.input_name.clone())
        .context("Failed to load ResNet-50 feature extractor")?;

    let state = ClassifierState {
        uploads: Arc::new(uploads),
        encoder: Arc::new(encoder),
        examples: Arc::new(RwLock::new(ExampleStore::new(config.neighbors))),
    };

    start_server(addr, create_classifier_app(state, config.max_upload_bytes)).await
}

/// Run the caption embedding service
pub async fn serve_embedder(args: ServeArgs) -> Result<()> {
    let config = EmbedderConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("Invalid embedder configuration: {}", e))?;
    let addr = args.socket_addr()?;

    let uploads = UploadStore::open(&config.upload_dir).await?;
    let captions = CaptionStore::open(&config.data_dir).await?;
    let embeddings = EmbeddingStore::open(&config.embeddings_dir).await?;
    info!(
        "📂 Uploads: {}, captions: {}, embeddings: {}",
        uploads.dir().display(),
        captions.path().display(),
        embeddings.dir().display()
    );

    info!("🧠 Loading CLIP from {}", config.clip.vision_model);
    let encoder = OnnxClipModel::new(&config.clip, config.context_length)
        .context("Failed to load CLIP model")?;

    let state = EmbedderState {
        uploads: Arc::new(uploads),
        encoder: Arc::new(encoder),
        captions: Arc::new(captions),
        embeddings: Arc::new(embeddings),
    };

    start_server(addr, create_embedder_app(state, config.max_upload_bytes)).await
}
