// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::classify::{label_handler, predict_handler, upload_images_handler};
use super::embed::{embed_handler, embed_matrix_handler, upload_image_handler};
use crate::classifier::ExampleStore;
use crate::storage::{CaptionStore, EmbeddingStore, UploadStore};
use crate::version;
use crate::vision::{ImageEncoder, JointEncoder};

/// Shared state of the few-shot classifier service
#[derive(Clone)]
pub struct ClassifierState {
    pub uploads: Arc<UploadStore>,
    pub encoder: Arc<dyn ImageEncoder>,
    pub examples: Arc<RwLock<ExampleStore>>,
}

/// Shared state of the caption embedding service
#[derive(Clone)]
pub struct EmbedderState {
    pub uploads: Arc<UploadStore>,
    pub encoder: Arc<dyn JointEncoder>,
    pub captions: Arc<CaptionStore>,
    pub embeddings: Arc<EmbeddingStore>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model: String,
    /// Build tag, date and feature list
    pub build: serde_json::Value,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_classifier_app(state: ClassifierState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(classifier_health_handler))
        .route("/upload/", post(upload_images_handler))
        .route("/label/", post(label_handler))
        .route("/predict/", get(predict_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

pub fn create_embedder_app(state: EmbedderState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(embedder_health_handler))
        .route("/upload/", post(upload_image_handler))
        .route("/embed/", post(embed_handler))
        .route("/embed_matrix/", get(embed_matrix_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Serve `app` on `addr` until Ctrl+C
pub async fn start_server(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received");
}

async fn classifier_health_handler(State(state): State<ClassifierState>) -> Json<HealthResponse> {
    let examples = state.examples.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "classifier".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        model: state.encoder.name(),
        build: version::get_version_info(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        examples: Some(examples.len()),
        classes: Some(examples.labels()),
    })
}

async fn embedder_health_handler(State(state): State<EmbedderState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "embedder".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        model: state.encoder.name(),
        build: version::get_version_info(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        examples: None,
        classes: None,
    })
}
