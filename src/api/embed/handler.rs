// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedder endpoint handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{debug, info, warn};

use super::request::{EmbedMatrixQuery, EmbedRequest};
use super::response::{EmbedMatrixResponse, EmbedResponse, UploadImageResponse};
use crate::api::errors::ApiError;
use crate::api::form::FormData;
use crate::api::http_server::EmbedderState;
use crate::embeddings::{combine, to_rows};
use crate::vision::load_rgb_image;

/// POST /upload/ - Store a single image sent as `file`
///
/// Extra file parts are stored as well; the first stored name is reported.
pub async fn upload_image_handler(
    State(state): State<EmbedderState>,
    form: FormData,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let stored = form.save_files(&state.uploads).await?;
    let Some(filename) = stored.into_iter().next() else {
        warn!("Upload without a file part");
        return Err(ApiError::InvalidRequest(
            "request must contain a file part".to_string(),
        ));
    };

    info!("📥 Stored upload {}", filename);
    Ok(Json(UploadImageResponse {
        status: "success".to_string(),
        filename,
    }))
}

/// POST /embed/ - Caption an uploaded image and embed the pair
///
/// # Form fields
/// - `filename`: previously uploaded image
/// - `caption`: text stored in the caption map and embedded with the image
///
/// # Response
/// - `filename`: the image
/// - `embedding_file`: record name for `GET /embed_matrix/`
/// - `matrix`: the `1 x (Di + Dt)` embedding
///
/// The caption is written before inference runs and is kept even when a
/// later step fails.
///
/// # Errors
/// - 400: missing fields
/// - 404: `filename` was never uploaded
/// - 500: decoding, inference or persistence failed
pub async fn embed_handler(
    State(state): State<EmbedderState>,
    form: FormData,
) -> Result<Json<EmbedResponse>, ApiError> {
    let request = EmbedRequest::from_form(&form)
        .inspect_err(|e| warn!("Embed request rejected: {}", e))?;
    debug!(
        "Embedding {} with caption of {} chars",
        request.filename,
        request.caption.len()
    );

    state
        .captions
        .upsert(&request.filename, &request.caption)
        .await?;

    let path = state.uploads.existing(&request.filename).await?;
    let image = load_rgb_image(&path).await?;

    let joint = state.encoder.encode_pair(&image, &request.caption).await?;
    let matrix = combine(joint)?;
    let embedding_file = state.embeddings.save(&matrix).await?;

    info!(
        "🧬 Embedded {} -> {} ({} dims)",
        request.filename,
        embedding_file,
        matrix.ncols()
    );

    Ok(Json(EmbedResponse {
        filename: request.filename,
        embedding_file,
        matrix: to_rows(&matrix),
    }))
}

/// GET /embed_matrix/?file=<record> - Fetch a stored embedding
///
/// Unknown records answer 200 with `{"error": "Embedding file not found"}`.
pub async fn embed_matrix_handler(
    State(state): State<EmbedderState>,
    query: Result<Query<EmbedMatrixQuery>, QueryRejection>,
) -> Result<Json<EmbedMatrixResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation("file", e.body_text()))?;

    match state.embeddings.load(&query.file).await? {
        Some(matrix) => Ok(Json(EmbedMatrixResponse::Found {
            filename: query.file,
            matrix: to_rows(&matrix),
        })),
        None => {
            debug!("Embedding record {} not found", query.file);
            Ok(Json(EmbedMatrixResponse::not_found()))
        }
    }
}
