// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier endpoint handlers

use axum::{extract::State, Json};
use tracing::{debug, info, warn};

use super::request::LabelRequest;
use super::response::{LabelResponse, PredictResponse, Prediction, UploadResponse};
use crate::api::errors::ApiError;
use crate::api::form::FormData;
use crate::api::http_server::ClassifierState;
use crate::vision::{crop_region, load_rgb_image};

/// POST /upload/ - Store one or more images
///
/// Every file part (normally sent as `files`) is written to the upload
/// directory under its client-supplied name.
pub async fn upload_images_handler(
    State(state): State<ClassifierState>,
    form: FormData,
) -> Result<Json<UploadResponse>, ApiError> {
    let files = form.save_files(&state.uploads).await?;
    info!("📥 Stored {} uploaded image(s)", files.len());

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        files,
    }))
}

/// POST /label/ - Label a region of an uploaded image
///
/// # Form fields
/// - `filename`: previously uploaded image
/// - `user_class`: label for the region
/// - `x1`, `y1`, `x2`, `y2`: crop box corners in pixels
///
/// # Errors
/// - 400: missing or non-integer fields, empty crop box
/// - 404: `filename` was never uploaded
/// - 500: decoding or feature extraction failed
pub async fn label_handler(
    State(state): State<ClassifierState>,
    form: FormData,
) -> Result<Json<LabelResponse>, ApiError> {
    let request = LabelRequest::from_form(&form)
        .inspect_err(|e| warn!("Label request rejected: {}", e))?;
    debug!(
        "Labeling {} as '{}' with box {:?}",
        request.filename, request.user_class, request.region
    );

    let path = state.uploads.existing(&request.filename).await?;
    let image = load_rgb_image(&path).await?;
    let region = crop_region(&image, request.region);

    // Encode before taking the write lock
    let features = state.encoder.encode(&region).await?;

    let mut examples = state.examples.write().await;
    examples.add_example(features, request.user_class.clone())?;
    info!(
        "🏷️  Added '{}' example from {} ({} examples total)",
        request.user_class,
        request.filename,
        examples.len()
    );

    Ok(Json(LabelResponse {
        status: "success".to_string(),
        class: request.user_class,
    }))
}

/// GET /predict/ - Classify every uploaded image
///
/// Returns the waiting status until at least two classes have been
/// labeled. Images are processed in file name order; the first failure
/// fails the whole request.
pub async fn predict_handler(
    State(state): State<ClassifierState>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Some(classifier) = state.examples.read().await.classifier() else {
        debug!("Predict requested before two classes were labeled");
        return Ok(Json(PredictResponse::waiting()));
    };

    let mut predictions = Vec::new();
    for filename in state.uploads.list().await? {
        let path = state.uploads.existing(&filename).await?;
        let image = load_rgb_image(&path).await?;
        let features = state.encoder.encode(&image).await?;
        let predicted_class = classifier.predict(&features)?.to_string();

        debug!("{} -> {}", filename, predicted_class);
        predictions.push(Prediction {
            filename,
            predicted_class,
        });
    }

    info!("🔮 Predicted {} image(s)", predictions.len());
    Ok(Json(PredictResponse::Predictions { predictions }))
}
