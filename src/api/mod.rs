// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod classify;
pub mod embed;
pub mod errors;
pub mod form;
pub mod http_server;

pub use classify::{
    label_handler, predict_handler, upload_images_handler, LabelRequest, LabelResponse,
    PredictResponse, Prediction, UploadResponse,
};
pub use embed::{
    embed_handler, embed_matrix_handler, upload_image_handler, EmbedMatrixQuery,
    EmbedMatrixResponse, EmbedRequest, EmbedResponse, UploadImageResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use form::{FormData, UploadedFile};
pub use http_server::{
    create_classifier_app, create_embedder_app, start_server, ClassifierState, EmbedderState,
    HealthResponse,
};
