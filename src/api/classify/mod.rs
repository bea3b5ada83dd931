// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Few-shot classifier endpoints
//!
//! `POST /upload/`, `POST /label/` and `GET /predict/` of the classifier
//! service.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{label_handler, predict_handler, upload_images_handler};
pub use request::LabelRequest;
pub use response::{LabelResponse, Prediction, PredictResponse, UploadResponse};
