// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier service response types

use serde::{Deserialize, Serialize};

/// Status reported while fewer than two classes have been labeled
pub const WAITING_STATUS: &str = "waiting for labeled examples";

/// Response to `POST /upload/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub status: String,
    /// Stored file names, in request order
    pub files: Vec<String>,
}

/// Response to `POST /label/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelResponse {
    pub status: String,
    pub class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub filename: String,
    pub predicted_class: String,
}

/// Response to `GET /predict/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PredictResponse {
    Predictions { predictions: Vec<Prediction> },
    Waiting { status: String },
}

impl PredictResponse {
    pub fn waiting() -> Self {
        PredictResponse::Waiting {
            status: WAITING_STATUS.to_string(),
        }
    }
}
