// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embed request types

use serde::Deserialize;

use crate::api::form::FormData;
use crate::api::ApiError;

/// Fields of `POST /embed/`
///
/// # Example
/// ```text
/// filename=beach.jpg&caption=two+dogs+on+a+beach
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedRequest {
    /// Name of a previously uploaded image
    pub filename: String,
    /// Caption stored for the image and embedded alongside it
    pub caption: String,
}

impl EmbedRequest {
    pub fn from_form(form: &FormData) -> Result<Self, ApiError> {
        let filename = form.required("filename")?.to_string();
        let caption = form.required("caption")?.to_string();

        if filename.is_empty() {
            return Err(ApiError::validation("filename", "filename cannot be empty"));
        }

        Ok(Self { filename, caption })
    }
}

/// Query string of `GET /embed_matrix/`
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedMatrixQuery {
    /// Record name returned by `POST /embed/`
    pub file: String,
}
