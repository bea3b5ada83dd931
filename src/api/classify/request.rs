// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label request parsing and validation

use crate::api::errors::ApiError;
use crate::api::form::FormData;
use crate::vision::CropBox;

/// A labeled region of an uploaded image
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    /// Name of a previously uploaded image
    pub filename: String,
    /// Class the user assigns to the region
    pub user_class: String,
    /// Region to crop before feature extraction
    pub region: CropBox,
}

impl LabelRequest {
    /// Build from the `filename, user_class, x1, y1, x2, y2` form fields
    pub fn from_form(form: &FormData) -> Result<Self, ApiError> {
        let filename = form.required("filename")?.to_string();
        let user_class = form.required("user_class")?.to_string();

        if filename.is_empty() {
            return Err(ApiError::validation("filename", "filename cannot be empty"));
        }

        let region = CropBox::new(
            form.required_i64("x1")?,
            form.required_i64("y1")?,
            form.required_i64("x2")?,
            form.required_i64("y2")?,
        )?;

        Ok(Self {
            filename,
            user_class,
            region,
        })
    }
}
