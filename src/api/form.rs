// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Form body extractor
//!
//! Browser clients post `FormData`, so the label and embed endpoints must
//! read `multipart/form-data`; plain `application/x-www-form-urlencoded`
//! bodies are accepted too. File parts are collected separately from text
//! fields so the upload endpoints can share the same extractor.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use axum_extra::extract::Multipart;
use std::collections::HashMap;

use super::ApiError;
use crate::storage::UploadStore;

/// A file part of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field the file was sent under
    pub field: String,
    /// Client-supplied file name
    pub file_name: String,
    pub bytes: Bytes,
}

/// Text fields and file parts of a form submission
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl FormData {
    /// Value of a required text field
    pub fn required(&self, name: &str) -> Result<&str, ApiError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ApiError::validation(name, format!("{} is required", name)))
    }

    /// Value of a required integer field
    pub fn required_i64(&self, name: &str) -> Result<i64, ApiError> {
        let raw = self.required(name)?;
        raw.trim().parse::<i64>().map_err(|_| {
            ApiError::validation(name, format!("{} must be an integer (got '{}')", name, raw))
        })
    }

    /// Store every file part, returning the stored keys in request order
    pub async fn save_files(&self, store: &UploadStore) -> Result<Vec<String>, ApiError> {
        let mut saved = Vec::with_capacity(self.files.len());
        for file in &self.files {
            saved.push(store.save(&file.file_name, &file.bytes).await?);
        }
        Ok(saved)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
            return Ok(FormData {
                fields,
                files: Vec::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                    form.files.push(UploadedFile {
                        field: name,
                        file_name,
                        bytes,
                    });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }
}
