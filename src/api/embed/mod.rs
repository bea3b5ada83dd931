// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Caption embedding endpoints
//!
//! `POST /upload/`, `POST /embed/` and `GET /embed_matrix/` of the embedder
//! service. Embeddings are CLIP image and text vectors, each L2-normalized
//! and concatenated into one row.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_handler, embed_matrix_handler, upload_image_handler};
pub use request::{EmbedMatrixQuery, EmbedRequest};
pub use response::{EmbedMatrixResponse, EmbedResponse, UploadImageResponse};
