// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for the endpoint tests: deterministic encoders that need
//! no model files, in-memory PNGs and hand-built multipart bodies.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
};
use fabstir_vision_lab::vision::{ImageEncoder, JointEmbedding, JointEncoder};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use std::io::Cursor;

pub const BOUNDARY: &str = "----visionlabtestboundary";

/// Mean R, G, B of the image
pub struct MeanColorEncoder;

#[async_trait]
impl ImageEncoder for MeanColorEncoder {
    async fn encode(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let rgb = image.to_rgb8();
        let count = (rgb.width() * rgb.height()).max(1) as f32;
        let mut sums = [0.0f32; 3];
        for pixel in rgb.pixels() {
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += channel as f32;
            }
        }
        Ok(sums.iter().map(|s| s / count).collect())
    }

    fn dimension(&self) -> usize {
        3
    }

    fn name(&self) -> String {
        "mean-color".to_string()
    }
}

/// Mean color for the image half, byte histogram of the caption for the text half
pub struct MeanColorTextEncoder;

#[async_trait]
impl JointEncoder for MeanColorTextEncoder {
    async fn encode_pair(&self, image: &DynamicImage, text: &str) -> Result<JointEmbedding> {
        let image = MeanColorEncoder.encode(image).await?;
        let mut text_features = vec![1.0f32; 4];
        for byte in text.bytes() {
            text_features[(byte % 4) as usize] += 1.0;
        }
        Ok(JointEmbedding {
            image,
            text: text_features,
        })
    }

    fn name(&self) -> String {
        "mean-color-text".to_string()
    }
}

pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Left half `left`, right half `right`
pub fn split_png(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb(left)
        } else {
            Rgb(right)
        }
    });
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Multipart body builder
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub fn urlencoded_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
