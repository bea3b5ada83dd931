// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading, format detection and cropping helpers

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Custom error types for image processing
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Invalid crop box ({x1}, {y1}, {x2}, {y2}): right/bottom must exceed left/top and each side must fit in u32")]
    InvalidCrop { x1: i64, y1: i64, x2: i64, y2: i64 },

    #[error("Crop box of {width}x{height} exceeds the {limit} pixel limit")]
    CropTooLarge { width: u32, height: u32, limit: u64 },

    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Largest crop area accepted, in pixels (64 megapixels, about 192 MB as RGB)
pub const MAX_CROP_PIXELS: u64 = 64 * 1024 * 1024;

/// Rectangular region given by two corners.
///
/// Left/top are inclusive, right/bottom exclusive. Coordinates may fall
/// outside the image; uncovered pixels come back black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    width: u32,
    height: u32,
}

impl CropBox {
    /// Validate the corners, limiting the area to [`MAX_CROP_PIXELS`]
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Result<Self, ImageError> {
        Self::with_limit(x1, y1, x2, y2, MAX_CROP_PIXELS)
    }

    pub fn with_limit(
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        max_pixels: u64,
    ) -> Result<Self, ImageError> {
        let side = |lo: i64, hi: i64| {
            hi.checked_sub(lo)
                .filter(|d| *d > 0)
                .and_then(|d| u32::try_from(d).ok())
        };
        let (Some(width), Some(height)) = (side(x1, x2), side(y1, y2)) else {
            return Err(ImageError::InvalidCrop { x1, y1, x2, y2 });
        };

        if u64::from(width) * u64::from(height) > max_pixels {
            return Err(ImageError::CropTooLarge {
                width,
                height,
                limit: max_pixels,
            });
        }

        Ok(Self {
            x1,
            y1,
            x2,
            y2,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Decode raw image bytes (for multipart uploads and files on disk)
///
/// # Arguments
/// * `bytes` - Raw image bytes
///
/// # Returns
/// * `Ok((DynamicImage, ImageInfo))` - The decoded image and metadata
/// * `Err(ImageError)` - If decoding fails
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = detect_format(bytes)?;

    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Read an image from disk and convert it to RGB
pub async fn load_rgb_image(path: &Path) -> Result<DynamicImage, ImageError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let (img, info) = decode_image_bytes(&bytes)?;
    tracing::debug!(
        "Loaded {} ({}x{}, {:?}, {} bytes)",
        path.display(),
        info.width,
        info.height,
        info.format,
        info.size_bytes
    );
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Detect image format from the content signature
///
/// Any format the `image` crate recognizes is accepted, so ICO, PNM, TGA
/// and friends work alongside PNG/JPEG/WebP.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.format())
        .ok_or(ImageError::UnsupportedFormat)
}

/// Cut `region` out of `image`, padding with black where the box leaves the image.
pub fn crop_region(image: &DynamicImage, region: CropBox) -> DynamicImage {
    let rgb = image.to_rgb8();
    let (img_w, img_h) = image.dimensions();
    let mut output = RgbImage::new(region.width(), region.height());

    // Overlap of the box with the image, in image coordinates. Offsets from
    // x1/y1 stay below width/height, which fit in u32.
    let left = region.x1.max(0);
    let top = region.y1.max(0);
    let right = region.x2.min(img_w as i64);
    let bottom = region.y2.min(img_h as i64);

    for y in top..bottom {
        for x in left..right {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            output.put_pixel((x - region.x1) as u32, (y - region.y1) as u32, *pixel);
        }
    }

    DynamicImage::ImageRgb8(output)
}
