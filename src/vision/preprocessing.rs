// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the ResNet feature extractor and the CLIP image encoder

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

/// Input resolution for the ResNet-50 backbone
pub const RESNET_INPUT_SIZE: u32 = 224;

/// Mean values for normalization (ImageNet)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Std values for normalization (ImageNet)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Input resolution for the CLIP ViT-B/32 image encoder
pub const CLIP_INPUT_SIZE: u32 = 224;

/// Mean values for normalization (CLIP)
pub const CLIP_MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];

/// Std values for normalization (CLIP)
pub const CLIP_STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

/// Preprocess an image for the ResNet feature extractor
///
/// Steps:
/// 1. Resize exactly to `size` x `size` (bilinear, aspect ratio not kept)
/// 2. Convert to RGB
/// 3. Normalize with ImageNet mean/std: (pixel/255 - mean) / std
/// 4. Convert to NCHW tensor format [1, 3, size, size]
pub fn preprocess_for_resnet(image: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = image.resize_exact(size, size, FilterType::Triangle);
    to_normalized_tensor(&resized, IMAGENET_MEAN, IMAGENET_STD)
}

/// Preprocess an image for the CLIP image encoder
///
/// Steps:
/// 1. Resize so the shorter side equals `size` (bicubic)
/// 2. Center crop to `size` x `size`
/// 3. Normalize with CLIP mean/std
/// 4. Convert to NCHW tensor format [1, 3, size, size]
pub fn preprocess_for_clip(image: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = resize_shorter_side(image, size);
    let (w, h) = resized.dimensions();
    let left = (w - size) / 2;
    let top = (h - size) / 2;
    let cropped = resized.crop_imm(left, top, size, size);
    to_normalized_tensor(&cropped, CLIP_MEAN, CLIP_STD)
}

/// Scale so that the shorter side becomes `target`, keeping aspect ratio
pub fn resize_shorter_side(image: &DynamicImage, target: u32) -> DynamicImage {
    let (orig_w, orig_h) = image.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return DynamicImage::new_rgb8(target, target);
    }

    let scale = target as f32 / orig_w.min(orig_h) as f32;
    let new_w = ((orig_w as f32 * scale).round() as u32).max(target);
    let new_h = ((orig_h as f32 * scale).round() as u32).max(target);

    image.resize_exact(new_w, new_h, FilterType::CatmullRom)
}

fn to_normalized_tensor(image: &DynamicImage, mean: [f32; 3], std: [f32; 3]) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut tensor = Array4::zeros((1, 3, height as usize, width as usize));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = (pixel[c] as f32 / 255.0 - mean[c]) / std[c];
        }
    }

    tensor
}
