// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Runtime session loading with GPU support
//!
//! Every model in this crate goes through [`load_session`], which tries the
//! CUDA execution provider first and falls back to CPU. Callers never see
//! which one was picked beyond the returned [`ExecutionDevice`].

use anyhow::{Context, Result};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Number of intra-op threads per session
const INTRA_THREADS: usize = 4;

/// Device an ONNX session ended up running on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionDevice {
    Cuda,
    Cpu,
}

impl fmt::Display for ExecutionDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionDevice::Cuda => write!(f, "cuda"),
            ExecutionDevice::Cpu => write!(f, "cpu"),
        }
    }
}

/// Load an ONNX model, preferring CUDA and falling back to CPU
///
/// # Errors
/// Returns error if the file is missing or neither provider can load it.
pub fn load_session(model_path: &Path) -> Result<(Session, ExecutionDevice)> {
    if !model_path.exists() {
        anyhow::bail!("ONNX model file not found: {}", model_path.display());
    }

    info!("🚀 Loading ONNX model {}", model_path.display());

    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build().error_on_failure()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(INTRA_THREADS)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path);

    match cuda_result {
        Ok(session) => {
            info!("✅ CUDA execution provider initialized");
            Ok((session, ExecutionDevice::Cuda))
        }
        Err(e) => {
            warn!("⚠️  CUDA execution provider failed: {}", e);
            warn!("   Falling back to CPU execution provider");
            let session = Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .with_intra_threads(INTRA_THREADS)
                .context("Failed to set intra threads")?
                .commit_from_file(model_path)
                .with_context(|| {
                    format!("Failed to load ONNX model from {}", model_path.display())
                })?;
            Ok((session, ExecutionDevice::Cpu))
        }
    }
}
