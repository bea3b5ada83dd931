// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Fabstir Vision Lab
#[derive(Parser, Debug)]
#[command(name = "fabstir-vision-lab")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Few-shot image classification and CLIP caption embedding services", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the few-shot classifier (/upload/, /label/, /predict/)
    Classifier(serve::ServeArgs),

    /// Serve the caption embedder (/upload/, /embed/, /embed_matrix/)
    Embedder(serve::ServeArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Classifier(args) => serve::serve_classifier(args).await,
        Commands::Embedder(args) => serve::serve_embedder(args).await,
    }
}
