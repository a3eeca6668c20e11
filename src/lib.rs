// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod pipeline;
pub mod providers;
pub mod vector;

// Re-export main types
pub use api::{ApiError, ErrorResponse};
pub use config::NodeConfig;
pub use pipeline::{NlpPipeline, PipelineError};
pub use providers::{
    CompletionProvider, EmbeddingProvider, HttpCompletionClient, HttpEmbeddingClient,
    HttpRerankClient, ProviderConfig, ProviderError, RerankProvider,
};
pub use vector::{SearchHit, StoreError, StoreHandle, TaskKind, VectorStore};
