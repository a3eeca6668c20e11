// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upstream provider clients
//!
//! The language understanding is delegated to three external HTTP APIs:
//! - embedding: text to fixed-length vector
//! - rerank: candidate texts reordered by relevance to a query
//! - completion: prompt to generated text
//!
//! Each is reached through a trait so the pipeline can be exercised with
//! scripted providers in tests. No retries; a failed call fails the request.

pub mod completion;
pub mod embedding;
pub mod provider;
pub mod rerank;
pub mod types;

pub use completion::HttpCompletionClient;
pub use embedding::HttpEmbeddingClient;
pub use provider::{CompletionProvider, EmbeddingProvider, RerankProvider};
pub use rerank::HttpRerankClient;
pub use types::{ProviderConfig, ProviderError};
