// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider trait definitions
//!
//! The pipeline talks to its three upstream capabilities through these
//! traits so tests can substitute scripted implementations.

use async_trait::async_trait;

use super::types::ProviderError;

/// Converts input text to a fixed-length embedding vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    ///
    /// # Returns
    /// The embedding vector, or an error if the provider fails or its
    /// response is missing the embedding field.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Reorders candidate texts by estimated relevance to a query
#[async_trait]
pub trait RerankProvider: Send + Sync {
    /// Rerank `candidates` against `query`
    ///
    /// # Returns
    /// The candidate strings reordered by relevance. The provider is
    /// trusted to return a subset or permutation of what it received.
    async fn rerank(&self, query: &str, candidates: &[String])
        -> Result<Vec<String>, ProviderError>;
}

/// Generates text from a prompt
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a single user-role prompt
    ///
    /// # Returns
    /// The first choice's message content, untrimmed.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
