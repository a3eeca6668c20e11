// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared types for upstream provider clients

use thiserror::Error;

/// Configuration shared by the three upstream provider clients
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub embedding_url: String,
    pub rerank_url: String,
    pub completion_url: String,
    pub api_key: String,
    pub embedding_model: String,
    pub rerank_model: String,
    pub completion_model: String,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            embedding_url: String::new(),
            rerank_url: String::new(),
            completion_url: String::new(),
            api_key: String::new(),
            embedding_model: "usf1-embed".to_string(),
            rerank_model: "usf1-rerank".to_string(),
            completion_model: "usf1-mini".to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },
    #[error("provider response missing field: {0}")]
    MissingField(&'static str),
    #[error("provider request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}
