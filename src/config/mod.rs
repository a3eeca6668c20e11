// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-driven service configuration

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::providers::ProviderConfig;

/// Embedding dimensionality of the configured upstream embedding model
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Directory holding the vector store snapshot files
pub const DEFAULT_DATA_DIR: &str = "vector_store_data";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub embedding_dim: usize,
    pub providers: ProviderConfig,
}

impl NodeConfig {
    /// Read configuration from environment variables, with defaults for
    /// everything except the provider endpoints and API key
    pub fn from_env() -> Self {
        let port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        let embedding_dim = env::var("EMBEDDING_DIM")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_EMBEDDING_DIM);

        let data_dir = env::var("VECTOR_STORE_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

        let timeout_ms = env::var("PROVIDER_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30_000);

        let defaults = ProviderConfig::default();
        let providers = ProviderConfig {
            embedding_url: env::var("EMBEDDING_API_URL").unwrap_or_default(),
            rerank_url: env::var("RERANK_API_URL").unwrap_or_default(),
            completion_url: env::var("COMPLETION_API_URL").unwrap_or_default(),
            api_key: env::var("NLP_API_KEY").unwrap_or_default(),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            rerank_model: env::var("RERANK_MODEL").unwrap_or(defaults.rerank_model),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or(defaults.completion_model),
            timeout_ms,
        };

        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], port)),
            data_dir: PathBuf::from(data_dir),
            embedding_dim,
            providers,
        }
    }
}
