// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP embedding provider client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::provider::EmbeddingProvider;
use super::types::{ProviderConfig, ProviderError};

/// Client for an upstream embedding API
///
/// POSTs `{model, input}` with a bearer token and reads the vector from
/// `result.data[0].embedding`.
pub struct HttpEmbeddingClient {
    url: String,
    api_key: String,
    model: String,
    timeout_ms: u64,
    client: Client,
}

impl HttpEmbeddingClient {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: config.embedding_url.clone(),
            api_key: config.api_key.clone(),
            model: config.embedding_model.clone(),
            timeout_ms: config.timeout_ms,
            client,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    ProviderError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        let data: EmbeddingResponse =
            response.json().await.map_err(|e| ProviderError::ApiStatus {
                status: 0,
                message: format!("JSON parse error: {}", e),
            })?;

        let result = data
            .result
            .ok_or(ProviderError::MissingField("result"))?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(ProviderError::MissingField("result.data[0].embedding"))
    }
}

#[derive(Debug, serde::Deserialize)]
struct EmbeddingResponse {
    result: Option<EmbeddingResult>,
}

#[derive(Debug, serde::Deserialize)]
struct EmbeddingResult {
    #[serde(default)]
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, serde::Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}
