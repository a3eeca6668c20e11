// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP chat-completion provider client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::provider::CompletionProvider;
use super::types::{ProviderConfig, ProviderError};

/// Client for an upstream chat-completions API
///
/// POSTs a single user-role message and reads the generated text from
/// `choices[0].message.content`.
pub struct HttpCompletionClient {
    url: String,
    api_key: String,
    model: String,
    timeout_ms: u64,
    client: Client,
}

impl HttpCompletionClient {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: config.completion_url.clone(),
            api_key: config.api_key.clone(),
            model: config.completion_model.clone(),
            timeout_ms: config.timeout_ms,
            client,
        }
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    { "role": "user", "content": prompt }
                ],
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

        let data: CompletionResponse =
            response.json().await.map_err(|e| ProviderError::ApiStatus {
                status: 0,
                message: format!("JSON parse error: {}", e),
            })?;

        data.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ProviderError::MissingField("choices[0].message.content"))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, serde::Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, serde::Deserialize)]
struct CompletionMessage {
    content: String,
}
