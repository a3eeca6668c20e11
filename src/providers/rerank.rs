// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP rerank provider client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::provider::RerankProvider;
use super::types::{ProviderConfig, ProviderError};

/// Client for an upstream rerank API
///
/// POSTs `{model, query, texts}` and reads the reordered strings from
/// `result.data[*].text`.
pub struct HttpRerankClient {
    url: String,
    api_key: String,
    model: String,
    timeout_ms: u64,
    client: Client,
}

impl HttpRerankClient {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: config.rerank_url.clone(),
            api_key: config.api_key.clone(),
            model: config.rerank_model.clone(),
            timeout_ms: config.timeout_ms,
            client,
        }
    }
}

#[async_trait]
impl RerankProvider for HttpRerankClient {
    async fn rerank(
        &self,
        query: &str,
        candidates: &[String],
    ) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "query": query,
                "texts": candidates,
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

        let data: RerankResponse =
            response.json().await.map_err(|e| ProviderError::ApiStatus {
                status: 0,
                message: format!("JSON parse error: {}", e),
            })?;

        let result = data.result.ok_or(ProviderError::MissingField("result"))?;

        Ok(result.data.into_iter().map(|d| d.text).collect())
    }
}

#[derive(Debug, serde::Deserialize)]
struct RerankResponse {
    result: Option<RerankResult>,
}

#[derive(Debug, serde::Deserialize)]
struct RerankResult {
    #[serde(default)]
    data: Vec<RerankDatum>,
}

#[derive(Debug, serde::Deserialize)]
struct RerankDatum {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerank_response_deserialization() {
        let json = r#"{
            "result": {
                "data": [
                    { "text": "most relevant" },
                    { "text": "less relevant" }
                ]
            }
        }"#;

        let response: RerankResponse = serde_json::from_str(json).unwrap();
        let texts: Vec<String> = response
            .result
            .unwrap()
            .data
            .into_iter()
            .map(|d| d.text)
            .collect();
        assert_eq!(texts, vec!["most relevant", "less relevant"]);
    }

    #[test]
    fn test_rerank_response_empty_data() {
        let response: RerankResponse =
            serde_json::from_str(r#"{"result": {"data": []}}"#).unwrap();
        assert!(response.result.unwrap().data.is_empty());
    }
}
