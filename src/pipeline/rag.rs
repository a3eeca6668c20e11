// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmentation pipeline
//!
//! The shared algorithm behind all four NLP operations:
//! embed the input, retrieve nearest prior results, rerank them, fold the
//! best few into the prompt, call the completion provider, then persist the
//! new record and snapshot the store. The store is only mutated after every
//! external call has succeeded, so it never holds a half-computed record.

use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use super::task::build_prompt;
use crate::providers::{CompletionProvider, EmbeddingProvider, ProviderError, RerankProvider};
use crate::vector::{StoreError, StoreHandle, TaskKind};

/// Candidates retrieved per request
const RETRIEVAL_TOP_K: usize = 5;
/// Reranked outputs folded into the prompt context
const CONTEXT_RESULTS: usize = 3;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Orchestrates the retrieval-augmented NLP operations over a shared store
/// and the three upstream providers
pub struct NlpPipeline {
    store: StoreHandle,
    embedder: Arc<dyn EmbeddingProvider>,
    reranker: Arc<dyn RerankProvider>,
    completer: Arc<dyn CompletionProvider>,
}

impl NlpPipeline {
    pub fn new(
        store: StoreHandle,
        embedder: Arc<dyn EmbeddingProvider>,
        reranker: Arc<dyn RerankProvider>,
        completer: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            store,
            embedder,
            reranker,
            completer,
        }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Summarize the input text
    pub async fn summarize(&self, text: &str) -> Result<String, PipelineError> {
        let (embedding, output) = self.generate(TaskKind::Summarization, text).await?;
        self.persist(&embedding, text, &output, TaskKind::Summarization)
            .await?;
        Ok(output)
    }

    /// Classify the input text into a topic label
    ///
    /// The completion is returned verbatim; an out-of-set label is passed
    /// through unchanged.
    pub async fn classify(&self, text: &str) -> Result<String, PipelineError> {
        let (embedding, output) = self.generate(TaskKind::Classification, text).await?;
        self.persist(&embedding, text, &output, TaskKind::Classification)
            .await?;
        Ok(output)
    }

    /// Extract named entities from the input text
    ///
    /// The completion is expected to be a JSON list of strings, possibly
    /// wrapped in a code fence. Malformed output degrades to a
    /// single-element list holding the fence-stripped raw string.
    pub async fn extract_entities(&self, text: &str) -> Result<Vec<String>, PipelineError> {
        let (embedding, raw) = self.generate(TaskKind::EntityExtraction, text).await?;
        let entities = parse_entity_list(&raw);
        self.persist(
            &embedding,
            text,
            &entities.join(", "),
            TaskKind::EntityExtraction,
        )
        .await?;
        Ok(entities)
    }

    /// Classify the sentiment of the input text
    pub async fn analyze_sentiment(&self, text: &str) -> Result<String, PipelineError> {
        let (embedding, output) = self.generate(TaskKind::SentimentAnalysis, text).await?;
        self.persist(&embedding, text, &output, TaskKind::SentimentAnalysis)
            .await?;
        Ok(output)
    }

    /// Steps 1-6 of the pipeline: embed, retrieve, rerank, assemble context,
    /// prompt, complete. Returns the input's embedding and the trimmed raw
    /// completion; nothing is persisted here.
    async fn generate(
        &self,
        task: TaskKind,
        text: &str,
    ) -> Result<(Vec<f32>, String), PipelineError> {
        let embedding = self.embedder.embed(text).await?;

        let candidates = self.store.search(&embedding, RETRIEVAL_TOP_K).await?;

        let context = if candidates.is_empty() {
            String::new()
        } else {
            let outputs: Vec<String> = candidates.iter().map(|c| c.output.clone()).collect();
            let reranked = self.reranker.rerank(text, &outputs).await?;

            // Keep only candidates the reranker echoed back, in the
            // reranker's order. Position lookup is first-match: duplicate
            // outputs alias to the same rank.
            let mut kept: Vec<_> = candidates
                .iter()
                .filter(|c| reranked.contains(&c.output))
                .collect();
            kept.sort_by_key(|c| {
                reranked
                    .iter()
                    .position(|r| *r == c.output)
                    .unwrap_or(usize::MAX)
            });

            kept.iter()
                .take(CONTEXT_RESULTS)
                .map(|c| c.output.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };

        tracing::debug!(
            task = %task,
            candidates = candidates.len(),
            context_len = context.len(),
            "assembled retrieval context"
        );

        let prompt = build_prompt(task, &context, text);
        let raw = self.completer.complete(&prompt).await?;

        Ok((embedding, raw.trim().to_string()))
    }

    /// Steps 8-9: append the completed record and snapshot the whole store
    async fn persist(
        &self,
        embedding: &[f32],
        text: &str,
        output: &str,
        task: TaskKind,
    ) -> Result<(), PipelineError> {
        self.store.add(embedding, text, output, task).await?;
        self.store.save().await?;
        let records = self.store.len().await;
        tracing::info!(task = %task, records, "stored result");
        Ok(())
    }
}

/// Parse the completion output of the entity-extraction task
///
/// Code-fence markers are stripped, then the remainder is parsed as a JSON
/// array. Anything that is not a JSON array falls back to a single-element
/// list with the stripped raw string.
pub fn parse_entity_list(raw: &str) -> Vec<String> {
    let fence = Regex::new(r"```(?:\w+)?").expect("static regex");
    let cleaned = fence.replace_all(raw, "").trim().to_string();

    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => vec![cleaned],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_list_plain_json() {
        let entities = parse_entity_list(r#"["Apple", "Tim Cook"]"#);
        assert_eq!(entities, vec!["Apple", "Tim Cook"]);
    }

    #[test]
    fn test_parse_entity_list_fenced_json() {
        let entities = parse_entity_list("```json\n[\"Apple\", \"Tim Cook\"]\n```");
        assert_eq!(entities, vec!["Apple", "Tim Cook"]);
    }

    #[test]
    fn test_parse_entity_list_malformed_falls_back() {
        let entities = parse_entity_list("Apple and Tim Cook");
        assert_eq!(entities, vec!["Apple and Tim Cook"]);
    }

    #[test]
    fn test_parse_entity_list_non_array_falls_back() {
        let entities = parse_entity_list(r#"{"entities": ["Apple"]}"#);
        assert_eq!(entities, vec![r#"{"entities": ["Apple"]}"#]);
    }

    #[test]
    fn test_parse_entity_list_fence_stripped_in_fallback() {
        let entities = parse_entity_list("```\nApple and Tim Cook\n```");
        assert_eq!(entities, vec!["Apple and Tim Cook"]);
    }

    #[test]
    fn test_parse_entity_list_empty_array() {
        let entities = parse_entity_list("[]");
        assert!(entities.is_empty());
    }
}
