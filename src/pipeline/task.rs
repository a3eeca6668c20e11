// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Task-specific prompt construction

use crate::vector::TaskKind;

/// Fixed label set for topic classification prompts
pub const TOPIC_LABELS: [&str; 10] = [
    "politics",
    "finance",
    "health",
    "technology",
    "sports",
    "entertainment",
    "science",
    "education",
    "environment",
    "travel",
];

/// Build the completion prompt for one task, embedding the retrieved
/// context and the input text
pub fn build_prompt(task: TaskKind, context: &str, text: &str) -> String {
    let instructions = match task {
        TaskKind::Summarization => {
            "Summarize the input using the given context if it's relevant.".to_string()
        }
        TaskKind::Classification => format!(
            "Classify the input into one of the following topics:\n{}\n\nRespond with only the topic name.",
            TOPIC_LABELS.join(", ")
        ),
        TaskKind::EntityExtraction => {
            "Extract all named entities (people, organizations, locations, products, etc.) mentioned in the input.\n\
             Return the entities as a JSON list of strings.\n\
             Example format: [\"Apple\", \"Tim Cook\", \"California\"]"
                .to_string()
        }
        TaskKind::SentimentAnalysis => {
            "Analyze the sentiment of the input text.\n\
             Return only one of these labels: Positive, Negative, or Neutral."
                .to_string()
        }
    };

    format!(
        "Context:\n{}\n\nInput:\n{}\n\nTask:\n{}",
        context, text, instructions
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context_and_input() {
        let prompt = build_prompt(TaskKind::Summarization, "prior summary", "new article");
        assert!(prompt.contains("Context:\nprior summary"));
        assert!(prompt.contains("Input:\nnew article"));
        assert!(prompt.contains("Summarize the input"));
    }

    #[test]
    fn test_classification_prompt_lists_all_labels() {
        let prompt = build_prompt(TaskKind::Classification, "", "some text");
        for label in TOPIC_LABELS {
            assert!(prompt.contains(label), "missing label {}", label);
        }
    }

    #[test]
    fn test_sentiment_prompt_names_labels() {
        let prompt = build_prompt(TaskKind::SentimentAnalysis, "", "great product");
        assert!(prompt.contains("Positive, Negative, or Neutral"));
    }

    #[test]
    fn test_empty_context_still_has_section() {
        let prompt = build_prompt(TaskKind::EntityExtraction, "", "text");
        assert!(prompt.starts_with("Context:\n\n"));
    }
}
