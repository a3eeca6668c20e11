// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmented NLP pipeline

pub mod rag;
pub mod task;

pub use rag::{parse_entity_list, NlpPipeline, PipelineError};
pub use task::{build_prompt, TOPIC_LABELS};
