// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory vector store with snapshot persistence
//!
//! Holds one record per processed text: the embedding (in the flat index)
//! plus parallel text / output / task-kind sequences. The index and the
//! sequences are mutated together; after any completed operation their
//! lengths are equal. Persistence is a full snapshot of two files under a
//! data directory, with a load-time consistency check that discards a
//! corrupt snapshot and restarts empty.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::StoreError;
use super::index::FlatIndex;

const INDEX_FILE: &str = "index.bin";
const RECORDS_FILE: &str = "records.bin";

/// Which NLP operation produced a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Summarization,
    Classification,
    EntityExtraction,
    SentimentAnalysis,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Summarization => "summarization",
            TaskKind::Classification => "classification",
            TaskKind::EntityExtraction => "entity_extraction",
            TaskKind::SentimentAnalysis => "sentiment_analysis",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One nearest-neighbor match returned from [`VectorStore::search`]
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub text: String,
    pub output: String,
    pub task_kind: TaskKind,
    pub distance: f32,
}

/// Serialized form of the non-index half of a snapshot
#[derive(Debug, Serialize, Deserialize)]
struct RecordData {
    texts: Vec<String>,
    outputs: Vec<String>,
    task_kinds: Vec<TaskKind>,
}

/// Append-only record store with an exact nearest-neighbor index
#[derive(Debug)]
pub struct VectorStore {
    index: FlatIndex,
    texts: Vec<String>,
    outputs: Vec<String>,
    task_kinds: Vec<TaskKind>,
}

impl VectorStore {
    /// Create an empty store for embeddings of dimension `dim`
    pub fn new(dim: usize) -> Self {
        Self {
            index: FlatIndex::new(dim),
            texts: Vec::new(),
            outputs: Vec::new(),
            task_kinds: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Append one record
    ///
    /// The index and the parallel sequences grow together; a dimension
    /// mismatch fails before anything is mutated.
    pub fn add(
        &mut self,
        embedding: &[f32],
        text: &str,
        output: &str,
        task_kind: TaskKind,
    ) -> Result<(), StoreError> {
        self.index.add(embedding)?;
        self.texts.push(text.to_string());
        self.outputs.push(output.to_string());
        self.task_kinds.push(task_kind);
        Ok(())
    }

    /// Return up to `top_k` records nearest to `embedding`
    ///
    /// Results are ordered by ascending squared-L2 distance, ties broken by
    /// insertion order. An empty store yields an empty result.
    pub fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>, StoreError> {
        let neighbors = self.index.search(embedding, top_k)?;

        Ok(neighbors
            .into_iter()
            .map(|(idx, distance)| SearchHit {
                text: self.texts[idx].clone(),
                output: self.outputs[idx].clone(),
                task_kind: self.task_kinds[idx],
                distance,
            })
            .collect())
    }

    /// Write a full snapshot under `dir`, creating the directory if absent
    ///
    /// Two files are produced: the serialized index and the parallel record
    /// sequences. Each file is written to a temp path and renamed into
    /// place, but the pair is not swapped atomically; a reader racing the
    /// rename can see a mismatched pair, which the load-time consistency
    /// check repairs. Acceptable for a single-process deployment.
    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(dir)?;

        write_atomic(&dir.join(INDEX_FILE), &bincode::serialize(&self.index)?)?;

        let records = RecordData {
            texts: self.texts.clone(),
            outputs: self.outputs.clone(),
            task_kinds: self.task_kinds.clone(),
        };
        write_atomic(&dir.join(RECORDS_FILE), &bincode::serialize(&records)?)?;

        Ok(())
    }

    /// Restore the store from a snapshot under `dir`
    ///
    /// Missing or unreadable files are reported as errors for the caller to
    /// downgrade. A snapshot whose index row count disagrees with the record
    /// sequences is corrupt: both files are deleted and the store resets to
    /// empty with its dimension preserved. Repair is deliberate policy, not
    /// an error.
    pub fn load(&mut self, dir: &Path) -> Result<(), StoreError> {
        let index_path = dir.join(INDEX_FILE);
        let records_path = dir.join(RECORDS_FILE);

        let index: FlatIndex = bincode::deserialize(&fs::read(&index_path)?)?;
        let records: RecordData = bincode::deserialize(&fs::read(&records_path)?)?;

        let consistent = index.len() == records.texts.len()
            && records.texts.len() == records.outputs.len()
            && records.outputs.len() == records.task_kinds.len();

        if !consistent {
            tracing::warn!(
                index_rows = index.len(),
                text_rows = records.texts.len(),
                "snapshot row counts disagree, deleting corrupt snapshot and starting fresh"
            );
            let _ = fs::remove_file(&index_path);
            let _ = fs::remove_file(&records_path);

            let dim = self.dim();
            *self = VectorStore::new(dim);
            return Ok(());
        }

        self.index = index;
        self.texts = records.texts;
        self.outputs = records.outputs;
        self.task_kinds = records.task_kinds;

        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
