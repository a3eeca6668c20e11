// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared handle to the process-wide vector store
//!
//! One store instance is constructed at startup and cloned (cheaply, via
//! `Arc`) into every component that needs it. Reads take a shared lock,
//! writes and snapshots take the exclusive lock, so concurrent snapshot
//! writes can never interleave on the same files.
//!
//! Two in-flight requests may both `search` before either `add`s; each sees
//! the store as of its own search and appends afterwards. Append-only
//! writes make this safe (no lost updates), a request may just miss a
//! sibling's fresh record.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::errors::StoreError;
use super::store::{SearchHit, TaskKind, VectorStore};

/// Cloneable handle owning the single shared [`VectorStore`]
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<VectorStore>>,
    data_dir: PathBuf,
}

impl StoreHandle {
    /// Construct the shared store, restoring a snapshot if one exists
    ///
    /// Any load failure (missing files, unreadable snapshot) is downgraded
    /// to a fresh empty store; initialization never fails.
    pub fn initialize(dim: usize, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let mut store = VectorStore::new(dim);

        match store.load(&data_dir) {
            Ok(()) => {
                tracing::info!(records = store.len(), "vector store loaded from disk");
            }
            Err(e) => {
                tracing::info!(error = %e, "no usable snapshot, starting with empty vector store");
                store = VectorStore::new(dim);
            }
        }

        Self {
            inner: Arc::new(RwLock::new(store)),
            data_dir,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchHit>, StoreError> {
        self.inner.read().await.search(embedding, top_k)
    }

    pub async fn add(
        &self,
        embedding: &[f32],
        text: &str,
        output: &str,
        task_kind: TaskKind,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .add(embedding, text, output, task_kind)
    }

    /// Persist a full snapshot of the current store state
    ///
    /// Re-serializes the entire store on every call; the simplicity/cost
    /// tradeoff is isolated here so an incremental strategy can replace it
    /// without touching callers. Holds the exclusive lock across the file
    /// writes so concurrent saves are serialized.
    pub async fn save(&self) -> Result<(), StoreError> {
        let store = self.inner.write().await;
        store.save(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_add_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let handle = StoreHandle::initialize(2, dir.path());
        handle
            .add(&[1.0, 0.0], "text", "output", TaskKind::Classification)
            .await
            .unwrap();

        assert_eq!(handle.len().await, 1);
        let hits = handle.search(&[1.0, 0.0], 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].output, "output");
    }

    #[tokio::test]
    async fn test_initialize_without_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let handle = StoreHandle::initialize(16, dir.path().join("missing"));
        assert_eq!(handle.len().await, 0);
    }
}
