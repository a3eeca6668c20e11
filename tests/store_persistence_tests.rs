// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Snapshot persistence tests for the vector store

use std::fs;

use rag_nlp_node::vector::{StoreHandle, TaskKind, VectorStore};

fn populated_store(dim: usize, n: usize) -> VectorStore {
    let mut store = VectorStore::new(dim);
    for i in 0..n {
        let mut embedding = vec![0.0; dim];
        embedding[0] = i as f32;
        store
            .add(
                &embedding,
                &format!("text {}", i),
                &format!("output {}", i),
                TaskKind::Summarization,
            )
            .unwrap();
    }
    store
}

#[test]
fn test_save_writes_exactly_two_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = populated_store(4, 2);
    store.save(dir.path()).unwrap();

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["index.bin", "records.bin"]);
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = populated_store(4, 3);
    store.save(dir.path()).unwrap();

    let mut restored = VectorStore::new(4);
    restored.load(dir.path()).unwrap();

    assert_eq!(restored.len(), 3);
    assert_eq!(restored.dim(), 4);

    // Identical ordered record sequence under the same query
    let query = vec![0.0; 4];
    let original_hits = store.search(&query, 10).unwrap();
    let restored_hits = restored.search(&query, 10).unwrap();
    assert_eq!(original_hits.len(), restored_hits.len());
    for (a, b) in original_hits.iter().zip(restored_hits.iter()) {
        assert_eq!(a.text, b.text);
        assert_eq!(a.output, b.output);
        assert_eq!(a.task_kind, b.task_kind);
        assert_eq!(a.distance, b.distance);
    }
}

#[test]
fn test_load_repairs_when_index_is_longer() {
    let long_dir = tempfile::tempdir().unwrap();
    let short_dir = tempfile::tempdir().unwrap();
    populated_store(4, 3).save(long_dir.path()).unwrap();
    populated_store(4, 1).save(short_dir.path()).unwrap();

    // Index from the 3-record store, records from the 1-record store
    fs::copy(
        short_dir.path().join("records.bin"),
        long_dir.path().join("records.bin"),
    )
    .unwrap();

    let mut store = VectorStore::new(4);
    store.load(long_dir.path()).unwrap();
    assert_eq!(store.len(), 0);
    assert_eq!(store.dim(), 4);

    // Repair deletes the corrupt snapshot pair
    assert!(!long_dir.path().join("index.bin").exists());
    assert!(!long_dir.path().join("records.bin").exists());
}

#[test]
fn test_load_repairs_when_records_are_longer() {
    let long_dir = tempfile::tempdir().unwrap();
    let short_dir = tempfile::tempdir().unwrap();
    populated_store(4, 3).save(long_dir.path()).unwrap();
    populated_store(4, 1).save(short_dir.path()).unwrap();

    // Index from the 1-record store, records from the 3-record store
    fs::copy(
        long_dir.path().join("records.bin"),
        short_dir.path().join("records.bin"),
    )
    .unwrap();

    let mut store = VectorStore::new(4);
    store.load(short_dir.path()).unwrap();
    assert_eq!(store.len(), 0);
    assert_eq!(store.dim(), 4);
}

#[test]
fn test_load_missing_files_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = VectorStore::new(4);
    assert!(store.load(dir.path()).is_err());
}

#[tokio::test]
async fn test_handle_initialize_restores_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    populated_store(4, 2).save(dir.path()).unwrap();

    let handle = StoreHandle::initialize(4, dir.path());
    assert_eq!(handle.len().await, 2);
}

#[tokio::test]
async fn test_handle_initialize_downgrades_corrupt_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    populated_store(4, 2).save(dir.path()).unwrap();
    fs::write(dir.path().join("records.bin"), b"not a snapshot").unwrap();

    let handle = StoreHandle::initialize(4, dir.path());
    assert_eq!(handle.len().await, 0);
}

#[tokio::test]
async fn test_handle_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let handle = StoreHandle::initialize(3, dir.path());
    handle
        .add(&[1.0, 2.0, 3.0], "a text", "an output", TaskKind::SentimentAnalysis)
        .await
        .unwrap();
    handle.save().await.unwrap();

    let restored = StoreHandle::initialize(3, dir.path());
    assert_eq!(restored.len().await, 1);
    let hits = restored.search(&[1.0, 2.0, 3.0], 5).await.unwrap();
    assert_eq!(hits[0].output, "an output");
    assert_eq!(hits[0].task_kind, TaskKind::SentimentAnalysis);
}
