// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector store: exact nearest-neighbor retrieval over processed texts
//!
//! Every completed NLP operation appends one record (embedding, source
//! text, produced output, task kind). Retrieval is an exact brute-force
//! scan; persistence is a two-file snapshot with corruption repair on load.

pub mod errors;
pub mod handle;
pub mod index;
pub mod store;

pub use errors::StoreError;
pub use handle::StoreHandle;
pub use index::FlatIndex;
pub use store::{SearchHit, TaskKind, VectorStore};
