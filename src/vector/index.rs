// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Exact flat nearest-neighbor index
//!
//! Brute-force squared-L2 scan over all stored vectors. Exact by contract:
//! results are never approximated, and ties are broken by insertion order.
//! The backing structure is an implementation detail behind `add`/`search`/
//! serde; it can be swapped for a smarter index as long as exactness holds
//! at the current scale.

use serde::{Deserialize, Serialize};

use super::errors::StoreError;

/// Flat index over fixed-dimension embedding vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index for vectors of dimension `dim`
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vectors currently indexed
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a vector to the index
    ///
    /// # Arguments
    /// * `vector` - Embedding of dimension `dim`
    ///
    /// # Returns
    /// * `Ok(())` if appended
    /// * `Err(StoreError::DimensionMismatch)` if the length is wrong
    pub fn add(&mut self, vector: &[f32]) -> Result<(), StoreError> {
        if vector.len() != self.dim {
            return Err(StoreError::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }

        self.vectors.push(vector.to_vec());
        Ok(())
    }

    /// Find the `k` nearest vectors to `query` under squared Euclidean distance
    ///
    /// # Returns
    /// * `Ok(Vec<(index, distance)>)` sorted by ascending distance, at most
    ///   `k` entries, fewer if the index holds fewer vectors. Empty index
    ///   yields an empty result, not an error.
    /// * `Err(StoreError::DimensionMismatch)` if the query length is wrong
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, StoreError> {
        if query.len() != self.dim {
            return Err(StoreError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, squared_l2(query, v)))
            .collect();

        // Stable sort keeps insertion order for equal distances
        results.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index_search() {
        let index = FlatIndex::new(3);
        let results = index.search(&[0.0, 0.0, 0.0], 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let mut index = FlatIndex::new(4);
        let err = index.add(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        ));
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_search_ascending_distance_order() {
        let mut index = FlatIndex::new(2);
        index.add(&[10.0, 0.0]).unwrap();
        index.add(&[1.0, 0.0]).unwrap();
        index.add(&[5.0, 0.0]).unwrap();

        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert!(results[0].1 < results[1].1);
        assert!(results[1].1 < results[2].1);
    }

    #[test]
    fn test_search_tie_breaks_by_insertion_order() {
        let mut index = FlatIndex::new(2);
        index.add(&[1.0, 0.0]).unwrap();
        index.add(&[-1.0, 0.0]).unwrap();
        index.add(&[0.0, 1.0]).unwrap();

        // All three are equidistant from the origin
        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_k_larger_than_len() {
        let mut index = FlatIndex::new(2);
        index.add(&[1.0, 1.0]).unwrap();
        index.add(&[2.0, 2.0]).unwrap();

        let results = index.search(&[0.0, 0.0], 100).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut index = FlatIndex::new(2);
        index.add(&[1.0, 2.0]).unwrap();
        index.add(&[3.0, 4.0]).unwrap();

        let bytes = bincode::serialize(&index).unwrap();
        let restored: FlatIndex = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.dim(), 2);
        assert_eq!(restored.len(), 2);
    }
}
