//! Vector index access
//!
//! The index itself is an external service; this module defines the
//! query contract and an HTTP client for Chroma.

mod chroma;

pub use chroma::{ChromaClient, CollectionInfo};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Nearest-neighbour query result, one row per query embedding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub documents: Vec<Vec<Option<String>>>,
    #[serde(default)]
    pub distances: Vec<Vec<f64>>,
}

impl QueryResult {
    /// Build a single-row result
    pub fn single(documents: Vec<String>, distances: Vec<f64>) -> Self {
        Self {
            documents: vec![documents.into_iter().map(Some).collect()],
            distances: vec![distances],
        }
    }

    /// Passages and distances of the first row, in index order
    pub fn passages(&self) -> Vec<(&str, f64)> {
        let documents = self.documents.first().map(Vec::as_slice).unwrap_or(&[]);
        let distances = self.distances.first().map(Vec::as_slice).unwrap_or(&[]);
        documents
            .iter()
            .zip(distances)
            .filter_map(|(doc, dist)| doc.as_deref().map(|d| (d, *dist)))
            .collect()
    }
}

/// Vector index query trait
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return the `top_k` stored passages nearest to `embedding`
    async fn query(&self, collection: &str, embedding: &[f32], top_k: usize)
        -> Result<QueryResult>;

    /// Names of all collections in the index
    async fn list_collections(&self) -> Result<Vec<String>>;
}

/// Collection name for vectors produced by `embedding_model`
///
/// Characters outside `[A-Za-z0-9._-]` become `-`, so `llama2:7b` maps to
/// `<prefix>llama2-7b`.
pub fn collection_name(prefix: &str, embedding_model: &str) -> String {
    let model: String = embedding_model
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{}{}", prefix, model)
}
