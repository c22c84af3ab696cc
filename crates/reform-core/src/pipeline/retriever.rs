//! Context retrieval from the vector index

use crate::cache::{BoundedCache, CacheStats};
use crate::error::{ReformError, Result};
use crate::index::VectorIndex;
use crate::llm::Embedder;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of a context lookup
///
/// Every variant yields a usable context string; the variants keep "nothing
/// relevant" and "lookup failed" apart for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// Served from the context cache
    Cached(String),
    /// At least one passage was under the distance threshold
    Found {
        context: String,
        kept: usize,
        total: usize,
    },
    /// The index answered but no passage qualified
    Empty { total: usize },
    /// Embedding or index query failed
    Failed(String),
}

impl Retrieval {
    pub fn context(&self) -> &str {
        match self {
            Self::Cached(context) | Self::Found { context, .. } => context,
            Self::Empty { .. } | Self::Failed(_) => "",
        }
    }

    pub fn into_context(self) -> String {
        match self {
            Self::Cached(context) | Self::Found { context, .. } => context,
            Self::Empty { .. } | Self::Failed(_) => String::new(),
        }
    }
}

/// Keep passages strictly closer than `max_distance`, in index order
pub fn filter_passages<'a>(passages: &[(&'a str, f64)], max_distance: f64) -> Vec<&'a str> {
    passages
        .iter()
        .filter(|(_, distance)| *distance < max_distance)
        .map(|(doc, _)| *doc)
        .collect()
}

/// Embeds queries, searches the index and caches the joined passages
pub struct ContextRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    collection: String,
    max_distance: f64,
    cache: BoundedCache<String, String>,
}

impl ContextRetriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
        max_distance: f64,
        cache_size: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            collection: collection.into(),
            max_distance,
            cache: BoundedCache::new(cache_size),
        }
    }

    /// Context for `query`, empty when nothing relevant or on failure
    pub async fn retrieve(&self, query: &str, top_k: usize) -> String {
        self.retrieve_detailed(query, top_k).await.into_context()
    }

    /// Context lookup that reports how the result was obtained
    pub async fn retrieve_detailed(&self, query: &str, top_k: usize) -> Retrieval {
        let key = query.to_string();
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("Context cache hit");
            return Retrieval::Cached(cached);
        }

        match self.lookup(query, top_k).await {
            Ok((context, kept, total)) => {
                self.cache.insert(key, context.clone());
                if kept == 0 {
                    tracing::info!(
                        "No passage under distance {} ({} checked)",
                        self.max_distance,
                        total
                    );
                    Retrieval::Empty { total }
                } else {
                    Retrieval::Found {
                        context,
                        kept,
                        total,
                    }
                }
            }
            Err(e) => {
                tracing::error!("{}", e);
                Retrieval::Failed(e.to_string())
            }
        }
    }

    async fn lookup(&self, query: &str, top_k: usize) -> Result<(String, usize, usize)> {
        let start = Instant::now();
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| ReformError::Retrieval(format!("embedding: {}", e)))?;
        let result = self
            .index
            .query(&self.collection, &embedding, top_k)
            .await
            .map_err(|e| ReformError::Retrieval(format!("index query: {}", e)))?;

        let passages = result.passages();
        let kept = filter_passages(&passages, self.max_distance);
        tracing::info!(
            "Context retrieved in {:.2}s ({} of {} passages kept)",
            start.elapsed().as_secs_f64(),
            kept.len(),
            passages.len()
        );
        Ok((kept.join(" "), kept.len(), passages.len()))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
