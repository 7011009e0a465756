//! In-memory vector store implementation.
//!
//! Built once from a full set of entries and never mutated afterwards.
//! Search is an exact scan, which is plenty for a single source.

use super::{cosine_similarity, IndexEntry, SearchResult, VectorStore};
use crate::error::{ParleyError, Result, SetupError};
use tracing::{debug, instrument};

/// In-memory vector store.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    entries: Vec<IndexEntry>,
    dimensions: Option<usize>,
}

impl MemoryVectorStore {
    /// Create an empty store. Searching it fails until replaced by a built one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a non-empty set of entries with uniform dimensions.
    pub fn build(entries: Vec<IndexEntry>) -> Result<Self> {
        let first = entries
            .first()
            .ok_or_else(|| SetupError::IndexBuild("no entries to index".to_string()))?;
        let dimensions = first.embedding.len();

        if dimensions == 0 {
            return Err(SetupError::IndexBuild("embeddings have zero dimensions".to_string()).into());
        }

        if let Some(bad) = entries.iter().find(|e| e.embedding.iter().any(|v| !v.is_finite())) {
            return Err(SetupError::IndexBuild(format!(
                "segment {} has a non-finite embedding value",
                bad.segment.order
            ))
            .into());
        }

        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimensions) {
            return Err(SetupError::IndexBuild(format!(
                "segment {} has {} dimensions, expected {}",
                bad.segment.order,
                bad.embedding.len(),
                dimensions
            ))
            .into());
        }

        Ok(Self {
            entries,
            dimensions: Some(dimensions),
        })
    }
}

impl VectorStore for MemoryVectorStore {
    #[instrument(skip(self, query_embedding), fields(entries = self.entries.len()))]
    fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        if self.entries.is_empty() {
            return Err(ParleyError::IndexEmpty);
        }

        if self.dimensions != Some(query_embedding.len()) {
            return Err(ParleyError::VectorStore(format!(
                "query has {} dimensions, index has {}",
                query_embedding.len(),
                self.dimensions.unwrap_or_default()
            )));
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                segment: entry.segment.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);

        debug!("Returning {} of {} entries", results.len(), self.entries.len());
        Ok(results)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}
