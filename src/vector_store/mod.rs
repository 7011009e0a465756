//! Vector store abstraction for Parley.
//!
//! Holds the embedded segments of one ingested source and answers top-k
//! similarity queries against them.

mod memory;

pub use memory::MemoryVectorStore;

use crate::chunking::Segment;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A segment paired with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub segment: Segment,
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    pub fn new(segment: Segment, embedding: Vec<f32>) -> Self {
        Self { segment, embedding }
    }
}

/// A search result with score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched segment.
    pub segment: Segment,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
pub trait VectorStore: Send + Sync {
    /// Return the `limit` most similar segments, best first.
    ///
    /// Equal scores keep insertion order. Fails with `IndexEmpty` when the
    /// store holds nothing.
    fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension shared by every stored embedding.
    fn dimensions(&self) -> Option<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
