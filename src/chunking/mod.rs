//! Text chunking strategies for breaking sources into searchable segments.
//!
//! Provides different strategies for splitting text into overlapping segments.

mod recursive;
mod window;

pub use recursive::RecursiveChunker;
pub use window::WindowChunker;

use crate::config::ChunkingSettings;
use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};

/// A contiguous span of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Text content of this segment.
    pub content: String,
    /// Order of this segment in the source.
    pub order: usize,
    /// Character offset of the segment's first character in the source.
    pub start: usize,
}

impl Segment {
    /// Create a new segment.
    pub fn new(content: impl Into<String>, order: usize, start: usize) -> Self {
        Self {
            content: content.into(),
            order,
            start,
        }
    }

    /// Length of this segment in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Chunking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    /// Fixed character windows with overlap.
    Window,
    /// Separator-aware splitting (paragraphs, lines, words, characters).
    Recursive,
}

impl std::str::FromStr for ChunkingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "window" | "fixed" => Ok(ChunkingStrategy::Window),
            "recursive" => Ok(ChunkingStrategy::Recursive),
            _ => Err(format!("Unknown chunking strategy: {}", s)),
        }
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Target segment length in characters.
    pub chunk_size: usize,
    /// Characters shared with the previous segment.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 3000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Build and validate a config from settings.
    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        let config = Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        };
        config.validate()?;
        Ok(config)
    }

    /// Overlap must leave room for the window to advance.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(ParleyError::Config(format!(
                "invalid chunking parameters: size {}, overlap {}",
                self.chunk_size, self.chunk_overlap
            )));
        }
        Ok(())
    }
}

/// Trait for text chunking implementations.
pub trait Chunker: Send + Sync {
    /// Split text into ordered segments. Empty text yields no segments.
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Segment>;
}

/// Create a chunker based on the strategy.
pub fn create_chunker(strategy: ChunkingStrategy) -> Box<dyn Chunker> {
    match strategy {
        ChunkingStrategy::Window => Box::new(WindowChunker::new()),
        ChunkingStrategy::Recursive => Box::new(RecursiveChunker::new()),
    }
}
