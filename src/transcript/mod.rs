//! Transcript sources for video ingestion.
//!
//! A transcript source turns a source identifier (a video id or URL) into
//! plain text ready for chunking.

mod youtube;

pub use youtube::{parse_json3, YoutubeTranscriptSource};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the full transcript text for a source.
    async fn fetch_transcript(&self, source_id: &str) -> Result<String>;
}
