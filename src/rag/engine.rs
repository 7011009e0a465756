//! The indexed pipeline for one ingested source.

use super::{format_context, Generator, PromptComposer};
use crate::chunking::{Chunker, ChunkingConfig};
use crate::embedding::Embedder;
use crate::error::{ParleyError, Result, SetupError};
use crate::vector_store::{IndexEntry, MemoryVectorStore, SearchResult, VectorStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A generated answer together with the segments it was based on.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Retrieved segments in rank order.
    pub sources: Vec<SearchResult>,
}

/// RAG engine over one built index.
///
/// Immutable once built; a new source means a new engine.
pub struct RagEngine {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    store: MemoryVectorStore,
    composer: PromptComposer,
    top_k: usize,
    built_at: DateTime<Utc>,
}

impl RagEngine {
    /// Chunk, embed and index `text`.
    ///
    /// Every failure is reported as a setup error.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub async fn build(
        text: &str,
        chunker: &dyn Chunker,
        chunking: &ChunkingConfig,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        composer: PromptComposer,
        top_k: usize,
    ) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(SetupError::EmptyInput.into());
        }

        chunking.validate()?;
        let segments = chunker.chunk(text, chunking);
        if segments.is_empty() {
            return Err(SetupError::EmptyInput.into());
        }
        info!("Chunked source into {} segments", segments.len());

        let texts: Vec<String> = segments.iter().map(|s| s.content.clone()).collect();
        let embeddings = embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| SetupError::Embedding(e.to_string()))?;

        if embeddings.len() != segments.len() {
            return Err(SetupError::IndexBuild(format!(
                "{} segments but {} embeddings",
                segments.len(),
                embeddings.len()
            ))
            .into());
        }

        let entries = segments
            .into_iter()
            .zip(embeddings)
            .map(|(segment, embedding)| IndexEntry::new(segment, embedding))
            .collect();
        let store = MemoryVectorStore::build(entries)?;

        Ok(Self {
            embedder,
            generator,
            store,
            composer,
            top_k: top_k.max(1),
            built_at: Utc::now(),
        })
    }

    /// Number of indexed segments.
    pub fn segment_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_indexed(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Embed the question and return the `top_k` closest segments.
    #[instrument(skip(self, question))]
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(question).await?;
        let results = self.store.search(&query_embedding, self.top_k)?;
        debug!("Retrieved {} segments", results.len());
        Ok(results)
    }

    /// Answer a question given the formatted conversation history.
    ///
    /// Runs retrieval, composes the prompt and calls the generator, in that
    /// order. Nothing is recorded here; the caller owns the memory.
    #[instrument(skip(self, question, history))]
    pub async fn answer(&self, question: &str, history: &str) -> Result<Answer> {
        let sources = self.retrieve(question).await?;
        let context = format_context(&sources);
        let prompt = self.composer.compose(&context, history, question);

        let text = self.generator.generate(&prompt).await.map_err(|e| match e {
            ParleyError::Generation(_) => e,
            other => ParleyError::Generation(other.to_string()),
        })?;

        Ok(Answer { text, sources })
    }
}
