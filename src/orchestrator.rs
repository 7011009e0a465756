//! Session orchestrator for Parley.
//!
//! Owns the active pipeline and the conversation memory, and exposes the
//! setup/query operations every front end uses.
//!
//! Queries run while holding the memory lock, so concurrent queries are
//! serialized and history never interleaves. Setup builds the new pipeline
//! without holding any lock and swaps it in at the end. Locks are always
//! taken memory first, then pipeline.
//!
//! `get_memory` and `clear_memory` wait for an in-flight query to finish.
//! `get_status` does not: it reads a memory size counter kept next to the lock.

use crate::chunking::{create_chunker, ChunkingConfig, ChunkingStrategy};
use crate::config::{Prompts, Settings};
use crate::conversation::{ConversationMemory, MemoryEntry};
use crate::embedding::Embedder;
use crate::error::{ParleyError, Result, SetupError};
use crate::openai::OpenAIProviders;
use crate::rag::{Generator, PromptComposer, RagEngine};
use crate::transcript::{TranscriptSource, YoutubeTranscriptSource};
use crate::vector_store::SearchResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

/// Builds the remote components for a credential.
pub trait Providers: Send + Sync {
    fn embedder(&self, credential: &str) -> Result<Arc<dyn Embedder>>;
    fn generator(&self, credential: &str) -> Result<Arc<dyn Generator>>;
}

/// Where the indexed text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Video { source_id: String },
}

/// Result of a successful setup.
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    pub source: SourceKind,
    pub segment_count: usize,
    /// Length of the ingested text in characters.
    pub text_length: usize,
    pub indexed_at: DateTime<Utc>,
}

/// Result of a successful query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    /// Conversation memory after this exchange was recorded.
    pub memory: Vec<MemoryEntry>,
    /// Retrieved segments in rank order.
    pub sources: Vec<SearchResult>,
}

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub initialized: bool,
    pub indexed: bool,
    pub memory_size: usize,
}

/// The session object: one active pipeline plus its conversation memory.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    providers: Arc<dyn Providers>,
    transcripts: Arc<dyn TranscriptSource>,
    engine: RwLock<Option<Arc<RagEngine>>>,
    memory: Mutex<ConversationMemory>,
    /// Mirrors `memory.len()`; only written while the memory lock is held.
    memory_size: AtomicUsize,
}

impl Orchestrator {
    /// Create an orchestrator talking to OpenAI-compatible services and YouTube.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let providers = Arc::new(OpenAIProviders::new(settings.clone()));
        let transcripts = Arc::new(YoutubeTranscriptSource::with_languages(
            settings.transcript.languages.clone(),
        ));

        Self::with_components(settings, prompts, providers, transcripts)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        providers: Arc<dyn Providers>,
        transcripts: Arc<dyn TranscriptSource>,
    ) -> Result<Self> {
        settings.validate()?;
        let memory = ConversationMemory::with_capacity(settings.memory.capacity);

        Ok(Self {
            settings,
            prompts,
            providers,
            transcripts,
            engine: RwLock::new(None),
            memory: Mutex::new(memory),
            memory_size: AtomicUsize::new(0),
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index raw text, replacing any previous source.
    #[instrument(skip(self, text, credential), fields(text_len = text.len()))]
    pub async fn setup_from_text(&self, text: &str, credential: &str) -> Result<SetupReport> {
        self.install(text, credential, SourceKind::Text).await
    }

    /// Fetch a transcript and index it, replacing any previous source.
    #[instrument(skip(self, credential))]
    pub async fn setup_from_source(&self, source_id: &str, credential: &str) -> Result<SetupReport> {
        let transcript = self
            .transcripts
            .fetch_transcript(source_id)
            .await
            .map_err(|e| match e {
                ParleyError::Setup(_) => e,
                other => SetupError::TranscriptFetch(other.to_string()).into(),
            })?;
        info!("Fetched transcript ({} characters)", transcript.chars().count());

        self.install(
            &transcript,
            credential,
            SourceKind::Video {
                source_id: source_id.to_string(),
            },
        )
        .await
    }

    async fn install(&self, text: &str, credential: &str, source: SourceKind) -> Result<SetupReport> {
        if text.trim().is_empty() {
            return Err(SetupError::EmptyInput.into());
        }

        let strategy: ChunkingStrategy = self
            .settings
            .chunking
            .strategy
            .parse()
            .map_err(ParleyError::Config)?;
        let chunker = create_chunker(strategy);
        let chunking = ChunkingConfig::from_settings(&self.settings.chunking)?;

        let embedder = self
            .providers
            .embedder(credential)
            .map_err(|e| SetupError::Provider(e.to_string()))?;
        let generator = self
            .providers
            .generator(credential)
            .map_err(|e| SetupError::Provider(e.to_string()))?;

        let engine = RagEngine::build(
            text,
            chunker.as_ref(),
            &chunking,
            embedder,
            generator,
            PromptComposer::new(self.prompts.clone()),
            self.settings.retrieval.top_k,
        )
        .await?;

        let report = SetupReport {
            source,
            segment_count: engine.segment_count(),
            text_length: text.chars().count(),
            indexed_at: engine.built_at(),
        };

        let mut memory = self.memory.lock().await;
        let mut slot = self.engine.write().await;
        if slot.is_some() {
            info!("Replacing the active index");
        }
        *slot = Some(Arc::new(engine));
        if !self.settings.memory.retain_on_setup {
            memory.clear();
            self.memory_size.store(0, Ordering::SeqCst);
        }

        info!("Indexed {} segments", report.segment_count);
        Ok(report)
    }

    /// Answer a question against the active source and record the exchange.
    #[instrument(skip(self, question))]
    pub async fn query(&self, question: &str) -> Result<QueryResponse> {
        let mut memory = self.memory.lock().await;
        let engine = self.active_engine().await?;

        let question = question.trim();
        if question.is_empty() {
            return Err(ParleyError::InvalidInput("question is empty".to_string()));
        }

        let history = memory.snapshot(self.settings.memory.prompt_window);
        let answer = match engine.answer(question, &history).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Query failed, memory left untouched: {}", e);
                return Err(e);
            }
        };

        memory.append(question, answer.text.clone());
        self.memory_size.store(memory.len(), Ordering::SeqCst);

        Ok(QueryResponse {
            answer: answer.text,
            memory: memory.all(),
            sources: answer.sources,
        })
    }

    /// Full retained conversation, oldest first.
    pub async fn get_memory(&self) -> Result<Vec<MemoryEntry>> {
        let memory = self.memory.lock().await;
        self.active_engine().await?;
        Ok(memory.all())
    }

    /// Forget the conversation, keeping the index.
    pub async fn clear_memory(&self) -> Result<()> {
        let mut memory = self.memory.lock().await;
        self.active_engine().await?;
        memory.clear();
        self.memory_size.store(0, Ordering::SeqCst);
        info!("Conversation memory cleared");
        Ok(())
    }

    /// Current session state. Never waits on an in-flight query.
    pub async fn get_status(&self) -> Status {
        let engine = self.engine.read().await;
        Status {
            initialized: engine.is_some(),
            indexed: engine.as_ref().is_some_and(|e| e.is_indexed()),
            memory_size: self.memory_size.load(Ordering::SeqCst),
        }
    }

    async fn active_engine(&self) -> Result<Arc<RagEngine>> {
        self.engine
            .read()
            .await
            .clone()
            .ok_or(ParleyError::NotInitialized)
    }
}
