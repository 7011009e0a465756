//! Test doubles for the pipeline's remote collaborators.

use crate::embedding::Embedder;
use crate::error::{ParleyError, Result};
use crate::orchestrator::Providers;
use crate::rag::Generator;
use crate::transcript::TranscriptSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const VOCABULARY: [&str; 8] = ["apple", "banana", "cherry", "date", "hello", "world", "rust", "video"];

/// Counts vocabulary words, plus a constant bias dimension so no vector is zero.
pub struct KeywordEmbedder {
    fail: bool,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn vector(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let mut vector: Vec<f32> = VOCABULARY
            .iter()
            .map(|word| lowered.matches(word).count() as f32)
            .collect();
        vector.push(1.0);
        vector
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(ParleyError::Embedding("embedding backend unreachable".to_string()));
        }
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail {
            return Err(ParleyError::Embedding("embedding backend unreachable".to_string()));
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(VOCABULARY.len() + 1)
    }
}

/// Answers `answer 1`, `answer 2`, ... and records every prompt it sees.
#[derive(Default)]
pub struct ScriptedGenerator {
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    fail_next: AtomicBool,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with a generation error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ParleyError::Generation("model unavailable".to_string()));
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("answer {}", n))
    }
}

/// Serves transcripts from a fixed map.
#[derive(Default)]
pub struct StaticTranscripts {
    transcripts: HashMap<String, String>,
}

impl StaticTranscripts {
    pub fn with(mut self, source_id: &str, text: &str) -> Self {
        self.transcripts.insert(source_id.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl TranscriptSource for StaticTranscripts {
    async fn fetch_transcript(&self, source_id: &str) -> Result<String> {
        self.transcripts
            .get(source_id)
            .cloned()
            .ok_or_else(|| ParleyError::InvalidInput(format!("no transcript for {}", source_id)))
    }
}

/// Hands out the shared fakes regardless of credential.
pub struct FakeProviders {
    pub generator: Arc<ScriptedGenerator>,
    pub fail_embedding: bool,
}

impl FakeProviders {
    pub fn new() -> Self {
        Self {
            generator: Arc::new(ScriptedGenerator::new()),
            fail_embedding: false,
        }
    }
}

impl Providers for FakeProviders {
    fn embedder(&self, _credential: &str) -> Result<Arc<dyn Embedder>> {
        if self.fail_embedding {
            Ok(Arc::new(KeywordEmbedder::failing()))
        } else {
            Ok(Arc::new(KeywordEmbedder::new()))
        }
    }

    fn generator(&self, _credential: &str) -> Result<Arc<dyn Generator>> {
        Ok(self.generator.clone())
    }
}
