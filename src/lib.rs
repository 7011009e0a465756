//! Parley - talk to a video or a document
//!
//! Index a YouTube transcript or any text and ask questions about it, with a
//! short conversational memory carried between questions.
//!
//! # Overview
//!
//! Parley allows you to:
//! - Index raw text or the captions of a YouTube video
//! - Ask follow-up questions answered from the indexed content
//! - Serve the same session over a small HTTP API
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `chunking` - Splitting text into overlapping segments
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory similarity index
//! - `conversation` - Bounded question/answer memory
//! - `rag` - Prompt composition, generation and the indexed engine
//! - `transcript` - Transcript sources (YouTube)
//! - `orchestrator` - The session object tying it all together
//!
//! # Example
//!
//! ```rust,no_run
//! use parley::config::Settings;
//! use parley::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credential = settings.credential_from_env().unwrap_or_default();
//!     let session = Orchestrator::new(settings)?;
//!
//!     let report = session.setup_from_source("dQw4w9WgXcQ", &credential).await?;
//!     println!("Indexed {} segments", report.segment_count);
//!
//!     let response = session.query("What is the song about?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod transcript;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ParleyError, Result, SetupError};
