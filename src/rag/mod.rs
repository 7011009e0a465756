//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Retrieval over the indexed source, prompt composition and the generation
//! call that produces the answer.

mod engine;
mod generator;
pub mod prompt;

pub use engine::{Answer, RagEngine};
pub use generator::{Generator, OpenAIGenerator};
pub use prompt::{format_context, PromptComposer};
