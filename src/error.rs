//! Error types for Parley.

use thiserror::Error;

/// Reasons a setup call can fail. The session is left as it was.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("input text is empty, nothing to index")]
    EmptyInput,

    #[error("could not fetch transcript: {0}")]
    TranscriptFetch(String),

    #[error("embedding backend failed: {0}")]
    Embedding(String),

    #[error("index build failed: {0}")]
    IndexBuild(String),

    #[error("could not create model client: {0}")]
    Provider(String),
}

/// Library-level error type for Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    #[error("Setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Not initialized: run a setup (text or video) before querying")]
    NotInitialized,

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Search attempted against an empty index")]
    IndexEmpty,

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ParleyError {
    /// HTTP status code used when this error crosses the server boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            ParleyError::Setup(_) | ParleyError::InvalidInput(_) => 400,
            ParleyError::NotInitialized => 409,
            ParleyError::Generation(_) => 502,
            _ => 500,
        }
    }

    /// Whether this error came from a failed setup call.
    pub fn is_setup(&self) -> bool {
        matches!(self, ParleyError::Setup(_))
    }
}

/// Result type alias for Parley operations.
pub type Result<T> = std::result::Result<T, ParleyError>;
