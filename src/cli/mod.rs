//! CLI module for Parley.

pub mod commands;
mod output;

pub use output::Output;

use crate::config::Settings;
use crate::error::{ParleyError, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parley - talk to a video or a document
///
/// Index a YouTube transcript or a text file, then ask questions about it.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// What to index before answering.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Index the contents of a text file
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Index text given inline
    #[arg(long)]
    pub text: Option<String>,

    /// Index the captions of a YouTube video (URL or ID)
    #[arg(long)]
    pub video: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat about a video or document
    Chat {
        #[command(flatten)]
        source: SourceArgs,

        /// API key (defaults to the configured environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Ask a single question about a video or document
    Ask {
        /// The question to ask
        question: String,

        #[command(flatten)]
        source: SourceArgs,

        /// API key (defaults to the configured environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}

/// Pick the explicit key if given, otherwise the configured environment variable.
pub fn resolve_credential(explicit: Option<&str>, settings: &Settings) -> Result<String> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    settings.credential_from_env().ok_or_else(|| {
        ParleyError::Config(format!(
            "{} not set. Pass --api-key or set it with: export {}='...'",
            settings.generation.api_key_env, settings.generation.api_key_env
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_credential_wins() {
        let settings = Settings::default();
        assert_eq!(resolve_credential(Some(" sk-abc "), &settings).unwrap(), "sk-abc");
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let mut settings = Settings::default();
        settings.generation.api_key_env = "PARLEY_TEST_UNSET_KEY".to_string();

        let err = resolve_credential(None, &settings).unwrap_err();
        assert!(err.to_string().contains("PARLEY_TEST_UNSET_KEY"));
    }

    #[test]
    fn test_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["parley", "chat"]).is_err());
        assert!(Cli::try_parse_from(["parley", "chat", "--text", "a", "--video", "b"]).is_err());

        let cli = Cli::try_parse_from(["parley", "ask", "why?", "--video", "dQw4w9WgXcQ"]).unwrap();
        match cli.command {
            Commands::Ask { question, source, .. } => {
                assert_eq!(question, "why?");
                assert_eq!(source.video.as_deref(), Some("dQw4w9WgXcQ"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
