//! Shared source setup for the chat and ask commands.

use crate::cli::{Output, SourceArgs};
use crate::orchestrator::{Orchestrator, SetupReport, SourceKind};
use anyhow::{Context, Result};

/// Index the source named on the command line, with a spinner.
pub(crate) async fn run_setup(
    orchestrator: &Orchestrator,
    source: &SourceArgs,
    credential: &str,
) -> Result<SetupReport> {
    let text = match (&source.text, &source.text_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let spinner = Output::spinner("Indexing source...");

    let result = match (&source.video, text) {
        (Some(video), _) => {
            spinner.set_message(format!("Fetching transcript for {}...", video));
            orchestrator.setup_from_source(video, credential).await
        }
        (None, text) => {
            orchestrator
                .setup_from_text(text.as_deref().unwrap_or_default(), credential)
                .await
        }
    };

    spinner.finish_and_clear();

    let report = result?;
    let label = match &report.source {
        SourceKind::Text => "text".to_string(),
        SourceKind::Video { source_id } => format!("video {}", source_id),
    };
    Output::success(&format!(
        "Indexed {} ({} characters, {} segments)",
        label, report.text_length, report.segment_count
    ));

    Ok(report)
}
