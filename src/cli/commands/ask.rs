//! Ask command implementation.

use super::setup::run_setup;
use crate::cli::{resolve_credential, Output, SourceArgs};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    source: &SourceArgs,
    api_key: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let credential = resolve_credential(api_key, &settings)?;
    let orchestrator = Orchestrator::new(settings)?;

    run_setup(&orchestrator, source, &credential).await?;

    let spinner = Output::spinner("Thinking...");
    let result = orchestrator.query(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for (rank, source) in response.sources.iter().enumerate() {
                    Output::source(rank + 1, source.segment.order, source.score, &source.segment.content);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
