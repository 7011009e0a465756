//! Interactive chat command.

use super::setup::run_setup;
use crate::cli::{resolve_credential, Output, SourceArgs};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Run the interactive chat command.
pub async fn run_chat(source: &SourceArgs, api_key: Option<&str>, settings: Settings) -> Result<()> {
    let credential = resolve_credential(api_key, &settings)?;
    let orchestrator = Orchestrator::new(settings)?;

    run_setup(&orchestrator, source, &credential).await?;

    println!("\n{}", style("Parley Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask anything about the source. Commands: 'history', 'clear', 'status', 'exit'.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            orchestrator.clear_memory().await?;
            Output::info("Conversation history cleared.");
            continue;
        }

        if input.eq_ignore_ascii_case("history") {
            Output::history(&orchestrator.get_memory().await?);
            continue;
        }

        if input.eq_ignore_ascii_case("status") {
            let status = orchestrator.get_status().await;
            Output::kv("Initialized", &status.initialized.to_string());
            Output::kv("Indexed", &status.indexed.to_string());
            Output::kv("Memory", &format!("{} exchanges", status.memory_size));
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = orchestrator.query(input).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                debug!("Answered from {} segments", response.sources.len());
                println!("\n{} {}\n", style("Parley:").cyan().bold(), response.answer);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
