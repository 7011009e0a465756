//! CLI output formatting utilities.

use crate::conversation::MemoryEntry;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one retrieved segment.
    pub fn source(rank: usize, order: usize, score: f32, content: &str) {
        println!(
            "\n{} {} (segment {}, score: {:.2})",
            style(">>").green(),
            style(format!("#{}", rank)).bold(),
            order,
            score
        );
        println!("   {}", content_preview(content, 200));
    }

    /// Print the conversation memory.
    pub fn history(entries: &[MemoryEntry]) {
        if entries.is_empty() {
            Output::info("No conversation yet.");
            return;
        }
        for (i, entry) in entries.iter().enumerate() {
            println!("  {} {}", style(format!("{}. Q:", i + 1)).green().bold(), entry.question);
            println!("     {} {}", style("A:").cyan().bold(), content_preview(&entry.answer, 200));
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short\ntext", 20), "short text");
        assert_eq!(content_preview("ééééé", 3), "ééé...");
    }
}
