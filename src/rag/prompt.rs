//! Prompt composition.

use crate::config::Prompts;
use crate::vector_store::SearchResult;
use std::collections::HashMap;

/// Join retrieved segments with a blank line, keeping retrieval rank order.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.segment.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fills the answer template with history, context and question.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    prompts: Prompts,
}

impl PromptComposer {
    pub fn new(prompts: Prompts) -> Self {
        Self { prompts }
    }

    /// Build the single generation request for one question.
    pub fn compose(&self, context: &str, history: &str, question: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("history".to_string(), history.to_string());
        vars.insert("context".to_string(), context.to_string());
        vars.insert("question".to_string(), question.to_string());

        self.prompts.render_with_custom(&self.prompts.rag.template, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Segment;
    use crate::conversation::NO_HISTORY;

    fn result(content: &str, order: usize, score: f32) -> SearchResult {
        SearchResult {
            segment: Segment::new(content, order, 0),
            score,
        }
    }

    #[test]
    fn test_context_keeps_rank_order_and_duplicates() {
        let results = vec![
            result("later segment", 7, 0.9),
            result("earlier segment", 1, 0.8),
            result("earlier segment", 1, 0.8),
        ];
        assert_eq!(
            format_context(&results),
            "later segment\n\nearlier segment\n\nearlier segment"
        );
    }

    #[test]
    fn test_compose_fills_every_field() {
        let composer = PromptComposer::default();
        let prompt = composer.compose("CTX", NO_HISTORY, "What is it?");

        assert!(prompt.starts_with("You are a helpful assistant."));
        assert!(prompt.contains("don't know"));
        assert!(prompt.contains("Conversation History:\nNo previous conversation."));
        assert!(prompt.contains("Context: CTX"));
        assert!(prompt.ends_with("Question: What is it?"));
    }
}
