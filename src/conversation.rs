//! Short-term conversational memory.
//!
//! A bounded log of question/answer pairs. The oldest pairs are evicted first
//! once the capacity is exceeded.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Text used in prompts when there is no history yet.
pub const NO_HISTORY: &str = "No previous conversation.";

/// Default number of retained exchanges.
pub const DEFAULT_CAPACITY: usize = 10;

/// One question and the answer that was given to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub question: String,
    pub answer: String,
}

/// Bounded, chronologically ordered conversation log.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    entries: VecDeque<MemoryEntry>,
    capacity: usize,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record an exchange, dropping the oldest ones beyond capacity.
    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.entries.push_back(MemoryEntry {
            question: question.into(),
            answer: answer.into(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Format the most recent `limit` exchanges for a prompt, oldest first.
    pub fn snapshot(&self, limit: usize) -> String {
        if self.entries.is_empty() {
            return NO_HISTORY.to_string();
        }

        let skip = self.entries.len().saturating_sub(limit);
        self.entries
            .iter()
            .skip(skip)
            .map(|e| format!("Q: {}\nA: {}", e.question, e.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Every retained exchange in chronological order.
    pub fn all(&self) -> Vec<MemoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_sentinel() {
        let memory = ConversationMemory::new();
        assert_eq!(memory.snapshot(3), NO_HISTORY);
        assert!(memory.all().is_empty());
    }

    #[test]
    fn test_snapshot_takes_recent_window_oldest_first() {
        let mut memory = ConversationMemory::new();
        for i in 1..=5 {
            memory.append(format!("q{}", i), format!("a{}", i));
        }

        assert_eq!(memory.snapshot(3), "Q: q3\nA: a3\nQ: q4\nA: a4\nQ: q5\nA: a5");
        assert_eq!(memory.snapshot(10).lines().count(), 10);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut memory = ConversationMemory::new();
        memory.append("what?", "that.");
        assert_eq!(memory.snapshot(3), memory.snapshot(3));
    }

    #[test]
    fn test_cap_keeps_latest_in_order() {
        let mut memory = ConversationMemory::new();
        for i in 0..25 {
            memory.append(format!("q{}", i), format!("a{}", i));
            assert!(memory.len() <= DEFAULT_CAPACITY);
        }

        let questions: Vec<String> = memory.all().into_iter().map(|e| e.question).collect();
        let expected: Vec<String> = (15..25).map(|i| format!("q{}", i)).collect();
        assert_eq!(questions, expected);
    }

    #[test]
    fn test_clear() {
        let mut memory = ConversationMemory::with_capacity(2);
        memory.append("q", "a");
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.capacity(), 2);
    }
}
