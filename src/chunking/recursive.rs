//! Separator-aware chunking implementation.
//!
//! Splits on the coarsest separator present (paragraphs, then lines, then
//! words, then characters), recursing into pieces that are still too long,
//! and merges neighbouring pieces back together up to the target size.

use super::{Chunker, ChunkingConfig, Segment};
use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character chunker.
pub struct RecursiveChunker {
    separators: Vec<String>,
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self {
            separators: SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Use a custom separator list, coarsest first.
    pub fn with_separators(separators: Vec<String>) -> Self {
        Self { separators }
    }

    /// Split `text`, whose first byte sits at `base` in the source, into
    /// chunks paired with their byte offset in the source.
    fn split_text(
        &self,
        text: &str,
        base: usize,
        separators: &[String],
        config: &ChunkingConfig,
    ) -> Vec<(usize, String)> {
        let mut separator = "";
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<(usize, &str)> = Vec::new();

        for (offset, piece) in split_keep_separator(text, separator) {
            if char_len(piece) < config.chunk_size {
                pending.push((base + offset, piece));
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(merge_pieces(&pending, config));
                pending.clear();
            }

            if remaining.is_empty() {
                chunks.push((base + offset, piece.to_string()));
            } else {
                chunks.extend(self.split_text(piece, base + offset, remaining, config));
            }
        }

        if !pending.is_empty() {
            chunks.extend(merge_pieces(&pending, config));
        }

        chunks
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }

        self.split_text(text, 0, &self.separators, config)
            .into_iter()
            .filter(|(_, chunk)| !chunk.trim().is_empty())
            .enumerate()
            .map(|(order, (offset, content))| Segment::new(content, order, char_len(&text[..offset])))
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text so every separator stays attached to the start of the piece
/// after it. Pieces carry their byte offset within `text`.
fn split_keep_separator<'a>(text: &'a str, separator: &str) -> Vec<(usize, &'a str)> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| (i, &text[i..i + c.len_utf8()]))
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push((start, &text[start..idx]));
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push((start, &text[start..]));
    }
    pieces
}

/// Greedily merge small pieces into chunks, carrying trailing pieces forward as overlap.
fn merge_pieces(pieces: &[(usize, &str)], config: &ChunkingConfig) -> Vec<(usize, String)> {
    let mut chunks = Vec::new();
    let mut current: VecDeque<(usize, &str)> = VecDeque::new();
    let mut total = 0;

    for &(offset, piece) in pieces {
        let len = char_len(piece);

        if total + len > config.chunk_size && !current.is_empty() {
            if let Some(chunk) = join_trimmed(&current) {
                chunks.push(chunk);
            }

            while total > config.chunk_overlap || (total + len > config.chunk_size && total > 0) {
                match current.pop_front() {
                    Some((_, first)) => total -= char_len(first),
                    None => break,
                }
            }
        }

        current.push_back((offset, piece));
        total += len;
    }

    if let Some(chunk) = join_trimmed(&current) {
        chunks.push(chunk);
    }

    chunks
}

/// Join consecutive pieces and trim the edges, shifting the offset past
/// any leading whitespace.
fn join_trimmed(pieces: &VecDeque<(usize, &str)>) -> Option<(usize, String)> {
    let (offset, _) = pieces.front()?;
    let joined: String = pieces.iter().map(|(_, piece)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        return None;
    }
    let leading = joined.len() - joined.trim_start().len();
    Some((offset + leading, trimmed.to_string()))
}
