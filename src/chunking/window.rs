//! Fixed-window chunking implementation.
//!
//! Splits text into windows of `chunk_size` characters, each starting
//! `chunk_overlap` characters before the end of the previous one.

use super::{Chunker, ChunkingConfig, Segment};

/// Fixed-window chunker.
pub struct WindowChunker;

impl WindowChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for WindowChunker {
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Segment> {
        let mut segments = Vec::new();

        if text.is_empty() {
            return segments;
        }

        // Byte offset of every character boundary, including the end of text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total_chars = boundaries.len() - 1;
        let step = config.chunk_size.saturating_sub(config.chunk_overlap).max(1);

        let mut start = 0;
        loop {
            let end = (start + config.chunk_size).min(total_chars);
            segments.push(Segment::new(
                &text[boundaries[start]..boundaries[end]],
                segments.len(),
                start,
            ));

            if end == total_chars {
                break;
            }
            start += step;
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, chunk_overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(WindowChunker::new().chunk("", &config(10, 2)).is_empty());
    }

    #[test]
    fn test_short_text_is_one_segment() {
        let segments = WindowChunker::new().chunk("hello world", &ChunkingConfig::default());
        assert_eq!(segments, vec![Segment::new("hello world", 0, 0)]);
    }

    #[test]
    fn test_windows_overlap_and_cover_text() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let segments = WindowChunker::new().chunk(text, &config(10, 3));

        let contents: Vec<&str> = segments.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxyz"]);

        // Each segment starts `overlap` characters before the previous one ends.
        for pair in segments.windows(2) {
            let chars: Vec<char> = pair[0].content.chars().collect();
            let tail: String = chars[chars.len() - 3..].iter().collect();
            assert!(pair[1].content.starts_with(&tail));
        }
        assert_eq!(segments.last().unwrap().order, 3);

        let starts: Vec<usize> = segments.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 7, 14, 21]);
        for segment in &segments {
            let expected: String = text.chars().skip(segment.start).take(segment.char_len()).collect();
            assert_eq!(segment.content, expected);
        }
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_fragment() {
        let segments = WindowChunker::new().chunk("abcdefghij", &config(10, 2));
        assert_eq!(segments.len(), 1);

        let segments = WindowChunker::new().chunk("abcdefghijklmnop", &config(10, 2));
        let contents: Vec<&str> = segments.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["abcdefghij", "ijklmnop"]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "ééééé";
        let segments = WindowChunker::new().chunk(text, &config(3, 1));
        let contents: Vec<&str> = segments.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["ééé", "ééé"]);
        assert_eq!(segments[1].start, 2);
    }
}
