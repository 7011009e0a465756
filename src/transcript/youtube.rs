//! YouTube transcript source implementation.
//!
//! Captions are downloaded with `yt-dlp` in the `json3` format and flattened
//! into a single space-separated text.

use super::TranscriptSource;
use crate::error::{ParleyError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// YouTube caption source.
pub struct YoutubeTranscriptSource {
    video_id_regex: Regex,
    languages: Vec<String>,
}

#[derive(Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Flatten a `json3` caption document into one line of text.
pub fn parse_json3(content: &str) -> Result<String> {
    let doc: Json3 = serde_json::from_str(content)?;

    let snippets: Vec<String> = doc
        .events
        .iter()
        .map(|event| event.segs.iter().map(|s| s.utf8.as_str()).collect::<String>())
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .collect();

    Ok(snippets.join(" "))
}

impl YoutubeTranscriptSource {
    pub fn new() -> Self {
        Self::with_languages(vec!["en".to_string()])
    }

    /// Create a source preferring the given caption languages, in order.
    pub fn with_languages(languages: Vec<String>) -> Self {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        Self {
            video_id_regex,
            languages,
        }
    }

    /// Extract video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Download captions for `video_id` in `sub_langs` into `dir`.
    async fn download_captions(&self, video_id: &str, sub_langs: &str, dir: &Path) -> Result<()> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let template = dir.join("%(id)s.%(ext)s");

        let output = tokio::process::Command::new("yt-dlp")
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .args(["--sub-langs", sub_langs])
            .args(["--sub-format", "json3"])
            .arg("--no-warnings")
            .arg("-o")
            .arg(&template)
            .arg(&url)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ParleyError::ToolNotFound("yt-dlp".to_string())
                } else {
                    ParleyError::InvalidInput(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParleyError::InvalidInput(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        Ok(())
    }

    /// Pick the caption file matching the earliest preferred language.
    fn pick_caption_file(&self, video_id: &str, dir: &Path) -> Result<Option<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json3"))
            .collect();
        files.sort();

        for lang in &self.languages {
            let wanted = format!("{}.{}.json3", video_id, lang);
            if let Some(path) = files.iter().find(|p| p.file_name().is_some_and(|n| n == wanted.as_str())) {
                return Ok(Some(path.clone()));
            }
        }

        Ok(files.into_iter().next())
    }
}

impl Default for YoutubeTranscriptSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    #[instrument(skip(self))]
    async fn fetch_transcript(&self, source_id: &str) -> Result<String> {
        let video_id = self.extract_video_id(source_id).ok_or_else(|| {
            ParleyError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", source_id))
        })?;

        let dir = tempfile::tempdir()?;
        let preferred = self.languages.join(",");

        info!("Fetching captions for {} ({})", video_id, preferred);
        self.download_captions(&video_id, &preferred, dir.path()).await?;

        let mut caption_file = self.pick_caption_file(&video_id, dir.path())?;
        if caption_file.is_none() {
            warn!("No captions in {}, trying any available language", preferred);
            self.download_captions(&video_id, "all,-live_chat", dir.path()).await?;
            caption_file = self.pick_caption_file(&video_id, dir.path())?;
        }

        let path = caption_file.ok_or_else(|| {
            ParleyError::InvalidInput(format!("No captions available for video {}", video_id))
        })?;
        debug!("Using caption file {}", path.display());

        let content = tokio::fs::read_to_string(&path).await?;
        let transcript = parse_json3(&content)?;

        if transcript.is_empty() {
            return Err(ParleyError::InvalidInput(format!(
                "Captions for video {} are empty",
                video_id
            )));
        }

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let source = YoutubeTranscriptSource::new();

        assert_eq!(
            source.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id(" dQw4w9WgXcQ "),
            Some("dQw4w9WgXcQ".to_string())
        );

        assert_eq!(source.extract_video_id("not-a-video-id"), None);
        assert_eq!(source.extract_video_id(""), None);
    }

    #[test]
    fn test_parse_json3() {
        let content = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "segs": [{"utf8": "hello"}, {"utf8": " there"}]},
                {"tStartMs": 1200, "aAppend": 1, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 1500},
                {"tStartMs": 2000, "segs": [{"utf8": "general   kenobi"}]}
            ]
        }"#;

        assert_eq!(parse_json3(content).unwrap(), "hello there general kenobi");
    }

    #[test]
    fn test_parse_json3_rejects_garbage() {
        assert!(matches!(parse_json3("<html>"), Err(ParleyError::Json(_))));
    }

    #[test]
    fn test_pick_caption_file_prefers_language_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["abcdefghijk.de.json3", "abcdefghijk.en.json3", "abcdefghijk.info.json"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }

        let source = YoutubeTranscriptSource::with_languages(vec!["fr".to_string(), "en".to_string()]);
        let picked = source.pick_caption_file("abcdefghijk", dir.path()).unwrap().unwrap();
        assert!(picked.ends_with("abcdefghijk.en.json3"));

        let source = YoutubeTranscriptSource::with_languages(vec!["fr".to_string()]);
        let picked = source.pick_caption_file("abcdefghijk", dir.path()).unwrap().unwrap();
        assert!(picked.ends_with("abcdefghijk.de.json3"));
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected_before_download() {
        let source = YoutubeTranscriptSource::new();
        let err = source.fetch_transcript("definitely not a video").await.unwrap_err();
        assert!(matches!(err, ParleyError::InvalidInput(_)));
    }
}
