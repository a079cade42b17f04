use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use crate::config::SpeechConfig;
use crate::error::{Result, ParleyError};

/// Longest text the speech endpoint accepts in one request
const MAX_CHUNK_CHARS: usize = 100;

/// Text-to-speech for translated output
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// MP3 audio for `text` spoken in `language` (a short code such as "hi")
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>>;
}

/// Google Translate speech endpoint
pub struct GoogleTts {
    client: Client,
    config: SpeechConfig,
}

impl GoogleTts {
    pub fn new(config: SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (parley)")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ParleyError::Http)?;

        Ok(Self { client, config })
    }

    async fn fetch_chunk(&self, chunk: &str, language: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self.client
            .get(&self.config.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("q", chunk),
                ("tl", language),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ParleyError::Speech(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ParleyError::Speech(format!(
                "speech service returned {} for language {}",
                response.status(),
                language
            )));
        }

        let bytes = response.bytes().await
            .map_err(|e| ParleyError::Speech(format!("failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>> {
        if !self.config.enabled {
            return Err(ParleyError::Speech("speech output is disabled".to_string()));
        }

        let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ParleyError::Speech("no text to speak".to_string()));
        }

        debug!("Synthesizing {} chunks in {}", chunks.len(), language);

        // MP3 frames concatenate cleanly, so chunks are appended as-is
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, language, idx, chunks.len()).await?);
        }
        Ok(audio)
    }
}

/// Split text into pieces of at most `max_chars` characters, breaking on
/// whitespace where possible
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if word_len <= max_chars {
            current.push_str(word);
        } else {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Write audio into `output_dir` under a timestamped name
pub async fn save_audio<P: AsRef<Path>>(audio: &[u8], output_dir: P, language: &str) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).await?;

    let filename = format!("{}-{}.mp3", Utc::now().format("%Y%m%d-%H%M%S%3f"), language);
    let path = output_dir.join(filename);
    fs::write(&path, audio).await?;

    info!("Saved speech to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_split_short_text_is_one_chunk() {
        assert_eq!(split_for_speech("Hola  mundo", 100), vec!["Hola mundo".to_string()]);
    }

    #[test]
    fn test_split_breaks_on_whitespace() {
        let chunks = split_for_speech("aaa bbb ccc ddd", 7);
        assert_eq!(chunks, vec!["aaa bbb", "ccc ddd"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 7));
    }

    #[test]
    fn test_split_long_word_and_multibyte_text() {
        let chunks = split_for_speech("नमस्ते abcdefghij", 4);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
        assert_eq!(chunks.concat().replace(' ', ""), "नमस्तेabcdefghij");
    }

    #[test]
    fn test_split_empty() {
        assert!(split_for_speech("", 100).is_empty());
        assert!(split_for_speech(" \n ", 100).is_empty());
    }

    #[tokio::test]
    async fn test_disabled_synthesizer_refuses() {
        let mut config = Config::default().speech;
        config.enabled = false;
        let tts = GoogleTts::new(config).unwrap();

        let result = tts.synthesize("Hello", "en").await;
        assert!(matches!(result, Err(ParleyError::Speech(_))));
    }

    #[tokio::test]
    async fn test_empty_text_refused_without_request() {
        let mut config = Config::default().speech;
        config.endpoint = "http://127.0.0.1:9/translate_tts".to_string();
        let tts = GoogleTts::new(config).unwrap();

        match tts.synthesize("   ", "fr").await {
            Err(ParleyError::Speech(reason)) => assert_eq!(reason, "no text to speak"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_speech_error() {
        let mut config = Config::default().speech;
        config.endpoint = "http://127.0.0.1:9/translate_tts".to_string();
        let tts = GoogleTts::new(config).unwrap();

        let result = tts.synthesize("Bonjour", "fr").await;
        assert!(matches!(result, Err(ParleyError::Speech(_))));
    }

    #[tokio::test]
    async fn test_save_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_audio(b"ID3fake", dir.path().join("audio"), "hi").await.unwrap();

        assert!(path.to_string_lossy().ends_with("-hi.mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"ID3fake");
    }
}
