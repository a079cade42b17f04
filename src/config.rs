use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, ParleyError};

fn default_revision() -> String {
    "main".to_string()
}

fn default_load_timeout_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelsConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Base URL of the model hub serving tokenizer artifacts
    pub hub_endpoint: String,
    /// Hub revision (branch, tag or commit) to fetch artifacts from
    #[serde(default = "default_revision")]
    pub revision: String,
    /// Local directory for downloaded artifacts
    pub cache_dir: String,
    /// Base URL of the generation server
    pub inference_endpoint: String,
    /// Upper bound on generated tokens per request
    pub max_new_tokens: usize,
    /// Give up on a model load after this many seconds (0 = wait forever)
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,
    /// Timeout for a single HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Synthesize the translated text when requested
    pub enabled: bool,
    /// Text-to-speech endpoint
    pub endpoint: String,
    /// Directory for generated MP3 files
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelsConfig {
                hub_endpoint: "https://huggingface.co".to_string(),
                revision: default_revision(),
                cache_dir: ".parley/models".to_string(),
                inference_endpoint: "http://localhost:8080".to_string(),
                max_new_tokens: 512,
                load_timeout_secs: default_load_timeout_secs(),
                request_timeout_secs: default_request_timeout_secs(),
            },
            speech: SpeechConfig {
                enabled: true,
                endpoint: "https://translate.google.com/translate_tts".to_string(),
                output_dir: ".parley/audio".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ParleyError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ParleyError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ParleyError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ParleyError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
