use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParleyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No model available for {from}-{to}")]
    UnsupportedPair { from: String, to: String },

    #[error("Failed to load model {model}: {reason}")]
    ResourceLoad { model: String, reason: String },

    #[error("Inference failed on model {model}: {reason}")]
    Inference { model: String, reason: String },

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
}

impl ParleyError {
    pub fn resource_load(model: &str, reason: impl ToString) -> Self {
        Self::ResourceLoad {
            model: model.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn inference(model: &str, reason: impl ToString) -> Self {
        Self::Inference {
            model: model.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Message shown to the user by the front end
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedPair { .. } => "❌ Translation not available for this pair".to_string(),
            Self::ResourceLoad { .. } => format!("⚠️ Could not load translation model: {}", self),
            Self::Inference { .. } => format!("⚠️ Translation failed: {}", self),
            Self::Speech(reason) => format!("⚠️ Could not generate speech: {}", reason),
            other => format!("⚠️ {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
