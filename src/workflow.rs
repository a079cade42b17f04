use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ParleyError;
use crate::language::Language;
use crate::resolver::TranslationResolver;
use crate::speech::{SpeechSynthesizer, save_audio};

/// Result of one user interaction
#[derive(Debug)]
pub enum Outcome {
    /// Nothing but whitespace was entered
    EmptyInput,
    /// Source and target are the same language; nothing to do
    SameLanguage(Language),
    Translated {
        text: String,
        audio: Option<PathBuf>,
        speech_warning: Option<String>,
    },
    Failed(ParleyError),
}

impl Outcome {
    /// Line shown to the user for outcomes that carry no translation
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::EmptyInput => Some("⚠️ Please enter some text.".to_string()),
            Self::SameLanguage(_) => Some("ℹ️ Source and target languages are same.".to_string()),
            Self::Failed(e) => Some(e.user_message()),
            Self::Translated { .. } => None,
        }
    }
}

/// Front-end orchestration around the resolver: input checks, translation
/// and optional speech output
pub struct Workflow {
    resolver: Arc<TranslationResolver>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    audio_dir: PathBuf,
}

impl Workflow {
    pub fn new(resolver: Arc<TranslationResolver>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            synthesizer: None,
            audio_dir: audio_dir.into(),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn resolver(&self) -> &Arc<TranslationResolver> {
        &self.resolver
    }

    pub async fn run(&self, text: &str, source: Language, target: Language, speak: bool) -> Outcome {
        if text.trim().is_empty() {
            return Outcome::EmptyInput;
        }

        if source == target {
            info!("Skipping translation: {} to itself", source);
            return Outcome::SameLanguage(source);
        }

        info!("Translating {} -> {}", source, target);
        let translation = match self.resolver.translate(text, source.code(), target.code()).await {
            Ok(translation) => translation,
            Err(e) => return Outcome::Failed(e),
        };

        let (audio, speech_warning) = if speak {
            match self.speak(&translation, target).await {
                Ok(path) => (Some(path), None),
                Err(e) => {
                    warn!("Speech output failed: {}", e);
                    (None, Some(e.user_message()))
                }
            }
        } else {
            (None, None)
        };

        Outcome::Translated {
            text: translation,
            audio,
            speech_warning,
        }
    }

    async fn speak(&self, text: &str, language: Language) -> crate::error::Result<PathBuf> {
        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or_else(|| ParleyError::Speech("no speech synthesizer configured".to_string()))?;

        let audio = synthesizer.synthesize(text, language.code()).await?;
        save_audio(&audio, &self.audio_dir, language.code()).await
    }
}
