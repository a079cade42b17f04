// Translation model abstraction
//
// A loaded model is a tokenizer paired with a generator, built by a
// ModelProvider and kept in a ModelCache:
// - vocab: Marian vocabulary tokenizer
// - hub: provider fetching artifacts from a model hub, with an HTTP generator
// - cache: at-most-one-load-per-identifier cache

pub mod cache;
pub mod hub;
pub mod vocab;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use cache::ModelCache;
pub use hub::{HttpGenerator, HubModelProvider};
pub use vocab::VocabTokenizer;
use crate::error::Result;

/// Text <-> token id conversion for one model
pub trait Tokenizer: Send + Sync {
    /// Encode text into model input ids
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode generated ids back to text, dropping special markers
    fn decode(&self, ids: &[u32]) -> Result<String>;
}

/// Sequence-to-sequence generation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, input_ids: &[u32]) -> Result<Vec<u32>>;
}

/// Builds a ready-to-use model for an identifier
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn load(&self, model_id: &str) -> Result<LoadedModel>;
}

/// In-memory tokenizer + generator for one model identifier
pub struct LoadedModel {
    pub model_id: String,
    pub tokenizer: Arc<dyn Tokenizer>,
    pub generator: Arc<dyn Generator>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    pub fn new(
        model_id: impl Into<String>,
        tokenizer: Arc<dyn Tokenizer>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            tokenizer,
            generator,
            loaded_at: Utc::now(),
        }
    }

    /// Encode, generate and decode one piece of text
    pub async fn translate(&self, text: &str) -> Result<String> {
        let input_ids = self.tokenizer.encode(text)?;
        let output_ids = self.generator.generate(&input_ids).await?;
        self.tokenizer.decode(&output_ids)
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("model_id", &self.model_id)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}
