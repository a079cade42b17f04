use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, ParleyError};
use crate::language::{LanguagePair, ModelBindings};
use crate::model::ModelCache;

/// Maps (source, target) requests to a bound model and runs the translation.
pub struct TranslationResolver {
    bindings: ModelBindings,
    cache: Arc<ModelCache>,
}

impl TranslationResolver {
    pub fn new(cache: Arc<ModelCache>) -> Self {
        Self {
            bindings: ModelBindings,
            cache,
        }
    }

    /// Model identifier bound to `source` -> `target`.
    ///
    /// Codes are matched exactly; equal codes are never bound.
    pub fn resolve(&self, source: &str, target: &str) -> Result<&'static str> {
        let pair = LanguagePair::new(source, target);
        self.bindings
            .lookup(&pair)
            .ok_or_else(|| ParleyError::UnsupportedPair {
                from: pair.source,
                to: pair.target,
            })
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// Any text is passed to the model as-is, including empty input.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let model_id = match self.resolve(source, target) {
            Ok(id) => id,
            Err(e) => {
                info!("No model for {}-{}", source, target);
                return Err(e);
            }
        };
        debug!("{}-{} resolved to {}", source, target, model_id);

        let model = self.cache.get_or_load(model_id).await?;

        match model.translate(text).await {
            Ok(translation) => {
                debug!("Translated {} chars with {}", text.chars().count(), model_id);
                Ok(translation)
            }
            Err(e) => {
                warn!("Translation with {} failed: {}", model_id, e);
                Err(match e {
                    ParleyError::Inference { .. } => e,
                    other => ParleyError::inference(model_id, other),
                })
            }
        }
    }

    pub fn supported_pairs(&self) -> impl Iterator<Item = (LanguagePair, &'static str)> {
        self.bindings.iter()
    }

    pub fn cached_models(&self) -> Vec<String> {
        self.cache.cached_models()
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }
}
