use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{Result, ParleyError};
use super::{LoadedModel, ModelProvider};

type Slot = Arc<OnceCell<Arc<LoadedModel>>>;

/// Process-wide model store keyed by model identifier.
///
/// Each identifier owns one slot; the first caller to reach an empty slot
/// runs the load while later callers wait on the same slot. A failed load
/// leaves the slot empty, so the next caller loads again.
pub struct ModelCache {
    provider: Arc<dyn ModelProvider>,
    load_timeout: Option<Duration>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl ModelCache {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            load_timeout: None,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Abort loads that take longer than `timeout`
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached model for `model_id`, loading it on first use
    pub async fn get_or_load(&self, model_id: &str) -> Result<Arc<LoadedModel>> {
        let slot = self
            .slots()
            .entry(model_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        if let Some(model) = slot.get() {
            debug!("Model cache hit: {}", model_id);
            return Ok(model.clone());
        }

        let model = slot.get_or_try_init(|| self.load(model_id)).await?;
        Ok(model.clone())
    }

    async fn load(&self, model_id: &str) -> Result<Arc<LoadedModel>> {
        info!("Loading model {}", model_id);
        let started = Instant::now();

        let loading = self.provider.load(model_id);
        let loaded = match self.load_timeout {
            Some(limit) => tokio::time::timeout(limit, loading).await.map_err(|_| {
                ParleyError::resource_load(model_id, format!("timed out after {:?}", limit))
            })?,
            None => loading.await,
        };

        match loaded {
            Ok(model) => {
                info!("Model {} ready in {:.1}s", model_id, started.elapsed().as_secs_f64());
                Ok(Arc::new(model))
            }
            Err(e) => {
                warn!("Model {} failed to load: {}", model_id, e);
                Err(match e {
                    ParleyError::ResourceLoad { .. } => e,
                    other => ParleyError::resource_load(model_id, other),
                })
            }
        }
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.slots()
            .get(model_id)
            .is_some_and(|slot| slot.initialized())
    }

    /// Identifiers of the models currently loaded, sorted
    pub fn cached_models(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .slots()
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.cached_models().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every loaded model; in-flight loads finish into detached slots
    pub fn clear(&self) -> usize {
        let mut slots = self.slots();
        let evicted = slots.values().filter(|slot| slot.initialized()).count();
        slots.clear();
        info!("Evicted {} cached models", evicted);
        evicted
    }
}
