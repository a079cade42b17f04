//! In-memory provider for exercising the cache and resolver without a hub.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, ParleyError};
use super::{Generator, LoadedModel, ModelProvider, Tokenizer};

const EOS: u32 = 0;

/// Code points in, code points out
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let mut ids: Vec<u32> = text.chars().map(|c| c as u32).collect();
        ids.push(EOS);
        Ok(ids)
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        ids.iter()
            .filter(|id| **id != EOS)
            .map(|id| char::from_u32(*id).ok_or_else(|| ParleyError::inference("char", "invalid code point")))
            .collect()
    }
}

/// Prefixes the input with `[<model name>] ` so tests can see which model ran
pub struct TaggingGenerator {
    tag: String,
}

#[async_trait]
impl Generator for TaggingGenerator {
    async fn generate(&self, input_ids: &[u32]) -> Result<Vec<u32>> {
        let mut output: Vec<u32> = self.tag.chars().map(|c| c as u32).collect();
        output.extend_from_slice(input_ids);
        Ok(output)
    }
}

#[derive(Default)]
pub struct FakeProvider {
    delay: Option<Duration>,
    loads: Mutex<Vec<String>>,
    fail_once: Mutex<HashSet<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The first load of `model_id` fails with a resource load error
    pub fn failing_once(self, model_id: &str) -> Self {
        self.fail_once.lock().unwrap().insert(model_id.to_string());
        self
    }

    pub fn load_count(&self, model_id: &str) -> usize {
        self.loads.lock().unwrap().iter().filter(|id| *id == model_id).count()
    }

    pub fn total_loads(&self) -> usize {
        self.loads.lock().unwrap().len()
    }

    pub fn loads_by_model(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for id in self.loads.lock().unwrap().iter() {
            *counts.entry(id.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[async_trait]
impl ModelProvider for FakeProvider {
    async fn load(&self, model_id: &str) -> Result<LoadedModel> {
        self.loads.lock().unwrap().push(model_id.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_once.lock().unwrap().remove(model_id) {
            return Err(ParleyError::resource_load(model_id, "simulated download failure"));
        }

        let name = model_id.rsplit('/').next().unwrap_or(model_id);
        let generator = TaggingGenerator {
            tag: format!("[{}] ", name),
        };
        Ok(LoadedModel::new(model_id, Arc::new(CharTokenizer), Arc::new(generator)))
    }
}
