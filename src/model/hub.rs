use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs as async_fs;
use tracing::{debug, info};

use crate::config::ModelsConfig;
use crate::error::{Result, ParleyError};
use super::{Generator, LoadedModel, ModelProvider, VocabTokenizer};

/// Tokenizer artifact fetched for every model
pub const VOCAB_FILE: &str = "vocab.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub input_ids: Vec<u32>,
    pub max_new_tokens: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub output_ids: Vec<u32>,
}

/// Provider that downloads tokenizer artifacts from a model hub and runs
/// generation on a remote inference server
pub struct HubModelProvider {
    client: Client,
    config: ModelsConfig,
    cache_dir: PathBuf,
}

impl HubModelProvider {
    pub fn new(config: ModelsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("parley/0.1.0")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ParleyError::Http)?;

        let cache_dir = PathBuf::from(&config.cache_dir);
        std::fs::create_dir_all(&cache_dir)?;

        Ok(Self {
            client,
            config,
            cache_dir,
        })
    }

    /// Local directory holding the artifacts of one model
    pub fn artifact_dir(&self, model_id: &str) -> PathBuf {
        self.cache_dir.join(model_id.replace('/', "--"))
    }

    pub fn vocab_path(&self, model_id: &str) -> PathBuf {
        self.artifact_dir(model_id).join(VOCAB_FILE)
    }

    pub fn has_artifacts(&self, model_id: &str) -> bool {
        self.vocab_path(model_id).exists()
    }

    /// Fetch missing artifacts into the disk cache
    pub async fn download_artifacts(&self, model_id: &str) -> Result<PathBuf> {
        let local_path = self.vocab_path(model_id);

        if local_path.exists() {
            debug!("Artifacts for {} already at {}", model_id, local_path.display());
            return Ok(local_path);
        }

        let url = format!(
            "{}/{}/resolve/{}/{}",
            self.config.hub_endpoint.trim_end_matches('/'),
            model_id,
            self.config.revision,
            VOCAB_FILE
        );
        info!("Downloading {} for {}...", VOCAB_FILE, model_id);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .map_err(|e| ParleyError::resource_load(model_id, e))?,
        );
        pb.set_message(format!("Fetching {}", model_id));
        pb.enable_steady_tick(Duration::from_millis(120));

        let bytes = match self.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(reason) => {
                pb.abandon_with_message(format!("Failed {}", model_id));
                return Err(ParleyError::resource_load(model_id, reason));
            }
        };

        if let Err(e) = self.store(model_id, &local_path, &bytes).await {
            pb.abandon_with_message(format!("Failed {}", model_id));
            return Err(ParleyError::resource_load(
                model_id,
                format!("cannot store {}: {}", local_path.display(), e),
            ));
        }

        pb.finish_with_message(format!("Downloaded {} ({} bytes)", model_id, bytes.len()));
        info!("Stored {} at {}", VOCAB_FILE, local_path.display());

        Ok(local_path)
    }

    /// Write to a temporary file, then rename, so an interrupted download
    /// never looks like a complete artifact
    async fn store(&self, model_id: &str, local_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        async_fs::create_dir_all(self.artifact_dir(model_id)).await?;

        let temp_path = local_path.with_extension("tmp");
        async_fs::write(&temp_path, bytes).await?;
        if let Err(e) = async_fs::rename(&temp_path, local_path).await {
            let _ = async_fs::remove_file(&temp_path).await;
            return Err(e);
        }
        Ok(())
    }

    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        let response = self.client.get(url).send().await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP {} from {}", response.status(), url));
        }

        let bytes = response.bytes().await
            .map_err(|e| format!("download from {} interrupted: {}", url, e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ModelProvider for HubModelProvider {
    async fn load(&self, model_id: &str) -> Result<LoadedModel> {
        let vocab_path = self.download_artifacts(model_id).await?;

        let id = model_id.to_string();
        let tokenizer = tokio::task::spawn_blocking(move || VocabTokenizer::from_file(&id, vocab_path))
            .await
            .map_err(|e| ParleyError::resource_load(model_id, e))??;

        let generator = HttpGenerator::new(
            self.client.clone(),
            &self.config.inference_endpoint,
            model_id,
            self.config.max_new_tokens,
        );

        info!("Loaded {} ({} vocabulary pieces)", model_id, tokenizer.len());
        Ok(LoadedModel::new(model_id, Arc::new(tokenizer), Arc::new(generator)))
    }
}

/// Generation over HTTP: token ids in, token ids out
pub struct HttpGenerator {
    client: Client,
    endpoint: String,
    model_id: String,
    max_new_tokens: usize,
}

impl HttpGenerator {
    pub fn new(client: Client, endpoint: &str, model_id: &str, max_new_tokens: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model_id: model_id.to_string(),
            max_new_tokens,
        }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, input_ids: &[u32]) -> Result<Vec<u32>> {
        let request = GenerateRequest {
            model: self.model_id.clone(),
            input_ids: input_ids.to_vec(),
            max_new_tokens: self.max_new_tokens,
        };

        let url = format!("{}/generate", self.endpoint);
        debug!("Sending {} input ids to {}", input_ids.len(), url);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ParleyError::inference(&self.model_id, format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ParleyError::inference(
                &self.model_id,
                format!("inference server error {}: {}", status, error_text),
            ));
        }

        let generated: GenerateResponse = response.json().await
            .map_err(|e| ParleyError::inference(&self.model_id, format!("Failed to parse response: {}", e)))?;

        debug!("Received {} output ids", generated.output_ids.len());
        Ok(generated.output_ids)
    }
}
