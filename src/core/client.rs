//! HTTP-backed model loader and inference client

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::model::{ModelLoader, Seq2SeqModel};
use crate::core::models::{Direction, GenerationConfig, ModelSnapshot};

/// Loads IndicTrans2 models from the model hub and serves them through a
/// hosted inference endpoint
#[derive(Debug, Clone)]
pub struct HubModelLoader {
    client: reqwest::Client,
    config: Arc<ServiceConfig>,
}

impl HubModelLoader {
    /// Create a new loader
    pub fn new(config: Arc<ServiceConfig>) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TranslationError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        authorize(builder, &self.config.api_token)
    }
}

fn authorize(builder: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
    if token.is_empty() {
        builder
    } else {
        builder.header("Authorization", format!("Bearer {}", token))
    }
}

#[async_trait]
impl ModelLoader for HubModelLoader {
    async fn fetch(&self, direction: Direction) -> Result<ModelSnapshot> {
        let model_id = self.config.model_id(direction);
        let url = format!(
            "{}/api/models/{}",
            self.config.hub_endpoint.trim_end_matches('/'),
            model_id
        );

        info!("Resolving model {} from {}", model_id, url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| TranslationError::model_unavailable(&model_id, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslationError::model_unavailable(
                &model_id,
                format!("hub returned {}: {}", status.as_u16(), error_text),
            ));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslationError::model_unavailable(&model_id, e))?;

        let revision = json["sha"].as_str().map(|s| s.to_string());
        debug!("Model {} resolved to revision {:?}", model_id, revision);

        Ok(ModelSnapshot::new(model_id, direction, revision))
    }

    async fn instantiate(&self, snapshot: &ModelSnapshot) -> Result<Arc<dyn Seq2SeqModel>> {
        if snapshot.model_id.is_empty() {
            return Err(TranslationError::model_unavailable(
                "<unnamed>",
                "snapshot has no model id",
            ));
        }

        let url = format!(
            "{}/models/{}",
            self.config.inference_endpoint.trim_end_matches('/'),
            snapshot.model_id
        );

        Ok(Arc::new(RemoteSeq2SeqModel {
            client: self.client.clone(),
            url,
            api_token: self.config.api_token.clone(),
            model_id: snapshot.model_id.clone(),
        }))
    }
}

/// Model served by a hosted inference endpoint
#[derive(Debug, Clone)]
pub struct RemoteSeq2SeqModel {
    client: reqwest::Client,
    url: String,
    api_token: String,
    model_id: String,
}

#[async_trait]
impl Seq2SeqModel for RemoteSeq2SeqModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, batch: &[String], generation: &GenerationConfig) -> Result<Vec<String>> {
        let body = serde_json::json!({
            "inputs": batch,
            "parameters": {
                "num_beams": generation.num_beams,
                "num_return_sequences": generation.num_return_sequences,
                "max_length": generation.max_length,
            },
            "options": {
                "wait_for_model": true
            }
        });

        debug!("Sending {} sentences to {}", batch.len(), self.url);

        let response = authorize(self.client.post(&self.url), &self.api_token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(TranslationError::inference)?;

        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Inference call for {} returned {}", self.model_id, status_code);

            if status_code == 404 {
                return Err(TranslationError::model_unavailable(&self.model_id, error_text));
            }

            return Err(TranslationError::inference(format!(
                "endpoint returned {}: {}",
                status_code, error_text
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(TranslationError::inference)?;
        parse_generations(&json, batch.len())
    }
}

/// Pull one decoded string per input out of an inference response
///
/// Items are either `{"translation_text": ..}` / `{"generated_text": ..}`
/// objects or, when several sequences are returned, arrays of them; only the
/// first sequence of each item is kept.
fn parse_generations(json: &serde_json::Value, expected: usize) -> Result<Vec<String>> {
    let items = json
        .as_array()
        .ok_or_else(|| TranslationError::inference("response is not a list"))?;

    if items.len() != expected {
        return Err(TranslationError::inference(format!(
            "expected {} generations, got {}",
            expected,
            items.len()
        )));
    }

    items
        .iter()
        .map(|item| {
            let first = item.as_array().and_then(|seqs| seqs.first()).unwrap_or(item);
            first["translation_text"]
                .as_str()
                .or_else(|| first["generated_text"].as_str())
                .map(|s| s.to_string())
                .ok_or_else(|| TranslationError::inference("no generated text in response item"))
        })
        .collect()
}
