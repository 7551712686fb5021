//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::models::{Direction, GenerationConfig};

/// Configuration for the translation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Model hub base URL, used to resolve model metadata
    pub hub_endpoint: String,
    /// Hosted inference base URL, models are served under `/models/<id>`
    pub inference_endpoint: String,
    /// Bearer token for hub and inference calls; empty means anonymous
    pub api_token: String,
    /// Model name prefix, e.g. `ai4bharat/indictrans2`
    pub model_family: String,
    /// Model size suffix, e.g. `dist-200M`
    pub model_variant: String,
    /// Directory holding `<direction>_model.json` snapshots
    pub cache_dir: PathBuf,
    /// HTTP timeout for hub and inference calls
    pub timeout_ms: u64,
    /// Decoding parameters forwarded to the model
    pub generation: GenerationConfig,
}

const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";
const DEFAULT_INFERENCE_ENDPOINT: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL_FAMILY: &str = "ai4bharat/indictrans2";
const DEFAULT_MODEL_VARIANT: &str = "dist-200M";

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            hub_endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            inference_endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            api_token: String::new(),
            model_family: DEFAULT_MODEL_FAMILY.to_string(),
            model_variant: DEFAULT_MODEL_VARIANT.to_string(),
            cache_dir: PathBuf::from("models"),
            timeout_ms: 120_000,
            generation: GenerationConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let hub_endpoint = std::env::var("HF_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_HUB_ENDPOINT.to_string());

        let inference_endpoint = std::env::var("INFERENCE_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_INFERENCE_ENDPOINT.to_string());

        let api_token = std::env::var("HF_TOKEN").unwrap_or_default();

        let model_family = std::env::var("MODEL_FAMILY")
            .unwrap_or_else(|_| DEFAULT_MODEL_FAMILY.to_string());

        let model_variant = std::env::var("MODEL_VARIANT")
            .unwrap_or_else(|_| DEFAULT_MODEL_VARIANT.to_string());

        let cache_dir = std::env::var("MODEL_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "120000".to_string())
            .parse::<u64>()?;

        let num_beams = std::env::var("NUM_BEAMS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()?;

        let max_length = std::env::var("MAX_LENGTH")
            .unwrap_or_else(|_| "256".to_string())
            .parse::<usize>()?;

        Ok(Self {
            hub_endpoint,
            inference_endpoint,
            api_token,
            model_family,
            model_variant,
            cache_dir,
            timeout_ms,
            generation: GenerationConfig {
                num_beams,
                max_length,
                ..defaults.generation
            },
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hub_endpoint.is_empty() {
            return Err(anyhow::anyhow!("Hub endpoint is required"));
        }

        if self.inference_endpoint.is_empty() {
            return Err(anyhow::anyhow!("Inference endpoint is required"));
        }

        if self.model_family.is_empty() {
            return Err(anyhow::anyhow!("Model family is required"));
        }

        if self.generation.num_beams == 0 {
            return Err(anyhow::anyhow!("num_beams must be greater than 0"));
        }

        if self.generation.num_return_sequences != 1 {
            return Err(anyhow::anyhow!("num_return_sequences must be 1"));
        }

        if self.generation.max_length == 0 {
            return Err(anyhow::anyhow!("max_length must be greater than 0"));
        }

        if self.api_token.is_empty() {
            warn!("No HF_TOKEN configured, hub and inference calls are anonymous");
        }

        Ok(())
    }

    /// Pretrained model name for a raw direction string
    pub fn model_name(&self, direction: &str) -> String {
        format!("{}-{}-{}", self.model_family, direction, self.model_variant)
    }

    /// Pretrained model name for a supported direction
    pub fn model_id(&self, direction: Direction) -> String {
        self.model_name(direction.as_str())
    }

    /// Cache path for a direction's model snapshot
    pub fn snapshot_path(&self, direction: Direction) -> PathBuf {
        self.cache_dir.join(format!("{}_model.json", direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_endpoint() {
        let config = ServiceConfig {
            inference_endpoint: "".to_string(),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_beams() {
        let mut config = ServiceConfig::default();
        config.generation.num_beams = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_model_names() {
        let config = ServiceConfig::default();
        assert_eq!(
            config.model_id(Direction::EnIndic),
            "ai4bharat/indictrans2-en-indic-dist-200M"
        );
        assert_eq!(
            config.model_id(Direction::IndicEn),
            "ai4bharat/indictrans2-indic-en-dist-200M"
        );
        assert_eq!(config.model_name("xx"), "ai4bharat/indictrans2-xx-dist-200M");
    }

    #[test]
    fn test_snapshot_path() {
        let config = ServiceConfig::default();
        assert_eq!(
            config.snapshot_path(Direction::EnIndic),
            PathBuf::from("models/en-indic_model.json")
        );
    }

    #[test]
    fn test_from_env() {
        // Single test touching these variables, so parallel tests cannot race
        std::env::set_var("MODEL_VARIANT", "1B");
        std::env::set_var("MODEL_CACHE_DIR", "/tmp/indictrans-cache");
        std::env::set_var("NUM_BEAMS", "3");
        std::env::set_var("MAX_LENGTH", "128");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.model_variant, "1B");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/indictrans-cache"));
        assert_eq!(config.generation.num_beams, 3);
        assert_eq!(config.generation.max_length, 128);
        assert_eq!(config.generation.num_return_sequences, 1);
        assert_eq!(config.model_id(Direction::EnIndic), "ai4bharat/indictrans2-en-indic-1B");

        std::env::set_var("NUM_BEAMS", "five");
        assert!(ServiceConfig::from_env().is_err());

        for key in ["MODEL_VARIANT", "MODEL_CACHE_DIR", "NUM_BEAMS", "MAX_LENGTH"] {
            std::env::remove_var(key);
        }

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.cache_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ServiceConfig::default();
        config.model_variant = "1B".to_string();
        config.to_file(&path).unwrap();

        let loaded = ServiceConfig::from_file(&path).unwrap();
        assert_eq!(loaded.model_variant, "1B");
        assert_eq!(loaded.generation, config.generation);
    }
}
