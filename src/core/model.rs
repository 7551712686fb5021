//! Seams to the external pretrained model

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::errors::Result;
use crate::core::models::{Direction, GenerationConfig, ModelSnapshot};

/// A loaded sequence-to-sequence model
///
/// Tokenization, beam search and detokenization all happen inside the
/// model artifact: callers hand in tag-prefixed sentences and get back
/// one decoded string per input.
#[async_trait]
pub trait Seq2SeqModel: Send + Sync {
    /// Model identifier, for logging and error reporting
    fn model_id(&self) -> &str;

    /// Generate one output per input sentence, in input order
    async fn generate(&self, batch: &[String], generation: &GenerationConfig) -> Result<Vec<String>>;
}

/// Resolves and instantiates models for a direction
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Resolve the pretrained model for a direction from its source
    async fn fetch(&self, direction: Direction) -> Result<ModelSnapshot>;

    /// Build a usable model handle from a snapshot
    async fn instantiate(&self, snapshot: &ModelSnapshot) -> Result<Arc<dyn Seq2SeqModel>>;

    /// Fetch then instantiate
    async fn load(&self, direction: Direction) -> Result<Arc<dyn Seq2SeqModel>> {
        let snapshot = self.fetch(direction).await?;
        self.instantiate(&snapshot).await
    }
}
