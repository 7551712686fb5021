//! Bhashini Translator - IndicTrans2 translation service
//!
//! This library wraps the pretrained IndicTrans2 models (English to Indic and
//! Indic to English) in a preprocess, generate, postprocess pipeline and
//! exposes it over an HTTP API and a one-shot CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;
pub mod processors;
pub mod server;
pub mod cli;

// Re-export key types for convenience
pub use crate::core::{
    client::{HubModelLoader, RemoteSeq2SeqModel},
    config::ServiceConfig,
    errors::TranslationError,
    model::{ModelLoader, Seq2SeqModel},
    models::{Direction, GenerationConfig, ModelSnapshot, TranslationRequest, TranslationResponse},
    pipeline::TranslationPipeline,
    registry::ModelRegistry,
};

pub use crate::processors::indic::IndicProcessor;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
