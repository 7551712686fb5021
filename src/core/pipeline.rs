//! Preprocess, generate, postprocess

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::errors::{Result, TranslationError};
use crate::core::languages::{self, ENGLISH};
use crate::core::model::{ModelLoader, Seq2SeqModel};
use crate::core::models::{Direction, GenerationConfig};
use crate::processors::indic::IndicProcessor;

/// Everything needed to translate along one direction
pub struct TranslationPipeline {
    direction: Direction,
    processor: IndicProcessor,
    model: Arc<dyn Seq2SeqModel>,
    generation: GenerationConfig,
}

impl std::fmt::Debug for TranslationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationPipeline")
            .field("direction", &self.direction)
            .field("model", &self.model.model_id())
            .field("generation", &self.generation)
            .finish()
    }
}

impl TranslationPipeline {
    /// Assemble a pipeline around an already loaded model
    pub fn new(
        direction: Direction,
        model: Arc<dyn Seq2SeqModel>,
        generation: GenerationConfig,
    ) -> Result<Self> {
        Ok(Self {
            direction,
            processor: IndicProcessor::new()?,
            model,
            generation,
        })
    }

    /// Load a fresh model for `direction` and wrap it
    pub async fn load(
        loader: &dyn ModelLoader,
        direction: Direction,
        generation: GenerationConfig,
    ) -> Result<Self> {
        let model = loader.load(direction).await?;
        Self::new(direction, model, generation)
    }

    /// Direction this pipeline translates along
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Identifier of the wrapped model
    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Translate a batch, preserving order and length
    pub async fn translate(
        &self,
        strings: &[String],
        src_lang: &str,
        tgt_lang: &str,
    ) -> Result<Vec<String>> {
        check_languages(self.direction, src_lang, tgt_lang)?;

        if strings.is_empty() {
            debug!("Empty batch, skipping inference");
            return Ok(Vec::new());
        }

        let start_time = Instant::now();

        let prepared = self.processor.preprocess_batch(strings, src_lang, tgt_lang)?;
        let outputs = self
            .model
            .generate(&prepared.sentences, &self.generation)
            .await?;
        let translated = self.processor.postprocess_batch(outputs, &prepared, tgt_lang)?;

        info!(
            "Translated {} strings {} -> {} with {} in {:?}",
            translated.len(),
            src_lang,
            tgt_lang,
            self.model.model_id(),
            start_time.elapsed()
        );

        Ok(translated)
    }
}

/// Reject unknown tags and tag pairs that do not match the direction
pub fn check_languages(direction: Direction, src_lang: &str, tgt_lang: &str) -> Result<()> {
    for code in [src_lang, tgt_lang] {
        if !languages::is_supported(code) {
            return Err(TranslationError::UnsupportedLanguage {
                code: code.to_string(),
            });
        }
    }

    let consistent = match direction {
        Direction::EnIndic => src_lang == ENGLISH && tgt_lang != ENGLISH,
        Direction::IndicEn => src_lang != ENGLISH && tgt_lang == ENGLISH,
    };

    if !consistent {
        return Err(TranslationError::InvalidInput {
            message: format!(
                "{} -> {} does not match direction {}",
                src_lang, tgt_lang, direction
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fakes shared by pipeline, registry and server tests

    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::core::errors::{Result, TranslationError};
    use crate::core::model::{ModelLoader, Seq2SeqModel};
    use crate::core::models::{Direction, GenerationConfig, ModelSnapshot};

    /// Echoes its input with the tag prefix stripped and a marker appended
    pub struct EchoModel {
        pub model_id: String,
        pub fail_with: Option<String>,
        pub seen: Mutex<Vec<String>>,
    }

    impl EchoModel {
        pub fn new(model_id: &str) -> Self {
            Self {
                model_id: model_id.to_string(),
                fail_with: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(model_id: &str, message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::new(model_id)
            }
        }
    }

    #[async_trait]
    impl Seq2SeqModel for EchoModel {
        fn model_id(&self) -> &str {
            &self.model_id
        }

        async fn generate(&self, batch: &[String], _generation: &GenerationConfig) -> Result<Vec<String>> {
            self.seen.lock().unwrap().extend(batch.iter().cloned());
            if let Some(message) = &self.fail_with {
                return Err(TranslationError::inference(message));
            }
            Ok(batch
                .iter()
                .map(|s| {
                    let text = s.splitn(3, ' ').nth(2).unwrap_or_default();
                    format!("{} [translated]", text)
                })
                .collect())
        }
    }

    /// Loader handing out echo models and counting calls
    #[derive(Default)]
    pub struct FakeLoader {
        pub fetches: AtomicUsize,
        pub instantiations: AtomicUsize,
        pub fail_generation: Option<String>,
        pub fail_fetch: bool,
    }

    impl FakeLoader {
        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        pub fn instantiations(&self) -> usize {
            self.instantiations.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelLoader for FakeLoader {
        async fn fetch(&self, direction: Direction) -> Result<ModelSnapshot> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let model_id = format!("fake/indictrans2-{}", direction);
            if self.fail_fetch {
                return Err(TranslationError::model_unavailable(model_id, "hub unreachable"));
            }
            Ok(ModelSnapshot::new(model_id, direction, Some("rev1".to_string())))
        }

        async fn instantiate(&self, snapshot: &ModelSnapshot) -> Result<Arc<dyn Seq2SeqModel>> {
            self.instantiations.fetch_add(1, Ordering::SeqCst);
            Ok(match &self.fail_generation {
                Some(message) => Arc::new(EchoModel::failing(&snapshot.model_id, message)),
                None => Arc::new(EchoModel::new(&snapshot.model_id)),
            })
        }
    }
}
