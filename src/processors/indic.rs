//! Language-tag-aware normalization around model inference
//!
//! Preprocessing cleans each sentence, shields spans the model should copy
//! verbatim (URLs, e-mail addresses, long digit runs) behind `<IDn>`
//! placeholders and prefixes the source/target tags the IndicTrans2 family
//! expects. Postprocessing undoes the placeholders and tidies spacing.

use regex::{Captures, Regex};
use tracing::debug;

use crate::core::errors::{Result, TranslationError};
use crate::core::languages;

/// Spans replaced by placeholders, in placeholder order (`<ID1>` first)
pub type PlaceholderMap = Vec<String>;

/// Output of [`IndicProcessor::preprocess_batch`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBatch {
    /// Model-ready sentences, tag-prefixed
    pub sentences: Vec<String>,
    /// One placeholder map per sentence
    pub placeholders: Vec<PlaceholderMap>,
}

impl PreparedBatch {
    /// Number of sentences in the batch
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether the batch holds no sentences
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Pre/post-processor for IndicTrans2 inputs and outputs
#[derive(Debug, Clone)]
pub struct IndicProcessor {
    protected: Regex,
    placeholder: Regex,
    whitespace: Regex,
    space_before_danda: Regex,
}

/// Scripts that end sentences with a danda
const DANDA_SCRIPTS: &[&str] = &["Deva", "Beng", "Guru", "Orya"];

/// Sentence punctuation left outside a protected URL
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

impl IndicProcessor {
    /// Create a new processor
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Literal placeholder-shaped text is shielded too, so it cannot be
            // confused with one of ours on restore. e-mail precedes URLs so
            // the domain is not taken for a bare URL.
            protected: compile(
                r"[<\[]\s*ID\s*\d+\s*[>\]]|[\w.+-]+@[\w-]+(?:\.[\w-]+)+|https?://\S+|www\.\S+|\+?\d[\d-]{6,}\d",
            )?,
            placeholder: compile(r"[<\[]\s*ID\s*(\d+)\s*[>\]]")?,
            whitespace: compile(r"\s+")?,
            space_before_danda: compile(r"\s+([।॥])")?,
        })
    }

    /// Normalize, protect and tag a batch of sentences
    pub fn preprocess_batch(
        &self,
        sentences: &[String],
        src_lang: &str,
        tgt_lang: &str,
    ) -> Result<PreparedBatch> {
        check_language(src_lang)?;
        check_language(tgt_lang)?;

        let mut prepared = PreparedBatch {
            sentences: Vec::with_capacity(sentences.len()),
            placeholders: Vec::with_capacity(sentences.len()),
        };

        for sentence in sentences {
            let normalized = self.normalize(sentence);
            let (protected, map) = self.protect(&normalized);
            prepared
                .sentences
                .push(format!("{} {} {}", src_lang, tgt_lang, protected));
            prepared.placeholders.push(map);
        }

        debug!(
            "Preprocessed {} sentences ({} -> {})",
            prepared.len(),
            src_lang,
            tgt_lang
        );

        Ok(prepared)
    }

    /// Restore placeholders and tidy model output
    pub fn postprocess_batch(
        &self,
        outputs: Vec<String>,
        prepared: &PreparedBatch,
        tgt_lang: &str,
    ) -> Result<Vec<String>> {
        if outputs.len() != prepared.len() {
            return Err(TranslationError::inference(format!(
                "model returned {} outputs for {} inputs",
                outputs.len(),
                prepared.len()
            )));
        }

        let uses_danda = languages::script_of(tgt_lang)
            .map(|script| DANDA_SCRIPTS.contains(&script))
            .unwrap_or(false);

        Ok(outputs
            .into_iter()
            .zip(prepared.placeholders.iter())
            .map(|(output, map)| {
                let restored = self.restore(&output, map);
                let collapsed = self.collapse(&restored);
                if uses_danda {
                    self.space_before_danda
                        .replace_all(&collapsed, "$1")
                        .into_owned()
                } else {
                    collapsed
                }
            })
            .collect())
    }

    fn normalize(&self, sentence: &str) -> String {
        let mapped: String = sentence
            .chars()
            .flat_map(|c| {
                let replacement: &[char] = match c {
                    '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => &['"'],
                    '\u{2018}' | '\u{2019}' | '\u{201A}' => &['\''],
                    '\u{2013}' | '\u{2014}' => &['-'],
                    '\u{2026}' => &['.', '.', '.'],
                    '\u{00A0}' | '\u{200B}' => &[' '],
                    _ => return vec![c],
                };
                replacement.to_vec()
            })
            .collect();
        self.collapse(&mapped)
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }

    fn protect(&self, sentence: &str) -> (String, PlaceholderMap) {
        let mut map = PlaceholderMap::new();
        let protected = self
            .protected
            .replace_all(sentence, |caps: &Captures| {
                let matched = &caps[0];
                let span = if matched.starts_with("http") || matched.starts_with("www.") {
                    matched.trim_end_matches(URL_TRAILING)
                } else {
                    matched
                };
                map.push(span.to_string());
                format!("<ID{}>{}", map.len(), &matched[span.len()..])
            })
            .into_owned();
        (protected, map)
    }

    fn restore(&self, output: &str, map: &PlaceholderMap) -> String {
        self.placeholder
            .replace_all(output, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| map.get(i))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| TranslationError::ConfigError {
        message: format!("invalid processor pattern: {}", e),
    })
}

fn check_language(code: &str) -> Result<()> {
    if languages::is_supported(code) {
        Ok(())
    } else {
        Err(TranslationError::UnsupportedLanguage {
            code: code.to_string(),
        })
    }
}
