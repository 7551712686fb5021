//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::core::errors::TranslationError;

/// Translation pathway, selecting which pretrained model to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// English to Indic languages
    #[serde(rename = "en-indic")]
    EnIndic,
    /// Indic languages to English
    #[serde(rename = "indic-en")]
    IndicEn,
}

impl Direction {
    /// Every supported direction, in startup load order
    pub const ALL: [Direction; 2] = [Direction::EnIndic, Direction::IndicEn];

    /// Wire name of the direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::EnIndic => "en-indic",
            Direction::IndicEn => "indic-en",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en-indic" => Ok(Direction::EnIndic),
            "indic-en" => Ok(Direction::IndicEn),
            other => Err(TranslationError::InvalidDirection {
                direction: other.to_string(),
            }),
        }
    }
}

fn default_strings() -> Vec<String> {
    vec!["Hello, how are you?".to_string()]
}

fn default_source_lang() -> String {
    "eng_Latn".to_string()
}

fn default_target_lang() -> String {
    "hin_Deva".to_string()
}

fn default_direction() -> String {
    "en-indic".to_string()
}

/// Translation request
///
/// Every field is optional on the wire and falls back to a one-sentence
/// English to Hindi request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslationRequest {
    /// Sentences to translate, order is preserved in the response
    #[serde(default = "default_strings")]
    #[schema(example = json!(["Hello, how are you?"]))]
    pub strings: Vec<String>,
    /// Source language tag, e.g. `eng_Latn`
    #[serde(default = "default_source_lang")]
    #[schema(example = "eng_Latn")]
    pub source_lang: String,
    /// Target language tag, e.g. `hin_Deva`
    #[serde(default = "default_target_lang")]
    #[schema(example = "hin_Deva")]
    pub target_lang: String,
    /// `en-indic` or `indic-en`; kept as a string so each serving mode can
    /// decide how an unknown value fails
    #[serde(default = "default_direction")]
    #[schema(example = "en-indic")]
    pub direction: String,
}

impl Default for TranslationRequest {
    fn default() -> Self {
        Self {
            strings: default_strings(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            direction: default_direction(),
        }
    }
}

impl TranslationRequest {
    /// Request for `strings` along `direction`, with the default language pair
    pub fn new(strings: Vec<String>, direction: Direction) -> Self {
        Self {
            strings,
            direction: direction.to_string(),
            ..Default::default()
        }
    }

    /// Replace the source and target tags
    pub fn with_languages(mut self, source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        self.source_lang = source_lang.into();
        self.target_lang = target_lang.into();
        self
    }
}

/// Translation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranslationResponse {
    /// Translations in input order
    pub translated_strings: Vec<String>,
}

/// Decoding parameters forwarded to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Beam width (default: 5)
    pub num_beams: usize,
    /// Sequences returned per input (default: 1)
    pub num_return_sequences: usize,
    /// Maximum output length in tokens (default: 256)
    pub max_length: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_beams: 5,
            num_return_sequences: 1,
            max_length: 256,
        }
    }
}

/// Serialized description of a resolved pretrained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Pretrained model name, e.g. `ai4bharat/indictrans2-en-indic-dist-200M`
    pub model_id: String,
    /// Direction the model serves
    pub direction: Direction,
    /// Hub revision the model resolved to, when the hub reported one
    pub revision: Option<String>,
    /// When the snapshot was resolved
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

impl ModelSnapshot {
    /// Snapshot stamped with the current time
    pub fn new(model_id: impl Into<String>, direction: Direction, revision: Option<String>) -> Self {
        Self {
            model_id: model_id.into(),
            direction,
            revision,
            saved_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("en-indic".parse::<Direction>().unwrap(), Direction::EnIndic);
        assert_eq!("indic-en".parse::<Direction>().unwrap(), Direction::IndicEn);

        let err = "en-fr".parse::<Direction>().unwrap_err();
        assert!(matches!(err, TranslationError::InvalidDirection { direction } if direction == "en-fr"));
    }

    #[test]
    fn test_direction_serde_uses_wire_names() {
        let json = serde_json::to_string(&Direction::IndicEn).unwrap();
        assert_eq!(json, "\"indic-en\"");
        let parsed: Direction = serde_json::from_str("\"en-indic\"").unwrap();
        assert_eq!(parsed, Direction::EnIndic);
    }

    #[test]
    fn test_request_defaults() {
        let request: TranslationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.strings, vec!["Hello, how are you?".to_string()]);
        assert_eq!(request.source_lang, "eng_Latn");
        assert_eq!(request.target_lang, "hin_Deva");
        assert_eq!(request.direction, "en-indic");
    }

    #[test]
    fn test_request_partial_body() {
        let request: TranslationRequest = serde_json::from_str(
            r#"{"strings": ["a", "b"], "target_lang": "tam_Taml"}"#,
        )
        .unwrap();
        assert_eq!(request.strings.len(), 2);
        assert_eq!(request.source_lang, "eng_Latn");
        assert_eq!(request.target_lang, "tam_Taml");
    }

    #[test]
    fn test_request_builder() {
        let request = TranslationRequest::new(vec!["नमस्ते".to_string()], Direction::IndicEn)
            .with_languages("hin_Deva", "eng_Latn");

        assert_eq!(request.direction, "indic-en");
        assert_eq!(request.source_lang, "hin_Deva");
        assert_eq!(request.target_lang, "eng_Latn");
        assert_eq!(request.strings, vec!["नमस्ते".to_string()]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["direction"], "indic-en");
    }

    #[test]
    fn test_generation_defaults() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.num_beams, 5);
        assert_eq!(generation.num_return_sequences, 1);
        assert_eq!(generation.max_length, 256);
    }
}
