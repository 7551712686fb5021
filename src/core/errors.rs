//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
///
/// Every failure inside the pipeline is mapped onto one of these kinds
/// explicitly; there are no blanket `From` conversions.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Direction string is not one of the supported pathways
    #[error("Invalid direction: {direction}. Supported directions: en-indic, indic-en")]
    InvalidDirection {
        /// Direction as received
        direction: String,
    },

    /// Language tag is not in the supported set
    #[error("Unsupported language code: {code}")]
    UnsupportedLanguage {
        /// Tag as received
        code: String,
    },

    /// Request is well-formed but semantically invalid
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What is wrong with the input
        message: String,
    },

    /// Model could not be resolved, fetched, cached or instantiated
    #[error("Model {model} unavailable: {message}")]
    ModelUnavailable {
        /// Model id, or the path that failed to load
        model: String,
        /// Underlying cause
        message: String,
    },

    /// Generation call failed or returned an unusable result
    #[error("Inference failed: {message}")]
    InferenceFailure {
        /// Underlying cause
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Underlying cause
        message: String,
    },
}

impl TranslationError {
    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TranslationError::InvalidDirection { .. }
                | TranslationError::UnsupportedLanguage { .. }
                | TranslationError::InvalidInput { .. }
        )
    }

    pub(crate) fn model_unavailable(model: impl Into<String>, message: impl ToString) -> Self {
        TranslationError::ModelUnavailable {
            model: model.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn inference(message: impl ToString) -> Self {
        TranslationError::InferenceFailure {
            message: message.to_string(),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(TranslationError::InvalidDirection {
            direction: "fr-en".to_string()
        }
        .is_client_error());
        assert!(TranslationError::UnsupportedLanguage {
            code: "xyz_Latn".to_string()
        }
        .is_client_error());
        assert!(!TranslationError::inference("boom").is_client_error());
        assert!(!TranslationError::model_unavailable("m", "gone").is_client_error());
    }

    #[test]
    fn test_error_messages() {
        let err = TranslationError::model_unavailable("ai4bharat/x", "404 Not Found");
        assert_eq!(err.to_string(), "Model ai4bharat/x unavailable: 404 Not Found");

        let err = TranslationError::InvalidDirection {
            direction: "en-fr".to_string(),
        };
        assert!(err.to_string().starts_with("Invalid direction: en-fr"));
    }
}
