//! Error types for the outfit-lens-core library.
//!
//! Every component propagates these with `?`. Only the
//! [`AnalysisOrchestrator`](crate::ui::AnalysisOrchestrator) catches
//! them, logs the detail and maps them to a generic user-facing message.

use thiserror::Error;

/// Message used when the analysis endpoint rejects a request without
/// saying why.
pub const FALLBACK_REJECTION_MESSAGE: &str = "Failed to analyze image";

/// Errors that can occur within the outfit-lens-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid endpoint, bad values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model identifier is not one of the supported models.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// The language code is not one of the supported languages.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// The supplied image could not be decoded.
    #[error("Image decoding failed: {0}")]
    Decode(String),

    /// The resampled image could not be re-encoded.
    #[error("Image encoding failed: {0}")]
    Encode(String),

    /// The request could not be completed or the response was unreadable.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The endpoint answered successfully but the body does not match the
    /// expected analysis schema.
    #[error("Invalid analysis: {0}")]
    Validation(String),

    /// A background task died before producing a result (e.g. it panicked).
    #[error("Task failed: {0}")]
    Task(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a decoding error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates an encoding error with the given message.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a task failure error with the given message.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    /// Creates a rejection error, falling back to
    /// [`FALLBACK_REJECTION_MESSAGE`] when the server sent no message.
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected {
            status,
            message: message.unwrap_or_else(|| FALLBACK_REJECTION_MESSAGE.to_string()),
        }
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_server_message() {
        let err = AppError::rejected(400, Some("Image too blurry".to_string()));
        assert_eq!(err.to_string(), "Image too blurry");
    }

    #[test]
    fn rejected_without_message_uses_fallback() {
        let err = AppError::rejected(500, None);
        assert_eq!(err.to_string(), FALLBACK_REJECTION_MESSAGE);
        assert!(matches!(err, AppError::Rejected { status: 500, .. }));
    }
}
