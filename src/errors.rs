/*!
 * Error types for the typeshift application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::document::{ResourceKind, StyleKey};

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status into a provider error
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors raised by the host document when an object or attribute cannot be accessed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// The attribute does not apply to this character
    #[error("Attribute {0} is not supported here")]
    Unsupported(StyleKey),

    /// A named resource could not be found in the document
    #[error("{kind} '{name}' could not be resolved")]
    Unresolved {
        /// Resource table that was searched
        kind: ResourceKind,
        /// Name that was looked up
        name: String,
    },

    /// A resource handle no longer points at a live resource
    #[error("Stale {0} handle")]
    StaleHandle(ResourceKind),

    /// The addressed object is gone or was never valid
    #[error("Invalid object: {0}")]
    InvalidObject(String),

    /// A paragraph or character index fell outside the span
    #[error("Index {index} out of range (length {len})")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of addressable items
        len: usize,
    },

    /// The host refused the write
    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered without any text
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// The translation service is misconfigured
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that abort translation of a single span
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The span has no paragraphs or only blank text
    #[error("Span contains no translatable text")]
    EmptySpan,

    /// Every paragraph ended in a soft failure; the document was left untouched
    #[error("Nothing translated: all {paragraphs} paragraph(s) failed. Check the API key and connection.")]
    NothingTranslated {
        /// Number of paragraphs that were attempted
        paragraphs: usize,
    },

    /// The host failed on an operation the pipeline cannot skip
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the translate-and-restyle pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Selection did not resolve to any text
    #[error("No text found in selection. Select a text frame or highlight some text.")]
    NoTextFound,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<HostError> for AppError {
    fn from(error: HostError) -> Self {
        Self::Pipeline(PipelineError::Host(error))
    }
}
