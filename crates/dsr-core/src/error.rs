//! Unified error types for DSR submission

use thiserror::Error;

/// Unified error type for all DSR operations
///
/// Bad spreadsheet data is never an error: classification, selection and
/// normalization degrade to documented defaults. These variants cover
/// configuration, I/O and browser failures only.
#[derive(Error, Debug)]
pub enum DsrError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Record source errors
    #[error("Record source error: {0}")]
    RecordSource(String),

    // Browser errors
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Option label not found on form: {0}")]
    LabelNotFound(String),

    #[error("No selector configured for field: {0}")]
    UnmappedField(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    // Submission errors
    #[error("Submission failed: {0}")]
    Submission(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using DsrError
pub type Result<T> = std::result::Result<T, DsrError>;
