//! Core error types

use thiserror::Error;

/// Errors produced while parsing page inputs (selectors, lengths, thresholds)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A selector string could not be parsed
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A CSS length or box-offset string could not be parsed
    #[error("Invalid length `{0}`")]
    InvalidLength(String),

    /// A visibility threshold outside [0, 1]
    #[error("Threshold {0} is outside [0, 1]")]
    InvalidThreshold(f32),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
