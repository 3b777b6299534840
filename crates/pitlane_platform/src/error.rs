//! Platform error types

use thiserror::Error;

/// Host-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// An interval timer needs a non-zero period
    #[error("Interval period must be greater than zero")]
    ZeroInterval,

    /// A viewport with a negative or non-finite dimension
    #[error("Invalid viewport size {width}x{height}")]
    InvalidViewport { width: String, height: String },
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
