//! Error types for pitlane_app

use std::path::PathBuf;

use pitlane_core::CoreError;
use pitlane_platform::PlatformError;
use thiserror::Error;

/// Errors that can occur while configuring or mounting a page
#[derive(Error, Debug)]
pub enum PageError {
    /// Failed to read a configuration file
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for [`crate::PageConfig`]
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of range
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Selector, length, or threshold rejected by the core parsers
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Host value rejected, such as a negative viewport size
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for pitlane_app operations
pub type Result<T> = std::result::Result<T, PageError>;
