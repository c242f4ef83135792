//! Error types for Cinder

use thiserror::Error;

/// The main error type for Cinder operations
#[derive(Debug, Error)]
pub enum CinderError {
    #[error("Unknown content index: {kind} #{index}")]
    UnknownContent { kind: &'static str, index: usize },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Hook error in {object}::{hook}: {message}")]
    HookError {
        object: String,
        hook: &'static str,
        message: String,
    },

    /// The windowing platform refused a request, e.g. window creation
    #[error("Platform error: {0}")]
    PlatformError(String),
}

impl CinderError {
    /// Build a hook error for content code that wants to abort the frame
    pub fn hook(object: impl Into<String>, hook: &'static str, message: impl Into<String>) -> Self {
        CinderError::HookError {
            object: object.into(),
            hook,
            message: message.into(),
        }
    }
}

/// Result type alias for Cinder operations
pub type Result<T> = std::result::Result<T, CinderError>;

impl From<toml::de::Error> for CinderError {
    fn from(err: toml::de::Error) -> Self {
        CinderError::TomlParseError(err.to_string())
    }
}
