use std::path::PathBuf;
use thiserror::Error;

/// Core error type for modalias operations.
///
/// Every variant is a configuration problem: it is raised when aliases are
/// registered or loaded, never while a request is being resolved.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid alias `{key}`: {reason}")]
    InvalidAlias { key: String, reason: &'static str },

    #[error("Failed to read alias config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse alias config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid alias config at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_alias(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidAlias {
            key: key.into(),
            reason,
        }
    }
}

/// Interceptor lifecycle misuse.
///
/// Returned (never panicked) when an operation is attempted in the wrong
/// state. The host loader keeps working either way.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("alias resolver is already installed")]
    AlreadyInstalled,

    #[error("alias resolver is not installed")]
    NotInstalled,
}
