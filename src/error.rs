// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for touchgrass
//!
//! Every failure the bootstrap can hit surfaces as one of these. Errors that
//! escape a bootstrap or timer task end up in the runtime's unhandled list.

use thiserror::Error;

use crate::touchgrass::ConfigError;

/// Result type alias for touchgrass operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for touchgrass
#[derive(Error, Debug)]
pub enum Error {
    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A relative script name could not be resolved against the extension base
    #[error("Cannot resolve '{name}': {reason}")]
    ModuleResolution { name: String, reason: String },

    /// The resolved script could not be loaded
    #[error("Failed to load module {url}: {reason}")]
    ModuleLoad { url: String, reason: String },

    /// A companion entry point failed
    #[error("Companion routine '{routine}' failed: {message}")]
    Companion { routine: String, message: String },

    /// Extension storage error
    #[error(transparent)]
    Storage(#[from] ConfigError),

    /// HTML parsing failed
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// DOM operation failed
    #[error("DOM error: {0}")]
    Dom(String),

    /// Timer registration failed
    #[error("Timer error: {0}")]
    Timer(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a resolution error
    pub fn resolution(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ModuleResolution {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a module load error
    pub fn load(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ModuleLoad {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a companion routine error
    pub fn companion(routine: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Companion {
            routine: routine.into(),
            message: message.into(),
        }
    }

    /// Create a new DOM error
    pub fn dom<S: Into<String>>(msg: S) -> Self {
        Error::Dom(msg.into())
    }

    /// Create a timer error
    pub fn timer<S: Into<String>>(msg: S) -> Self {
        Error::Timer(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this failed while resolving a script address
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::ModuleResolution { .. } | Error::Url(_))
    }

    /// Check if this failed while loading a module
    pub fn is_load(&self) -> bool {
        matches!(self, Error::ModuleLoad { .. })
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Get the storage error if this is one
    pub fn storage_error(&self) -> Option<&ConfigError> {
        match self {
            Error::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error() {
        let err = Error::resolution("../escape.js", "outside extension origin");
        assert!(err.is_resolution());
        assert!(!err.is_load());
        assert_eq!(
            err.to_string(),
            "Cannot resolve '../escape.js': outside extension origin"
        );
    }

    #[test]
    fn test_storage_error_passthrough() {
        let err: Error = ConfigError::EmptyStorage.into();
        assert!(err.is_storage());
        assert_eq!(err.storage_error(), Some(&ConfigError::EmptyStorage));
        assert_eq!(err.to_string(), ConfigError::EmptyStorage.to_string());
    }

    #[test]
    fn test_context() {
        let res: std::result::Result<(), &str> = Err("boom");
        let err = res.context("loading companion").unwrap_err();
        assert_eq!(err.to_string(), "loading companion: boom");
    }
}
