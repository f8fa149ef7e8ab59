// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for reqscope
//!
//! Errors raised while observing a request never reach the host application:
//! interceptors return them internally and the hook boundary logs and drops
//! them. Errors from the instrumented HTTP hosts (a failed fetch, a bad URL)
//! are ordinary results for the caller.

use thiserror::Error;

use crate::network::RequestHandle;

/// Result type alias for reqscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for reqscope
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Ignore rule pattern failed to compile
    #[error("Invalid ignore pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Network-level failure reported by an instrumented host
    #[error("Network error: {0}")]
    Network(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A completion arrived for a request whose context is gone
    #[error("No request context for {handle}")]
    MissingContext { handle: RequestHandle },

    /// A completion arrived before `send` recorded the trigger time
    #[error("Request {handle} completed without a trigger time")]
    MissingTriggerTime { handle: RequestHandle },

    /// Telemetry sink rejected an event
    #[error("Telemetry sink error: {0}")]
    Sink(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a sink error
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        Error::Sink(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http(_))
    }

    /// Check if this error came from request correlation
    pub fn is_correlation(&self) -> bool {
        matches!(
            self,
            Error::MissingContext { .. } | Error::MissingTriggerTime { .. }
        )
    }

    /// Get the request handle if the error concerns one
    pub fn handle(&self) -> Option<RequestHandle> {
        match self {
            Error::MissingContext { handle } | Error::MissingTriggerTime { handle } => {
                Some(*handle)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_errors() {
        let handle = RequestHandle::from_raw(7);
        let err = Error::MissingContext { handle };

        assert!(err.is_correlation());
        assert!(!err.is_network());
        assert_eq!(err.handle(), Some(handle));
        assert_eq!(err.to_string(), "No request context for req#7");
    }

    #[test]
    fn test_pattern_error_conversion() {
        let err: Error = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, Error::Pattern(_)));
        assert!(err.handle().is_none());
    }

    #[test]
    fn test_network_error() {
        let err = Error::network("connection reset");
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Network error: connection reset");
    }
}
