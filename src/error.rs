//! Error types for rs-fragments.
//!
//! This module defines the error types returned by fetch and extraction operations.

/// Error type for fetch and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Candidate source URL is not an absolute URL.
    #[error("Invalid url parameter. Expecting an absolute URL: {0}")]
    InvalidUrl(String),

    /// Candidate source URL points at a host outside the allow-list.
    #[error("The requested host is not allowed: {0}")]
    HostNotAllowed(String),

    /// Upstream answered with a non-success status.
    #[error("Failed to fetch source. Status: {status} {status_text}")]
    Upstream {
        /// Numeric HTTP status.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        status_text: String,
    },

    /// Transport-level failure (DNS, connect, TLS, timeout, body read).
    #[error("Network request failed: {0}")]
    Network(String),

    /// Input (an HTML body or a request payload) could not be parsed.
    #[error("Parse failure: {0}")]
    ParseError(String),

    /// An optional nested fetch failed. Only ever logged.
    #[error("Secondary fetch failed: {0}")]
    SecondaryFetch(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error was caused by the caller's input.
    ///
    /// Classification follows the message text: anything mentioning
    /// `"not allowed"` or `"Invalid url"` is a client error, everything else
    /// is a server or upstream error.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        let message = self.to_string();
        message.contains("not allowed") || message.contains("Invalid url")
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for fetch and extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
