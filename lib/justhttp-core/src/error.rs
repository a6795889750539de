//! Error types for justhttp.
//!
//! Every pipeline stage maps its failure to exactly one [`Error`] variant so that
//! callers can tell a timeout or an oversized body apart from a generic transport
//! or decode failure.

use std::time::Duration;

use derive_more::{Display, Error, From};

/// Main error type for justhttp operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[display("invalid URL '{url}': {reason}")]
    #[from(skip)]
    InvalidUrl {
        /// URL as given by the caller.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request payload could not be serialized to JSON.
    #[display("JSON serialization error: {_0}")]
    #[from]
    Encoding(serde_json::Error),

    /// The per-call deadline elapsed before the call completed.
    #[display("time limit ({limit:?}) exceeded")]
    #[from(skip)]
    Timeout {
        /// Configured deadline.
        limit: Duration,
    },

    /// Network, connection or TLS failure reported by the transport.
    #[display("transport error: {_0}")]
    #[from(skip)]
    Transport(#[error(not(source))] String),

    /// The server answered `401 Unauthorized`.
    #[display("HTTP error {status}")]
    #[from(skip)]
    Auth {
        /// HTTP status code.
        status: u16,
    },

    /// The response body is larger than the configured size limit.
    #[display("body limit ({limit} bytes) exceeded")]
    #[from(skip)]
    SizeLimit {
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The response body is not the expected JSON.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    Decode {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// The transport-level request could not be built.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON decode error with path context.
    #[must_use]
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the server rejected the credentials.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` if the response body exceeded the size limit.
    #[must_use]
    pub const fn is_size_limit(&self) -> bool {
        matches!(self, Self::SizeLimit { .. })
    }

    /// Returns `true` if the response body could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns the HTTP status code if this is an auth error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status } => Some(*status),
            _ => None,
        }
    }
}
