//! Unified error handling for composectl-core
//!
//! Every failure of an API call ends up as a [`CoreError`]: the request never
//! reached the server, the server rejected it, or the body could not be read.
//!
//! # Example
//!
//! ```rust
//! use composectl_core::CoreError;
//!
//! let err = CoreError::Api {
//!     status: 404,
//!     message: "Not found".to_string(),
//! };
//! assert_eq!(err.status(), Some(404));
//! assert!(!err.is_unauthorized());
//! ```

use thiserror::Error;

/// Core error type for API calls
#[derive(Error, Debug)]
pub enum CoreError {
    /// The request did not complete (DNS, connect, TLS, broken connection)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not the JSON we expected
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A status-only outcome reached an operation that always returns a body
    #[error("'{operation}' returned no body to summarize")]
    MissingBody { operation: &'static str },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// HTTP status of a remote rejection, if this is one
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Api { status, .. } => Some(*status),
            CoreError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
