//! Error types for the catalog client.

use cadence_core::CadenceError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no session available
    #[error("Authentication required")]
    AuthRequired,

    /// Authentication failed (invalid credentials or expired token)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Response had an unexpected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Session persistence failed
    #[error(transparent)]
    Storage(#[from] CadenceError),
}

impl ServerClientError {
    /// Whether the error means the credentials are missing or no longer valid
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::AuthRequired | Self::AuthFailed(_) | Self::TokenRefreshFailed(_)
        )
    }

    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServerUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;
