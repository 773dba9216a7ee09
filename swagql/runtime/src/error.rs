//! Runtime errors.
//!
//! Every error raised while resolving a field is a [`ResolutionError`]. It
//! is converted into a per-field GraphQL error carrying a machine-readable
//! `code` extension, so sibling fields keep resolving.

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Errors from a [`crate::Fetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// Any other transport failure reported by a custom fetcher.
    #[error("Transport failed: {0}")]
    Transport(String),
}

impl FetchError {
    /// Returns the HTTP status code if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Rejection from an [`crate::AuthVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while resolving a single field.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The execution context has no capability under the module's marker.
    #[error("No {capability} capability registered under marker '{marker}'")]
    MissingCapability {
        capability: &'static str,
        marker: String,
    },

    /// The auth verifier rejected the call.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The fetcher failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An argument could not be mapped back to its REST form.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// No execution context was attached to the request.
    #[error("No execution context attached to the request")]
    MissingContext,
}

impl ResolutionError {
    /// Stable error code exposed in the `code` extension.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCapability { .. } => "MISSING_CAPABILITY",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Fetch(_) => "FETCH_FAILED",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::MissingContext => "MISSING_CONTEXT",
        }
    }
}

impl From<AuthError> for ResolutionError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err.message)
    }
}

impl ErrorExtensions for ResolutionError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        let status = match self {
            Self::Fetch(e) => e.status_code(),
            _ => None,
        };
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", code.to_string());
            if let Some(status) = status {
                ext.set("status", i32::from(status));
            }
        })
    }
}
