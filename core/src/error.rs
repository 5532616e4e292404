//! Error types for the Fitbit client.
//!
//! # Design
//! Only unexpected conditions become an `ApiError`. A non-2xx reply that
//! carries the provider's structured `errors` list is an expected outcome and
//! is returned as `ApiResponse::Failure` instead. `Http` covers the remaining
//! non-2xx replies whose body is not such a list, keeping the raw status and
//! body for debugging.

use crate::http::TransportError;

/// Errors returned by `FitbitClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP round trip itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A non-2xx response without a structured error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Transport(TransportError::Cancelled))
    }
}
