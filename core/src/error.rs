//! Error types for the product client.
//!
//! # Design
//! The service layer does not interpret status codes: every non-2xx response
//! lands in `Status` with the raw code and body, and it is up to the caller
//! to dig structured details out of the body. Network failures (refused
//! connections, timeouts) are `Transport`.

use std::fmt;

use thiserror::Error;

/// Errors returned by the transport, the client's parse methods and the
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("encoding failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Which store operation produced a `StoreError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            StoreOperation::Fetch => "load",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// The last failure recorded by a `ProductStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {operation} products: {source}")]
pub struct StoreError {
    pub operation: StoreOperation,
    #[source]
    pub source: ApiError,
}

/// Errors raised while loading `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid base url {0:?}: expected an http:// or https:// url")]
    InvalidBaseUrl(String),
}
