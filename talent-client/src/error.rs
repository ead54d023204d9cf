//! Client error types

use serde_json::Value;
use shared::error::ErrorCode;
use std::collections::HashMap;
use thiserror::Error;

/// Client error type
///
/// Reorders do not use this: they resolve to a tagged
/// [`ReorderOutcome`](shared::reorder::ReorderOutcome) instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Structured error returned by the API
    #[error("API error {code}: {message}")]
    Api {
        code: u16,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// Simulated network failure, the request never reached the server
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Error code carried by an API error, if known
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => ErrorCode::try_from(*code).ok(),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
