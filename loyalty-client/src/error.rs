//! Client error types
//!
//! [`ClientError`] is the persistence failure of the desk: every gateway
//! operation that cannot reach the store, or whose write the store rejects,
//! returns one carrying the underlying cause.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Postgres SQLSTATE class for integrity constraint violations
const CONSTRAINT_VIOLATION_CLASS: &str = "23";

/// Postgres SQLSTATE for "relation does not exist"
pub const UNDEFINED_TABLE: &str = "42P01";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (unreachable, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with an error body
    #[error("Store error {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Connection could not be used
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Unique / foreign key / not-null violation reported by the store
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, ClientError::Api { code, .. } if code.starts_with(CONSTRAINT_VIOLATION_CLASS))
    }

    /// Table missing from the store schema
    pub fn is_undefined_table(&self) -> bool {
        matches!(self, ClientError::Api { code, .. } if code == UNDEFINED_TABLE)
    }

    /// Network-level failure (store unreachable)
    pub fn is_network(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            ClientError::Connection(_) => true,
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            ClientError::Http(_) | ClientError::Connection(_) => ErrorCode::NetworkError,
            ClientError::Api { .. } if err.is_constraint_violation() => {
                ErrorCode::ConstraintViolation
            }
            ClientError::Api { .. } | ClientError::InvalidResponse(_) => ErrorCode::DatabaseError,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Config(_) => ErrorCode::ConfigError,
            ClientError::Serialization(_) => ErrorCode::InternalError,
        };
        AppError::new(code).with_detail("cause", err.to_string())
    }
}
