//! Error types for Divergence

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DivergenceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// The backend rejected the bearer token (HTTP 401)
    #[error("Session expired or invalid")]
    Unauthorized,

    /// The backend has not finished processing this user yet (HTTP 404)
    #[error("Data not ready yet")]
    NotReady,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for DivergenceError {
    fn from(e: serde_json::Error) -> Self {
        DivergenceError::InvalidData(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DivergenceError>;
