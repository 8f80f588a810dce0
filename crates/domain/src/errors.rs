//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for SmartCon
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SmartconError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// First violated form rule, already phrased for the operator.
    #[error("{0}")]
    Validation(String),

    /// A write was acknowledged but reading it back returned other values.
    #[error("Write verification failed: {0}")]
    WriteVerification(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SmartconError {
    /// Build a `NotFound` error for a document in a collection.
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound(format!("{collection}/{id}"))
    }
}

/// Result type alias for SmartCon operations
pub type Result<T> = std::result::Result<T, SmartconError>;
