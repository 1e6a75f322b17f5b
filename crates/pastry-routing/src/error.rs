//! Routing error types

use thiserror::Error;

/// Errors raised by the routing core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PastryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed identifier {id:?}: {reason}")]
    MalformedIdentifier { id: String, reason: String },

    #[error("Invalid trial: {0}")]
    InvalidTrial(String),

    #[error("Key {0} is not part of the node set")]
    UnknownKey(u64),
}

impl PastryError {
    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        PastryError::MalformedIdentifier {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, PastryError>;
