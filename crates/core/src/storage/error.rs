use thiserror::Error;

/// Ways a stored row can fail to match the shape of its entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing field: {field}")]
    MissingField { field: &'static str },
    #[error("field {field} is not of type {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("malformed field {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Failed to decode {entity_type}: {source}")]
    Decode {
        entity_type: &'static str,
        #[source]
        source: DecodeError,
    },
    #[error("Operation cancelled")]
    Cancelled,
}

impl RepositoryError {
    /// Wraps a decode failure for the given entity.
    pub fn decode(entity_type: &'static str, source: DecodeError) -> Self {
        Self::Decode {
            entity_type,
            source,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
