//! Error types for DynamoDB operations.

use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

/// Errors that can occur during DynamoDB operations.
#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Timeout waiting for table '{table_name}' to become active")]
    TableActivationTimeout { table_name: String },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl DynamodbError {
    pub fn sdk(err: impl ToString) -> Self {
        Self::AwsSdk(err.to_string())
    }
}
