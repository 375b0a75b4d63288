use std::{env, time::Duration};

use opinions_core::storage::TableNames;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Physical table and index names.
    pub tables: TableNames,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// Endpoint override for a local DynamoDB.
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub aws_endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `OPINIONS_TABLE` - Opinions table name (default: "opinions")
    /// - `COMMENTS_TABLE` - Comments table name (default: "comments")
    /// - `REACTIONS_TABLE` - Reactions table name (default: "reactions")
    /// - `COMMENTS_INDEX` - Comments-by-creation index (default: "opinionId-createdDateTime-index")
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `AWS_ENDPOINT_URL` - Endpoint override (default: unset)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = TableNames::default();

        Self {
            tables: TableNames {
                opinions: lookup("OPINIONS_TABLE").unwrap_or(defaults.opinions),
                comments: lookup("COMMENTS_TABLE").unwrap_or(defaults.comments),
                reactions: lookup("REACTIONS_TABLE").unwrap_or(defaults.reactions),
                comments_by_created: lookup("COMMENTS_INDEX")
                    .unwrap_or(defaults.comments_by_created),
            },
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
