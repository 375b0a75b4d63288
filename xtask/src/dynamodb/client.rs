//! AWS SDK client setup (Imperative Shell).

use aws_sdk_dynamodb::types::{IndexStatus, TableStatus as SdkTableStatus};
use aws_sdk_dynamodb::Client;

use super::error::{DynamodbError, Result};
use super::planning::{GsiState, GsiStatus, TableState, TableStatus};

/// AWS client configuration.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: std::env::var("AWS_ENDPOINT_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &AwsConfig) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Fetches current table state, returns None if table doesn't exist.
pub async fn get_table_state(client: &Client, table_name: &str) -> Result<Option<TableState>> {
    let response = match client.describe_table().table_name(table_name).send().await {
        Ok(response) => response,
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()) =>
        {
            return Ok(None);
        }
        Err(err) => return Err(DynamodbError::sdk(format!("{:?}", err))),
    };

    let table = response.table().ok_or_else(|| {
        DynamodbError::AwsSdk(format!("DescribeTable returned no table for '{}'", table_name))
    })?;

    let gsis = table
        .global_secondary_indexes()
        .iter()
        .map(|gsi| GsiState {
            name: gsi.index_name().unwrap_or_default().to_string(),
            status: match gsi.index_status() {
                Some(IndexStatus::Creating) => GsiStatus::Creating,
                Some(IndexStatus::Updating) => GsiStatus::Updating,
                Some(IndexStatus::Deleting) => GsiStatus::Deleting,
                _ => GsiStatus::Active,
            },
        })
        .collect();

    let status = match table.table_status() {
        Some(SdkTableStatus::Creating) => TableStatus::Creating,
        Some(SdkTableStatus::Updating) => TableStatus::Updating,
        Some(SdkTableStatus::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Active,
    };

    Ok(Some(TableState { status, gsis }))
}
