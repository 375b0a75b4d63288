//! DynamoDB-backed [`StoreClient`].

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use opinions_core::storage::{Cursor, Item, KeyCondition, Page, Result, StoreClient};

use super::conversions::{
    exclusive_start_key, from_sdk_item, to_page, to_sdk_item, to_sdk_value,
};
use super::error::{map_get_item_error, map_put_item_error, map_query_error, map_scan_error};

/// Store client over a DynamoDB `Client`.
///
/// Every call is a single request; paging is driven by the repository.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StoreClient for DynamoDbStore {
    async fn put(&self, table: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_sdk_item(item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn get(&self, table: &str, key: Item) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(to_sdk_item(key)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(result.item.map(from_sdk_item))
    }

    async fn query(
        &self,
        table: &str,
        index: Option<&str>,
        condition: &KeyCondition,
        cursor: Option<Cursor>,
    ) -> Result<Page> {
        let result = self
            .client
            .query()
            .table_name(table)
            .set_index_name(index.map(str::to_string))
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", &condition.attribute)
            .expression_attribute_values(":pk", to_sdk_value(condition.value.clone()))
            .set_exclusive_start_key(exclusive_start_key(cursor))
            .send()
            .await
            .map_err(map_query_error)?;

        tracing::trace!(
            table = %table,
            count = result.count,
            more = result.last_evaluated_key.is_some(),
            "DynamoDB query page"
        );

        Ok(to_page(result.items, result.last_evaluated_key))
    }

    async fn scan(&self, table: &str, cursor: Option<Cursor>) -> Result<Page> {
        let result = self
            .client
            .scan()
            .table_name(table)
            .set_exclusive_start_key(exclusive_start_key(cursor))
            .send()
            .await
            .map_err(map_scan_error)?;

        tracing::trace!(
            table = %table,
            count = result.count,
            more = result.last_evaluated_key.is_some(),
            "DynamoDB scan page"
        );

        Ok(to_page(result.items, result.last_evaluated_key))
    }
}
