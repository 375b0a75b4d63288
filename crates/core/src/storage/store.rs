use async_trait::async_trait;

use super::item::{Cursor, Item, KeyCondition, Page};
use super::Result;

/// The key-value store capability the repositories are built on.
///
/// Implementations translate their native error shapes into
/// [`RepositoryError`](super::RepositoryError) and never retry.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Writes an item, replacing any item with the same primary key.
    async fn put(&self, table: &str, item: Item) -> Result<()>;

    /// Reads the item at the given primary key.
    async fn get(&self, table: &str, key: Item) -> Result<Option<Item>>;

    /// Reads one page of items whose partition key matches `condition`,
    /// from the table itself or from one of its secondary indexes.
    async fn query(
        &self,
        table: &str,
        index: Option<&str>,
        condition: &KeyCondition,
        cursor: Option<Cursor>,
    ) -> Result<Page>;

    /// Reads one page of the whole table, in no defined order.
    async fn scan(&self, table: &str, cursor: Option<Cursor>) -> Result<Page>;
}
