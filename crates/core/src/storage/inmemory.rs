//! In-memory store backend for testing and local development.
//!
//! Implements [`StoreClient`] over `BTreeMap`s wrapped in `Arc<RwLock<_>>`.
//! Reads are paged with a configurable page size so that cursor handling is
//! exercised exactly as it is against a remote store. Data is not persisted.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::item::{Cursor, Item, KeyCondition, Page};
use super::keys::{self, TableNames};
use super::store::StoreClient;
use super::{RepositoryError, Result};

/// Default number of items returned per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Key layout of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: String,
    pub partition_key: String,
    pub sort_key: Option<String>,
}

/// Key layout of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub partition_key: String,
    pub sort_key: Option<String>,
    pub indexes: Vec<IndexSchema>,
}

impl TableSchema {
    /// Creates a table keyed by a partition key only.
    pub fn new(name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition_key: partition_key.into(),
            sort_key: None,
            indexes: Vec::new(),
        }
    }

    /// Sets the sort key of the table.
    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    /// Adds a secondary index.
    pub fn with_index(
        mut self,
        name: impl Into<String>,
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        self.indexes.push(IndexSchema {
            name: name.into(),
            partition_key: partition_key.into(),
            sort_key: Some(sort_key.into()),
        });
        self
    }

    /// The three tables of the opinions service.
    pub fn opinion_tables(tables: &TableNames) -> Vec<TableSchema> {
        vec![
            TableSchema::new(&tables.opinions, keys::ID),
            TableSchema::new(&tables.comments, keys::OPINION_ID)
                .with_sort_key(keys::COMMENT_ID)
                .with_index(
                    &tables.comments_by_created,
                    keys::OPINION_ID,
                    keys::CREATED_DATE_TIME,
                ),
            TableSchema::new(&tables.reactions, keys::OPINION_ID)
                .with_sort_key(keys::MAIL_ADDRESS),
        ]
    }
}

/// Primary key of a row in textual form: (partition, sort or empty).
type RowKey = (String, String);

#[derive(Debug)]
struct Table {
    schema: TableSchema,
    rows: BTreeMap<RowKey, Item>,
}

impl Table {
    fn row_key(&self, item: &Item) -> Result<RowKey> {
        let partition = key_text(item, &self.schema.partition_key)?;
        let sort = match &self.schema.sort_key {
            Some(name) => key_text(item, name)?,
            None => String::new(),
        };
        Ok((partition, sort))
    }

    /// Primary key attributes of a row, used to build cursors.
    fn key_attributes(&self, item: &Item) -> Item {
        let mut key = Item::new();
        let names = std::iter::once(&self.schema.partition_key).chain(&self.schema.sort_key);
        for name in names {
            if let Some(value) = item.get(name) {
                key.insert(name.clone(), value.clone());
            }
        }
        key
    }
}

fn key_text(item: &Item, name: &str) -> Result<String> {
    item.get(name)
        .and_then(|value| value.key_text())
        .map(str::to_string)
        .ok_or_else(|| RepositoryError::QueryFailed(format!("Missing key attribute: {name}")))
}

fn table_not_found(table: &str) -> RepositoryError {
    RepositoryError::QueryFailed(format!("Table not found: {table}"))
}

/// In-memory store for testing.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    page_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::for_tables(&TableNames::default())
    }
}

impl InMemoryStore {
    /// Creates an empty store with the given tables.
    pub fn new(schemas: impl IntoIterator<Item = TableSchema>) -> Self {
        let tables = schemas
            .into_iter()
            .map(|schema| {
                (
                    schema.name.clone(),
                    Table {
                        schema,
                        rows: BTreeMap::new(),
                    },
                )
            })
            .collect();

        Self {
            tables: Arc::new(RwLock::new(tables)),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates an empty store laid out for the opinions service.
    pub fn for_tables(tables: &TableNames) -> Self {
        Self::new(TableSchema::opinion_tables(tables))
    }

    /// Sets the maximum number of items per page (at least one).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of rows currently held by a table.
    pub async fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map_or(0, |t| t.rows.len())
    }
}

#[async_trait]
impl StoreClient for InMemoryStore {
    async fn put(&self, table: &str, item: Item) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let key = table.row_key(&item)?;
        table.rows.insert(key, item);
        Ok(())
    }

    async fn get(&self, table: &str, key: Item) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;
        let key = table.row_key(&key)?;
        Ok(table.rows.get(&key).cloned())
    }

    async fn query(
        &self,
        table: &str,
        index: Option<&str>,
        condition: &KeyCondition,
        cursor: Option<Cursor>,
    ) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;

        let (partition_key, sort_key) = match index {
            Some(name) => {
                let index = table
                    .schema
                    .indexes
                    .iter()
                    .find(|i| i.name == name)
                    .ok_or_else(|| RepositoryError::QueryFailed(format!("Index not found: {name}")))?;
                (&index.partition_key, &index.sort_key)
            }
            None => (&table.schema.partition_key, &table.schema.sort_key),
        };

        if condition.attribute != *partition_key {
            return Err(RepositoryError::QueryFailed(format!(
                "Key condition must target partition key {partition_key}"
            )));
        }
        let wanted = condition.value.key_text();

        // Rows missing an index key attribute are not part of that index.
        let mut matches: Vec<(String, RowKey, &Item)> = Vec::new();
        for (row_key, item) in &table.rows {
            if item.get(partition_key.as_str()).and_then(|v| v.key_text()) != wanted {
                continue;
            }
            let sort = match sort_key {
                Some(name) => match item.get(name.as_str()).and_then(|v| v.key_text()) {
                    Some(text) => text.to_string(),
                    None => continue,
                },
                None => String::new(),
            };
            matches.push((sort, row_key.clone(), item));
        }
        matches.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let start = match &cursor {
            Some(cursor) => {
                let after = (
                    match sort_key {
                        Some(name) => key_text(cursor.as_item(), name)?,
                        None => String::new(),
                    },
                    table.row_key(cursor.as_item())?,
                );
                matches
                    .iter()
                    .position(|(sort, row_key, _)| {
                        (sort, row_key).cmp(&(&after.0, &after.1)) == Ordering::Greater
                    })
                    .unwrap_or(matches.len())
            }
            None => 0,
        };

        let remaining = &matches[start..];
        let taken = &remaining[..remaining.len().min(self.page_size)];
        let items: Vec<Item> = taken.iter().map(|(_, _, item)| (*item).clone()).collect();

        if taken.len() < remaining.len() {
            let last = taken[taken.len() - 1].2;
            let mut key = table.key_attributes(last);
            if let Some(name) = sort_key {
                if let Some(value) = last.get(name.as_str()) {
                    key.insert(name.clone(), value.clone());
                }
            }
            Ok(Page::with_cursor(items, Cursor::new(key)))
        } else {
            Ok(Page::last(items))
        }
    }

    async fn scan(&self, table: &str, cursor: Option<Cursor>) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;

        let lower = match &cursor {
            Some(cursor) => Bound::Excluded(table.row_key(cursor.as_item())?),
            None => Bound::Unbounded,
        };

        let mut rows = table.rows.range((lower, Bound::Unbounded));
        let items: Vec<Item> = rows
            .by_ref()
            .take(self.page_size)
            .map(|(_, item)| item.clone())
            .collect();

        let next_cursor = match (rows.next(), items.last()) {
            (Some(_), Some(last)) => Some(Cursor::new(table.key_attributes(last))),
            _ => None,
        };

        Ok(Page { items, next_cursor })
    }
}
