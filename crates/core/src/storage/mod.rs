mod conversions;
mod error;
mod http_mapping;
mod inmemory;
mod item;
pub mod keys;
mod pagination;
mod repository;
mod store;
mod traits;

pub use conversions::format_timestamp;
pub use error::{DecodeError, RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use inmemory::{InMemoryStore, IndexSchema, TableSchema};
pub use item::{AttributeValue, Cursor, Item, KeyCondition, Page};
pub use keys::TableNames;
pub use pagination::{collect_pages, run_cancellable};
pub use repository::StoreRepository;
pub use store::StoreClient;
pub use traits::{CommentRepository, OpinionRepository, ReactionRepository};
