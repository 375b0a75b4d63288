//! Core domain types and data access layer for the opinions service.
//!
//! - [`opinion`] holds the entities (opinions, comments, reactions), the API
//!   request payloads and the identifier generator.
//! - [`storage`] maps those entities onto a partitioned key-value store:
//!   the [`storage::StoreClient`] capability, the pagination driver, the
//!   per-entity conversions and the store-backed repository.

pub mod opinion;
pub mod storage;
