//! DynamoDB store adapter.
//!
//! Implements [`StoreClient`](opinions_core::storage::StoreClient) on top of
//! `aws-sdk-dynamodb`; the repositories in `opinions_core` do the rest.

mod client;
mod conversions;
mod error;

pub use client::DynamoDbStore;
