//! Conversion between store items and DynamoDB attribute maps.
//!
//! Pure functions, testable without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use opinions_core::storage::{AttributeValue, Cursor, Item, Page};

/// Wire representation of one row.
pub type SdkItem = HashMap<String, SdkValue>;

/// Convert a store value to its SDK form.
pub fn to_sdk_value(value: AttributeValue) -> SdkValue {
    match value {
        AttributeValue::S(s) => SdkValue::S(s),
        AttributeValue::N(n) => SdkValue::N(n),
        AttributeValue::Bool(b) => SdkValue::Bool(b),
        // Never produced by the repositories.
        AttributeValue::Unsupported(_) => SdkValue::Null(true),
    }
}

/// Convert an SDK value to its store form.
///
/// Types outside the scalar set keep only their type tag, so decoding a
/// field of that type reports a type mismatch.
pub fn from_sdk_value(value: SdkValue) -> AttributeValue {
    match value {
        SdkValue::S(s) => AttributeValue::S(s),
        SdkValue::N(n) => AttributeValue::N(n),
        SdkValue::Bool(b) => AttributeValue::Bool(b),
        SdkValue::B(_) => AttributeValue::Unsupported("B"),
        SdkValue::Bs(_) => AttributeValue::Unsupported("BS"),
        SdkValue::L(_) => AttributeValue::Unsupported("L"),
        SdkValue::M(_) => AttributeValue::Unsupported("M"),
        SdkValue::Ns(_) => AttributeValue::Unsupported("NS"),
        SdkValue::Null(_) => AttributeValue::Unsupported("NULL"),
        SdkValue::Ss(_) => AttributeValue::Unsupported("SS"),
        _ => AttributeValue::Unsupported("UNKNOWN"),
    }
}

pub fn to_sdk_item(item: Item) -> SdkItem {
    item.into_iter()
        .map(|(name, value)| (name, to_sdk_value(value)))
        .collect()
}

pub fn from_sdk_item(item: SdkItem) -> Item {
    item.into_iter()
        .map(|(name, value)| (name, from_sdk_value(value)))
        .collect()
}

/// Build a page from a Query/Scan response.
///
/// An absent or empty `LastEvaluatedKey` ends pagination.
pub fn to_page(items: Option<Vec<SdkItem>>, last_evaluated_key: Option<SdkItem>) -> Page {
    let items = items
        .unwrap_or_default()
        .into_iter()
        .map(from_sdk_item)
        .collect();

    let next_cursor = last_evaluated_key
        .filter(|key| !key.is_empty())
        .map(|key| Cursor::new(from_sdk_item(key)));

    Page { items, next_cursor }
}

/// `ExclusiveStartKey` for a continuation request.
pub fn exclusive_start_key(cursor: Option<Cursor>) -> Option<SdkItem> {
    cursor.map(|cursor| to_sdk_item(cursor.into_inner()))
}
