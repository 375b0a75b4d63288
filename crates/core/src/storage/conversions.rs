//! Attribute conversion functions.
//!
//! Pure functions for converting between store items and domain types.
//! Every decoder checks each field's presence and type and reports the first
//! mismatch as a [`DecodeError`].

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::opinion::{Comment, Coordinate, Opinion, Reaction};

use super::item::{AttributeValue, Item};
use super::keys;
use super::{DecodeError, RepositoryError};

pub const ENTITY_OPINION: &str = "Opinion";
pub const ENTITY_COMMENT: &str = "Comment";
pub const ENTITY_REACTION: &str = "Reaction";

// ============================================================================
// Opinion conversions
// ============================================================================

/// Convert an Opinion to a store item.
pub fn opinion_to_item(opinion: &Opinion) -> Item {
    HashMap::from([
        (keys::ID.to_string(), AttributeValue::S(opinion.id.clone())),
        (
            keys::MAIL_ADDRESS.to_string(),
            AttributeValue::S(opinion.mail_address.clone()),
        ),
        (
            keys::LATITUDE.to_string(),
            number(opinion.coordinate.latitude),
        ),
        (
            keys::LONGITUDE.to_string(),
            number(opinion.coordinate.longitude),
        ),
        (
            keys::OPINION.to_string(),
            AttributeValue::S(opinion.opinion.clone()),
        ),
    ])
}

/// Convert a store item to an Opinion.
pub fn item_to_opinion(item: &Item) -> Result<Opinion, RepositoryError> {
    decode_opinion(item).map_err(|e| RepositoryError::decode(ENTITY_OPINION, e))
}

fn decode_opinion(item: &Item) -> Result<Opinion, DecodeError> {
    Ok(Opinion {
        id: get_string(item, keys::ID)?,
        mail_address: get_string(item, keys::MAIL_ADDRESS)?,
        coordinate: Coordinate {
            latitude: get_f64(item, keys::LATITUDE)?,
            longitude: get_f64(item, keys::LONGITUDE)?,
        },
        opinion: get_string(item, keys::OPINION)?,
    })
}

// ============================================================================
// Comment conversions
// ============================================================================

/// Convert a Comment to a store item.
pub fn comment_to_item(comment: &Comment) -> Item {
    HashMap::from([
        (
            keys::OPINION_ID.to_string(),
            AttributeValue::S(comment.opinion_id.clone()),
        ),
        (
            keys::COMMENT_ID.to_string(),
            AttributeValue::S(comment.comment_id.clone()),
        ),
        (
            keys::MAIL_ADDRESS.to_string(),
            AttributeValue::S(comment.mail_address.clone()),
        ),
        (
            keys::COMMENT.to_string(),
            AttributeValue::S(comment.comment.clone()),
        ),
        (
            keys::CREATED_DATE_TIME.to_string(),
            AttributeValue::S(format_timestamp(&comment.created_date_time)),
        ),
    ])
}

/// Convert a store item to a Comment.
pub fn item_to_comment(item: &Item) -> Result<Comment, RepositoryError> {
    decode_comment(item).map_err(|e| RepositoryError::decode(ENTITY_COMMENT, e))
}

fn decode_comment(item: &Item) -> Result<Comment, DecodeError> {
    Ok(Comment {
        opinion_id: get_string(item, keys::OPINION_ID)?,
        comment_id: get_string(item, keys::COMMENT_ID)?,
        mail_address: get_string(item, keys::MAIL_ADDRESS)?,
        comment: get_string(item, keys::COMMENT)?,
        created_date_time: get_datetime(item, keys::CREATED_DATE_TIME)?,
    })
}

// ============================================================================
// Reaction conversions
// ============================================================================

/// Convert a Reaction to a store item.
pub fn reaction_to_item(reaction: &Reaction) -> Item {
    let mut item = keys::reaction_key(&reaction.opinion_id, &reaction.mail_address);
    item.insert(
        keys::IS_REACTIONED.to_string(),
        AttributeValue::Bool(reaction.is_reactioned),
    );
    item
}

/// Convert a store item to a Reaction.
pub fn item_to_reaction(item: &Item) -> Result<Reaction, RepositoryError> {
    decode_reaction(item).map_err(|e| RepositoryError::decode(ENTITY_REACTION, e))
}

fn decode_reaction(item: &Item) -> Result<Reaction, DecodeError> {
    Ok(Reaction {
        opinion_id: get_string(item, keys::OPINION_ID)?,
        mail_address: get_string(item, keys::MAIL_ADDRESS)?,
        is_reactioned: get_bool(item, keys::IS_REACTIONED)?,
    })
}

// ============================================================================
// Timestamps
// ============================================================================

/// Formats a timestamp as fixed-width RFC 3339 in UTC.
///
/// Microsecond precision and a `Z` suffix keep every value the same length,
/// so lexicographic order equals chronological order.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ============================================================================
// Helper functions
// ============================================================================

fn number(value: f64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

fn get_attribute<'a>(item: &'a Item, key: &'static str) -> Result<&'a AttributeValue, DecodeError> {
    item.get(key)
        .ok_or(DecodeError::MissingField { field: key })
}

/// Get a required string attribute.
fn get_string(item: &Item, key: &'static str) -> Result<String, DecodeError> {
    get_attribute(item, key)?
        .as_s()
        .map(str::to_string)
        .ok_or(DecodeError::WrongType {
            field: key,
            expected: "S",
        })
}

/// Get a required numeric attribute.
fn get_f64(item: &Item, key: &'static str) -> Result<f64, DecodeError> {
    let raw = get_attribute(item, key)?.as_n().ok_or(DecodeError::WrongType {
        field: key,
        expected: "N",
    })?;
    raw.parse().map_err(|e: std::num::ParseFloatError| DecodeError::Malformed {
        field: key,
        reason: e.to_string(),
    })
}

/// Get a required boolean attribute.
fn get_bool(item: &Item, key: &'static str) -> Result<bool, DecodeError> {
    get_attribute(item, key)?
        .as_bool()
        .ok_or(DecodeError::WrongType {
            field: key,
            expected: "BOOL",
        })
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &Item, key: &'static str) -> Result<DateTime<Utc>, DecodeError> {
    let raw = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DecodeError::Malformed {
            field: key,
            reason: e.to_string(),
        })
}

/// Reads the `isReactioned` flag of a reaction row.
pub fn is_reactioned(item: &Item) -> Result<bool, RepositoryError> {
    get_bool(item, keys::IS_REACTIONED).map_err(|e| RepositoryError::decode(ENTITY_REACTION, e))
}
