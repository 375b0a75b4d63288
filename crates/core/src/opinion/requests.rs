//! API request and response payloads.
//!
//! Shared between the server handlers and their tests. Pure data types with
//! no I/O; field names follow the camelCase JSON contract.

use serde::{Deserialize, Serialize};

use super::types::Coordinate;

/// Request payload for submitting an opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpinionRequest {
    pub mail_address: String,
    pub coordinate: Coordinate,
    pub opinion: String,
}

/// Response payload after an opinion was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOpinion {
    pub id: String,
}

/// Request payload for commenting on an opinion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub mail_address: String,
    pub comment: String,
}

/// Response payload after a comment was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedComment {
    pub comment_id: String,
}

/// Request payload for setting a user's reaction on an opinion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReactionRequest {
    pub mail_address: String,
    pub is_reactioned: bool,
}

/// Query parameters for reading reaction info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionInfoQuery {
    pub mail_address: String,
}
