use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A geotagged opinion submitted by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opinion {
    pub id: String,
    pub mail_address: String,
    pub coordinate: Coordinate,
    pub opinion: String,
}

/// A comment attached to an opinion.
///
/// Comments are ordered by `created_date_time` when listed for an opinion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub opinion_id: String,
    pub comment_id: String,
    pub mail_address: String,
    pub comment: String,
    pub created_date_time: DateTime<Utc>,
}

/// A user's reaction on an opinion.
///
/// Identified by the pair (`opinion_id`, `mail_address`); at most one row
/// exists per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub opinion_id: String,
    pub mail_address: String,
    pub is_reactioned: bool,
}

/// Aggregate reaction state for one opinion, as seen by one user.
///
/// Computed on demand from the reaction rows, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionInfo {
    /// Whether the requesting user currently reacts to the opinion.
    pub is_reactioned: bool,
    /// Number of users whose reaction is set.
    pub reaction_count: u32,
}
