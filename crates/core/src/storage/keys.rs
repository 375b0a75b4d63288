//! Table layout: table names, index names, attribute names and key builders.
//!
//! Pure functions, no I/O.

use std::collections::HashMap;

use super::item::{AttributeValue, Item};

// ============================================================================
// Attribute names
// ============================================================================

pub const ID: &str = "id";
pub const OPINION_ID: &str = "opinionId";
pub const COMMENT_ID: &str = "commentId";
pub const MAIL_ADDRESS: &str = "mailAddress";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const OPINION: &str = "opinion";
pub const COMMENT: &str = "comment";
pub const CREATED_DATE_TIME: &str = "createdDateTime";
pub const IS_REACTIONED: &str = "isReactioned";

// ============================================================================
// Default table and index names
// ============================================================================

pub const OPINIONS_TABLE: &str = "opinions";
pub const COMMENTS_TABLE: &str = "comments";
pub const REACTIONS_TABLE: &str = "reactions";
pub const COMMENTS_BY_CREATED_INDEX: &str = "opinionId-createdDateTime-index";

/// Names of the tables and indexes the repository reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub opinions: String,
    pub comments: String,
    pub reactions: String,
    /// Index on `comments` keyed by (`opinionId`, `createdDateTime`).
    pub comments_by_created: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            opinions: OPINIONS_TABLE.to_string(),
            comments: COMMENTS_TABLE.to_string(),
            reactions: REACTIONS_TABLE.to_string(),
            comments_by_created: COMMENTS_BY_CREATED_INDEX.to_string(),
        }
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Primary key of a reaction row.
///
/// Pattern: (`opinionId`, `mailAddress`)
pub fn reaction_key(opinion_id: &str, mail_address: &str) -> Item {
    HashMap::from([
        (
            OPINION_ID.to_string(),
            AttributeValue::S(opinion_id.to_string()),
        ),
        (
            MAIL_ADDRESS.to_string(),
            AttributeValue::S(mail_address.to_string()),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_key() {
        let key = reaction_key("op-1", "u1@example.com");

        assert_eq!(key.len(), 2);
        assert_eq!(key.get(OPINION_ID).unwrap().as_s(), Some("op-1"));
        assert_eq!(key.get(MAIL_ADDRESS).unwrap().as_s(), Some("u1@example.com"));
    }

    #[test]
    fn test_default_table_names() {
        let tables = TableNames::default();

        assert_eq!(tables.opinions, "opinions");
        assert_eq!(tables.comments, "comments");
        assert_eq!(tables.reactions, "reactions");
        assert_eq!(tables.comments_by_created, "opinionId-createdDateTime-index");
    }
}
