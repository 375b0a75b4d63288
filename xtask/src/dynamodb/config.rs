//! Table configuration types (Functional Core - pure data).

use opinions_core::storage::{keys, TableNames};

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub gsis: Vec<GsiConfig>,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    pub fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute_type: AttributeType::String,
        }
    }
}

/// DynamoDB attribute types. Every key in this schema is a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

/// Global Secondary Index configuration. Projects all attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
}

impl TableConfig {
    fn new(table_name: &str, partition_key: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            partition_key: KeyAttribute::string(partition_key),
            sort_key: None,
            gsis: Vec::new(),
        }
    }

    fn with_sort_key(mut self, sort_key: &str) -> Self {
        self.sort_key = Some(KeyAttribute::string(sort_key));
        self
    }

    fn with_gsi(mut self, name: &str, partition_key: &str, sort_key: &str) -> Self {
        self.gsis.push(GsiConfig {
            name: name.to_string(),
            partition_key: KeyAttribute::string(partition_key),
            sort_key: Some(KeyAttribute::string(sort_key)),
        });
        self
    }
}

/// Returns the table configurations the service reads and writes.
/// This is a pure function - no I/O.
///
/// - opinions: `id`
/// - comments: (`opinionId`, `commentId`), indexed by (`opinionId`, `createdDateTime`)
/// - reactions: (`opinionId`, `mailAddress`)
pub fn opinion_table_configs(names: &TableNames) -> Vec<TableConfig> {
    vec![
        TableConfig::new(&names.opinions, keys::ID),
        TableConfig::new(&names.comments, keys::OPINION_ID)
            .with_sort_key(keys::COMMENT_ID)
            .with_gsi(
                &names.comments_by_created,
                keys::OPINION_ID,
                keys::CREATED_DATE_TIME,
            ),
        TableConfig::new(&names.reactions, keys::OPINION_ID).with_sort_key(keys::MAIL_ADDRESS),
    ]
}
