//! Store-level data shapes: attribute values, items, pages and cursors.
//!
//! The store is schema-less; a row is a map from attribute name to a typed
//! scalar. Only the scalar kinds the repositories write are modeled.

use std::collections::HashMap;

/// A typed attribute value as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, carried in its textual form the way the store transmits it.
    N(String),
    /// Boolean.
    Bool(bool),
    /// A store type the repositories never write (lists, maps, sets, ...),
    /// tagged with the store's type name.
    Unsupported(&'static str),
}

impl AttributeValue {
    /// Short type tag of this value (`S`, `N`, `BOOL`).
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Unsupported(name) => name,
        }
    }

    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Textual form of a key attribute. Only strings and numbers can be keys.
    pub fn key_text(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) | AttributeValue::N(s) => Some(s),
            AttributeValue::Bool(_) | AttributeValue::Unsupported(_) => None,
        }
    }
}

/// One row of a table.
pub type Item = HashMap<String, AttributeValue>;

/// Opaque continuation marker returned by a paged read.
///
/// Pass it back unchanged to fetch the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(Item);

impl Cursor {
    pub fn new(key: Item) -> Self {
        Self(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Item {
        self.0
    }

    pub fn as_item(&self) -> &Item {
        &self.0
    }
}

/// One page of a Query or Scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T = Item> {
    pub items: Vec<T>,
    /// Present when more results remain.
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    pub fn with_cursor(items: Vec<T>, cursor: Cursor) -> Self {
        Self {
            items,
            next_cursor: Some(cursor),
        }
    }
}

/// Equality condition on the partition key of a table or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    pub attribute: String,
    pub value: AttributeValue,
}

impl KeyCondition {
    pub fn equals(attribute: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            attribute: attribute.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        let s = AttributeValue::S("abc".to_string());
        let n = AttributeValue::N("35.5".to_string());
        let b = AttributeValue::Bool(true);

        assert_eq!(s.as_s(), Some("abc"));
        assert_eq!(s.as_n(), None);
        assert_eq!(n.as_n(), Some("35.5"));
        assert_eq!(n.as_bool(), None);
        assert_eq!(b.as_bool(), Some(true));
        assert_eq!(b.as_s(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(AttributeValue::S(String::new()).type_name(), "S");
        assert_eq!(AttributeValue::N("1".to_string()).type_name(), "N");
        assert_eq!(AttributeValue::Bool(false).type_name(), "BOOL");
        assert_eq!(AttributeValue::Unsupported("M").type_name(), "M");
    }

    #[test]
    fn test_booleans_have_no_key_text() {
        assert_eq!(AttributeValue::Bool(true).key_text(), None);
        assert_eq!(AttributeValue::N("7".to_string()).key_text(), Some("7"));
    }

    #[test]
    fn test_empty_cursor() {
        assert!(Cursor::new(Item::new()).is_empty());
    }
}
