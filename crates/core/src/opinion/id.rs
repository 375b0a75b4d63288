//! Identifier generation for new records.

use uuid::Uuid;

/// Produces globally unique identifiers for new opinions and comments.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier.
    fn new_id(&self) -> String;
}

/// Random (v4) UUIDs in canonical hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
