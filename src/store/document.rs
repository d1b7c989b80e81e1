//! DocumentStore - Abstract remote document database.

use serde_json::{Map, Value};

use super::StoreError;

/// A schemaless document: top-level field names mapped to JSON values.
pub type Document = Map<String, Value>;

/// Remote document storage addressed by collection and id.
///
/// Every write is a merge write: fields present in the write replace the
/// stored ones, fields absent from it are preserved.
pub trait DocumentStore: Send + Sync {
    /// Get a document. Returns None if it does not exist.
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge `fields` into the document, creating it if missing.
    /// Returns the document version after the write.
    fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<u64, StoreError>;
}

/// Merge `fields` into `target`.
///
/// Nested objects are merged field by field; every other value (arrays
/// included) replaces what was stored.
pub fn merge_fields(target: &mut Document, fields: Document) {
    for (key, value) in fields {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_fields(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
