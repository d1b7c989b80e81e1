//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::document::merge_fields;
use super::{Document, DocumentStore, StoreError};

/// Internal stored representation of a document.
struct StoredDocument {
    fields: Document,
    version: u64,
}

/// In-memory document store backed by a HashMap.
///
/// Storage key is `"collection:id"`. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<HashMap<String, StoredDocument>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }

    /// Current version of a document, if it exists.
    pub fn version(&self, collection: &str, id: &str) -> Result<Option<u64>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage
            .get(&Self::make_key(collection, id))
            .map(|stored| stored.version))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage
            .get(&Self::make_key(collection, id))
            .map(|stored| stored.fields.clone()))
    }

    fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<u64, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let stored = storage
            .entry(Self::make_key(collection, id))
            .or_insert_with(|| StoredDocument {
                fields: Document::new(),
                version: 0,
            });
        merge_fields(&mut stored.fields, fields);
        stored.version += 1;

        Ok(stored.version)
    }
}
