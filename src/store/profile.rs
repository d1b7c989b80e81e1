//! ProfileRepository - Typed accessor for per-user profile records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Document, DocumentStore, StoreError};

pub const FAVORITES_FIELD: &str = "favorites";
pub const PICTURE_FIELD: &str = "profilePictureDataUrl";

/// The per-user record in the remote document store.
///
/// Fields other than these two may exist in the document; they are ignored
/// on read and left untouched on write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_data_url: Option<String>,
}

impl UserProfile {
    /// The collection user records live in unless configured otherwise.
    pub const COLLECTION: &'static str = "users";

    /// Stored favorites, empty when the field is missing.
    pub fn favorites(&self) -> &[String] {
        self.favorites.as_deref().unwrap_or(&[])
    }
}

/// Typed repository over the user records of one collection.
pub struct ProfileRepository<'a, S> {
    store: &'a S,
    collection: &'a str,
}

impl<'a, S: DocumentStore> ProfileRepository<'a, S> {
    pub fn new(store: &'a S, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// Get a user's profile. Returns None if the record does not exist.
    pub fn get(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        match self.store.get_document(self.collection, uid)? {
            Some(doc) => Ok(Some(serde_json::from_value(Value::Object(doc))?)),
            None => Ok(None),
        }
    }

    /// Merge-write the favorites field.
    pub fn merge_favorites(&self, uid: &str, favorites: &[String]) -> Result<u64, StoreError> {
        let mut fields = Document::new();
        fields.insert(FAVORITES_FIELD.to_string(), serde_json::to_value(favorites)?);
        self.store.merge_document(self.collection, uid, fields)
    }

    /// Merge-write the profile picture field.
    pub fn merge_picture(&self, uid: &str, data_url: &str) -> Result<u64, StoreError> {
        let mut fields = Document::new();
        fields.insert(
            PICTURE_FIELD.to_string(),
            Value::String(data_url.to_string()),
        );
        self.store.merge_document(self.collection, uid, fields)
    }
}

/// Extension trait for typed profile access on any DocumentStore.
pub trait ProfilesExt: DocumentStore + Sized {
    /// Profiles in the default `users` collection.
    fn profiles(&self) -> ProfileRepository<'_, Self> {
        ProfileRepository::new(self, UserProfile::COLLECTION)
    }

    /// Profiles in a named collection.
    fn profiles_in<'a>(&'a self, collection: &'a str) -> ProfileRepository<'a, Self> {
        ProfileRepository::new(self, collection)
    }
}

impl<S: DocumentStore> ProfilesExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use serde_json::json;

    #[test]
    fn missing_profile_is_none() {
        let store = InMemoryDocumentStore::new();
        assert!(store.profiles().get("u1").unwrap().is_none());
    }

    #[test]
    fn merges_keep_each_other() {
        let store = InMemoryDocumentStore::new();
        let profiles = store.profiles();

        profiles.merge_picture("u1", "data:image/jpeg;base64,AAAA").unwrap();
        profiles
            .merge_favorites("u1", &["a".to_string(), "b".to_string()])
            .unwrap();

        let profile = profiles.get("u1").unwrap().unwrap();
        assert_eq!(profile.favorites(), ["a".to_string(), "b".to_string()]);
        assert_eq!(
            profile.profile_picture_data_url.as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );
    }

    #[test]
    fn null_favorites_read_as_empty() {
        let store = InMemoryDocumentStore::new();
        let mut fields = Document::new();
        fields.insert("favorites".into(), Value::Null);
        fields.insert("displayName".into(), json!("Ada"));
        store.merge_document("users", "u1", fields).unwrap();

        let profile = store.profiles().get("u1").unwrap().unwrap();
        assert!(profile.favorites().is_empty());
    }

    #[test]
    fn wrong_field_type_is_serde_error() {
        let store = InMemoryDocumentStore::new();
        let mut fields = Document::new();
        fields.insert("favorites".into(), json!("not-a-list"));
        store.merge_document("users", "u1", fields).unwrap();

        let err = store.profiles().get("u1").unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }

    #[test]
    fn custom_collection() {
        let store = InMemoryDocumentStore::new();
        store
            .profiles_in("readers")
            .merge_favorites("u1", &["x".to_string()])
            .unwrap();
        assert!(store.profiles().get("u1").unwrap().is_none());
        assert!(store.profiles_in("readers").get("u1").unwrap().is_some());
    }
}
