//! Stores - Where favorites and profiles are persisted.
//!
//! Two kinds of backing storage exist:
//!
//! - [`LocalStorage`]: device-local string key/value storage. Holds the
//!   favorites of an anonymous user as a JSON array under a single key.
//! - [`DocumentStore`]: the remote document database. Holds one record per
//!   user, written only with merge writes.
//!
//! ## Example
//!
//! ```ignore
//! use shelfkeeper::store::{InMemoryDocumentStore, ProfilesExt};
//!
//! let store = InMemoryDocumentStore::new();
//! store.profiles().merge_favorites("uid-1", &["book-1".to_string()])?;
//! let profile = store.profiles().get("uid-1")?;
//! ```

mod document;
mod error;
mod file;
mod in_memory;
mod local;
mod profile;

pub use document::{merge_fields, Document, DocumentStore};
pub use error::StoreError;
pub use file::FileLocalStorage;
pub use in_memory::InMemoryDocumentStore;
pub use local::{InMemoryLocalStorage, LocalStorage};
pub use profile::{ProfileRepository, ProfilesExt, UserProfile, FAVORITES_FIELD, PICTURE_FIELD};
