pub mod config;
pub mod favorites;
pub mod imaging;
pub mod profile;
pub mod store;
pub mod watch;

pub use config::{Config, ConfigError, FavoritesConfig, ImageConfig};
pub use favorites::{
    FavoritesSet, FavoritesSync, Identity, PersistHandle, PersistMode, PersistOutcome,
    FAVORITES_CHANGED,
};
pub use imaging::{
    CompressError, CompressedImage, CompressionWorker, DataUrl, Execution, ImageCompressor,
    ImageFile, ImageSource, PathSource,
};
pub use profile::{ProfilePictures, UploadError, UploadEvent, UploadState};
pub use store::{
    DocumentStore, FileLocalStorage, InMemoryDocumentStore, InMemoryLocalStorage, LocalStorage,
    ProfilesExt, StoreError, UserProfile,
};
pub use watch::{Observable, Subscription};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
