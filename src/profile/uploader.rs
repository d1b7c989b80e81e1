use std::fmt;
use std::sync::Arc;

use crate::imaging::{CompressError, CompressedImage, Execution, ImageCompressor, ImageSource};
use crate::store::{DocumentStore, ProfilesExt, StoreError, UserProfile};

/// Error type for profile picture uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The image was rejected or could not be compressed.
    Compress(CompressError),
    /// Nobody is signed in, so there is no record to write to.
    NotAuthenticated,
    /// The compressed picture could not be written to the profile record.
    Save(StoreError),
}

impl UploadError {
    /// Message suitable for showing to the uploader.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Compress(err) => err.user_message(),
            UploadError::NotAuthenticated => "User not authenticated".into(),
            UploadError::Save(err) => format!("Failed to save image: {}", err),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Compress(err) => write!(f, "compression failed: {}", err),
            UploadError::NotAuthenticated => write!(f, "no authenticated user"),
            UploadError::Save(err) => write!(f, "saving profile picture failed: {}", err),
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Compress(err) => Some(err),
            UploadError::NotAuthenticated => None,
            UploadError::Save(err) => Some(err),
        }
    }
}

impl From<CompressError> for UploadError {
    fn from(err: CompressError) -> Self {
        UploadError::Compress(err)
    }
}

impl From<StoreError> for UploadError {
    fn from(err: StoreError) -> Self {
        UploadError::Save(err)
    }
}

/// Compresses profile pictures and stores them inline in the user's record.
pub struct ProfilePictures<D> {
    store: Arc<D>,
    compressor: ImageCompressor,
    collection: String,
}

impl<D: DocumentStore> ProfilePictures<D> {
    pub fn new(store: Arc<D>, compressor: ImageCompressor) -> Self {
        Self {
            store,
            compressor,
            collection: UserProfile::COLLECTION.to_string(),
        }
    }

    /// Store pictures in `collection` instead of `users`.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn compressor(&self) -> &ImageCompressor {
        &self.compressor
    }

    /// Compress `source` and merge it into `uid`'s record as
    /// `profilePictureDataUrl`.
    ///
    /// Nothing is written unless compression fully succeeds. Store failures
    /// are returned, not swallowed.
    pub fn upload<S: ImageSource + ?Sized>(
        &self,
        uid: Option<&str>,
        source: &S,
        execution: Execution<'_>,
    ) -> Result<CompressedImage, UploadError> {
        let compressed = self.compressor.compress(source, execution)?;

        let uid = uid.ok_or(UploadError::NotAuthenticated)?;
        log::debug!(
            "saving {}KB profile picture for {}",
            compressed.estimated_kb,
            uid
        );
        self.store
            .profiles_in(&self.collection)
            .merge_picture(uid, &compressed.data_url)
            .map_err(|err| {
                log::error!("error saving profile picture for {}: {}", uid, err);
                UploadError::Save(err)
            })?;

        Ok(compressed)
    }

    /// The stored picture, if any. Read failures are logged and read as none.
    pub fn load(&self, uid: &str) -> Option<String> {
        match self.store.profiles_in(&self.collection).get(uid) {
            Ok(profile) => profile.and_then(|profile| profile.profile_picture_data_url),
            Err(err) => {
                log::error!("error loading profile picture for {}: {}", uid, err);
                None
            }
        }
    }
}
