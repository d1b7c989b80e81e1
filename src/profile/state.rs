use super::UploadError;
use crate::imaging::CompressedImage;

/// What the profile screen shows about the picture and its upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub picture: Option<String>,
    pub uploading: bool,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// The stored picture was read for the signed-in user.
    PictureLoaded(Option<String>),
    /// A file was picked and the upload started.
    FileSelected,
    /// The upload stopped with a user-facing message.
    Failed(String),
    /// The picture was saved; carries the stored data URL.
    Saved(String),
    /// The success notice timed out.
    SuccessDismissed,
}

impl UploadEvent {
    /// The event that ends an upload with `result`.
    pub fn from_result(result: &Result<CompressedImage, UploadError>) -> Self {
        match result {
            Ok(compressed) => UploadEvent::Saved(compressed.data_url.clone()),
            Err(err) => UploadEvent::Failed(err.user_message()),
        }
    }
}

/// Apply `event` to `state`.
pub fn reduce(state: &UploadState, event: UploadEvent) -> UploadState {
    match event {
        UploadEvent::PictureLoaded(picture) => UploadState {
            picture,
            ..state.clone()
        },
        UploadEvent::FileSelected => UploadState {
            uploading: true,
            error: None,
            success: false,
            ..state.clone()
        },
        UploadEvent::Failed(message) => UploadState {
            uploading: false,
            error: Some(message),
            ..state.clone()
        },
        UploadEvent::Saved(picture) => UploadState {
            picture: Some(picture),
            uploading: false,
            error: None,
            success: true,
        },
        UploadEvent::SuccessDismissed => UploadState {
            success: false,
            ..state.clone()
        },
    }
}

impl UploadState {
    pub fn apply(self, event: UploadEvent) -> Self {
        reduce(&self, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::CompressError;

    #[test]
    fn selecting_clears_previous_outcome() {
        let state = UploadState {
            error: Some("old".into()),
            success: true,
            ..UploadState::default()
        };
        let next = reduce(&state, UploadEvent::FileSelected);
        assert!(next.uploading);
        assert_eq!(next.error, None);
        assert!(!next.success);
    }

    #[test]
    fn failure_keeps_current_picture() {
        let state = UploadState::default()
            .apply(UploadEvent::PictureLoaded(Some("data:old".into())))
            .apply(UploadEvent::FileSelected);

        let failed: Result<CompressedImage, UploadError> =
            Err(UploadError::Compress(CompressError::ExceedsCeiling {
                estimated_kb: 950,
                limit_kb: 900,
            }));
        let next = state.apply(UploadEvent::from_result(&failed));

        assert!(!next.uploading);
        assert_eq!(next.picture.as_deref(), Some("data:old"));
        assert_eq!(
            next.error.as_deref(),
            Some("Compressed image still too large. Try a smaller image.")
        );
    }

    #[test]
    fn save_then_dismiss() {
        let state = UploadState::default()
            .apply(UploadEvent::FileSelected)
            .apply(UploadEvent::Saved("data:new".into()));
        assert!(state.success);
        assert!(!state.uploading);
        assert_eq!(state.picture.as_deref(), Some("data:new"));

        let state = state.apply(UploadEvent::SuccessDismissed);
        assert!(!state.success);
        assert_eq!(state.picture.as_deref(), Some("data:new"));
    }
}
