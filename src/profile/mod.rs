//! Profile pictures - Compressed images stored inline in the user record.
//!
//! [`ProfilePictures`] runs the imaging pipeline and merge-writes the
//! result; [`UploadState`] with [`reduce`] tracks what the profile screen
//! shows while that happens.

mod state;
mod uploader;

pub use state::{reduce, UploadEvent, UploadState};
pub use uploader::{ProfilePictures, UploadError};
