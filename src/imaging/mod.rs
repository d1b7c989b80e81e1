//! Imaging - Turns a picked image into a small JPEG data URL.
//!
//! The pipeline validates the declared type and size, decodes, fits the
//! bitmap inside a square of `max_edge` pixels, re-encodes it as JPEG and
//! checks the resulting data URL against a size ceiling. The re-encode can
//! run inline or on a [`CompressionWorker`] thread with identical results.
//!
//! ## Example
//!
//! ```ignore
//! use shelfkeeper::imaging::{Execution, ImageCompressor, PathSource};
//!
//! let compressor = ImageCompressor::default();
//! let source = PathSource::open(Path::new("avatar.png"))?;
//! let compressed = compressor.compress(&source, Execution::Inline)?;
//! println!("{}x{}", compressed.dimensions.width, compressed.dimensions.height);
//! ```

mod compressor;
mod data_url;
mod encode;
mod error;
mod resize;
mod source;
mod worker;

pub use compressor::{CompressedImage, Execution, ImageCompressor};
pub use data_url::{estimated_decoded_kb, DataUrl, DataUrlError};
pub use encode::{encode_rgba, jpeg_quality, DEFAULT_WORKER_QUALITY, JPEG_MIME};
pub use error::CompressError;
pub use resize::{resize_to, target_dimensions, Dimensions};
pub use source::{mime_from_extension, ImageFile, ImageSource, PathSource};
pub use worker::{CompressionWorker, EncodeRequest, EncodeResponse, WorkerStats};
