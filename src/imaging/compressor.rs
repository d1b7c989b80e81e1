use super::data_url::{estimated_decoded_kb, DataUrl};
use super::encode::{encode_rgba, JPEG_MIME};
use super::resize::{resize_to, target_dimensions, Dimensions};
use super::{CompressError, CompressionWorker, EncodeRequest, ImageSource};
use crate::config::ImageConfig;

/// Where the re-encode step runs.
#[derive(Clone, Copy)]
pub enum Execution<'a> {
    /// On the calling thread.
    Inline,
    /// On a background worker; the caller still waits for the result.
    Worker(&'a CompressionWorker),
}

/// The output of a successful compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    /// `data:image/jpeg;base64,...`
    pub data_url: String,
    pub dimensions: Dimensions,
    /// Size of the JPEG before base64 encoding.
    pub encoded_bytes: usize,
    /// Estimated decoded size of `data_url`, as checked against the ceiling.
    pub estimated_kb: u64,
}

/// Validates, downsamples and re-encodes user images.
#[derive(Debug, Clone, Default)]
pub struct ImageCompressor {
    config: ImageConfig,
}

impl ImageCompressor {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Reject sources by declared type and size without reading them.
    pub fn validate<S: ImageSource + ?Sized>(&self, source: &S) -> Result<(), CompressError> {
        if !self.config.allows(source.mime_type()) {
            return Err(CompressError::UnsupportedType {
                mime_type: source.mime_type().to_string(),
            });
        }
        if source.size() > self.config.max_source_bytes {
            return Err(CompressError::SourceTooLarge {
                size: source.size(),
                limit: self.config.max_source_bytes,
            });
        }
        Ok(())
    }

    /// Run the whole pipeline, stopping at the first failing step.
    pub fn compress<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        execution: Execution<'_>,
    ) -> Result<CompressedImage, CompressError> {
        self.validate(source)?;

        let bytes = source
            .read()
            .map_err(|e| CompressError::Read(e.to_string()))?;
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| CompressError::Decode(e.to_string()))?;

        let dimensions = target_dimensions(decoded.width(), decoded.height(), self.config.max_edge);
        log::debug!(
            "compressing {} from {}x{} to {}x{}",
            source.name(),
            decoded.width(),
            decoded.height(),
            dimensions.width,
            dimensions.height
        );
        let bitmap = resize_to(&decoded, dimensions);

        let jpeg = match execution {
            Execution::Inline => encode_rgba(
                bitmap.as_raw(),
                dimensions.width,
                dimensions.height,
                self.config.quality,
            )
            .map_err(CompressError::Encode)?,
            Execution::Worker(worker) => worker.encode(EncodeRequest {
                image_data: bitmap.into_raw(),
                width: dimensions.width,
                height: dimensions.height,
                quality: self.config.quality as f32 / 100.0,
            })?,
        };

        let encoded_bytes = jpeg.len();
        let data_url = DataUrl::new(JPEG_MIME, jpeg).to_string();
        let estimated_kb = self.check_ceiling(data_url.len())?;

        Ok(CompressedImage {
            data_url,
            dimensions,
            encoded_bytes,
            estimated_kb,
        })
    }

    /// Estimated KB of a data URL `len` characters long, or the ceiling
    /// error when it is over the limit.
    pub fn check_ceiling(&self, len: usize) -> Result<u64, CompressError> {
        let estimated_kb = estimated_decoded_kb(len);
        if estimated_kb > self.config.max_encoded_kb {
            return Err(CompressError::ExceedsCeiling {
                estimated_kb,
                limit_kb: self.config.max_encoded_kb,
            });
        }
        Ok(estimated_kb)
    }
}
