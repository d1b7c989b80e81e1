use std::fmt;

/// Error type for the image compression pipeline.
///
/// Each variant corresponds to the step that failed; the pipeline stops at
/// the first failure and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressError {
    /// The declared MIME type is not in the allow-list.
    UnsupportedType { mime_type: String },
    /// The source file is larger than the accepted maximum.
    SourceTooLarge { size: u64, limit: u64 },
    /// The source bytes could not be read.
    Read(String),
    /// The bytes are not a decodable image.
    Decode(String),
    /// No encoder is available to run the re-encode step.
    Environment(String),
    /// Re-encoding the resized bitmap failed.
    Encode(String),
    /// The compressed data URL is still above the size ceiling.
    ExceedsCeiling { estimated_kb: u64, limit_kb: u64 },
}

impl CompressError {
    /// Message suitable for showing to the person who picked the file.
    pub fn user_message(&self) -> String {
        match self {
            CompressError::UnsupportedType { .. } => "Only JPG and PNG files are allowed".into(),
            CompressError::SourceTooLarge { limit, .. } => {
                format!("File size must be less than {}", human_size(*limit))
            }
            CompressError::Read(_) => "Error reading file".into(),
            CompressError::Decode(_) => "Error loading image".into(),
            CompressError::Environment(_) => "Image encoder is not available".into(),
            CompressError::Encode(_) => "Error processing image".into(),
            CompressError::ExceedsCeiling { .. } => {
                "Compressed image still too large. Try a smaller image.".into()
            }
        }
    }

    /// Whether the input was rejected before any bytes were read.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CompressError::UnsupportedType { .. } | CompressError::SourceTooLarge { .. }
        )
    }
}

impl fmt::Display for CompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressError::UnsupportedType { mime_type } => {
                write!(f, "unsupported image type: {}", mime_type)
            }
            CompressError::SourceTooLarge { size, limit } => write!(
                f,
                "source image is {} bytes, limit is {} bytes",
                size, limit
            ),
            CompressError::Read(msg) => write!(f, "failed to read image: {}", msg),
            CompressError::Decode(msg) => write!(f, "failed to decode image: {}", msg),
            CompressError::Environment(msg) => write!(f, "encoder unavailable: {}", msg),
            CompressError::Encode(msg) => write!(f, "failed to encode image: {}", msg),
            CompressError::ExceedsCeiling {
                estimated_kb,
                limit_kb,
            } => write!(
                f,
                "compressed image is about {}KB, limit is {}KB",
                estimated_kb, limit_kb
            ),
        }
    }
}

impl std::error::Error for CompressError {}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

// Whole MB/KB where exact, otherwise one decimal.
fn human_size(bytes: u64) -> String {
    let (unit, name) = if bytes >= MIB {
        (MIB, "MB")
    } else if bytes >= KIB {
        (KIB, "KB")
    } else {
        return format!("{} bytes", bytes);
    };
    if bytes % unit == 0 {
        format!("{}{}", bytes / unit, name)
    } else {
        format!("{:.1}{}", bytes as f64 / unit as f64, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages() {
        let too_large = CompressError::SourceTooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(too_large.user_message(), "File size must be less than 5MB");
        assert!(too_large.is_validation());

        let gif = CompressError::UnsupportedType {
            mime_type: "image/gif".into(),
        };
        assert_eq!(gif.user_message(), "Only JPG and PNG files are allowed");
        assert_eq!(gif.to_string(), "unsupported image type: image/gif");

        assert!(!CompressError::Decode("bad".into()).is_validation());
    }

    #[test]
    fn size_limit_message_never_rounds_to_zero() {
        let message = |limit| CompressError::SourceTooLarge { size: u64::MAX, limit }.user_message();
        assert_eq!(message(512 * 1024), "File size must be less than 512KB");
        assert_eq!(message(1536 * 1024), "File size must be less than 1.5MB");
        assert_eq!(message(1500), "File size must be less than 1.5KB");
        assert_eq!(message(800), "File size must be less than 800 bytes");
    }
}
