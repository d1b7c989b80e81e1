//! Base64 `data:` URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing data URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    /// The string does not start with `data:` or has no `,` separator.
    Malformed,
    /// The payload is not marked `;base64`.
    NotBase64,
    /// The payload is not valid base64.
    Decode(String),
}

impl fmt::Display for DataUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataUrlError::Malformed => write!(f, "malformed data url"),
            DataUrlError::NotBase64 => write!(f, "data url payload is not base64"),
            DataUrlError::Decode(msg) => write!(f, "data url payload decode error: {}", msg),
        }
    }
}

impl std::error::Error for DataUrlError {}

/// A MIME type plus the bytes it describes, rendered as
/// `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data:{};base64,{}",
            self.mime_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

impl FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("data:").ok_or(DataUrlError::Malformed)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::Malformed)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(DataUrlError::NotBase64)?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| DataUrlError::Decode(e.to_string()))?;
        Ok(Self::new(mime_type, bytes))
    }
}

/// Approximate decoded size, in KB, of a base64 text `encoded_len` long:
/// three bytes per four characters, rounded to the nearest KB.
pub fn estimated_decoded_kb(encoded_len: usize) -> u64 {
    (encoded_len as f64 * 3.0 / 4.0 / 1024.0).round() as u64
}
