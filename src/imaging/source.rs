//! Image sources - Where the bytes of a picked image come from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A user-picked image file.
///
/// The MIME type and size are what the picker declared; both are checked
/// before `read` is ever called.
pub trait ImageSource {
    fn mime_type(&self) -> &str;

    fn size(&self) -> u64;

    fn read(&self) -> io::Result<Vec<u8>>;

    /// Display name for log lines.
    fn name(&self) -> &str {
        "image"
    }
}

/// An image held in memory.
#[derive(Debug, Clone)]
pub struct ImageFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl ImageSource for ImageFile {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An image file on disk. The MIME type comes from the file extension and
/// the size from the file metadata.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
    mime_type: String,
    size: u64,
}

impl PathSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        Ok(Self {
            path: PathBuf::from(path),
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime_type: mime_from_extension(path).to_string(),
            size: metadata.len(),
        })
    }
}

impl ImageSource for PathSource {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// MIME type for a file extension, `application/octet-stream` when unknown.
pub fn mime_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
