//! Configuration for the favorites synchronizer and the image compressor.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "favorites": { "persist": "detached" }, "images": { "quality": 60 } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::favorites::PersistMode;

pub const DEFAULT_STORAGE_KEY: &str = "book-favorites";
pub const DEFAULT_USERS_COLLECTION: &str = "users";
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MAX_EDGE: u32 = 400;
pub const DEFAULT_QUALITY: u8 = 70;
pub const DEFAULT_MAX_ENCODED_KB: u64 = 900;

/// Error type for loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    /// The file parsed but holds a value the crate cannot work with.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub favorites: FavoritesConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    /// Local storage key holding the anonymous favorites.
    pub storage_key: String,
    /// Remote collection holding one record per user.
    pub users_collection: String,
    pub persist: PersistMode,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            users_collection: DEFAULT_USERS_COLLECTION.to_string(),
            persist: PersistMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Accepted MIME types, compared case-insensitively.
    pub allowed_types: Vec<String>,
    /// Largest source file accepted before compression.
    pub max_source_bytes: u64,
    /// Longest edge of the compressed image, in pixels.
    pub max_edge: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
    /// Ceiling on the estimated decoded size of the data URL, in KB.
    pub max_encoded_kb: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
            ],
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            max_edge: DEFAULT_MAX_EDGE,
            quality: DEFAULT_QUALITY,
            max_encoded_kb: DEFAULT_MAX_ENCODED_KB,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.favorites.storage_key.is_empty() {
            return Err(ConfigError::Invalid("favorites.storage_key is empty".into()));
        }
        if self.favorites.users_collection.is_empty() {
            return Err(ConfigError::Invalid(
                "favorites.users_collection is empty".into(),
            ));
        }
        self.images.validate()
    }
}

impl ImageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_edge == 0 {
            return Err(ConfigError::Invalid("images.max_edge must be positive".into()));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Invalid(format!(
                "images.quality must be within 1..=100, got {}",
                self.quality
            )));
        }
        if self.allowed_types.is_empty() {
            return Err(ConfigError::Invalid("images.allowed_types is empty".into()));
        }
        Ok(())
    }

    pub fn allows(&self, mime_type: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type.trim()))
    }
}
