use std::fmt;

/// Error type for local and remote store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The underlying lock was poisoned while performing the named operation.
    LockPoisoned(&'static str),
    /// The store could not be reached (network down, backend offline).
    Unavailable(String),
    /// The caller is not allowed to read or write the record.
    PermissionDenied(String),
    /// A stored value could not be serialized or deserialized.
    Serde(String),
    /// Filesystem failure in a disk-backed store.
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            StoreError::Serde(msg) => write!(f, "store serialization error: {}", msg),
            StoreError::Io(msg) => write!(f, "store io error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
