//! FileLocalStorage - Local storage persisted as a JSON file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{LocalStorage, StoreError};

const STORAGE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct FileData {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// Local storage that keeps its entries in memory and writes them through
/// to a JSON file on every mutation.
///
/// The label only appears in log lines and error messages.
pub struct FileLocalStorage {
    label: String,
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileLocalStorage {
    /// Open the storage at `path`, loading existing entries if the file exists.
    pub fn open(label: impl Into<String>, path: &Path) -> Result<Self, StoreError> {
        let label = label.into();
        let entries = if path.exists() {
            let file = File::open(path)?;
            let data: FileData = serde_json::from_reader(file).map_err(|err| {
                StoreError::Serde(format!("{}: {}", label, err))
            })?;
            if data.version != STORAGE_VERSION {
                return Err(StoreError::Serde(format!(
                    "{}: storage version mismatch: expected {}, got {}",
                    label, STORAGE_VERSION, data.version
                )));
            }
            log::debug!("{} loaded {} entries", label, data.entries.len());
            data.entries
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            label,
            path: PathBuf::from(path),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_fs(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = FileData {
            version: STORAGE_VERSION,
            entries: entries.clone(),
        };
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &data)?;
        writer.flush()?;

        log::debug!("{} {} entries have been written", self.label, entries.len());
        Ok(())
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        entries.insert(key.to_string(), value.to_string());
        self.write_fs(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        if entries.remove(key).is_some() {
            self.write_fs(&entries)?;
        }
        Ok(())
    }
}
