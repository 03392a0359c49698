//! JSON file store

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde_json::{Map, Value};

use super::{KeyValueStore, StoreError};

/// Store keeping every key in a single JSON object on disk.
///
/// The file is re-read on every access so that separate processes sharing it observe each
/// other's writes. Writes replace the file atomically via a sibling temporary file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(error.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: self.path.display().to_string(),
            source,
        })
    }

    fn save(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(values).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(self.load()?.get(key).map(Value::to_string))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let parsed: Value = serde_json::from_str(&value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut values = self.load()?;

        values.insert(key.to_string(), parsed);

        self.save(&values)
    }
}
