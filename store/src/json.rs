use std::fs;
use std::path::{Path, PathBuf};

use dominsp_types::Record;

use crate::atomic_write::{atomic_write, recover_bak_file};
use crate::{RecordStore, StoreError};

/// JSON-file backed [`RecordStore`].
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonRecordStore {
    fn load(&self) -> Result<Vec<Record>, StoreError> {
        recover_bak_file(&self.path);

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(|source| StoreError::Format {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Loaded records");
        Ok(records)
    }

    fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        let mut serialized =
            serde_json::to_string_pretty(records).map_err(|source| StoreError::Format {
                path: self.path.clone(),
                source,
            })?;
        serialized.push('\n');

        atomic_write(&self.path, serialized.as_bytes()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Saved records");
        Ok(())
    }
}

/// Create (or reset) the database at `path` as an empty collection.
pub fn init_database(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    JsonRecordStore::new(path).save(&[])
}
