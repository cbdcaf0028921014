//! Record persistence for dominsp.
//!
//! The database is a single JSON array of flat records, read and rewritten in
//! full by every operation:
//!
//! ```json
//! [
//!   { "word": "fine", "status": 2, "combined": false },
//!   { "word": "sunset", "status": 1, "combined": true }
//! ]
//! ```
//!
//! - [`RecordStore`]: the load/save contract the pipeline consumes
//! - [`JsonRecordStore`]: the file-backed implementation
//! - [`atomic_write`]: crash-safe rewrite (temp + rename)

pub mod atomic_write;
mod json;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, ParentDirSyncPolicy, atomic_write,
    atomic_write_with_options, recover_bak_file,
};
pub use json::{JsonRecordStore, init_database};

use std::path::PathBuf;

use dominsp_types::Record;
use thiserror::Error;

/// Full-collection access to the record database.
///
/// There is no partial update: `load` returns every record in stored order and
/// `save` replaces the stored collection with exactly the given slice.
pub trait RecordStore {
    fn load(&self) -> Result<Vec<Record>, StoreError>;
    fn save(&self, records: &[Record]) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load(&self) -> Result<Vec<Record>, StoreError> {
        (**self).load()
    }

    fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        (**self).save(records)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database read failure at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("database write failure at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("database format failure at {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreError::Read { path, .. }
            | StoreError::Write { path, .. }
            | StoreError::Format { path, .. } => path,
        }
    }

    /// Short name of the failure kind, for user-facing messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Read { .. } => "read failure",
            StoreError::Write { .. } => "write failure",
            StoreError::Format { .. } => "format failure",
        }
    }
}
