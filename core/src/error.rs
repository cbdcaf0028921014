use dominsp_store::StoreError;
use dominsp_types::WordError;
use thiserror::Error;

use crate::capabilities::LookupError;

/// Failures surfaced by pipeline operations.
///
/// Store and lookup errors pass through unchanged so callers can name the
/// underlying failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
