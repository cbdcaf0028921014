//! Core pipeline for dominsp.
//!
//! Seed words are expanded into related words, combined into compounds, and
//! each candidate's domain is checked for availability. This crate owns those
//! transitions; persistence comes from `dominsp-store` and the two lookups are
//! injected through [`LexicalExpander`] and [`NameRegistrar`].
//!
//! # Passes
//!
//! | Operation | Reads | Writes | Lookups |
//! |-----------|-------|--------|---------|
//! | [`Pipeline::add`] | 1 | 1 | none |
//! | [`Pipeline::stage`] | 2 | 1-2 | expander per `New` record |
//! | [`Pipeline::resolve`] | 1 | 1 | registrar per `Expanded` record |
//! | [`Pipeline::combine`] | 1-2 | 0-1 | none |
//!
//! Every pass dedups against the words already stored, so re-running a pass
//! never creates a word twice. A failed pass can simply be retried.
//!
//! # Concurrency
//!
//! One pipeline invocation per database at a time. Concurrent invocations can
//! interleave their read-modify-write cycles and break word uniqueness.

mod candidates;
mod capabilities;
mod error;
mod pipeline;

pub use candidates::{MAX_DISCARDED_LEN, candidate_word};
pub use capabilities::{LexicalExpander, LookupError, NameRegistrar};
pub use error::PipelineError;
pub use pipeline::{
    CombineReport, DEFAULT_TLD, Pipeline, ProcessReport, ResolveReport, StageReport,
};

pub use dominsp_store;
pub use dominsp_types;
