//! Lookup capabilities the pipeline depends on.
//!
//! Both lookups are expensive and external, so the pipeline only ever sees
//! them through these traits. Production implementations live in
//! `dominsp-providers`; tests plug in deterministic stubs.

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

/// Source of lexically related word-forms (synonyms and the like).
///
/// Results are raw: the pipeline normalizes, filters and dedups them.
#[async_trait]
pub trait LexicalExpander: Send + Sync {
    async fn expand(&self, word: &str) -> Result<BTreeSet<String>, LookupError>;
}

/// Authority on whether a domain name is already registered.
#[async_trait]
pub trait NameRegistrar: Send + Sync {
    async fn is_registered(&self, name: &str) -> Result<bool, LookupError>;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{provider} request failed: {message}")]
    Request {
        provider: &'static str,
        message: String,
    },
    #[error("{provider} returned unexpected HTTP status {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("{provider} returned a malformed response: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },
    #[error("{provider} is unavailable: {message}")]
    Unavailable {
        provider: &'static str,
        message: String,
    },
}

impl LookupError {
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            LookupError::Request { provider, .. }
            | LookupError::Status { provider, .. }
            | LookupError::Malformed { provider, .. }
            | LookupError::Unavailable { provider, .. } => provider,
        }
    }
}
