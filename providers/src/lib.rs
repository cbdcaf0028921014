//! Lookup providers for dominsp.
//!
//! Concrete implementations of the two capabilities the pipeline consumes:
//!
//! - [`ThesaurusExpander`] - offline synonyms from a local thesaurus file
//! - [`DatamuseExpander`] - synonyms from the Datamuse words API
//! - [`RdapRegistrar`] - domain registration status over RDAP
//!
//! None of them retry. A failed request is reported once as a
//! [`LookupError`] and the caller decides what to do with the pass.

pub mod datamuse;
pub mod rdap;
pub mod thesaurus;

pub use datamuse::{DATAMUSE_API_URL, DEFAULT_MAX_RESULTS, DatamuseExpander};
pub use rdap::{RdapRegistrar, VERISIGN_COM_RDAP_URL};
pub use thesaurus::ThesaurusExpander;

pub(crate) use dominsp_core::LookupError;

use std::time::Duration;

use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("dominsp/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by the network providers.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
}

/// Parse a provider base URL, rejecting anything that cannot carry a path.
pub(crate) fn parse_base_url(provider: &'static str, raw: &str) -> Result<Url, LookupError> {
    let url = Url::parse(raw).map_err(|e| LookupError::Unavailable {
        provider,
        message: format!("invalid base URL {raw:?}: {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(LookupError::Unavailable {
            provider,
            message: format!("base URL {raw:?} cannot carry a path"),
        });
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub(crate) fn request_error(provider: &'static str, err: &reqwest::Error) -> LookupError {
    tracing::debug!(provider, "Request failed: {err}");
    LookupError::Request {
        provider,
        message: err.to_string(),
    }
}
