//! Datamuse words API expander.
//!
//! `GET {base}/words?rel_syn={word}&max={n}` answers with a JSON array:
//!
//! ```json
//! [{ "word": "fine", "score": 1203 }, { "word": "great", "score": 1177 }]
//! ```

use std::collections::BTreeSet;

use async_trait::async_trait;
use dominsp_core::LexicalExpander;
use serde::Deserialize;
use url::Url;

use crate::{LookupError, join_segments, parse_base_url, request_error};

/// Canonical Datamuse API base URL.
pub const DATAMUSE_API_URL: &str = "https://api.datamuse.com";
pub const DEFAULT_MAX_RESULTS: u32 = 100;

const PROVIDER: &str = "datamuse";

#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
}

#[derive(Debug, Clone)]
pub struct DatamuseExpander {
    client: reqwest::Client,
    base_url: Url,
    max_results: u32,
}

impl DatamuseExpander {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, LookupError> {
        Ok(Self {
            client,
            base_url: parse_base_url(PROVIDER, base_url)?,
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    fn words_url(&self, word: &str) -> Url {
        let mut url = join_segments(&self.base_url, &["words"]);
        url.query_pairs_mut()
            .append_pair("rel_syn", word)
            .append_pair("max", &self.max_results.to_string());
        url
    }
}

#[async_trait]
impl LexicalExpander for DatamuseExpander {
    async fn expand(&self, word: &str) -> Result<BTreeSet<String>, LookupError> {
        let url = self.words_url(word);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let words: Vec<DatamuseWord> = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        tracing::debug!(word, results = words.len(), "Datamuse expansion");
        Ok(words.into_iter().map(|entry| entry.word).collect())
    }
}
