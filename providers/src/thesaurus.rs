//! Offline thesaurus expander.
//!
//! The thesaurus is a plain text file with one entry per line: the head word
//! followed by its related forms, comma separated (the Moby thesaurus layout).
//!
//! ```text
//! # comments and blank lines are ignored
//! good,fine,great,in good order
//! sun,daystar,sol
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use dominsp_core::LexicalExpander;

use crate::LookupError;

const PROVIDER: &str = "thesaurus";

#[derive(Debug, Clone, Default)]
pub struct ThesaurusExpander {
    entries: HashMap<String, BTreeSet<String>>,
}

impl ThesaurusExpander {
    pub fn open(path: &Path) -> Result<Self, LookupError> {
        let content = fs::read_to_string(path).map_err(|e| LookupError::Unavailable {
            provider: PROVIDER,
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let thesaurus = Self::parse(&content);
        tracing::debug!(path = %path.display(), entries = thesaurus.len(), "Loaded thesaurus");
        Ok(thesaurus)
    }

    /// Parse thesaurus text. Head words are matched case-insensitively and a
    /// head that appears on several lines merges its forms.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut entries: HashMap<String, BTreeSet<String>> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split(',').map(str::trim);
            let Some(head) = fields.next().filter(|head| !head.is_empty()) else {
                continue;
            };
            entries
                .entry(head.to_lowercase())
                .or_default()
                .extend(
                    fields
                        .filter(|form| !form.is_empty())
                        .map(ToString::to_string),
                );
        }
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl LexicalExpander for ThesaurusExpander {
    async fn expand(&self, word: &str) -> Result<BTreeSet<String>, LookupError> {
        Ok(self
            .entries
            .get(&word.trim().to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}
