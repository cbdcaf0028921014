//! The record lifecycle pipeline.
//!
//! Every operation is a batch pass: load the whole collection, transform it in
//! memory, save the whole collection. Nothing is cached between operations.
//!
//! ```text
//! add ──▶ New ──stage──▶ Expanded ──resolve──▶ Taken | Available
//!                          ▲
//!        stage (discovered) ┤
//!        combine (compound) ┘
//! ```

use std::collections::HashSet;

use dominsp_store::{RecordStore, StoreError};
use dominsp_types::{Record, Status, Word};
use tracing::{debug, info, warn};

use crate::candidates::{FirstSeen, candidate_word};
use crate::capabilities::{LexicalExpander, NameRegistrar};
use crate::error::PipelineError;

pub const DEFAULT_TLD: &str = "com";

/// Outcome of the discover-and-stage phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Records moved from `New` to `Expanded`.
    pub expanded: usize,
    /// Newly recorded words, in the order they were appended.
    pub discovered: Vec<Word>,
}

/// Outcome of the resolve-and-finalize phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub taken: Vec<Word>,
    pub available: Vec<Word>,
}

impl ResolveReport {
    #[must_use]
    pub fn checked(&self) -> usize {
        self.taken.len() + self.available.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub stage: StageReport,
    pub resolve: ResolveReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineReport {
    /// Compounds recorded by this pass, in creation order.
    pub created: Vec<Word>,
}

/// Owns every state transition of the record collection.
#[derive(Debug)]
pub struct Pipeline<S> {
    store: S,
    tld: String,
}

impl<S: RecordStore> Pipeline<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tld: DEFAULT_TLD.to_string(),
        }
    }

    /// Check `{word}.{tld}` instead of `{word}.com`.
    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = tld.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Queue a user-supplied word as `New`.
    pub fn add<T: AsRef<str>>(&self, tokens: &[T]) -> Result<Record, PipelineError> {
        self.add_with(tokens, Status::New, false)
    }

    /// Append one record. Duplicates are not rejected here; the passes dedup
    /// against existing words instead.
    pub fn add_with<T: AsRef<str>>(
        &self,
        tokens: &[T],
        status: Status,
        combined: bool,
    ) -> Result<Record, PipelineError> {
        let record = Record::new(Word::from_tokens(tokens)?, status, combined);
        self.append(std::slice::from_ref(&record))?;
        debug!(word = %record.word(), status = %status, combined, "Added record");
        Ok(record)
    }

    /// The full collection, in stored order.
    pub fn list_all(&self) -> Result<Vec<Record>, PipelineError> {
        Ok(self.store.load()?)
    }

    /// Only the records whose domain is free, in stored order.
    pub fn available(&self) -> Result<Vec<Record>, PipelineError> {
        let mut records = self.store.load()?;
        records.retain(|record| record.status() == Status::Available);
        Ok(records)
    }

    /// Expansion pass: [`Pipeline::stage`] followed by [`Pipeline::resolve`].
    pub async fn process(
        &self,
        expander: &dyn LexicalExpander,
        registrar: &dyn NameRegistrar,
    ) -> Result<ProcessReport, PipelineError> {
        let stage = self.stage(expander).await?;
        let resolve = self.resolve(registrar).await?;
        info!(
            expanded = stage.expanded,
            discovered = stage.discovered.len(),
            taken = resolve.taken.len(),
            available = resolve.available.len(),
            "Expansion pass complete"
        );
        Ok(ProcessReport { stage, resolve })
    }

    /// Discover and stage.
    ///
    /// Expands every `New` record, checkpoints the `Expanded` marks, then
    /// appends each previously unknown candidate as `Expanded`.
    pub async fn stage(
        &self,
        expander: &dyn LexicalExpander,
    ) -> Result<StageReport, PipelineError> {
        let mut records = self.store.load()?;
        let mut candidates = FirstSeen::default();
        let mut expanded = 0;

        for record in records
            .iter_mut()
            .filter(|record| record.status() == Status::New)
        {
            match expander.expand(record.word().as_str()).await {
                Ok(forms) => {
                    for word in forms.iter().filter_map(|form| candidate_word(form)) {
                        candidates.insert(word);
                    }
                }
                Err(e) => {
                    warn!(word = %record.word(), "Lexical expansion failed: {e}");
                }
            }
            record.mark_expanded();
            expanded += 1;
            debug!(word = %record.word(), "Marked expanded");
        }

        let discovered = {
            let known: HashSet<&Word> = records.iter().map(Record::word).collect();
            candidates.into_unknown(&known)
        };

        self.store.save(&records)?;

        if !discovered.is_empty() {
            let staged: Vec<Record> = discovered
                .iter()
                .map(|word| Record::new(word.clone(), Status::Expanded, false))
                .collect();
            self.append(&staged)?;
        }

        Ok(StageReport {
            expanded,
            discovered,
        })
    }

    /// Resolve and finalize.
    ///
    /// Checks every `Expanded` record with the registrar, whichever pass staged
    /// it, then leaves the collection sorted by word.
    pub async fn resolve(
        &self,
        registrar: &dyn NameRegistrar,
    ) -> Result<ResolveReport, PipelineError> {
        let mut records = self.store.load()?;
        let mut report = ResolveReport::default();

        for record in records
            .iter_mut()
            .filter(|record| record.status() == Status::Expanded)
        {
            let name = record.word().domain(&self.tld);
            let registered = registrar.is_registered(&name).await?;
            record.resolve(registered);
            debug!(%name, registered, "Resolved availability");

            let word = record.word().clone();
            if registered {
                report.taken.push(word);
            } else {
                report.available.push(word);
            }
        }

        records.sort_by(|a, b| a.word().cmp(b.word()));
        self.store.save(&records)?;
        Ok(report)
    }

    /// Composition pass: record every ordered pairwise concatenation of
    /// non-combined words (a word paired with itself included) that is not
    /// already known.
    pub fn combine(&self) -> Result<CombineReport, PipelineError> {
        let records = self.store.load()?;

        let created = {
            let bases: Vec<&Word> = records
                .iter()
                .filter(|record| !record.combined())
                .map(Record::word)
                .collect();
            let mut compounds = FirstSeen::default();
            for first in &bases {
                for second in &bases {
                    compounds.insert(first.concat(second));
                }
            }
            let known: HashSet<&Word> = records.iter().map(Record::word).collect();
            compounds.into_unknown(&known)
        };

        if !created.is_empty() {
            let staged: Vec<Record> = created
                .iter()
                .map(|word| Record::new(word.clone(), Status::Expanded, true))
                .collect();
            self.append(&staged)?;
        }

        info!(created = created.len(), "Composition pass complete");
        Ok(CombineReport { created })
    }

    /// Load, append in order, save. Equivalent to one `add` per record.
    fn append(&self, new_records: &[Record]) -> Result<(), StoreError> {
        let mut records = self.store.load()?;
        records.extend_from_slice(new_records);
        self.store.save(&records)
    }
}
