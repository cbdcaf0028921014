//! Record model for dominsp.
//!
//! This crate contains the pure domain types shared by every layer: the
//! normalized [`Word`] key, the [`Status`] lifecycle and the [`Record`] that
//! ties them together. No IO, no async.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Word
// ============================================================================

/// A normalized, non-empty word key.
///
/// Normalization splits the input on whitespace, joins the pieces with single
/// spaces and lower-cases the result. `["Bad", "Apple"]` and `["bad apple"]`
/// both normalize to `"bad apple"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("word must not be empty after normalization")]
pub struct WordError;

impl Word {
    pub fn new(raw: &str) -> Result<Self, WordError> {
        Self::from_tokens(&[raw])
    }

    /// Build a word from command-line style tokens.
    pub fn from_tokens<T: AsRef<str>>(tokens: &[T]) -> Result<Self, WordError> {
        let joined = tokens
            .iter()
            .flat_map(|token| token.as_ref().split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            return Err(WordError);
        }
        Ok(Self(joined.to_lowercase()))
    }

    /// Concatenate two words with no separator.
    #[must_use]
    pub fn concat(&self, other: &Word) -> Word {
        let mut joined = String::with_capacity(self.0.len() + other.0.len());
        joined.push_str(&self.0);
        joined.push_str(&other.0);
        Word(joined)
    }

    /// The domain name form of this word, e.g. `sunset.com`.
    #[must_use]
    pub fn domain(&self, tld: &str) -> String {
        format!("{}.{tld}", self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Word {
    type Error = WordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.0
    }
}

impl std::ops::Deref for Word {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Status
// ============================================================================

/// Lifecycle of a record.
///
/// Stored as its integer code. Transitions only go forward:
/// `New -> Expanded -> {Taken | Available}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    /// Not yet expanded.
    #[default]
    New,
    /// Expansion attempted; availability not checked yet.
    Expanded,
    /// The registrar reports the domain as registered.
    Taken,
    /// The registrar reports the domain as free.
    Available,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status code {0} (expected 0-3)")]
pub struct InvalidStatus(pub u8);

impl Status {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Expanded => 1,
            Self::Taken => 2,
            Self::Available => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Expanded => "expanded",
            Self::Taken => "taken",
            Self::Available => "available",
        }
    }

    /// Whether `self -> next` is a legal forward transition.
    #[must_use]
    pub const fn can_advance_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Expanded)
                | (Self::Expanded, Self::Taken | Self::Available)
        )
    }

    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Taken | Self::Available)
    }
}

impl TryFrom<u8> for Status {
    type Error = InvalidStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::Expanded),
            2 => Ok(Self::Taken),
            3 => Ok(Self::Available),
            other => Err(InvalidStatus(other)),
        }
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Record
// ============================================================================

/// A word candidate with its lifecycle status and origin flag.
///
/// Older databases predate `status` and `combined`; both default on load so
/// every record carries the full schema once read. The status field is only
/// moved forward through [`Record::mark_expanded`] and [`Record::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    word: Word,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    combined: bool,
}

impl Record {
    #[must_use]
    pub fn new(word: Word, status: Status, combined: bool) -> Self {
        Self {
            word,
            status,
            combined,
        }
    }

    /// A user-supplied seed: `New`, not combined.
    #[must_use]
    pub fn seed(word: Word) -> Self {
        Self::new(word, Status::New, false)
    }

    #[must_use]
    pub fn word(&self) -> &Word {
        &self.word
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn combined(&self) -> bool {
        self.combined
    }

    /// `New -> Expanded`. Returns false (and leaves the record alone) from any
    /// other status.
    pub fn mark_expanded(&mut self) -> bool {
        self.advance(Status::Expanded)
    }

    /// `Expanded -> Taken` when `registered`, otherwise `Expanded -> Available`.
    /// Returns false from any status other than `Expanded`.
    pub fn resolve(&mut self, registered: bool) -> bool {
        let next = if registered {
            Status::Taken
        } else {
            Status::Available
        };
        self.advance(next)
    }

    fn advance(&mut self, next: Status) -> bool {
        if !self.status.can_advance_to(next) {
            return false;
        }
        self.status = next;
        true
    }
}
