use std::collections::HashSet;

use dominsp_types::Word;

/// Lexical forms this short (in characters) or shorter are never kept.
pub const MAX_DISCARDED_LEN: usize = 2;

/// Normalize a raw lexical form into a candidate word.
///
/// Strips every non-alphanumeric character (separators included) and
/// lower-cases the rest. Returns `None` for forms that end up too short.
#[must_use]
pub fn candidate_word(form: &str) -> Option<Word> {
    let cleaned: String = form
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if cleaned.chars().count() <= MAX_DISCARDED_LEN {
        return None;
    }
    Word::new(&cleaned).ok()
}

/// Set of words that remembers insertion order.
#[derive(Debug, Default)]
pub(crate) struct FirstSeen {
    order: Vec<Word>,
    seen: HashSet<Word>,
}

impl FirstSeen {
    pub(crate) fn insert(&mut self, word: Word) {
        if self.seen.insert(word.clone()) {
            self.order.push(word);
        }
    }

    /// Drain in first-seen order, skipping anything `known` already holds.
    pub(crate) fn into_unknown(self, known: &HashSet<&Word>) -> Vec<Word> {
        self.order
            .into_iter()
            .filter(|word| !known.contains(word))
            .collect()
    }
}
