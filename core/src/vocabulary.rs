use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::tokenizer::tokenize;

/// Coordinate of a word that does not occur in a document.
pub const ABSENT: f64 = 0.0;
/// Coordinate of a word that occurs in a document.
pub const PRESENT: f64 = 1.0;

/// Distinct words of one batch, in first-seen order, each mapped to [`ABSENT`].
///
/// A vocabulary is the vector template for its batch: every [`DocumentVector`]
/// it produces has exactly its key set. Build a new one per batch; vectors
/// from different vocabularies are not comparable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexMap<String, f64>,
}

impl Vocabulary {
    pub fn new() -> Self { Self::default() }

    /// Collect every whitespace token of every document. An empty batch gives
    /// an empty vocabulary.
    pub fn build(docs: &[Document]) -> Self {
        let mut vocab = Self::new();
        for doc in docs {
            vocab.add_text(&doc.text);
        }
        tracing::debug!(num_docs = docs.len(), num_terms = vocab.len(), "built vocabulary");
        vocab
    }

    fn add_text(&mut self, text: &str) {
        for token in tokenize(text) {
            if !self.terms.contains_key(token) {
                self.terms.insert(token.to_string(), ABSENT);
            }
        }
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn contains(&self, term: &str) -> bool { self.terms.contains_key(term) }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.keys().map(String::as_str)
    }

    /// Presence vector of `doc` over this vocabulary. Tokens the vocabulary
    /// does not know have no coordinate and are skipped.
    pub fn vectorize(&self, doc: &Document) -> DocumentVector {
        let mut values = self.terms.clone();
        let mut unknown = 0usize;
        for token in tokenize(&doc.text) {
            match values.get_mut(token) {
                Some(v) => *v = PRESENT,
                None => unknown += 1,
            }
        }
        if unknown > 0 {
            tracing::trace!(unknown, "ignored tokens outside vocabulary");
        }
        DocumentVector { values }
    }
}

/// Presence/absence encoding of one document over a [`Vocabulary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector {
    values: IndexMap<String, f64>,
}

impl DocumentVector {
    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn get(&self, term: &str) -> Option<f64> { self.values.get(term).copied() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// True when no coordinate is set, e.g. for a blank document.
    pub fn is_zero(&self) -> bool { self.values.values().all(|v| *v == ABSENT) }

    /// Words this document contains, in vocabulary order.
    pub fn present_terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().filter(|(_, v)| *v != ABSENT).map(|(k, _)| k)
    }
}

impl FromIterator<(String, f64)> for DocumentVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}
