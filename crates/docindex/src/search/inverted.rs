//! Inverted index from terms to the records that contain them.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::tokenizer::{tokenize, TokenizerOptions};
use crate::index::SearchIndex;

/// Which part of a record a term was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The title or the page name.
    Title,
    /// The body text.
    Text,
}

/// One occurrence list entry: a term appears `frequency` times in `field` of
/// record `record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Posting {
    /// Sequence position of the record.
    pub record: usize,
    /// Field the term occurs in.
    pub field: Field,
    /// Number of occurrences in that field.
    pub frequency: usize,
}

/// Term → postings map, sorted by record then field.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    terms: BTreeMap<String, Vec<Posting>>,
    records: usize,
}

impl InvertedIndex {
    /// Build the inverted index for every record of a search index.
    #[must_use]
    pub fn build(index: &SearchIndex, options: &TokenizerOptions) -> Self {
        let mut terms: BTreeMap<String, Vec<Posting>> = BTreeMap::new();

        for (record, doc) in index.iter().enumerate() {
            let mut title_counts: BTreeMap<String, usize> = BTreeMap::new();
            for token in tokenize(&doc.title, options)
                .into_iter()
                .chain(tokenize(&doc.page, options))
            {
                *title_counts.entry(token.term).or_default() += 1;
            }

            let mut text_counts: BTreeMap<String, usize> = BTreeMap::new();
            for token in tokenize(&doc.text, options) {
                *text_counts.entry(token.term).or_default() += 1;
            }

            for (field, counts) in [(Field::Title, title_counts), (Field::Text, text_counts)] {
                for (term, frequency) in counts {
                    terms.entry(term).or_default().push(Posting {
                        record,
                        field,
                        frequency,
                    });
                }
            }
        }

        debug!(
            terms = terms.len(),
            records = index.len(),
            "Built inverted index"
        );
        Self {
            terms,
            records: index.len(),
        }
    }

    /// Postings for a term, already normalized. Empty if the term is unknown.
    #[must_use]
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.terms.get(term).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct records containing a term in any field.
    #[must_use]
    pub fn document_frequency(&self, term: &str) -> usize {
        let mut records: Vec<usize> = self.postings(term).iter().map(|p| p.record).collect();
        records.dedup();
        records.len()
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// All terms in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Number of records the index was built from.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records
    }

}
