//! The documentation search index.
//!
//! A [`SearchIndex`] is the validated, ordered sequence of doc fragments found
//! under the `docs` key of an index file. Order is document traversal order
//! (each page followed by its sections) and is preserved end to end.
//!
//! - [`loader`] reads bare JSON or the generator's JavaScript wrapper.
//! - [`validate`] reports structural problems and softer warnings.
//! - [`writer`] serializes an index back to either format.

pub mod loader;
pub mod validate;
pub mod writer;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fragment::{Category, DocFragment};

/// An ordered, immutable collection of doc fragments with unique locations.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    docs: Vec<DocFragment>,
    positions: HashMap<String, usize>,
}

/// On-disk shape of an index: `{"docs": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IndexFile<T> {
    pub(crate) docs: T,
}

impl SearchIndex {
    /// Build an index from fragments in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyIndex`] if there are no fragments and
    /// [`Error::DuplicateLocation`] if two fragments share a location.
    pub fn from_fragments(docs: Vec<DocFragment>) -> Result<Self> {
        if docs.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let mut positions = HashMap::with_capacity(docs.len());
        for (i, doc) in docs.iter().enumerate() {
            if let Some(first) = positions.insert(doc.location.clone(), i) {
                return Err(Error::DuplicateLocation {
                    location: doc.location.clone(),
                    first,
                    second: i,
                });
            }
        }

        debug!(records = docs.len(), "Built search index");
        Ok(Self { docs, positions })
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Always `false` for a constructed index; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// All fragments in sequence order.
    #[must_use]
    pub fn fragments(&self) -> &[DocFragment] {
        &self.docs
    }

    /// Iterate over fragments in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, DocFragment> {
        self.docs.iter()
    }

    /// Get the fragment at a sequence position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DocFragment> {
        self.docs.get(index)
    }

    /// Look up a fragment by its exact location.
    #[must_use]
    pub fn find(&self, location: &str) -> Option<&DocFragment> {
        self.position(location).map(|i| &self.docs[i])
    }

    /// Sequence position of a location.
    #[must_use]
    pub fn position(&self, location: &str) -> Option<usize> {
        self.positions.get(location).copied()
    }

    /// Distinct page names in order of first appearance.
    #[must_use]
    pub fn pages(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for doc in &self.docs {
            if !seen.contains(&doc.page.as_str()) {
                seen.push(doc.page.as_str());
            }
        }
        seen
    }

    /// All fragments belonging to a page, in sequence order.
    pub fn page_fragments<'a>(&'a self, page: &'a str) -> impl Iterator<Item = &'a DocFragment> {
        self.docs.iter().filter(move |doc| doc.page == page)
    }

    /// Only the section fragments of a page.
    pub fn sections_of<'a>(&'a self, page: &'a str) -> impl Iterator<Item = &'a DocFragment> {
        self.page_fragments(page).filter(|doc| doc.is_section())
    }

    /// BLAKE3 digest over every fragment's content hash, in order.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for doc in &self.docs {
            hasher.update(doc.content_hash().as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Summary statistics.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let pages = self
            .docs
            .iter()
            .filter(|d| d.category == Category::Page)
            .count();
        IndexStats {
            total: self.docs.len(),
            pages,
            sections: self.docs.len() - pages,
            empty_text: self.docs.iter().filter(|d| !d.has_text()).count(),
            distinct_pages: self.pages().len(),
            text_bytes: self.docs.iter().map(|d| d.text.len()).sum(),
            fingerprint: self.fingerprint(),
        }
    }

    /// Consume the index and return its fragments.
    #[must_use]
    pub fn into_fragments(self) -> Vec<DocFragment> {
        self.docs
    }
}

impl PartialEq for SearchIndex {
    fn eq(&self, other: &Self) -> bool {
        self.docs == other.docs
    }
}

impl Eq for SearchIndex {}

impl<'a> IntoIterator for &'a SearchIndex {
    type Item = &'a DocFragment;
    type IntoIter = std::slice::Iter<'a, DocFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

impl Serialize for SearchIndex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        IndexFile { docs: &self.docs }.serialize(serializer)
    }
}

/// Statistics about an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Total number of fragments.
    pub total: usize,
    /// Fragments with category `page`.
    pub pages: usize,
    /// Fragments with category `section`.
    pub sections: usize,
    /// Fragments whose text is empty.
    pub empty_text: usize,
    /// Number of distinct page names.
    pub distinct_pages: usize,
    /// Total bytes of body text.
    pub text_bytes: usize,
    /// Content fingerprint of the whole index.
    pub fingerprint: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small index shaped like a generated one.
    pub(crate) fn sample_index() -> SearchIndex {
        SearchIndex::from_fragments(vec![
            DocFragment::new("#", "Home", "Home", Category::Page, ""),
            DocFragment::new(
                "#ZMQ.jl-1",
                "Home",
                "ZMQ.jl",
                Category::Section,
                "A Julia interface to ZeroMQ.",
            ),
            DocFragment::new("man/guide/#", "Guide", "Guide", Category::Page, ""),
            DocFragment::new(
                "man/guide/#Usage-1",
                "Guide",
                "Usage",
                Category::Section,
                "send(socket, x) and recv(socket, SomeType) copy data",
            ),
        ])
        .expect("sample index is valid")
    }

    #[test]
    fn test_from_fragments_empty() {
        let result = SearchIndex::from_fragments(Vec::new());
        assert!(matches!(result, Err(Error::EmptyIndex)));
    }

    #[test]
    fn test_from_fragments_duplicate_location() {
        let docs = vec![
            DocFragment::new("#", "Home", "Home", Category::Page, ""),
            DocFragment::new("#a-1", "Home", "A", Category::Section, ""),
            DocFragment::new("#a-1", "Home", "A again", Category::Section, ""),
        ];
        match SearchIndex::from_fragments(docs) {
            Err(Error::DuplicateLocation {
                location,
                first,
                second,
            }) => {
                assert_eq!(location, "#a-1");
                assert_eq!(first, 1);
                assert_eq!(second, 2);
            }
            other => panic!("expected duplicate location error, got {other:?}"),
        }
    }

    #[test]
    fn test_find_and_position() {
        let index = sample_index();
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
        assert_eq!(index.position("man/guide/#Usage-1"), Some(3));
        assert_eq!(index.find("#").unwrap().page, "Home");
        assert!(index.find("#missing").is_none());
    }

    #[test]
    fn test_pages_in_first_appearance_order() {
        let index = sample_index();
        assert_eq!(index.pages(), vec!["Home", "Guide"]);
    }

    #[test]
    fn test_page_fragments_and_sections() {
        let index = sample_index();
        let guide: Vec<_> = index.page_fragments("Guide").map(|d| d.title.as_str()).collect();
        assert_eq!(guide, vec!["Guide", "Usage"]);

        let sections: Vec<_> = index.sections_of("Guide").map(|d| d.title.as_str()).collect();
        assert_eq!(sections, vec!["Usage"]);
        assert_eq!(index.sections_of("Nope").count(), 0);
    }

    #[test]
    fn test_stats() {
        let stats = sample_index().stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.sections, 2);
        assert_eq!(stats.empty_text, 2);
        assert_eq!(stats.distinct_pages, 2);
        assert!(stats.text_bytes > 0);
        assert_eq!(stats.fingerprint.len(), 64);
    }

    #[test]
    fn test_fingerprint_tracks_content_and_order() {
        let index = sample_index();
        assert_eq!(index.fingerprint(), sample_index().fingerprint());

        let mut docs = index.clone().into_fragments();
        docs.swap(0, 1);
        let reordered = SearchIndex::from_fragments(docs).unwrap();
        assert_ne!(index.fingerprint(), reordered.fingerprint());
        assert_ne!(index, reordered);
    }

    #[test]
    fn test_serialize_shape() {
        let value = serde_json::to_value(sample_index()).unwrap();
        let docs = value["docs"].as_array().unwrap();
        assert_eq!(docs.len(), 4);
        assert_eq!(docs[0]["location"], "#");
        assert_eq!(docs[1]["category"], "section");
    }

    #[test]
    fn test_iteration_order() {
        let index = sample_index();
        let locations: Vec<_> = (&index).into_iter().map(|d| d.location.as_str()).collect();
        assert_eq!(
            locations,
            vec!["#", "#ZMQ.jl-1", "man/guide/#", "man/guide/#Usage-1"]
        );
    }
}
