//! Query types, matching and scoring.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::inverted::{Field, InvertedIndex};
use super::tokenizer::{terms, tokenize, TokenizerOptions};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::fragment::{Category, DocFragment};
use crate::index::SearchIndex;

/// How query text is matched against records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Every query term must appear as a token (AND semantics).
    #[default]
    Token,
    /// The query must appear verbatim within the title or text.
    Substring,
    /// The query is a regular expression.
    Regex,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Substring => write!(f, "substring"),
            Self::Regex => write!(f, "regex"),
        }
    }
}

/// Order in which hits are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    /// Best matches first; ties keep sequence order.
    #[default]
    Relevance,
    /// Sequence order of the index.
    Sequence,
}

/// A search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Query text.
    pub text: String,
    /// Matching mode.
    pub mode: SearchMode,
    /// Only return records of this category.
    pub category: Option<Category>,
    /// Only return records of this page.
    pub page: Option<String>,
    /// Maximum number of hits; 0 for unlimited.
    pub limit: usize,
    /// Result ordering.
    pub order: ResultOrder,
}

impl Query {
    /// Create a token query with no filters and no limit, ordered by relevance.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: SearchMode::default(),
            category: None,
            page: None,
            limit: 0,
            order: ResultOrder::default(),
        }
    }

    /// Set the matching mode.
    #[must_use]
    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Restrict to one category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Restrict to one page.
    #[must_use]
    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Cap the number of hits (0 for unlimited).
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the result ordering.
    #[must_use]
    pub fn order(mut self, order: ResultOrder) -> Self {
        self.order = order;
        self
    }

    fn accepts(&self, doc: &DocFragment) -> bool {
        self.category.map_or(true, |c| doc.category == c)
            && self.page.as_deref().map_or(true, |p| doc.page == p)
    }
}

/// A matching record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit<'a> {
    /// Sequence position of the record.
    pub index: usize,
    /// Relevance score.
    pub score: u64,
    /// How many query terms (or matches) hit the title.
    pub title_hits: usize,
    /// The matching record.
    pub fragment: &'a DocFragment,
    /// Text around the first body match, if the body matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Per-record match counts gathered before scoring.
#[derive(Debug, Default, Clone, Copy)]
struct Matched {
    title_hits: usize,
    text_frequency: usize,
    /// Char offset and length of the first match in the text.
    first_text_match: Option<(usize, usize)>,
}

/// Runs queries against one index.
#[derive(Debug)]
pub struct Searcher<'a> {
    index: &'a SearchIndex,
    config: SearchConfig,
    inverted: OnceLock<InvertedIndex>,
}

impl<'a> Searcher<'a> {
    /// Create a searcher. The inverted index is built on the first token query.
    #[must_use]
    pub fn new(index: &'a SearchIndex, config: &SearchConfig) -> Self {
        Self {
            index,
            config: config.clone(),
            inverted: OnceLock::new(),
        }
    }

    /// A query seeded with the configured mode, order and limit.
    #[must_use]
    pub fn query(&self, text: impl Into<String>) -> Query {
        Query::new(text)
            .mode(self.config.mode)
            .order(self.config.order)
            .limit(self.config.limit)
    }

    /// The inverted index, building it if needed.
    pub fn inverted(&self) -> &InvertedIndex {
        self.inverted
            .get_or_init(|| InvertedIndex::build(self.index, &self.tokenizer_options()))
    }

    fn tokenizer_options(&self) -> TokenizerOptions {
        self.config.tokenizer_options()
    }

    /// Run a query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuery`] if a regex query does not compile.
    pub fn search(&self, query: &Query) -> Result<Vec<Hit<'a>>> {
        let matched = match query.mode {
            SearchMode::Token => self.match_tokens(query),
            SearchMode::Substring => self.match_substring(query),
            SearchMode::Regex => self.match_regex(query)?,
        };

        let mut hits: Vec<Hit<'a>> = matched
            .into_iter()
            .map(|(index, m)| self.to_hit(index, &m, query))
            .collect();

        if query.order == ResultOrder::Relevance {
            hits.sort_by(|a, b| {
                b.title_hits
                    .cmp(&a.title_hits)
                    .then(b.score.cmp(&a.score))
                    .then(a.index.cmp(&b.index))
            });
        }
        if query.limit > 0 {
            hits.truncate(query.limit);
        }

        debug!(query = %query.text, mode = %query.mode, hits = hits.len(), "Search finished");
        Ok(hits)
    }

    fn match_tokens(&self, query: &Query) -> BTreeMap<usize, Matched> {
        let mut query_terms = terms(&query.text, &self.tokenizer_options());
        query_terms.sort();
        query_terms.dedup();
        if query_terms.is_empty() {
            return BTreeMap::new();
        }

        let inverted = self.inverted();
        let mut matched: BTreeMap<usize, (Matched, usize)> = BTreeMap::new();
        for term in &query_terms {
            let mut last_record = None;
            for posting in inverted.postings(term) {
                let (entry, terms_seen) = matched.entry(posting.record).or_default();
                if last_record != Some(posting.record) {
                    *terms_seen += 1;
                    last_record = Some(posting.record);
                }
                match posting.field {
                    Field::Title => entry.title_hits += 1,
                    Field::Text => entry.text_frequency += posting.frequency,
                }
            }
        }

        let options = self.tokenizer_options();
        matched
            .into_iter()
            .filter(|(_, (_, seen))| *seen == query_terms.len())
            .filter_map(|(i, (mut m, _))| {
                let doc = self.index.get(i)?;
                if !query.accepts(doc) {
                    return None;
                }
                if m.text_frequency > 0 {
                    // Same tokens the inverted index was built from, so a
                    // text posting always has a token here.
                    m.first_text_match = tokenize(&doc.text, &options)
                        .into_iter()
                        .find(|token| query_terms.binary_search(&token.term).is_ok())
                        .map(|token| (token.offset, token.len));
                }
                Some((i, m))
            })
            .collect()
    }

    fn match_substring(&self, query: &Query) -> BTreeMap<usize, Matched> {
        let case_sensitive = self.config.case_sensitive;
        let needle = fold(&query.text, case_sensitive);

        self.index
            .iter()
            .enumerate()
            .filter(|(_, doc)| query.accepts(doc))
            .filter_map(|(i, doc)| {
                if needle.is_empty() {
                    return Some((i, Matched::default()));
                }
                let in_title = !find_all(&fold(&doc.title, case_sensitive), &needle).is_empty();
                let in_text = find_all(&fold(&doc.text, case_sensitive), &needle);
                if !in_title && in_text.is_empty() {
                    return None;
                }
                Some((
                    i,
                    Matched {
                        title_hits: usize::from(in_title),
                        text_frequency: in_text.len(),
                        first_text_match: in_text.first().map(|&at| (at, needle.len())),
                    },
                ))
            })
            .collect()
    }

    fn match_regex(&self, query: &Query) -> Result<BTreeMap<usize, Matched>> {
        let regex = RegexBuilder::new(&query.text)
            .case_insensitive(!self.config.case_sensitive)
            .build()
            .map_err(|e| Error::invalid_query(e.to_string()))?;

        Ok(self
            .index
            .iter()
            .enumerate()
            .filter(|(_, doc)| query.accepts(doc))
            .filter_map(|(i, doc)| {
                let in_title = regex.is_match(&doc.title);
                let text_frequency = regex.find_iter(&doc.text).count();
                if !in_title && text_frequency == 0 {
                    return None;
                }
                Some((
                    i,
                    Matched {
                        title_hits: usize::from(in_title),
                        text_frequency,
                        first_text_match: first_regex_match(&regex, &doc.text),
                    },
                ))
            })
            .collect())
    }

    fn to_hit(&self, index: usize, m: &Matched, query: &Query) -> Hit<'a> {
        let fragment = &self.index.fragments()[index];
        let weights = &self.config;

        let mut score = weights
            .title_weight
            .saturating_mul(m.title_hits as u64)
            .saturating_add(weights.text_weight.saturating_mul(m.text_frequency as u64));
        if fragment.is_page() && titles_equal(&fragment.title, &query.text, weights.case_sensitive)
        {
            score = score.saturating_add(weights.page_bonus);
        }

        Hit {
            index,
            score,
            title_hits: m.title_hits,
            fragment,
            snippet: m
                .first_text_match
                .map(|(at, len)| snippet(&fragment.text, at, len, weights.snippet_chars)),
        }
    }
}

/// Char offset and char length of the first regex match in `text`.
fn first_regex_match(regex: &Regex, text: &str) -> Option<(usize, usize)> {
    regex.find(text).map(|m| {
        let start = text[..m.start()].chars().count();
        (start, m.as_str().chars().count())
    })
}

/// Fold text to one char per source char so char offsets line up with the
/// original.
fn fold(text: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        text.chars().collect()
    } else {
        text.chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect()
    }
}

fn titles_equal(title: &str, query: &str, case_sensitive: bool) -> bool {
    fold(title.trim(), case_sensitive) == fold(query.trim(), case_sensitive)
}

/// Start offsets of non-overlapping occurrences of `needle` in `hay`.
fn find_all(hay: &[char], needle: &[char]) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() || needle.len() > hay.len() {
        return found;
    }
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        if hay[i..i + needle.len()] == *needle {
            found.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    found
}

/// A window of at most `width` chars centred on a match, with `…` marking
/// elided text and line breaks flattened to spaces.
fn snippet(text: &str, at: usize, len: usize, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let width = width.max(1);

    let lead = width.saturating_sub(len.min(width)) / 2;
    let mut start = at.saturating_sub(lead);
    let end = (start + width).min(total);
    start = end.saturating_sub(width).min(start);

    let mut out = String::with_capacity(width + 6);
    if start > 0 {
        out.push('…');
    }
    out.extend(
        chars[start..end]
            .iter()
            .map(|&c| if c == '\n' || c == '\r' { ' ' } else { c }),
    );
    if end < total {
        out.push('…');
    }
    out
}
