//! Querying a loaded search index.
//!
//! This module answers the lookups a client-side search widget makes:
//!
//! - **Token queries** go through an [`InvertedIndex`] built on first use.
//!   Every query term must be present in the record (AND semantics).
//! - **Substring queries** scan titles and text linearly, the way a simple
//!   widget does.
//! - **Regex queries** match a pattern against titles and text.
//!
//! Results come back in sequence order or ranked by relevance. In relevance
//! order a title match always outranks a text-only match; remaining ties
//! fall back to sequence order.
//!
//! # Example
//!
//! ```
//! use docindex::config::SearchConfig;
//! use docindex::index::loader::parse_str;
//! use docindex::search::{Query, SearchMode, Searcher};
//!
//! let index = parse_str(r##"{"docs": [
//!     {"location": "#", "page": "Home", "title": "Home", "category": "page", "text": ""},
//!     {"location": "#Intro-1", "page": "Home", "title": "Intro", "category": "section",
//!      "text": "A Julia interface to ZeroMQ."}
//! ]}"##).unwrap();
//!
//! let searcher = Searcher::new(&index, &SearchConfig::default());
//! let hits = searcher.search(&Query::new("zeromq")).unwrap();
//! assert_eq!(hits[0].fragment.location, "#Intro-1");
//!
//! let hits = searcher
//!     .search(&Query::new("julia inter").mode(SearchMode::Substring))
//!     .unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

pub mod inverted;
mod query;
pub mod tokenizer;

pub use inverted::{Field, InvertedIndex, Posting};
pub use query::{Hit, Query, ResultOrder, SearchMode, Searcher};
pub use tokenizer::{tokenize, Token, TokenizerOptions};
