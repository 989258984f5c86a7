//! `docindex` - Load, validate and query documentation search indexes
//!
//! This library reads the search index a documentation generator emits for a
//! site's client-side search (either bare JSON or the generator's
//! `var documenterSearchIndex = ...` script), checks it, writes it back out
//! losslessly, and answers token, substring and regex queries over it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod fragment;
pub mod index;
pub mod logging;
pub mod search;

pub use config::Config;
pub use error::{Error, Result};
pub use fragment::{Category, DocFragment, Location};
pub use index::loader::{load_path, parse_str, LoadPolicy, LoadReport, Loader, SourceFormat};
pub use index::{IndexStats, SearchIndex};
pub use logging::init_logging;
pub use search::{Hit, Query, SearchMode, Searcher};
