//! Loading search indexes from disk or memory.
//!
//! Two source formats are understood:
//!
//! - bare JSON, `{"docs": [...]}`
//! - the generator's JavaScript wrapper, `var documenterSearchIndex = {...}`,
//!   which also carries trailing commas after the last record
//!
//! Records are checked one by one so that a [`LoadPolicy`] can decide whether
//! a malformed record rejects the file or is skipped with a warning.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::SearchIndex;
use crate::error::{Error, Result};
use crate::fragment::{Category, DocFragment};

/// File names probed, in order, when a directory is given as the index path.
pub const INDEX_FILE_NAMES: &[&str] = &["search_index.js", "search_index.json"];

/// Name of the variable the generator assigns the index to.
pub const DOCUMENTER_VARIABLE: &str = "documenterSearchIndex";

/// Fields every record must carry, in canonical order.
const REQUIRED_FIELDS: [&str; 5] = ["location", "page", "title", "category", "text"];

/// Source format of an index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Bare JSON object.
    Json,
    /// JavaScript variable assignment wrapping the JSON object.
    #[default]
    DocumenterJs,
}

impl SourceFormat {
    /// Guess the format from the source text.
    #[must_use]
    pub fn detect(src: &str) -> Self {
        if wrapper_regex().is_match(src) {
            Self::DocumenterJs
        } else {
            Self::Json
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::DocumenterJs => write!(f, "documenter_js"),
        }
    }
}

/// What to do with a record that is not a valid doc fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Reject the whole file.
    #[default]
    Strict,
    /// Drop the record, log it, and keep going.
    Skip,
}

/// A record that was dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
    /// Position of the record in the source `docs` array.
    pub index: usize,
    /// The record's location, when it had a readable one.
    pub location: Option<String>,
    /// Why the record was dropped.
    pub reason: String,
}

/// Summary of a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Format the source was read as.
    pub format: SourceFormat,
    /// Number of records in the resulting index.
    pub accepted: usize,
    /// Records dropped under [`LoadPolicy::Skip`].
    pub skipped: Vec<RecordIssue>,
    /// Records dropped by location exclusion patterns.
    pub excluded: usize,
}

/// Index loader with a malformed-record policy and optional exclusions.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    policy: LoadPolicy,
    exclude: Vec<Regex>,
}

impl Loader {
    /// Create a loader with the given policy and no exclusions.
    #[must_use]
    pub fn new(policy: LoadPolicy) -> Self {
        Self {
            policy,
            exclude: Vec::new(),
        }
    }

    /// Drop records whose location matches any of the given patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if a pattern is not a valid regex.
    pub fn with_exclusions(mut self, patterns: &[String]) -> Result<Self> {
        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|e| Error::ConfigValidation {
                message: format!("invalid exclude_locations pattern {pattern:?}: {e}"),
            })?;
            self.exclude.push(regex);
        }
        Ok(self)
    }

    /// The configured policy.
    #[must_use]
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Load an index from a file, or from a directory containing one.
    ///
    /// # Errors
    ///
    /// Returns an error if no index file exists, it cannot be read, or its
    /// content is rejected under the loader's policy.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<(SearchIndex, LoadReport)> {
        let path = resolve_path(path.as_ref())?;
        debug!("Reading search index from {}", path.display());
        let src = std::fs::read_to_string(&path).map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?;
        let (index, report) = self.load_str(&src)?;
        info!(
            records = report.accepted,
            skipped = report.skipped.len(),
            excluded = report.excluded,
            "Loaded search index from {}",
            path.display()
        );
        Ok((index, report))
    }

    /// Load an index from source text in either format.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a recognisable index, or a record
    /// is rejected under the loader's policy.
    pub fn load_str(&self, src: &str) -> Result<(SearchIndex, LoadReport)> {
        let format = SourceFormat::detect(src);
        let body = match format {
            SourceFormat::Json => src.trim(),
            SourceFormat::DocumenterJs => strip_wrapper(src)?,
        };
        let body = strip_trailing_commas(body);
        let root: Value = serde_json::from_str(&body)?;
        let records = docs_array(root)?;
        if records.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let mut report = LoadReport {
            format,
            accepted: 0,
            skipped: Vec::new(),
            excluded: 0,
        };
        let mut docs = Vec::with_capacity(records.len());
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for (i, value) in records.into_iter().enumerate() {
            let location = value
                .get("location")
                .and_then(Value::as_str)
                .map(ToString::to_string);

            let checked = record_from_value(i, value).and_then(|doc| {
                match seen.get(&doc.location) {
                    Some(&first) => Err(Error::DuplicateLocation {
                        location: doc.location,
                        first,
                        second: i,
                    }),
                    None => Ok(doc),
                }
            });

            match checked {
                Ok(doc) => {
                    seen.insert(doc.location.clone(), i);
                    docs.push(doc);
                }
                Err(err) if self.policy == LoadPolicy::Skip && err.is_malformed() => {
                    warn!(record = i, location = ?location, reason = %err, "Skipping record");
                    report.skipped.push(RecordIssue {
                        index: i,
                        location,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        if !self.exclude.is_empty() {
            let before = docs.len();
            docs.retain(|doc| {
                let excluded = self.exclude.iter().any(|re| re.is_match(&doc.location));
                if excluded {
                    debug!(location = %doc.location, "Excluding record");
                }
                !excluded
            });
            report.excluded = before - docs.len();
        }

        let index = SearchIndex::from_fragments(docs)?;
        report.accepted = index.len();
        Ok((index, report))
    }
}

/// Load an index file (or directory) with the given policy.
///
/// # Errors
///
/// See [`Loader::load_path`].
pub fn load_path(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<(SearchIndex, LoadReport)> {
    Loader::new(policy).load_path(path)
}

/// Parse an index from source text, rejecting any malformed record.
///
/// # Errors
///
/// See [`Loader::load_str`].
pub fn parse_str(src: &str) -> Result<SearchIndex> {
    Loader::new(LoadPolicy::Strict).load_str(src).map(|(index, _)| index)
}

/// Resolve an index path: files are used as-is, directories are probed for
/// the known index file names.
///
/// # Errors
///
/// Returns [`Error::IndexNotFound`] if nothing usable exists at `path`.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        if let Some(found) = INDEX_FILE_NAMES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file())
        {
            return Ok(found);
        }
    }
    Err(Error::IndexNotFound {
        path: path.to_path_buf(),
    })
}

fn wrapper_regex() -> &'static Regex {
    static WRAPPER: OnceLock<Regex> = OnceLock::new();
    WRAPPER.get_or_init(|| {
        Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*")
            .unwrap_or_else(|e| unreachable!("wrapper pattern is valid: {e}"))
    })
}

/// Remove the `var name = ` prefix and an optional trailing `;`.
fn strip_wrapper(src: &str) -> Result<&str> {
    let prefix = wrapper_regex()
        .find(src)
        .ok_or_else(|| Error::InvalidWrapper("expected a variable assignment".to_string()))?;
    let body = src[prefix.end()..].trim_end();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();
    if !body.starts_with('{') {
        return Err(Error::InvalidWrapper(
            "assigned value is not an object literal".to_string(),
        ));
    }
    Ok(body)
}

/// Drop commas that directly precede `]` or `}`, ignoring string contents.
fn strip_trailing_commas(src: &str) -> Cow<'_, str> {
    if !src.contains(',') {
        return Cow::Borrowed(src);
    }

    let mut out = String::with_capacity(src.len());
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in src.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let rest = src[i + 1..].trim_start();
                if !(rest.starts_with(']') || rest.starts_with('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// Pull the `docs` array out of the parsed root value.
fn docs_array(root: Value) -> Result<Vec<Value>> {
    let Value::Object(mut root) = root else {
        return Err(Error::MissingDocs);
    };
    match root.remove("docs") {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(Error::DocsNotArray),
        None => Err(Error::MissingDocs),
    }
}

/// Convert one raw record into a fragment, naming the first problem found.
fn record_from_value(index: usize, value: Value) -> Result<DocFragment> {
    let Value::Object(mut fields) = value else {
        return Err(Error::malformed(index, "record is not an object"));
    };

    let mut take = |name: &str| -> Result<String> {
        take_string(&mut fields, name).map_err(|reason| Error::malformed(index, reason))
    };

    let location = take(REQUIRED_FIELDS[0])?;
    let page = take(REQUIRED_FIELDS[1])?;
    let title = take(REQUIRED_FIELDS[2])?;
    let category = take(REQUIRED_FIELDS[3])?;
    let text = take(REQUIRED_FIELDS[4])?;

    let category = category
        .parse::<Category>()
        .map_err(|_| Error::malformed(index, format!("unknown category {category:?}")))?;

    Ok(DocFragment {
        location,
        page,
        title,
        category,
        text,
    })
}

fn take_string(fields: &mut Map<String, Value>, name: &str) -> std::result::Result<String, String> {
    match fields.remove(name) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!("field `{name}` is not a string (found {})", kind(&other))),
        None => Err(format!("missing field `{name}`")),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
