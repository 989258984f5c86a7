//! Core record types for docindex.
//!
//! This module defines the doc fragment, the single record kind found in a
//! documentation search index, along with its category and location views.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Whether a fragment describes a whole page or a section within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A whole documentation page.
    Page,
    /// A named section within a page.
    Section,
}

impl Category {
    /// The wire name used in the index file.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Self::Page),
            "section" => Ok(Self::Section),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

/// One record of a documentation search index.
///
/// Field order matches the generator's output so that re-serialization keeps
/// the same layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocFragment {
    /// URL fragment identifying the page and optional in-page anchor.
    pub location: String,

    /// Human-readable page name.
    pub page: String,

    /// Section or page title.
    pub title: String,

    /// Whether this is a page or a section.
    pub category: Category,

    /// Plain-text body content (may be empty).
    pub text: String,
}

impl DocFragment {
    /// Create a new fragment.
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        page: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        text: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            page: page.into(),
            title: title.into(),
            category,
            text: text.into(),
        }
    }

    /// Check if this fragment is a whole page.
    #[must_use]
    pub fn is_page(&self) -> bool {
        self.category == Category::Page
    }

    /// Check if this fragment is a section.
    #[must_use]
    pub fn is_section(&self) -> bool {
        self.category == Category::Section
    }

    /// Check if the fragment carries any body text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Parsed view of the location.
    #[must_use]
    pub fn location(&self) -> Location<'_> {
        Location::parse(&self.location)
    }

    /// BLAKE3 hash over every field, location included.
    #[must_use]
    pub fn content_hash(&self) -> String {
        hash_fields(&[
            &self.location,
            &self.page,
            &self.title,
            self.category.as_str(),
            &self.text,
        ])
    }

    /// BLAKE3 hash over everything except the location.
    ///
    /// Two fragments with the same body hash describe the same content under
    /// different addresses.
    #[must_use]
    pub fn body_hash(&self) -> String {
        hash_fields(&[&self.page, &self.title, self.category.as_str(), &self.text])
    }
}

/// Hash a list of fields, length-prefixing each so boundaries are unambiguous.
fn hash_fields(fields: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    for field in fields {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// A borrowed view of a fragment location, split at the first `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    raw: &'a str,
    path: &'a str,
    anchor: Option<&'a str>,
}

impl<'a> Location<'a> {
    /// Parse a location string.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('#') {
            Some((path, anchor)) => Self {
                raw,
                path,
                anchor: (!anchor.is_empty()).then_some(anchor),
            },
            None => Self {
                raw,
                path: raw,
                anchor: None,
            },
        }
    }

    /// The full location as written.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// The page path before the `#` (empty for the home page).
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// The in-page anchor, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&'a str> {
        self.anchor
    }

    /// The anchor without the generator's `-N` disambiguation suffix.
    #[must_use]
    pub fn slug(&self) -> Option<&'a str> {
        self.anchor.map(|anchor| match anchor.rsplit_once('-') {
            Some((stem, counter))
                if !stem.is_empty()
                    && !counter.is_empty()
                    && counter.bytes().all(|b| b.is_ascii_digit()) =>
            {
                stem
            }
            _ => anchor,
        })
    }

    /// Join a base URL and this location with exactly one `/` between them.
    #[must_use]
    pub fn url(&self, base: &str) -> String {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.raw.trim_start_matches('/')
        )
    }
}

impl std::fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw)
    }
}
