//! Validation of a loaded search index.
//!
//! Hard invariants (non-empty, unique locations) are enforced when an index
//! is built; this pass re-checks them and adds softer findings about the
//! traversal order and content that a generator would not normally emit.

use std::collections::HashMap;

use serde::Serialize;

use super::loader::LoadReport;
use super::SearchIndex;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The index violates an invariant.
    Error,
    /// The index is usable but unusual.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// The kind of finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// The index has no records.
    Empty,
    /// Two records share a location.
    DuplicateLocation {
        /// Index of the earlier record.
        first: usize,
    },
    /// A section appears before any page record for its page.
    OrphanSection,
    /// A page record's location points at an in-page anchor.
    AnchoredPage,
    /// The same content appears under an earlier location.
    DuplicateContent {
        /// Index of the earlier record.
        first: usize,
    },
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// How serious this is.
    pub severity: Severity,
    /// What was found.
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Record the finding is about, when there is one.
    pub record: Option<usize>,
    /// Location of that record.
    pub location: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.record {
            Some(record) => write!(f, "{} [record {record}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Validate an index, returning findings in record order.
#[must_use]
pub fn validate(index: &SearchIndex) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if index.is_empty() {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            kind: IssueKind::Empty,
            record: None,
            location: None,
            message: "index contains no records".to_string(),
        });
        return issues;
    }

    let mut locations: HashMap<&str, usize> = HashMap::new();
    let mut bodies: HashMap<String, usize> = HashMap::new();
    let mut pages_seen: Vec<&str> = Vec::new();

    for (i, doc) in index.iter().enumerate() {
        let issue = |severity, kind, message: String| ValidationIssue {
            severity,
            kind,
            record: Some(i),
            location: Some(doc.location.clone()),
            message,
        };

        if let Some(&first) = locations.get(doc.location.as_str()) {
            issues.push(issue(
                Severity::Error,
                IssueKind::DuplicateLocation { first },
                format!("location {:?} repeats record {first}", doc.location),
            ));
        } else {
            locations.insert(doc.location.as_str(), i);
        }

        if doc.is_page() {
            pages_seen.push(doc.page.as_str());
            if doc.location().anchor().is_some() {
                issues.push(issue(
                    Severity::Warning,
                    IssueKind::AnchoredPage,
                    format!("page record {:?} has an in-page anchor", doc.location),
                ));
            }
        } else if !pages_seen.contains(&doc.page.as_str()) {
            issues.push(issue(
                Severity::Warning,
                IssueKind::OrphanSection,
                format!(
                    "section {:?} appears before any page record for {:?}",
                    doc.title, doc.page
                ),
            ));
        }

        // Empty bodies are normal for headings, so only flag real content.
        if doc.has_text() {
            let body = doc.body_hash();
            if let Some(&first) = bodies.get(&body) {
                issues.push(issue(
                    Severity::Warning,
                    IssueKind::DuplicateContent { first },
                    format!("content duplicates record {first}"),
                ));
            } else {
                bodies.insert(body, i);
            }
        }
    }

    issues
}

/// Check whether any finding is error-severity.
#[must_use]
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Error count for a checked index: error-severity findings plus every
/// record the loader skipped.
#[must_use]
pub fn error_count(issues: &[ValidationIssue], report: &LoadReport) -> usize {
    report.skipped.len()
        + issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
}
