//! Serializing search indexes.
//!
//! The JavaScript layout mirrors what the documentation generator emits, so a
//! loaded generator file written back out is byte-identical to the original.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use super::loader::{SourceFormat, DOCUMENTER_VARIABLE};
use super::{IndexFile, SearchIndex};
use crate::error::{Error, Result};
use crate::fragment::DocFragment;

/// Serialize as `{"docs": [...]}`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_json(index: &SearchIndex, pretty: bool) -> Result<String> {
    let file = IndexFile {
        docs: index.fragments(),
    };
    let json = if pretty {
        serde_json::to_string_pretty(&file)?
    } else {
        serde_json::to_string(&file)?
    };
    Ok(json)
}

/// Serialize in the generator's `var documenterSearchIndex = ...` layout.
///
/// # Errors
///
/// Returns an error if a field cannot be encoded as a JSON string.
pub fn to_documenter_js(index: &SearchIndex) -> Result<String> {
    let text_bytes: usize = index.iter().map(|doc| doc.text.len()).sum();
    let mut out = String::with_capacity(text_bytes + index.len() * 128);
    let _ = writeln!(out, "var {DOCUMENTER_VARIABLE} = {{\"docs\": [");
    for doc in index {
        out.push('\n');
        out.push_str("{\n");
        write_record_fields(&mut out, doc)?;
        out.push_str("},\n");
    }
    out.push_str("\n]}\n");
    Ok(out)
}

fn write_record_fields(out: &mut String, doc: &DocFragment) -> Result<()> {
    let fields = [
        ("location", doc.location.as_str()),
        ("page", doc.page.as_str()),
        ("title", doc.title.as_str()),
        ("category", doc.category.as_str()),
        ("text", doc.text.as_str()),
    ];
    let last = fields.len() - 1;
    for (i, (name, value)) in fields.iter().enumerate() {
        let encoded = serde_json::to_string(value)?;
        let sep = if i == last { "" } else { "," };
        let _ = writeln!(out, "    \"{name}\": {encoded}{sep}");
    }
    Ok(())
}

/// Serialize in the given format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(index: &SearchIndex, format: SourceFormat, pretty: bool) -> Result<String> {
    match format {
        SourceFormat::Json => to_json(index, pretty),
        SourceFormat::DocumenterJs => to_documenter_js(index),
    }
}

/// Write an index to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the file cannot be
/// written.
pub fn write_path(
    index: &SearchIndex,
    path: impl AsRef<Path>,
    format: SourceFormat,
    pretty: bool,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let rendered = render(index, format, pretty)?;
    std::fs::write(path, rendered).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!(records = index.len(), %format, "Wrote search index to {}", path.display());
    Ok(())
}
