//! Directory entry types and listing parse.

use serde::Deserialize;

use crate::error::Result;

/// Entry kind as reported by the remote store's `e_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Subdirectory
    Dir,
    /// Regular file
    File,
}

impl EntryKind {
    /// Create from the wire `e_type` literal.
    ///
    /// Exactly `"Dir"` and `"File"` are recognized; anything else is a
    /// data-contract violation and yields `None`.
    pub fn from_e_type(raw: &str) -> Option<Self> {
        match raw {
            "Dir" => Some(EntryKind::Dir),
            "File" => Some(EntryKind::File),
            _ => None,
        }
    }
}

/// One item returned by a directory listing.
///
/// The name is the raw remote name (not percent-encoded). The kind is taken
/// verbatim from the service and never inferred from the name; `None` marks
/// an unrecognized `e_type`, which renders as inert text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Raw remote name
    pub name: String,
    /// Entry kind, or `None` for an unrecognized `e_type`
    pub kind: Option<EntryKind>,
}

impl DirectoryEntry {
    /// Create an entry with a recognized kind.
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == Some(EntryKind::Dir)
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == Some(EntryKind::File)
    }
}

/// Wire shape of a listing entry.
#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    e_type: String,
}

/// Parse a listing response body into entries, preserving service order.
pub(crate) fn parse_listing(body: &str) -> Result<Vec<DirectoryEntry>> {
    let raw: Vec<RawEntry> = serde_json::from_str(body)?;

    Ok(raw
        .into_iter()
        .map(|entry| {
            let kind = EntryKind::from_e_type(&entry.e_type);
            if kind.is_none() {
                log::warn!(
                    "unrecognized e_type '{}' for entry '{}'",
                    entry.e_type,
                    entry.name
                );
            }
            DirectoryEntry {
                name: entry.name,
                kind,
            }
        })
        .collect())
}
