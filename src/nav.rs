//! Remote paths and the navigation stack.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped inside a single path segment. Everything outside the
/// URL "unreserved" set is encoded, so a segment round-trips exactly once.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A location in the remote directory tree.
///
/// Segments are stored raw (not percent-encoded); encoding is applied once,
/// per segment, when a URL is built via [`RemotePath::encoded`]. The root
/// path is the empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemotePath {
    segments: Vec<String>,
}

impl RemotePath {
    /// The root of the remote tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from raw (unencoded) segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Raw segments of this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Return this path extended by one child segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(segment.into());
        path
    }

    /// Join the raw segments with `/` for display. Root displays as `/`.
    pub fn display(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Join the percent-encoded segments with `/` for use in a URL.
    /// Root yields the empty string.
    pub fn encoded(&self) -> String {
        self.segments
            .iter()
            .map(|s| utf8_percent_encode(s, SEGMENT_ENCODE_SET).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Percent-encode a single raw segment.
    pub(crate) fn encode_segment(segment: &str) -> String {
        utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Ordered history of visited paths; the top is the currently displayed one.
///
/// The stack is never empty: it is created holding the root path, and
/// [`NavigationStack::back`] refuses to pop the last element, so navigation
/// above root is impossible. Callers must treat the path returned by a
/// mutation as the new source of truth and trigger a re-listing.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    visited: Vec<RemotePath>,
}

impl NavigationStack {
    /// Create a stack positioned at root.
    pub fn new() -> Self {
        Self {
            visited: vec![RemotePath::root()],
        }
    }

    /// The currently displayed path.
    pub fn current(&self) -> &RemotePath {
        self.visited.last().expect("navigation stack is never empty")
    }

    /// Descend into a child directory; returns the new current path.
    pub fn enter(&mut self, segment: impl Into<String>) -> &RemotePath {
        let next = self.current().child(segment);
        self.visited.push(next);
        self.current()
    }

    /// Go up one level; a no-op when already at root.
    pub fn back(&mut self) -> &RemotePath {
        if self.visited.len() > 1 {
            self.visited.pop();
        }
        self.current()
    }

    /// Drop all history and return to root.
    pub fn reset(&mut self) -> &RemotePath {
        self.visited.truncate(1);
        self.current()
    }

    /// Number of paths on the stack.
    pub fn depth(&self) -> usize {
        self.visited.len()
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new()
    }
}
