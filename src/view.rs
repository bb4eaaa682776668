//! Pure view projection and the upload progress surface.

use crate::entry::{DirectoryEntry, EntryKind};
use crate::nav::RemotePath;
use crate::progress::UploadEvent;
use crate::service::Endpoints;

/// Document-level drag events the embedding shell must cancel (prevent
/// default and stop propagation) before handing dropped files to
/// [`Browser::handle_drop`](crate::controller::Browser::handle_drop).
/// Left alone, the browser navigates to or opens the dropped file itself.
pub const INTERCEPTED_DRAG_EVENTS: [&str; 3] = ["dragstart", "dragover", "drop"];

/// One interactive element of the rendered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewItem {
    /// Activatable element that navigates into a subdirectory. Carries the
    /// raw segment so the follow-up `enter` encodes it exactly once.
    Directory {
        /// Raw directory name
        name: String,
    },
    /// Direct link to the static retrieval location of a file.
    File {
        /// Raw file name
        name: String,
        /// Fully-built download URL
        href: String,
    },
    /// Entry with an unrecognized kind, rendered as inert text.
    Inert {
        /// Raw entry name
        name: String,
    },
}

/// A complete visible frame: current-path indicator plus entry list.
///
/// Each frame is built only from the path and entries it was projected
/// from; nothing carries over from a previous frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFrame {
    /// Displayed current path
    pub location: String,
    /// Rendered entries, in service order
    pub items: Vec<ViewItem>,
    /// Set when the listing behind this frame failed
    pub error: Option<String>,
}

impl ViewFrame {
    /// An empty frame for a path, shown before the first listing resolves.
    pub fn empty(path: &RemotePath) -> Self {
        Self {
            location: path.display(),
            items: Vec::new(),
            error: None,
        }
    }

    /// An error frame: visibly empty rather than silently stale.
    pub fn listing_failed(path: &RemotePath, message: impl Into<String>) -> Self {
        Self {
            location: path.display(),
            items: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Project a directory listing into a view frame.
///
/// Pure function of its inputs: directory entries become activatable
/// navigation items, file entries become direct links under the static
/// retrieval prefix, and entries with an unrecognized kind become inert
/// text instead of guessing.
pub fn project(endpoints: &Endpoints, path: &RemotePath, entries: &[DirectoryEntry]) -> ViewFrame {
    let items = entries
        .iter()
        .map(|entry| match entry.kind {
            Some(EntryKind::Dir) => ViewItem::Directory {
                name: entry.name.clone(),
            },
            Some(EntryKind::File) => ViewItem::File {
                name: entry.name.clone(),
                href: endpoints.file_url(path, &entry.name),
            },
            None => ViewItem::Inert {
                name: entry.name.clone(),
            },
        })
        .collect();

    ViewFrame {
        location: path.display(),
        items,
        error: None,
    }
}

/// State of the per-file progress indicator modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressModal {
    /// File name shown in the indicator
    pub name: String,
    /// Displayed percentage
    pub percent: u8,
}

/// The modal progress indicator fed by upload events.
///
/// Only ever displays one task (uploads are sequential). The displayed
/// percentage never decreases and never exceeds 100, whatever arrives.
#[derive(Debug, Default)]
pub struct ProgressSurface {
    current: Option<ProgressModal>,
}

impl ProgressSurface {
    /// Create a closed surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently displayed modal, if open.
    pub fn current(&self) -> Option<&ProgressModal> {
        self.current.as_ref()
    }

    /// Open the indicator for a named task at 0%.
    pub fn open(&mut self, name: impl Into<String>) {
        self.current = Some(ProgressModal {
            name: name.into(),
            percent: 0,
        });
    }

    /// Raise the displayed percentage. Lower or repeated values are kept at
    /// the previous maximum; values above 100 are clamped.
    pub fn update(&mut self, percent: u8) {
        if let Some(modal) = &mut self.current {
            modal.percent = modal.percent.max(percent.min(100));
        }
    }

    /// Close the indicator, discarding the task it reported.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Apply one coordinator event to the surface.
    pub fn apply_event(&mut self, event: &UploadEvent) {
        match event {
            UploadEvent::TaskStarted { name } => self.open(name.clone()),
            UploadEvent::Progress { percent, .. } => self.update(*percent),
            UploadEvent::TaskFinished { .. } => {}
            UploadEvent::IndicatorDismissed { .. } => self.dismiss(),
        }
    }
}
