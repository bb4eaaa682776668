//! # sharefs
//!
//! Client library for a shared remote directory: browse listings, navigate
//! the tree, and upload dropped files.
//!
//! ## Features
//!
//! - **Navigation**: a stack of visited paths with `enter`/`back`, never
//!   escaping above root, with per-segment percent-encoding applied exactly
//!   once when URLs are built.
//! - **Listings**: asynchronous directory reads parsed into typed entries,
//!   returned in service order, with a stale-response guard so a slow
//!   earlier request never overwrites a newer view.
//! - **Rendering**: a pure projection from `(path, entries)` to a
//!   [`ViewFrame`] of directory links, file links and inert items, unit
//!   testable without a browser environment.
//! - **Uploads**: dropped files transfer strictly one at a time, with typed
//!   progress events on a channel, per-file failure isolation, and a root
//!   refresh after each success.
//!
//! The remote store is reached through the [`DirectoryService`] trait;
//! [`RemoteStore`] is the HTTP implementation and tests substitute
//! in-memory fakes.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sharefs::{Browser, DroppedFile, Endpoints, RemoteStore};
//!
//! # async fn example() {
//! let endpoints = Endpoints::new("http://localhost:8080");
//! let store = Arc::new(RemoteStore::new(endpoints.clone()));
//! let (mut browser, mut events) = Browser::new(store, endpoints);
//!
//! // First frame
//! browser.refresh().await;
//! println!("at {}", browser.frame().location);
//!
//! // Descend into a subdirectory, then drop a file into it
//! browser.enter("docs").await;
//! let reports = browser
//!     .handle_drop(vec![DroppedFile::new("notes.txt", b"hello".to_vec())])
//!     .await;
//! for report in &reports {
//!     println!("{}: {:?}", report.task.display_name, report.task.status);
//! }
//!
//! // Upload lifecycle notifications for the progress indicator
//! while let Ok(event) = events.try_recv() {
//!     println!("{:?}", event);
//! }
//! # }
//! ```

pub mod controller;
pub mod entry;
pub mod error;
pub mod http;
pub mod nav;
pub mod progress;
pub mod service;
pub mod upload;
pub mod view;

// Re-export commonly used types
pub use controller::Browser;
pub use entry::{DirectoryEntry, EntryKind};
pub use error::{Result, ShareError};
pub use nav::{NavigationStack, RemotePath};
pub use progress::{event_channel, ProgressTx, TransferProgress, UploadEvent};
pub use service::{DirectoryService, Endpoints, RemoteStore};
pub use upload::{DroppedFile, UploadCoordinator, UploadReport, UploadStatus, UploadTask};
pub use view::{
    project, ProgressModal, ProgressSurface, ViewFrame, ViewItem, INTERCEPTED_DRAG_EVENTS,
};
