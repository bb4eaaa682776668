//! The navigation-and-transfer controller.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::entry::DirectoryEntry;
use crate::error::Result;
use crate::nav::{NavigationStack, RemotePath};
use crate::progress::{event_channel, UploadEvent};
use crate::service::{DirectoryService, Endpoints};
use crate::upload::{DroppedFile, UploadCoordinator, UploadReport};
use crate::view::{project, ViewFrame};

/// Client session over one remote store: tracks where the user is in the
/// remote tree, fetches listings, projects them into view frames, and runs
/// dropped-file uploads.
///
/// All mutation happens through `&mut self` on one logical thread; every
/// network call is a suspension point. The stack and the rendered frame are
/// owned here and nowhere else, so no locking is involved. The one genuine
/// hazard is a stale listing response, which [`Browser::apply_listing`]
/// guards against by path tag.
///
/// Upload lifecycle notifications arrive on the event receiver returned by
/// [`Browser::new`]; feed them to a
/// [`ProgressSurface`](crate::view::ProgressSurface).
pub struct Browser {
    nav: NavigationStack,
    service: Arc<dyn DirectoryService>,
    endpoints: Endpoints,
    uploads: UploadCoordinator,
    frame: ViewFrame,
}

impl Browser {
    /// Create a session at the root of the remote tree.
    ///
    /// Returns the browser and the receiver for its upload events. Each
    /// instance owns an independent navigation stack, so multiple sessions
    /// against the same store can coexist in-process.
    pub fn new(
        service: Arc<dyn DirectoryService>,
        endpoints: Endpoints,
    ) -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (events, event_rx) = event_channel();
        let nav = NavigationStack::new();
        let frame = ViewFrame::empty(nav.current());
        let browser = Self {
            nav,
            service: Arc::clone(&service),
            endpoints,
            uploads: UploadCoordinator::new(service, events),
            frame,
        };
        (browser, event_rx)
    }

    /// The currently displayed path.
    pub fn current_path(&self) -> &RemotePath {
        self.nav.current()
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &ViewFrame {
        &self.frame
    }

    /// Re-list the current directory and redraw.
    ///
    /// A listing failure becomes a visible error frame, never a silently
    /// stale view; it is not retried here.
    pub async fn refresh(&mut self) {
        let path = self.nav.current().clone();
        let result = self.service.list_dir(&path).await;
        self.apply_listing(path, result);
    }

    /// Apply a resolved listing to the display.
    ///
    /// This is the stale-response guard: each listing is tagged with the
    /// path it was issued for, and a response whose tag no longer matches
    /// the current stack top is discarded so a slow earlier request cannot
    /// overwrite the frame of a more recent one.
    pub fn apply_listing(&mut self, path: RemotePath, result: Result<Vec<DirectoryEntry>>) {
        if &path != self.nav.current() {
            log::warn!(
                "discarding stale listing for {} (now at {})",
                path,
                self.nav.current()
            );
            return;
        }

        match result {
            Ok(entries) => {
                self.frame = project(&self.endpoints, &path, &entries);
            }
            Err(err) => {
                log::warn!("listing of {} failed: {}", path, err);
                self.frame = ViewFrame::listing_failed(&path, err.to_string());
            }
        }
    }

    /// Navigate into a subdirectory of the current path and redraw.
    pub async fn enter(&mut self, segment: impl Into<String>) {
        self.nav.enter(segment);
        self.refresh().await;
    }

    /// Navigate up one level and redraw; a no-op move at root still
    /// re-fetches. No listing cache is kept, so going back always re-lists.
    pub async fn back(&mut self) {
        self.nav.back();
        self.refresh().await;
    }

    /// Upload dropped files into the directory displayed at drop time.
    ///
    /// The target path is captured once, here, and is not re-evaluated even
    /// if navigation happens while a transfer is in flight. Files transfer
    /// strictly one after another in drop order; a failed file is logged
    /// and the queue continues. After each successful transfer the stack is
    /// reset to root and the root listing refreshed, so the new file is
    /// visible at the top level.
    ///
    /// Never fails as a whole: per-file outcomes are in the returned
    /// reports, in drop order.
    pub async fn handle_drop(&mut self, files: Vec<DroppedFile>) -> Vec<UploadReport> {
        let target = self.nav.current().clone();
        let mut reports = Vec::with_capacity(files.len());

        for file in files {
            let report = self.uploads.transfer(&target, file).await;
            if report.succeeded() {
                self.nav.reset();
                self.refresh().await;
            }
            reports.push(report);
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use crate::error::ShareError;
    use crate::progress::{ProgressTx, TransferProgress};
    use crate::upload::UploadStatus;
    use crate::view::ViewItem;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory store with scripted listings and recorded calls.
    #[derive(Default)]
    struct FakeStore {
        listings: HashMap<String, Vec<DirectoryEntry>>,
        fail_uploads: HashSet<String>,
        list_calls: Mutex<Vec<String>>,
        upload_log: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn with_root_listing() -> Self {
            let mut store = Self::default();
            store.listings.insert(
                "/".to_string(),
                vec![
                    DirectoryEntry::new("docs", EntryKind::Dir),
                    DirectoryEntry::new("readme.txt", EntryKind::File),
                ],
            );
            store
                .listings
                .insert("/docs".to_string(), vec![DirectoryEntry::new("deep.txt", EntryKind::File)]);
            store
        }

        fn list_calls(&self) -> Vec<String> {
            self.list_calls.lock().unwrap().clone()
        }

        fn upload_log(&self) -> Vec<String> {
            self.upload_log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DirectoryService for FakeStore {
        async fn list_dir(&self, path: &RemotePath) -> crate::error::Result<Vec<DirectoryEntry>> {
            let key = path.display();
            self.list_calls.lock().unwrap().push(key.clone());
            self.listings
                .get(&key)
                .cloned()
                .ok_or(ShareError::Status(404))
        }

        async fn store_file(
            &self,
            target: &RemotePath,
            name: &str,
            _data: Bytes,
            progress: ProgressTx,
        ) -> crate::error::Result<()> {
            self.upload_log
                .lock()
                .unwrap()
                .push(format!("start:{}:{}", target.display(), name));
            // A genuine suspension point, like the real network write.
            tokio::task::yield_now().await;
            let _ = progress.send(TransferProgress::new(1, 1));
            self.upload_log
                .lock()
                .unwrap()
                .push(format!("end:{}:{}", target.display(), name));

            if self.fail_uploads.contains(name) {
                Err(ShareError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn browser_with(store: FakeStore) -> (Browser, Arc<FakeStore>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = Arc::new(store);
        let service: Arc<dyn DirectoryService> = store.clone();
        let (browser, _events) = Browser::new(service, Endpoints::new("http://host"));
        (browser, store)
    }

    fn file(name: &str) -> DroppedFile {
        DroppedFile::new(name, vec![0u8; 8])
    }

    #[tokio::test]
    async fn test_root_listing_projects_links() {
        let (mut browser, _store) = browser_with(FakeStore::with_root_listing());
        browser.refresh().await;

        let frame = browser.frame();
        assert_eq!(frame.location, "/");
        assert_eq!(
            frame.items,
            vec![
                ViewItem::Directory {
                    name: "docs".to_string()
                },
                ViewItem::File {
                    name: "readme.txt".to_string(),
                    href: "http://host/s/readme.txt".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_enter_then_back_refetches() {
        let (mut browser, store) = browser_with(FakeStore::with_root_listing());
        browser.refresh().await;

        browser.enter("docs").await;
        assert_eq!(browser.current_path().display(), "/docs");
        assert_eq!(browser.frame().location, "/docs");
        assert_eq!(store.list_calls(), ["/", "/docs"]);

        // No cache is kept: going back issues a fresh root listing.
        browser.back().await;
        assert_eq!(browser.current_path().display(), "/");
        assert_eq!(store.list_calls(), ["/", "/docs", "/"]);
        assert_eq!(browser.frame().items.len(), 2);
    }

    #[tokio::test]
    async fn test_listing_error_surfaces() {
        let (mut browser, _store) = browser_with(FakeStore::default());
        browser.refresh().await;

        let frame = browser.frame();
        assert!(frame.items.is_empty());
        assert_eq!(frame.error.as_deref(), Some("HTTP error: 404"));
    }

    #[tokio::test]
    async fn test_stale_listing_discarded() {
        let mut store = FakeStore::with_root_listing();
        store
            .listings
            .insert("/a".to_string(), vec![DirectoryEntry::new("from_a", EntryKind::File)]);
        store
            .listings
            .insert("/b".to_string(), vec![DirectoryEntry::new("from_b", EntryKind::File)]);
        let (mut browser, _store) = browser_with(store);

        // The user navigated to /b and its listing resolved.
        browser.enter("b").await;
        assert_eq!(browser.frame().location, "/b");

        // Now the slow response for a previous /a request arrives.
        let stale = Ok(vec![DirectoryEntry::new("from_a", EntryKind::File)]);
        browser.apply_listing(RemotePath::from_segments(["a"]), stale);

        assert_eq!(browser.frame().location, "/b");
        assert_eq!(
            browser.frame().items,
            vec![ViewItem::File {
                name: "from_b".to_string(),
                href: "http://host/s/b/from_b".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_uploads_are_strictly_sequential() {
        let (mut browser, store) = browser_with(FakeStore::with_root_listing());
        browser.refresh().await;

        let reports = browser
            .handle_drop(vec![file("f1"), file("f2"), file("f3")])
            .await;
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.succeeded()));

        // Each transfer fully resolves before the next begins.
        assert_eq!(
            store.upload_log(),
            [
                "start:/:f1",
                "end:/:f1",
                "start:/:f2",
                "end:/:f2",
                "start:/:f3",
                "end:/:f3",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_file_does_not_stop_queue() {
        let mut store = FakeStore::with_root_listing();
        store.fail_uploads.insert("f2".to_string());
        let (mut browser, store) = browser_with(store);
        browser.refresh().await;

        let reports = browser
            .handle_drop(vec![file("f1"), file("f2"), file("f3")])
            .await;

        let statuses: Vec<_> = reports.iter().map(|r| r.task.status).collect();
        assert_eq!(
            statuses,
            [
                UploadStatus::Succeeded,
                UploadStatus::Failed,
                UploadStatus::Succeeded,
            ]
        );
        // All three were attempted despite the middle failure.
        let starts: Vec<_> = store
            .upload_log()
            .into_iter()
            .filter(|l| l.starts_with("start:"))
            .collect();
        assert_eq!(starts.len(), 3);
    }

    #[tokio::test]
    async fn test_upload_targets_drop_path_and_lands_at_root() {
        let (mut browser, store) = browser_with(FakeStore::with_root_listing());
        browser.refresh().await;
        browser.enter("docs").await;

        let reports = browser.handle_drop(vec![file("f1"), file("f2")]).await;
        assert!(reports.iter().all(|r| r.succeeded()));

        // The target was captured at drop time: both files went to /docs
        // even though the first success already reset the view to root.
        let log = store.upload_log();
        assert!(log.contains(&"start:/docs:f1".to_string()));
        assert!(log.contains(&"start:/docs:f2".to_string()));

        // The view landed on a refreshed root listing.
        assert_eq!(browser.current_path().display(), "/");
        assert_eq!(browser.frame().location, "/");
        assert_eq!(store.list_calls().last().map(String::as_str), Some("/"));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = Arc::new(FakeStore::with_root_listing());
        let service: Arc<dyn DirectoryService> = store;
        let (mut first, _rx1) = Browser::new(Arc::clone(&service), Endpoints::new("http://host"));
        let (second, _rx2) = Browser::new(service, Endpoints::new("http://host"));

        first.enter("docs").await;
        assert_eq!(first.current_path().display(), "/docs");
        assert!(second.current_path().is_root());
    }
}
