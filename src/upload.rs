//! Upload coordination for dropped files.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::ShareError;
use crate::nav::RemotePath;
use crate::progress::{TransferProgress, UploadEvent};
use crate::service::DirectoryService;

/// Lifecycle state of one upload task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// Created, transfer not yet started
    Pending,
    /// Transfer in progress
    InFlight,
    /// Transfer completed successfully
    Succeeded,
    /// Transfer failed or was aborted
    Failed,
}

/// A file handed over by a drop action: display name plus payload bytes.
#[derive(Debug, Clone)]
pub struct DroppedFile {
    /// Name the file will be stored under
    pub name: String,
    /// Raw file bytes
    pub data: Bytes,
}

impl DroppedFile {
    /// Create a dropped file from a name and its bytes.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// One file's transfer lifecycle from drop to terminal state.
#[derive(Debug, Clone)]
pub struct UploadTask {
    /// Name surfaced to the user
    pub display_name: String,
    /// Last reported percentage, 0 to 100
    pub progress: u8,
    /// Current lifecycle state
    pub status: UploadStatus,
}

impl UploadTask {
    fn new(name: &str) -> Self {
        Self {
            display_name: name.to_string(),
            progress: 0,
            status: UploadStatus::Pending,
        }
    }
}

/// Outcome of one file's transfer.
#[derive(Debug)]
pub struct UploadReport {
    /// The task in its terminal state
    pub task: UploadTask,
    /// The error when the task failed
    pub error: Option<ShareError>,
}

impl UploadReport {
    /// Check if the transfer succeeded.
    pub fn succeeded(&self) -> bool {
        self.task.status == UploadStatus::Succeeded
    }
}

/// Transfers dropped files to the remote store, one at a time.
///
/// Each transfer runs to a terminal state before the next one starts, so
/// the single progress indicator is never ambiguous. Per-file lifecycle and
/// progress are published as [`UploadEvent`]s on the coordinator's event
/// channel; a failed file is logged and never aborts the remaining queue.
pub struct UploadCoordinator {
    service: Arc<dyn DirectoryService>,
    events: mpsc::UnboundedSender<UploadEvent>,
}

impl UploadCoordinator {
    /// Create a coordinator that transfers through `service` and publishes
    /// events on `events`.
    pub fn new(
        service: Arc<dyn DirectoryService>,
        events: mpsc::UnboundedSender<UploadEvent>,
    ) -> Self {
        Self { service, events }
    }

    /// Transfer one dropped file into the target directory.
    ///
    /// The target is captured by the caller at drop time and never
    /// re-evaluated mid-transfer. The returned report is terminal:
    /// `Succeeded` or `Failed`, with the error preserved on failure.
    pub async fn transfer(&self, target: &RemotePath, file: DroppedFile) -> UploadReport {
        let mut task = UploadTask::new(&file.name);
        // Surface the name immediately: the indicator opens before any bytes move.
        self.emit(UploadEvent::TaskStarted {
            name: task.display_name.clone(),
        });

        task.status = UploadStatus::InFlight;
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let forward = tokio::spawn(forward_progress(
            self.events.clone(),
            task.display_name.clone(),
            progress_rx,
        ));

        let result = self
            .service
            .store_file(target, &file.name, file.data, progress_tx)
            .await;

        // store_file dropped its sender, so the forwarder drains the channel
        // and exits; awaiting it keeps event order intact.
        let reached = forward.await.unwrap_or(0);

        let error = match result {
            Ok(()) => {
                task.status = UploadStatus::Succeeded;
                task.progress = 100;
                if reached < 100 {
                    // Granular progress never arrived; jump to done.
                    self.emit(UploadEvent::Progress {
                        name: task.display_name.clone(),
                        percent: 100,
                    });
                }
                None
            }
            Err(err) => {
                log::warn!("upload of '{}' failed: {}", task.display_name, err);
                task.status = UploadStatus::Failed;
                task.progress = reached;
                Some(ShareError::upload(&task.display_name, err))
            }
        };

        self.emit(UploadEvent::TaskFinished {
            name: task.display_name.clone(),
            status: task.status,
        });
        self.emit(UploadEvent::IndicatorDismissed {
            name: task.display_name.clone(),
        });

        UploadReport { task, error }
    }

    fn emit(&self, event: UploadEvent) {
        // A dropped receiver only means nobody is watching.
        let _ = self.events.send(event);
    }
}

/// Forward raw transfer progress as percentage events, deduplicated and
/// monotonically non-decreasing. Returns the highest percentage reached.
async fn forward_progress(
    events: mpsc::UnboundedSender<UploadEvent>,
    name: String,
    mut progress: mpsc::UnboundedReceiver<TransferProgress>,
) -> u8 {
    let mut last = 0u8;
    while let Some(report) = progress.recv().await {
        let percent = report.percent();
        if percent > last {
            last = percent;
            let _ = events.send(UploadEvent::Progress {
                name: name.clone(),
                percent,
            });
        }
    }
    last
}
