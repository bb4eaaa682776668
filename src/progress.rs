//! Progress reporting for file transfers.

use tokio::sync::mpsc;

use crate::upload::UploadStatus;

/// Progress information for a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes transferred so far
    pub sent: u64,
    /// Total bytes to transfer
    pub total: u64,
}

impl TransferProgress {
    /// Create a new progress report.
    pub fn new(sent: u64, total: u64) -> Self {
        Self { sent, total }
    }

    /// Get progress as a rounded percentage (0 to 100).
    ///
    /// A transfer with an unknown or zero total cannot report granular
    /// progress and jumps directly to 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.sent * 100 + self.total / 2) / self.total;
        pct.min(100) as u8
    }

    /// Check if the transfer is complete.
    pub fn is_complete(&self) -> bool {
        self.sent >= self.total
    }
}

/// Sender half of a per-transfer progress channel.
///
/// The transport emits cumulative [`TransferProgress`] values into it while
/// the request body is being consumed.
pub type ProgressTx = mpsc::UnboundedSender<TransferProgress>;

/// Typed notification emitted by the upload coordinator and observed by the
/// view layer. Replaces ad-hoc progress callbacks with an explicit channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// A task was created; the progress indicator should open.
    TaskStarted {
        /// Display name of the dropped file
        name: String,
    },
    /// The displayed percentage for the named task changed.
    Progress {
        /// Display name of the dropped file
        name: String,
        /// New percentage, monotonically non-decreasing, never above 100
        percent: u8,
    },
    /// The task reached a terminal state.
    TaskFinished {
        /// Display name of the dropped file
        name: String,
        /// Terminal status (`Succeeded` or `Failed`)
        status: UploadStatus,
    },
    /// The per-file progress indicator was dismissed.
    IndicatorDismissed {
        /// Display name of the dropped file
        name: String,
    },
}

/// Create an upload event channel.
pub fn event_channel() -> (
    mpsc::UnboundedSender<UploadEvent>,
    mpsc::UnboundedReceiver<UploadEvent>,
) {
    mpsc::unbounded_channel()
}
