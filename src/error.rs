//! Error types for the sharefs library.

use thiserror::Error;

/// Main error type for sharefs operations.
#[derive(Error, Debug)]
pub enum ShareError {
    /// Remote responded with a non-success HTTP status.
    #[error("HTTP error: {0}")]
    Status(u16),

    /// Network request error.
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Listing response was not valid structured data.
    #[error("Listing parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single file transfer failed.
    #[error("Upload of '{name}' failed")]
    Upload {
        /// Display name of the file whose transfer failed.
        name: String,
        /// Underlying transport or status error.
        #[source]
        source: Box<ShareError>,
    },
}

impl ShareError {
    /// Wrap a transfer error with the name of the file it belongs to.
    pub(crate) fn upload(name: impl Into<String>, source: ShareError) -> Self {
        ShareError::Upload {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for sharefs operations.
pub type Result<T> = std::result::Result<T, ShareError>;
