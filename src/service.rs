//! Remote directory service: the seam and its HTTP implementation.

use async_trait::async_trait;
use bytes::Bytes;

use crate::entry::{parse_listing, DirectoryEntry};
use crate::error::Result;
use crate::http::HttpClient;
use crate::nav::RemotePath;
use crate::progress::{ProgressTx, TransferProgress};

/// Size of the chunks a streamed upload body is cut into. Progress is
/// reported once per chunk as the transport pulls it off the stream.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Fixed URL prefixes of the remote store.
///
/// The listing endpoint, the upload endpoint and the static file retrieval
/// prefix are distinct mounts on the same base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
    listing_prefix: String,
    upload_prefix: String,
    files_prefix: String,
}

impl Endpoints {
    /// Create endpoints for a base URL with the default prefixes.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            listing_prefix: "/index".to_string(),
            upload_prefix: "/upload".to_string(),
            files_prefix: "/s".to_string(),
        }
    }

    /// Override the three mount prefixes.
    pub fn with_prefixes(
        mut self,
        listing: impl Into<String>,
        upload: impl Into<String>,
        files: impl Into<String>,
    ) -> Self {
        self.listing_prefix = listing.into();
        self.upload_prefix = upload.into();
        self.files_prefix = files.into();
        self
    }

    /// URL of the listing endpoint for a directory.
    pub(crate) fn listing_url(&self, path: &RemotePath) -> String {
        if path.is_root() {
            format!("{}{}", self.base, self.listing_prefix)
        } else {
            format!("{}{}/{}", self.base, self.listing_prefix, path.encoded())
        }
    }

    /// URL of the upload endpoint for a file in a target directory.
    pub(crate) fn upload_url(&self, target: &RemotePath, name: &str) -> String {
        let encoded_name = RemotePath::encode_segment(name);
        if target.is_root() {
            format!("{}{}/{}", self.base, self.upload_prefix, encoded_name)
        } else {
            format!(
                "{}{}/{}/{}",
                self.base,
                self.upload_prefix,
                target.encoded(),
                encoded_name
            )
        }
    }

    /// Static retrieval URL for a file entry; the browser's native
    /// navigation handles the download, no client-side fetch is needed.
    pub fn file_url(&self, path: &RemotePath, name: &str) -> String {
        let encoded_name = RemotePath::encode_segment(name);
        if path.is_root() {
            format!("{}{}/{}", self.base, self.files_prefix, encoded_name)
        } else {
            format!(
                "{}{}/{}/{}",
                self.base,
                self.files_prefix,
                path.encoded(),
                encoded_name
            )
        }
    }
}

/// Interface to the remote store: one listing read, one file write.
///
/// The production implementation is [`RemoteStore`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Read the entries of a directory, in the order the service supplies
    /// them. No retries: the caller decides whether to retry.
    async fn list_dir(&self, path: &RemotePath) -> Result<Vec<DirectoryEntry>>;

    /// Store a file's bytes under the target directory, reporting
    /// cumulative progress into `progress` while the body is consumed.
    async fn store_file(
        &self,
        target: &RemotePath,
        name: &str,
        data: Bytes,
        progress: ProgressTx,
    ) -> Result<()>;
}

/// HTTP-backed implementation of [`DirectoryService`].
#[derive(Debug)]
pub struct RemoteStore {
    http: HttpClient,
    endpoints: Endpoints,
}

impl RemoteStore {
    /// Create a store client for the given endpoints.
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http: HttpClient::new(),
            endpoints,
        }
    }

    /// The endpoint configuration this store talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait]
impl DirectoryService for RemoteStore {
    async fn list_dir(&self, path: &RemotePath) -> Result<Vec<DirectoryEntry>> {
        let url = self.endpoints.listing_url(path);
        let body = self.http.get(&url).await?;
        parse_listing(&body)
    }

    async fn store_file(
        &self,
        target: &RemotePath,
        name: &str,
        data: Bytes,
        progress: ProgressTx,
    ) -> Result<()> {
        let url = self.endpoints.upload_url(target, name);
        let total = data.len() as u64;

        let mut chunks = Vec::with_capacity(data.len() / UPLOAD_CHUNK_SIZE + 1);
        let mut offset = 0;
        while offset < data.len() {
            let end = (offset + UPLOAD_CHUNK_SIZE).min(data.len());
            chunks.push(data.slice(offset..end));
            offset = end;
        }

        // Report progress lazily as the transport pulls chunks off the
        // stream, approximating bytes handed to the wire.
        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            let _ = progress.send(TransferProgress::new(sent, total));
            Ok::<Bytes, std::convert::Infallible>(chunk)
        }));

        self.http
            .post_raw(&url, reqwest::Body::wrap_stream(stream))
            .await
    }
}
