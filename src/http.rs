//! HTTP client wrapper for remote store requests.

use crate::error::{Result, ShareError};
use reqwest::{Body, Client};

/// HTTP client for making requests to the remote store.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Make a GET request and return the response body.
    ///
    /// # Arguments
    /// * `url` - URL to fetch
    ///
    /// # Returns
    /// Response body as string
    pub async fn get(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ShareError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Make a POST request with a raw byte-stream body.
    ///
    /// # Arguments
    /// * `url` - URL to post to
    /// * `body` - Request body (may be a stream)
    pub async fn post_raw(&self, url: &str, body: Body) -> Result<()> {
        log::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ShareError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let _client = HttpClient::new();
        let _default = HttpClient::default();
    }
}
