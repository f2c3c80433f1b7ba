//! Tools for fetching data from a URL.
//!
//! This module is subdivided into two modules:
//! `deps` installs the yt-dlp binary, `streams` downloads media through it.

use crate::error::{Error, Result};
use crate::utils::file_system;
use futures_util::StreamExt;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

pub mod deps;
pub mod streams;

/// A callback receiving the downloaded size and the total size, 0 if unknown.
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// The fetcher is responsible for downloading data from a URL.
pub struct Fetcher {
    /// The URL from which to download the data.
    url: String,
    /// Callback optional for tracking download progress
    progress_callback: Option<ProgressCallback>,
}

impl fmt::Display for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fetcher(url={})", self.url)
    }
}

impl Fetcher {
    /// Creates a new fetcher for the given URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL from which to download the data.
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: url.as_ref().to_string(),
            progress_callback: None,
        }
    }

    /// Configure a callback for tracking download progress.
    ///
    /// # Arguments
    ///
    /// * `callback` - A function that will be called with the downloaded size and total size.
    pub fn with_progress_callback(mut self, callback: Option<ProgressCallback>) -> Self {
        self.progress_callback = callback;
        self
    }

    fn client() -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(client)
    }

    /// Fetch the body of the URL as text.
    ///
    /// # Errors
    ///
    /// This function will return an error if the request fails or the server answers with an
    /// error status.
    pub async fn fetch_text(&self) -> Result<String> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Fetching text from {}", self.url);

        let response = Self::client()?
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    /// Downloads the asset at the given URL and writes it to the given destination.
    /// An existing file is overwritten.
    ///
    /// # Arguments
    ///
    /// * `destination` - The path where to write the asset.
    ///
    /// # Errors
    ///
    /// This function will return an error if the asset cannot be downloaded or written to the destination.
    pub async fn fetch_asset(&self, destination: impl AsRef<Path> + std::fmt::Debug) -> Result<u64> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Fetching asset from {} to {:?}", self.url, destination);

        file_system::create_parent_dir(&destination)?;

        let response = Self::client()?
            .get(&self.url)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::DownloadFailed(format!(
                "Unexpected status code {} for {}",
                status, self.url
            )));
        }

        let total_bytes = response.content_length().unwrap_or(0);
        let mut dest = file_system::create_file(&destination).await?;
        let mut stream = response.bytes_stream();

        // Use a larger buffer to improve performance
        let mut buffer = Vec::with_capacity(1024 * 1024);
        let mut downloaded_bytes = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.extend_from_slice(&chunk);
            downloaded_bytes += chunk.len() as u64;

            if let Some(callback) = &self.progress_callback {
                callback(downloaded_bytes, total_bytes);
            }

            if buffer.len() >= 1024 * 1024 {
                dest.write_all(&buffer).await?;
                buffer.clear();
            }
        }

        if !buffer.is_empty() {
            dest.write_all(&buffer).await?;
        }
        dest.flush().await?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Wrote {} bytes to {:?}", downloaded_bytes, destination);

        Ok(downloaded_bytes)
    }
}
