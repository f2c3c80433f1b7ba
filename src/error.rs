//! The errors that can occur.

use std::time::Duration;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The possible errors that can occur.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred while running the runtime.
    #[error("An error occurred while running the runtime: {0}")]
    Runtime(#[from] tokio::task::JoinError),
    /// An error occurred while interacting with the file system.
    #[error("An IO error occurred: {0}")]
    IO(#[from] std::io::Error),
    /// An error occurred while fetching a file.
    #[error("An error occurred while fetching: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The video identifier could not be extracted from the URL.
    #[error("Invalid YouTube URL, unable to extract video ID: {0}")]
    InvalidUrl(String),
    /// The requested platform has no yt-dlp release.
    #[error("Unsupported platform: {0}. Supported platforms are win32, linux, and darwin")]
    UnsupportedPlatform(String),
    /// The yt-dlp binary could not be fetched or written.
    #[error("Failed to download yt-dlp: {0}")]
    DownloadFailed(String),
    /// The downloaded binary does not match the published checksum.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    /// An external tool exited with a non-zero status.
    #[error("{program} exited with code {code}: {stderr}")]
    ExternalTool {
        program: String,
        code: i32,
        stderr: String,
    },
    /// ffmpeg failed to convert the downloaded file.
    #[error("Failed to convert media: {0}")]
    ConversionFailed(String),
    /// The tool printed a different number of lines than fields were requested.
    #[error("Expected {expected} metadata lines, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    /// An error occurred while running a command.
    #[error("Failed to execute command: {0}")]
    Command(String),
    /// An error occurred manipulating a path.
    #[error("An invalid path was provided: {0}")]
    Path(String),
    /// An error occurred due to a timeout.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}
