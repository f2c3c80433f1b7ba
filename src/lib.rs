//! Fetch YouTube metadata and download audio or video through yt-dlp and ffmpeg.
//!
//! The heavy lifting is done by the external binaries: this crate builds their arguments, runs
//! them, and turns their plain-text output into typed values.

use crate::error::Result;
use crate::executor::Executor;
use crate::fetcher::deps::{BinaryInstaller, Executables, ProvisionOptions};
use crate::transcoder::Transcoder;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub mod command;
pub mod error;
pub mod executor;
pub mod fetcher;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod transcoder;
pub mod utils;

pub use error::Error;
pub use model::options::{AudioDownload, VideoDownload};
pub use model::{AudioBitrate, VideoField, VideoMetadata, VideoQuality};

/// A YouTube fetcher that uses yt-dlp to query videos and download them, and ffmpeg to convert
/// the downloads.
///
/// The operations are implemented next to the code they rely on: metadata queries in the
/// `metadata` module, media downloads in `fetcher::streams`.
///
/// # Examples
///
/// ```rust, no_run
/// # use ytdlp_bridge::{YtDlp, VideoField};
/// # use ytdlp_bridge::fetcher::deps::Executables;
/// # use std::path::PathBuf;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let executables = Executables::new(PathBuf::from("bin/yt-dlp"), PathBuf::from("ffmpeg"));
/// let fetcher = YtDlp::new(executables);
///
/// let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
/// let metadata = fetcher
///     .fetch_metadata(url, &[VideoField::Title, VideoField::Duration])
///     .await?;
/// println!("Video title: {:?}", metadata.title);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct YtDlp {
    /// The yt-dlp and ffmpeg binaries.
    pub executables: Executables,

    /// Extra arguments passed to every yt-dlp call.
    pub args: Vec<String>,
    /// The timeout for each external command, `None` waits until it exits.
    pub timeout: Option<Duration>,
    /// Fail metadata queries whose output has a different number of lines than fields.
    pub strict_metadata: bool,
}

impl fmt::Display for YtDlp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "YtDlp: downloader={:?}, transcoder={:?}, args={:?}",
            self.executables.downloader, self.executables.transcoder, self.args
        )
    }
}

impl YtDlp {
    /// Creates a new fetcher with the given executables.
    ///
    /// # Arguments
    ///
    /// * `executables` - The yt-dlp and ffmpeg binaries.
    pub fn new(executables: Executables) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!("Creating a new video fetcher");

        Self {
            executables,
            args: Vec::new(),
            timeout: None,
            strict_metadata: false,
        }
    }

    /// Downloads the yt-dlp binary according to the given options and returns its path.
    ///
    /// # Errors
    ///
    /// See [`BinaryInstaller::install`].
    ///
    /// # Examples
    ///
    /// ```rust, no_run
    /// # use ytdlp_bridge::YtDlp;
    /// # use ytdlp_bridge::fetcher::deps::ProvisionOptions;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let path = YtDlp::download_binary(ProvisionOptions::default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_binary(options: ProvisionOptions) -> Result<PathBuf> {
        BinaryInstaller::new(options).install().await
    }

    /// Creates a new fetcher after installing yt-dlp. ffmpeg is looked up on `PATH`.
    /// Be careful, this function may take a while to execute.
    ///
    /// # Errors
    ///
    /// This function will return an error if yt-dlp could not be installed.
    pub async fn with_new_binary(options: ProvisionOptions) -> Result<Self> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Creating a new video fetcher with binary installation");

        let downloader = Self::download_binary(options).await?;
        let transcoder = PathBuf::from(utils::find_executable("ffmpeg"));

        Ok(Self::new(Executables::new(downloader, transcoder)))
    }

    /// Sets the arguments to pass to yt-dlp.
    pub fn with_args(&mut self, mut args: Vec<String>) -> &mut Self {
        self.args.append(&mut args);
        self
    }

    /// Adds an argument to pass to yt-dlp.
    pub fn with_arg(&mut self, arg: impl AsRef<str>) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Sets the timeout for command execution.
    pub fn with_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables the line count check of metadata queries.
    pub fn with_strict_metadata(&mut self, strict: bool) -> &mut Self {
        self.strict_metadata = strict;
        self
    }

    /// Updates the yt-dlp executable in place.
    /// Be careful, this function may take a while to execute.
    ///
    /// # Errors
    ///
    /// This function will return an error if the yt-dlp executable could not be updated.
    pub async fn update_downloader(&self) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Updating the downloader");

        self.run_downloader(vec!["--update".to_string()]).await?;
        Ok(())
    }

    /// Runs yt-dlp with the configured extra arguments followed by `args`.
    pub(crate) async fn run_downloader(
        &self,
        mut args: Vec<String>,
    ) -> Result<executor::ProcessOutput> {
        let mut final_args = self.args.clone();
        final_args.append(&mut args);

        let executor = Executor {
            executable_path: self.executables.downloader.clone(),
            timeout: self.timeout,
            args: final_args,
        };

        executor.execute().await
    }

    /// The ffmpeg wrapper sharing this fetcher's timeout.
    pub(crate) fn transcoder(&self) -> Transcoder {
        Transcoder::new(self.executables.transcoder.clone(), self.timeout)
    }
}
