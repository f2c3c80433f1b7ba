//! Metadata queries: printed fields and available qualities.

use crate::error::{Error, Result};
use crate::model::{VideoField, VideoMetadata};
use crate::{YtDlp, command, parser};
use std::fmt::Display;

impl YtDlp {
    /// Fetches the requested fields of a video without downloading it.
    ///
    /// Only the requested fields are set on the returned metadata.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL of the video.
    /// * `fields` - The fields to print, duplicates are ignored.
    ///
    /// # Errors
    ///
    /// This function will return an error if yt-dlp fails, or, in strict mode, if it prints a
    /// different number of lines than fields were requested.
    ///
    /// # Examples
    ///
    /// ```rust, no_run
    /// # use ytdlp_bridge::{YtDlp, VideoField};
    /// # use ytdlp_bridge::fetcher::deps::Executables;
    /// # use std::path::PathBuf;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let executables = Executables::new(PathBuf::from("bin/yt-dlp"), PathBuf::from("ffmpeg"));
    /// let fetcher = YtDlp::new(executables);
    ///
    /// let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    /// let metadata = fetcher.fetch_metadata(url, &[VideoField::Id, VideoField::Title]).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_metadata(
        &self,
        url: impl AsRef<str> + Display,
        fields: &[VideoField],
    ) -> Result<VideoMetadata> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Fetching metadata {:?} for {}", fields, url);

        let args = command::metadata_args(url.as_ref(), fields);
        let output = self.run_downloader(args).await?;

        if self.strict_metadata {
            parser::parse_metadata_strict(&output.stdout, fields)
        } else {
            Ok(parser::parse_metadata(&output.stdout, fields))
        }
    }

    /// Fetches the video resolutions available for a video, e.g. `["1080p", "720p"]`.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL of the video.
    ///
    /// # Errors
    ///
    /// This function will return an error if yt-dlp fails.
    pub async fn fetch_available_qualities(
        &self,
        url: impl AsRef<str> + Display,
    ) -> Result<Vec<String>> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Fetching available qualities for {}", url);

        let output = self.run_downloader(command::formats_args(url.as_ref())).await?;
        let qualities = parser::parse_qualities(&output.stdout);

        #[cfg(feature = "tracing")]
        tracing::debug!("Found qualities {:?} for {}", qualities, url);

        Ok(qualities)
    }

    /// Extracts the video ID of a watch URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL has no video ID, or if the ID holds anything
    /// other than ASCII letters, digits, `-` and `_`. The ID names the downloaded files.
    pub fn video_id(url: impl AsRef<str>) -> Result<String> {
        crate::utils::extract_video_id(url.as_ref())
            .filter(|id| {
                id.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            })
            .ok_or_else(|| Error::InvalidUrl(url.as_ref().to_string()))
    }
}
