//! Media downloads: yt-dlp fetches the stream, ffmpeg converts it.

use crate::YtDlp;
use crate::command;
use crate::error::Result;
use crate::model::options::{AudioDownload, MediaPaths, VideoDownload};
use crate::utils::file_system;
use std::path::{Path, PathBuf};

/// Logs a progress message at info level when verbose, debug otherwise.
#[cfg(feature = "tracing")]
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        let _ = $verbose;
    };
}

impl YtDlp {
    /// Downloads the audio of a video and converts it to mp3.
    ///
    /// The best audio stream is downloaded as `<id>.webm` next to the output, converted at the
    /// requested bitrate, then removed unless `keep_intermediate` is set.
    ///
    /// # Errors
    ///
    /// This function will return an error if the URL has no video ID, if yt-dlp fails, or if
    /// the conversion fails.
    ///
    /// # Examples
    ///
    /// ```rust, no_run
    /// # use ytdlp_bridge::{YtDlp, AudioBitrate, AudioDownload};
    /// # use ytdlp_bridge::fetcher::deps::Executables;
    /// # use std::path::PathBuf;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let executables = Executables::new(PathBuf::from("bin/yt-dlp"), PathBuf::from("ffmpeg"));
    /// let fetcher = YtDlp::new(executables);
    ///
    /// let options = AudioDownload::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ", AudioBitrate::K192)
    ///     .with_destination("music");
    /// let path = fetcher.download_audio(options).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_audio(&self, options: AudioDownload) -> Result<PathBuf> {
        let video_id = Self::video_id(&options.url)?;
        let paths = MediaPaths::resolve(&options.destination, &video_id, "mp3");
        file_system::create_dir(&paths.directory)?;

        progress!(options.verbose, "Starting download...");
        progress!(options.verbose, "Video URL - {}", options.url);

        self.run_downloader(command::audio_args(&options.url, &paths.intermediate))
            .await?;

        progress!(
            options.verbose,
            "Converting {} to mp3 with bitrate {}",
            paths.intermediate.display(),
            options.bitrate
        );

        let output = self
            .transcoder()
            .to_audio(&paths.intermediate, &paths.output, options.bitrate)
            .await?;

        Self::clean_intermediate(&paths.intermediate, options.keep_intermediate).await;

        progress!(
            options.verbose,
            "Conversion successful! MP3 saved to {}",
            output.display()
        );

        Ok(output)
    }

    /// Downloads a video in the requested quality and converts it to mp4.
    ///
    /// The webm streams are downloaded as `<id>.webm` next to the output, re-encoded with H.264
    /// and AAC, then removed unless `keep_intermediate` is set. The conversion is awaited before
    /// returning.
    ///
    /// # Errors
    ///
    /// This function will return an error if the URL has no video ID, if yt-dlp fails, or if
    /// the conversion fails.
    pub async fn download_video(&self, options: VideoDownload) -> Result<PathBuf> {
        let video_id = Self::video_id(&options.url)?;
        let paths = MediaPaths::resolve(&options.destination, &video_id, "mp4");
        file_system::create_dir(&paths.directory)?;

        progress!(options.verbose, "Starting download...");
        progress!(options.verbose, "Video URL - {}", options.url);

        self.run_downloader(command::video_args(
            &options.url,
            options.quality,
            &paths.intermediate,
        ))
        .await?;

        progress!(
            options.verbose,
            "Converting {} to {}",
            paths.intermediate.display(),
            paths.output.display()
        );

        let output = self
            .transcoder()
            .to_video(&paths.intermediate, &paths.output)
            .await?;

        Self::clean_intermediate(&paths.intermediate, options.keep_intermediate).await;

        progress!(
            options.verbose,
            "Conversion successful! MP4 saved to {}",
            output.display()
        );

        Ok(output)
    }

    async fn clean_intermediate(intermediate: &Path, keep: bool) {
        if keep {
            return;
        }

        file_system::remove_temp_file(intermediate).await;
    }
}
