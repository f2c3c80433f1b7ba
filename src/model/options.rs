//! Options for media downloads, merged over defaults at construction.

use crate::model::{AudioBitrate, VideoQuality};
use std::path::{Path, PathBuf};

/// The extension yt-dlp is asked to write intermediate downloads with.
pub const INTERMEDIATE_EXTENSION: &str = "webm";

/// Returns the default destination directory, `download` under the working directory.
pub fn default_destination() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_default()
        .join("download")
}

/// Options for [`YtDlp::download_audio`](crate::YtDlp::download_audio).
///
/// # Examples
///
/// ```rust
/// # use ytdlp_bridge::model::AudioBitrate;
/// # use ytdlp_bridge::model::options::AudioDownload;
/// let options = AudioDownload::new("https://www.youtube.com/watch?v=abc123", AudioBitrate::K192)
///     .with_destination("music")
///     .with_verbose(false);
///
/// assert!(!options.verbose);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDownload {
    /// The watch URL of the video.
    pub url: String,
    /// The bitrate of the produced mp3.
    pub bitrate: AudioBitrate,
    /// A directory, or the path of the final file if it has an extension.
    pub destination: PathBuf,
    /// Log progress at info level instead of debug.
    pub verbose: bool,
    /// Keep the downloaded `.webm` after conversion.
    pub keep_intermediate: bool,
}

/// Options for [`YtDlp::download_video`](crate::YtDlp::download_video).
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDownload {
    /// The watch URL of the video.
    pub url: String,
    /// The resolution to download.
    pub quality: VideoQuality,
    /// A directory, or the path of the final file if it has an extension.
    pub destination: PathBuf,
    /// Log progress at info level instead of debug.
    pub verbose: bool,
    /// Keep the downloaded `.webm` after conversion.
    pub keep_intermediate: bool,
}

impl AudioDownload {
    pub fn new(url: impl Into<String>, bitrate: AudioBitrate) -> Self {
        Self {
            url: url.into(),
            bitrate,
            destination: default_destination(),
            verbose: true,
            keep_intermediate: false,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_keep_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }
}

impl VideoDownload {
    pub fn new(url: impl Into<String>, quality: VideoQuality) -> Self {
        Self {
            url: url.into(),
            quality,
            destination: default_destination(),
            verbose: true,
            keep_intermediate: false,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_keep_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }
}

/// Where a media download is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPaths {
    /// The directory holding both files.
    pub directory: PathBuf,
    /// The file yt-dlp writes, `<id>.webm`.
    pub intermediate: PathBuf,
    /// The file ffmpeg produces.
    pub output: PathBuf,
}

impl MediaPaths {
    /// Resolves the paths for a download.
    ///
    /// A destination without extension is a directory and the output is `<id>.<extension>`
    /// inside it. Otherwise the destination is the output file itself.
    ///
    /// # Arguments
    ///
    /// * `destination` - The directory or output file requested by the caller.
    /// * `video_id` - The identifier of the video.
    /// * `extension` - The extension of the converted file, e.g. `mp3`.
    pub fn resolve(destination: impl AsRef<Path>, video_id: &str, extension: &str) -> Self {
        let destination = destination.as_ref();
        let is_directory = destination.extension().is_none();

        let directory = if is_directory {
            destination.to_path_buf()
        } else {
            destination
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        };

        let output = if is_directory {
            directory.join(format!("{}.{}", video_id, extension))
        } else {
            destination.to_path_buf()
        };

        Self {
            intermediate: directory.join(format!("{}.{}", video_id, INTERMEDIATE_EXTENSION)),
            directory,
            output,
        }
    }
}
