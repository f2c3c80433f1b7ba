//! Conversion of downloaded files with ffmpeg.

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::model::AudioBitrate;
use crate::utils;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The video codec of converted videos.
pub const VIDEO_CODEC: &str = "libx264";
/// The audio codec of converted videos.
pub const AUDIO_CODEC: &str = "aac";

/// Runs ffmpeg to turn an intermediate download into the requested format.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcoder {
    /// The path to the ffmpeg binary.
    pub executable: PathBuf,
    /// The timeout for a conversion, `None` waits until it finishes.
    pub timeout: Option<Duration>,
}

impl Transcoder {
    pub fn new(executable: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    /// Arguments extracting the audio of `src` into `dst` at the given bitrate.
    pub fn audio_args(src: &Path, dst: &Path, bitrate: AudioBitrate) -> Result<Vec<String>> {
        let (src, dst) = (path_str(src)?, path_str(dst)?);

        Ok(utils::to_owned(vec![
            "-y",
            "-i",
            src,
            "-vn",
            "-b:a",
            bitrate.as_str(),
            dst,
        ]))
    }

    /// Arguments re-encoding `src` into `dst` with H.264 video and AAC audio.
    pub fn video_args(src: &Path, dst: &Path) -> Result<Vec<String>> {
        let (src, dst) = (path_str(src)?, path_str(dst)?);

        Ok(utils::to_owned(vec![
            "-y",
            "-i",
            src,
            "-c:v",
            VIDEO_CODEC,
            "-c:a",
            AUDIO_CODEC,
            dst,
        ]))
    }

    /// Converts `src` into an audio-only file at `dst` and returns `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConversionFailed`] if ffmpeg cannot be run or fails.
    pub async fn to_audio(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        bitrate: AudioBitrate,
    ) -> Result<PathBuf> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Converting {} to audio at {}",
            src.as_ref().display(),
            bitrate
        );

        let args = Self::audio_args(src.as_ref(), dst.as_ref(), bitrate)?;
        self.run(args).await?;

        Ok(dst.as_ref().to_path_buf())
    }

    /// Converts `src` into an H.264/AAC video at `dst` and returns `dst`.
    /// The conversion is awaited like the audio one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConversionFailed`] if ffmpeg cannot be run or fails.
    pub async fn to_video(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<PathBuf> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Converting {} to video", src.as_ref().display());

        let args = Self::video_args(src.as_ref(), dst.as_ref())?;
        self.run(args).await?;

        Ok(dst.as_ref().to_path_buf())
    }

    async fn run(&self, args: Vec<String>) -> Result<()> {
        let executor = Executor {
            executable_path: self.executable.clone(),
            timeout: self.timeout,
            args,
        };

        executor.execute().await.map_err(|e| match e {
            Error::ExternalTool { stderr, .. } => Error::ConversionFailed(stderr.trim().to_string()),
            Error::Timeout(timeout) => Error::Timeout(timeout),
            other => Error::ConversionFailed(other.to_string()),
        })?;

        Ok(())
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::Path(format!("Invalid path: {}", path.display())))
}
