//! Argument lists for the yt-dlp invocations.
//!
//! Every builder returns owned arguments, ready for an [`Executor`](crate::executor::Executor).
//! Nothing goes through a shell, so URLs and paths are never quoted.

use crate::model::{VideoField, VideoQuality};
use crate::utils;
use std::path::Path;

/// Deduplicates the requested fields, keeping the first occurrence of each.
pub fn unique_fields(fields: &[VideoField]) -> Vec<VideoField> {
    let mut unique: Vec<VideoField> = Vec::with_capacity(fields.len());

    for field in fields {
        if !unique.contains(field) {
            unique.push(field.clone());
        }
    }

    unique
}

/// Formats the requested fields for `--print`, e.g. `id,original_url,title`.
///
/// # Examples
///
/// ```rust
/// # use ytdlp_bridge::command::field_string;
/// # use ytdlp_bridge::model::VideoField;
/// let fields = [VideoField::Id, VideoField::Url, VideoField::Id];
/// assert_eq!(field_string(&fields), "id,original_url");
/// ```
pub fn field_string(fields: &[VideoField]) -> String {
    unique_fields(fields)
        .iter()
        .map(VideoField::as_arg)
        .collect::<Vec<_>>()
        .join(",")
}

/// Arguments printing the requested fields without downloading the media.
pub fn metadata_args(url: &str, fields: &[VideoField]) -> Vec<String> {
    let fields = field_string(fields);

    utils::to_owned(vec!["--print", fields.as_str(), "--skip-download", url])
}

/// Arguments listing every available format without downloading the media.
pub fn formats_args(url: &str) -> Vec<String> {
    utils::to_owned(vec!["-F", "--skip-download", url])
}

/// Arguments downloading the best audio stream to `output`.
pub fn audio_args(url: &str, output: &Path) -> Vec<String> {
    let output = output.to_string_lossy();

    utils::to_owned(vec!["-f", "bestaudio", "-o", &*output, url])
}

/// The format selector for a webm video of the given height, merged with the best webm audio.
pub fn video_selector(quality: VideoQuality) -> String {
    let height = quality.height();

    format!(
        "bestaudio[ext=webm]+bestvideo[height={height}][ext=webm]/best[height={height}][ext=webm]"
    )
}

/// Arguments downloading the video in the given quality to `output`.
pub fn video_args(url: &str, quality: VideoQuality, output: &Path) -> Vec<String> {
    let selector = video_selector(quality);
    let output = output.to_string_lossy();

    utils::to_owned(vec!["-f", selector.as_str(), "-o", &*output, url])
}
