//! The values exchanged with yt-dlp: requested fields, parsed metadata and quality presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod options;

/// A field that can be requested from yt-dlp with `--print`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VideoField {
    /// The video identifier.
    Id,
    /// The URL of the video page, printed by yt-dlp as `original_url`.
    Url,
    /// The video title.
    Title,
    /// The duration in seconds.
    Duration,
    /// The duration formatted as `m:ss` or `h:mm:ss`.
    DurationString,

    /// Any other yt-dlp field. It is sent to the tool, but its value is not parsed.
    Other(String),
}

impl VideoField {
    /// The name of the field as written by the caller.
    pub fn name(&self) -> &str {
        match self {
            VideoField::Id => "id",
            VideoField::Url => "url",
            VideoField::Title => "title",
            VideoField::Duration => "duration",
            VideoField::DurationString => "duration_string",
            VideoField::Other(name) => name,
        }
    }

    /// The name of the field as understood by yt-dlp.
    pub fn as_arg(&self) -> &str {
        match self {
            VideoField::Url => "original_url",
            other => other.name(),
        }
    }
}

impl From<&str> for VideoField {
    fn from(name: &str) -> Self {
        match name {
            "id" => VideoField::Id,
            "url" => VideoField::Url,
            "title" => VideoField::Title,
            "duration" => VideoField::Duration,
            "duration_string" => VideoField::DurationString,
            other => VideoField::Other(other.to_string()),
        }
    }
}

impl From<String> for VideoField {
    fn from(name: String) -> Self {
        VideoField::from(name.as_str())
    }
}

impl From<VideoField> for String {
    fn from(field: VideoField) -> Self {
        field.name().to_string()
    }
}

impl fmt::Display for VideoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The metadata of a video, populated only for the fields that were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Duration as a formatted string, e.g. `4:30`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_string: Option<String>,
}

impl fmt::Display for VideoMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VideoMetadata(id={:?}, title={:?}, duration={:?})",
            self.id, self.title, self.duration
        )
    }
}

/// Error returned when a quality or bitrate label is not one of the presets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown preset: {}", self.0)
    }
}

impl std::error::Error for UnknownPreset {}

/// The bitrates an audio download can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AudioBitrate {
    #[serde(rename = "48k")]
    K48,
    #[serde(rename = "128k")]
    K128,
    #[default]
    #[serde(rename = "192k")]
    K192,
    #[serde(rename = "256k")]
    K256,
    #[serde(rename = "320k")]
    K320,
}

impl AudioBitrate {
    /// Every supported bitrate, lowest first.
    pub const ALL: [AudioBitrate; 5] = [
        AudioBitrate::K48,
        AudioBitrate::K128,
        AudioBitrate::K192,
        AudioBitrate::K256,
        AudioBitrate::K320,
    ];

    /// The label passed to ffmpeg, e.g. `192k`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioBitrate::K48 => "48k",
            AudioBitrate::K128 => "128k",
            AudioBitrate::K192 => "192k",
            AudioBitrate::K256 => "256k",
            AudioBitrate::K320 => "320k",
        }
    }
}

impl fmt::Display for AudioBitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AudioBitrate {
    type Err = UnknownPreset;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bitrate| bitrate.as_str() == label)
            .ok_or_else(|| UnknownPreset(label.to_string()))
    }
}

/// The resolutions a video download can be requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "144p")]
    P144,
    #[serde(rename = "240p")]
    P240,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "1440p")]
    P1440,
    #[serde(rename = "2160p")]
    P2160,
}

impl VideoQuality {
    /// Every supported quality, lowest first.
    pub const ALL: [VideoQuality; 8] = [
        VideoQuality::P144,
        VideoQuality::P240,
        VideoQuality::P360,
        VideoQuality::P480,
        VideoQuality::P720,
        VideoQuality::P1080,
        VideoQuality::P1440,
        VideoQuality::P2160,
    ];

    /// The label of the quality, e.g. `720p`.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::P144 => "144p",
            VideoQuality::P240 => "240p",
            VideoQuality::P360 => "360p",
            VideoQuality::P480 => "480p",
            VideoQuality::P720 => "720p",
            VideoQuality::P1080 => "1080p",
            VideoQuality::P1440 => "1440p",
            VideoQuality::P2160 => "2160p",
        }
    }

    /// The frame height, i.e. the label without its `p` suffix.
    pub fn height(&self) -> &'static str {
        self.as_str().trim_end_matches('p')
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoQuality {
    type Err = UnknownPreset;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|quality| quality.as_str() == label)
            .ok_or_else(|| UnknownPreset(label.to_string()))
    }
}
