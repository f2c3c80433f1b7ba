//! Parsers for the plain-text output of yt-dlp.

use crate::command::unique_fields;
use crate::error::{Error, Result};
use crate::model::{VideoField, VideoMetadata};
use regex::Regex;
use std::sync::LazyLock;

static QUALITY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+p").expect("quality pattern is valid"));

/// Splits the output into trimmed, non-empty lines.
fn output_lines(raw_output: &str) -> Vec<&str> {
    raw_output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Reads the leading digits of a value, so `212` and `212.0` both give 212.
fn leading_integer(value: &str) -> Option<u64> {
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());

    value[..end].parse().ok()
}

/// Maps the output of `--print` onto the requested fields.
///
/// Line `i` holds the value of the `i`-th requested field, duplicates removed. Text fields
/// without a line are set to an empty string. `duration` keeps only its leading digits, and is
/// left unset if there are none. Fields other than the known ones are ignored.
///
/// # Examples
///
/// ```rust
/// # use ytdlp_bridge::parser::parse_metadata;
/// # use ytdlp_bridge::model::VideoField;
/// let output = "abc123\nNever Gonna Give You Up\n212\n";
/// let fields = [VideoField::Id, VideoField::Title, VideoField::Duration];
///
/// let metadata = parse_metadata(output, &fields);
/// assert_eq!(metadata.id.as_deref(), Some("abc123"));
/// assert_eq!(metadata.duration, Some(212));
/// ```
pub fn parse_metadata(raw_output: &str, fields: &[VideoField]) -> VideoMetadata {
    let lines = output_lines(raw_output);
    let mut metadata = VideoMetadata::default();

    for (index, field) in unique_fields(fields).iter().enumerate() {
        let value = lines.get(index).copied().unwrap_or_default();

        match field {
            VideoField::Id => metadata.id = Some(value.to_string()),
            VideoField::Url => metadata.url = Some(value.to_string()),
            VideoField::Title => metadata.title = Some(value.to_string()),
            VideoField::Duration => metadata.duration = leading_integer(value),
            VideoField::DurationString => metadata.duration_string = Some(value.to_string()),
            VideoField::Other(_name) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("Ignoring unparsed field {}", _name);
            }
        }
    }

    metadata
}

/// Same as [`parse_metadata`], but fails if the number of lines differs from the number of
/// requested fields.
///
/// # Errors
///
/// Returns [`Error::FieldCountMismatch`] when the counts differ.
pub fn parse_metadata_strict(raw_output: &str, fields: &[VideoField]) -> Result<VideoMetadata> {
    let expected = unique_fields(fields).len();
    let actual = output_lines(raw_output).len();

    if expected != actual {
        return Err(Error::FieldCountMismatch { expected, actual });
    }

    Ok(parse_metadata(raw_output, fields))
}

/// Extracts the video resolutions listed by `-F`, e.g. `["1080p", "720p"]`.
///
/// Only lines with more than two columns whose description mentions `video` are considered.
/// Labels keep the order in which they first appear.
pub fn parse_qualities(raw_output: &str) -> Vec<String> {
    let mut qualities: Vec<String> = Vec::new();

    for line in raw_output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() <= 2 {
            continue;
        }

        let description = parts[1..].join(" ");
        if !description.contains("video") {
            continue;
        }

        if let Some(label) = QUALITY_LABEL.find(&description) {
            let label = label.as_str();
            if !qualities.iter().any(|quality| quality == label) {
                qualities.push(label.to_string());
            }
        }
    }

    qualities
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATS: &str = r#"[youtube] Extracting URL: https://www.youtube.com/watch?v=abc123
[info] Available formats for abc123:
ID  EXT   RESOLUTION FPS CH |   FILESIZE   TBR PROTO | VCODEC          VBR ACODEC      ABR ASR MORE INFO
---------------------------------------------------------------------------------------------------------
140 m4a   audio only      2 |    3.28MiB  129k https | audio only          mp4a.40.2  129k 44k medium, m4a_dash
251 webm  audio only      2 |    3.42MiB  135k https | audio only          opus       135k 48k medium, webm_dash
160 mp4   256x144     30    |    1.09MiB   43k https | avc1.4d400c     43k video only              144p, mp4_dash
278 webm  256x144     30    |    1.63MiB   64k https | vp9             64k video only              144p, webm_dash
247 webm  1280x720    30    |   17.05MiB  673k https | vp9            673k video only              720p, webm_dash
136 mp4   1280x720    30    |   26.36MiB 1040k https | avc1.4d401f   1040k video only              720p, mp4_dash
248 webm  1920x1080   30    |   31.87MiB 1258k https | vp9           1258k video only              1080p, webm_dash
"#;

    #[test]
    fn qualities_are_deduplicated_in_order() {
        assert_eq!(parse_qualities(FORMATS), vec!["144p", "720p", "1080p"]);
    }

    #[test]
    fn audio_only_lines_are_skipped() {
        let output = "247 webm 1280x720 720p 673k video only\n140 m4a audio only";

        assert_eq!(parse_qualities(output), vec!["720p"]);
    }

    #[test]
    fn short_lines_are_skipped() {
        assert!(parse_qualities("video 720p\n\n").is_empty());
    }

    #[test]
    fn video_line_without_label_is_skipped() {
        assert!(parse_qualities("399 mp4 video only, no label").is_empty());
    }

    #[test]
    fn metadata_maps_lines_positionally() {
        let output = "  abc123  \n\nhttps://www.youtube.com/watch?v=abc123\nA title\n212\n3:32\n";
        let fields = [
            VideoField::Id,
            VideoField::Url,
            VideoField::Title,
            VideoField::Duration,
            VideoField::DurationString,
        ];

        let metadata = parse_metadata(output, &fields);

        assert_eq!(
            metadata,
            VideoMetadata {
                id: Some("abc123".into()),
                url: Some("https://www.youtube.com/watch?v=abc123".into()),
                title: Some("A title".into()),
                duration: Some(212),
                duration_string: Some("3:32".into()),
            }
        );
    }

    #[test]
    fn missing_lines_default_to_empty() {
        let fields = [VideoField::Title, VideoField::Id, VideoField::DurationString];
        let metadata = parse_metadata("Only a title\n", &fields);

        assert_eq!(metadata.title.as_deref(), Some("Only a title"));
        assert_eq!(metadata.id.as_deref(), Some(""));
        assert_eq!(metadata.duration_string.as_deref(), Some(""));
        assert_eq!(metadata.url, None);
    }

    #[test]
    fn duration_keeps_leading_digits() {
        let fields = [VideoField::Duration];

        assert_eq!(parse_metadata("212.0", &fields).duration, Some(212));
        assert_eq!(parse_metadata("NA", &fields).duration, None);
        assert_eq!(parse_metadata("", &fields).duration, None);
    }

    #[test]
    fn unknown_fields_consume_their_line() {
        let fields = [VideoField::from("uploader"), VideoField::Title];
        let metadata = parse_metadata("Rick Astley\nA title\n", &fields);

        assert_eq!(metadata.title.as_deref(), Some("A title"));
        assert_eq!(metadata, VideoMetadata {
            title: Some("A title".into()),
            ..Default::default()
        });
    }

    #[test]
    fn duplicate_fields_share_one_line() {
        let fields = [VideoField::Id, VideoField::Id, VideoField::Title];
        let metadata = parse_metadata("abc123\nA title\n", &fields);

        assert_eq!(metadata.id.as_deref(), Some("abc123"));
        assert_eq!(metadata.title.as_deref(), Some("A title"));
    }

    #[test]
    fn strict_parsing_rejects_count_mismatch() {
        let fields = [VideoField::Id, VideoField::Title];

        match parse_metadata_strict("abc123\n", &fields) {
            Err(Error::FieldCountMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let metadata = parse_metadata_strict("abc123\nA title\n", &fields).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("A title"));
    }
}
