#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;
use ytdlp_bridge::fetcher::deps::Executables;
use ytdlp_bridge::{
    AudioBitrate, AudioDownload, Error, VideoDownload, VideoField, VideoQuality, YtDlp,
};

const URL: &str = "https://www.youtube.com/watch?v=abc123";

const FAKE_YT_DLP: &str = r#"#!/bin/sh
out=""
mode="download"
url=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  case "$arg" in
    --print) mode="print" ;;
    -F) mode="formats" ;;
    --update) mode="update" ;;
  esac
  prev="$arg"
  url="$arg"
done
case "$url" in
  *unavailable*) echo "ERROR: [youtube] unavailable: Video unavailable" >&2; exit 1 ;;
esac
case "$mode" in
  print) printf 'abc123\nNever Gonna Give You Up\n212\n' ;;
  formats)
    echo "[info] Available formats for abc123:"
    echo "140 m4a   audio only      2 | 3.28MiB  129k https | audio only mp4a.40.2 129k"
    echo "247 webm  1280x720    30    | 17.05MiB 673k https | vp9 673k video only 720p, webm_dash"
    echo "248 webm  1920x1080   30    | 31.87MiB 1258k https | vp9 1258k video only 1080p, webm_dash"
    echo "136 mp4   1280x720    30    | 26.36MiB 1040k https | avc1.4d401f 1040k video only 720p, mp4_dash"
    ;;
  update) echo "yt-dlp is up to date" ;;
  *)
    echo "WARNING: informational output on stderr" >&2
    printf '%s' "$*" > "$out"
    ;;
esac
"#;

const FAKE_FFMPEG: &str = r#"#!/bin/sh
src=""
prev=""
last=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then src="$arg"; fi
  prev="$arg"
  last="$arg"
done
case "$src" in
  *broken*) echo "Invalid data found when processing input" >&2; exit 1 ;;
esac
if [ ! -f "$src" ]; then
  echo "$src: No such file or directory" >&2
  exit 1
fi
printf '%s' "$*" > "$last"
"#;

/// Writes the fake binaries once, before any test spawns a process.
fn executables() -> Executables {
    static BIN_DIR: OnceLock<TempDir> = OnceLock::new();

    let dir = BIN_DIR.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir.path().join("yt-dlp"), FAKE_YT_DLP);
        write_script(&dir.path().join("ffmpeg"), FAKE_FFMPEG);
        dir
    });

    Executables::new(dir.path().join("yt-dlp"), dir.path().join("ffmpeg"))
}

fn write_script(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn fetcher() -> YtDlp {
    YtDlp::new(executables())
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn fetch_metadata_parses_printed_fields() {
    let fields = [VideoField::Id, VideoField::Title, VideoField::Duration];

    let metadata = fetcher().fetch_metadata(URL, &fields).await.unwrap();

    assert_eq!(metadata.id.as_deref(), Some("abc123"));
    assert_eq!(metadata.title.as_deref(), Some("Never Gonna Give You Up"));
    assert_eq!(metadata.duration, Some(212));
    assert_eq!(metadata.url, None);
    assert_eq!(metadata.duration_string, None);
}

#[tokio::test]
async fn strict_metadata_rejects_extra_lines() {
    let mut fetcher = fetcher();
    fetcher.with_strict_metadata(true);

    let result = fetcher
        .fetch_metadata(URL, &[VideoField::Id, VideoField::Title])
        .await;

    assert!(matches!(
        result,
        Err(Error::FieldCountMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[tokio::test]
async fn fetch_available_qualities_lists_video_resolutions() {
    let qualities = fetcher().fetch_available_qualities(URL).await.unwrap();

    assert_eq!(qualities, vec!["720p", "1080p"]);
}

#[tokio::test]
async fn download_audio_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("music");

    let options = AudioDownload::new(URL, AudioBitrate::K192)
        .with_destination(&destination)
        .with_verbose(false);
    let path = fetcher().download_audio(options).await.unwrap();

    assert_eq!(path, destination.join("abc123.mp3"));
    assert!(!destination.join("abc123.webm").exists());

    let conversion = read(&path);
    assert!(conversion.contains("-vn -b:a 192k"), "{conversion}");
    assert!(conversion.contains("abc123.webm"), "{conversion}");
}

#[tokio::test]
async fn download_audio_can_keep_intermediate() {
    let dir = tempfile::tempdir().unwrap();

    let options = AudioDownload::new(URL, AudioBitrate::K320)
        .with_destination(dir.path())
        .with_keep_intermediate(true);
    let path = fetcher().download_audio(options).await.unwrap();

    let intermediate = dir.path().join("abc123.webm");
    assert!(intermediate.exists());
    assert!(read(&intermediate).starts_with("-f bestaudio -o "));
    assert!(read(&path).contains("-b:a 320k"));
}

#[tokio::test]
async fn download_video_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("clips").join("rick.mp4");

    let options = VideoDownload::new(URL, VideoQuality::P1080)
        .with_destination(&destination)
        .with_keep_intermediate(true);
    let path = fetcher().download_video(options).await.unwrap();

    assert_eq!(path, destination);

    let download = read(dir.path().join("clips").join("abc123.webm"));
    assert!(download.contains("bestvideo[height=1080][ext=webm]"), "{download}");

    let conversion = read(&path);
    assert!(conversion.contains("-c:v libx264 -c:a aac"), "{conversion}");
}

#[tokio::test]
async fn invalid_url_fails_before_running_anything() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("never-created");

    let options = AudioDownload::new("https://youtu.be/abc123", AudioBitrate::K128)
        .with_destination(&destination);
    let result = fetcher().download_audio(options).await;

    assert!(matches!(result, Err(Error::InvalidUrl(_))));
    assert!(!destination.exists());
}

#[tokio::test]
async fn traversing_video_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("a").join("music");
    let outside = dir.path().join("escaped.webm");
    std::fs::write(&outside, b"unrelated").unwrap();

    let options = AudioDownload::new(
        "https://www.youtube.com/watch?v=../../escaped",
        AudioBitrate::K192,
    )
    .with_destination(&destination);
    let result = fetcher().download_audio(options).await;

    assert!(matches!(result, Err(Error::InvalidUrl(_))));
    assert!(!destination.exists());
    assert_eq!(read(&outside), "unrelated");
    assert!(!dir.path().join("escaped.mp3").exists());
}

#[tokio::test]
async fn downloader_failure_carries_stderr() {
    let dir = tempfile::tempdir().unwrap();

    let options = VideoDownload::new(
        "https://www.youtube.com/watch?v=unavailable",
        VideoQuality::P720,
    )
    .with_destination(dir.path());
    let result = fetcher().download_video(options).await;

    match result {
        Err(Error::ExternalTool { code, stderr, .. }) => {
            assert_eq!(code, 1);
            assert!(stderr.contains("Video unavailable"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn conversion_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let destination: PathBuf = dir.path().join("broken");

    let options = AudioDownload::new(URL, AudioBitrate::K48).with_destination(&destination);
    let result = fetcher().download_audio(options).await;

    match result {
        Err(Error::ConversionFailed(message)) => {
            assert_eq!(message, "Invalid data found when processing input");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn update_downloader_succeeds() {
    fetcher().update_downloader().await.unwrap();
}
