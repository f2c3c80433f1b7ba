//! Utility functions and types used throughout the application.

use url::Url;

pub mod file_system;
pub mod platform;

/// A macro to mimic the ternary operator in Rust.
#[macro_export]
macro_rules! ternary {
    ($condition:expr, $true:expr, $false:expr) => {
        if $condition { $true } else { $false }
    };
}

/// Returns the name of the executable for the current platform.
///
/// # Arguments
///
/// * `name` - The name of the executable, without any extension.
pub fn find_executable(name: impl AsRef<str>) -> String {
    let name = name.as_ref();

    ternary!(
        cfg!(target_os = "windows"),
        format!("{}.exe", name),
        name.to_string()
    )
}

/// Converts a vector of string slices to a vector of owned strings.
pub fn to_owned(vec: Vec<impl AsRef<str>>) -> Vec<String> {
    vec.into_iter().map(|s| s.as_ref().to_string()).collect()
}

/// Extracts the video ID from a YouTube watch URL.
///
/// Returns `None` if the URL cannot be parsed or has no `v` query parameter.
///
/// # Examples
///
/// ```rust
/// # use ytdlp_bridge::utils::extract_video_id;
/// let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// assert_eq!(id.as_deref(), Some("dQw4w9WgXcQ"));
///
/// assert_eq!(extract_video_id("not a url"), None);
/// ```
pub fn extract_video_id(video_url: impl AsRef<str>) -> Option<String> {
    let parsed = Url::parse(video_url.as_ref()).ok()?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
