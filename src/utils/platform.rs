//! Platform detection.

use std::fmt;
use std::str::FromStr;

/// Represents the operating system a yt-dlp release is built for.
///
/// The tags follow the `win32` / `linux` / `darwin` naming used by yt-dlp consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Platform {
    /// The Windows operating system.
    Windows,
    /// The Linux operating system.
    Linux,
    /// The macOS operating system.
    Mac,

    /// An unknown operating system.
    Unknown(String),
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(tag))
    }
}

impl Platform {
    /// Detects the current platform where the program is running.
    pub fn detect() -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!("Detecting current platform");

        let os = std::env::consts::OS;

        #[cfg(feature = "tracing")]
        tracing::debug!("Detected platform: {}", os);

        match os {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::Mac,
            _ => Platform::Unknown(os.to_string()),
        }
    }

    /// Parses a platform tag such as `win32`, `linux` or `darwin`.
    /// Any other tag is kept as [`Platform::Unknown`].
    pub fn from_tag(tag: impl AsRef<str>) -> Self {
        match tag.as_ref() {
            "win32" => Platform::Windows,
            "linux" => Platform::Linux,
            "darwin" => Platform::Mac,
            other => Platform::Unknown(other.to_string()),
        }
    }

    /// Returns the tag of this platform.
    pub fn tag(&self) -> &str {
        match self {
            Platform::Windows => "win32",
            Platform::Linux => "linux",
            Platform::Mac => "darwin",
            Platform::Unknown(os) => os,
        }
    }

    /// Whether a yt-dlp release exists for this platform.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unknown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_tags_are_supported() {
        for tag in ["win32", "linux", "darwin"] {
            let platform = Platform::from_tag(tag);
            assert!(platform.is_supported());
            assert_eq!(platform.tag(), tag);
        }

        for tag in ["freebsd", "windows", "macos", "", "Linux"] {
            assert!(!Platform::from_tag(tag).is_supported());
        }
    }

    #[test]
    fn detected_host_maps_to_tag() {
        let platform = Platform::detect();

        match std::env::consts::OS {
            "linux" => assert_eq!(platform, Platform::Linux),
            "macos" => assert_eq!(platform, Platform::Mac),
            "windows" => assert_eq!(platform, Platform::Windows),
            other => assert_eq!(platform, Platform::Unknown(other.to_string())),
        }
    }
}
