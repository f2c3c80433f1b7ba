//! The installer for the yt-dlp binary.

use crate::error::{Error, Result};
use crate::fetcher::{Fetcher, ProgressCallback};
use crate::utils::file_system;
use crate::utils::platform::Platform;
use derive_more::Constructor;
use std::fmt;
use std::path::{Path, PathBuf};

/// The base URL of the latest yt-dlp release assets.
pub const RELEASE_BASE_URL: &str = "https://github.com/yt-dlp/yt-dlp/releases/latest/download";

/// The name of the checksum file published with every release.
pub const CHECKSUMS_ASSET: &str = "SHA2-256SUMS";

/// The executables used to download and convert media.
///
/// # Examples
///
/// ```rust
/// # use ytdlp_bridge::fetcher::deps::Executables;
/// # use std::path::PathBuf;
/// let executables = Executables::new(PathBuf::from("bin/yt-dlp"), PathBuf::from("ffmpeg"));
/// assert_eq!(executables.transcoder, PathBuf::from("ffmpeg"));
/// ```
#[derive(Constructor, Clone, Debug, PartialEq)]
pub struct Executables {
    /// The path to the yt-dlp binary.
    pub downloader: PathBuf,
    /// The path to the ffmpeg binary, or its name if it is on `PATH`.
    pub transcoder: PathBuf,
}

/// Options for installing yt-dlp.
#[derive(Clone)]
pub struct ProvisionOptions {
    /// The directory the binary is written to.
    pub destination: PathBuf,
    /// The platform tag to install for. Defaults to the host platform.
    pub platform: Option<String>,
    /// The base URL the release assets are fetched from.
    pub base_url: String,
    /// Compare the binary with the published SHA-256 checksum.
    pub verify_checksum: bool,
    /// Called with the downloaded size and the total size.
    pub progress: Option<ProgressCallback>,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            destination: std::env::current_dir().unwrap_or_default().join("bin"),
            platform: None,
            base_url: RELEASE_BASE_URL.to_string(),
            verify_checksum: false,
            progress: None,
        }
    }
}

impl fmt::Debug for ProvisionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionOptions")
            .field("destination", &self.destination)
            .field("platform", &self.platform)
            .field("base_url", &self.base_url)
            .field("verify_checksum", &self.verify_checksum)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl ProvisionOptions {
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.progress = Some(std::sync::Arc::new(callback));
        self
    }
}

/// A release asset selected for a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// The name of the asset in the release.
    pub name: &'static str,
    /// The file name the binary is saved under.
    pub file_name: &'static str,
}

impl fmt::Display for ReleaseAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReleaseAsset: name={}, file={};", self.name, self.file_name)
    }
}

impl ReleaseAsset {
    /// Selects the asset for the given platform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] for anything but Windows, Linux and macOS.
    pub fn for_platform(platform: &Platform) -> Result<Self> {
        match platform {
            Platform::Windows => Ok(Self {
                name: "yt-dlp.exe",
                file_name: "yt-dlp.exe",
            }),
            Platform::Linux => Ok(Self {
                name: "yt-dlp_linux",
                file_name: "yt-dlp",
            }),
            Platform::Mac => Ok(Self {
                name: "yt-dlp_macos",
                file_name: "yt-dlp",
            }),
            Platform::Unknown(tag) => Err(Error::UnsupportedPlatform(tag.clone())),
        }
    }

    /// The download URL of the asset under the given base URL.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.name)
    }
}

/// Installs the yt-dlp binary.
///
/// # Examples
///
/// ```rust,no_run
/// # use ytdlp_bridge::fetcher::deps::{BinaryInstaller, ProvisionOptions};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = ProvisionOptions::default().with_destination("bin");
/// let path = BinaryInstaller::new(options).install().await?;
/// println!("yt-dlp installed at {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Constructor, Clone, Debug)]
pub struct BinaryInstaller {
    /// The installation options.
    pub options: ProvisionOptions,
}

impl BinaryInstaller {
    /// The platform to install for, the requested one or the host.
    pub fn platform(&self) -> Platform {
        match &self.options.platform {
            Some(tag) => Platform::from_tag(tag),
            None => Platform::detect(),
        }
    }

    /// Downloads the yt-dlp binary and returns its path.
    ///
    /// The platform is validated before anything touches the network or the disk.
    /// An existing binary at the destination is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] for an unknown platform, [`Error::DownloadFailed`]
    /// if the binary cannot be fetched or written, and [`Error::ChecksumMismatch`] if the
    /// checksum verification is enabled and fails.
    pub async fn install(&self) -> Result<PathBuf> {
        let platform = self.platform();
        let asset = ReleaseAsset::for_platform(&platform)?;
        let url = asset.url(&self.options.base_url);

        file_system::create_dir(&self.options.destination).map_err(|e| {
            Error::DownloadFailed(format!(
                "cannot create {}: {}",
                self.options.destination.display(),
                e
            ))
        })?;

        let executable = self.options.destination.join(asset.file_name);
        let staged = self
            .options
            .destination
            .join(format!("{}.part", asset.file_name));

        #[cfg(feature = "tracing")]
        tracing::info!("Starting downloading yt-dlp for {}", platform);
        #[cfg(feature = "tracing")]
        tracing::info!("Downloading {}", url);

        // The binary only replaces `executable` once it is complete and verified.
        if let Err(e) = self.stage(&asset, &url, &staged).await {
            file_system::remove_temp_file(&staged).await;
            return Err(e);
        }

        tokio::fs::rename(&staged, &executable).await.map_err(|e| {
            Error::DownloadFailed(format!("cannot move binary to {}: {}", executable.display(), e))
        })?;

        #[cfg(feature = "tracing")]
        tracing::info!("Destination: {}", executable.display());

        Ok(executable)
    }

    /// Downloads the asset to `staged`, marks it executable and verifies it when enabled.
    async fn stage(&self, asset: &ReleaseAsset, url: &str, staged: &Path) -> Result<()> {
        Fetcher::new(url)
            .with_progress_callback(self.options.progress.clone())
            .fetch_asset(staged)
            .await
            .map_err(|e| match e {
                Error::DownloadFailed(reason) => Error::DownloadFailed(reason),
                other => Error::DownloadFailed(format!("{}: {}", url, other)),
            })?;

        file_system::set_executable(staged).map_err(|e| {
            Error::DownloadFailed(format!("cannot mark {} executable: {}", staged.display(), e))
        })?;

        if self.options.verify_checksum {
            self.verify(asset, staged).await?;
        }

        Ok(())
    }

    /// Compares the downloaded binary with the checksum published for the asset.
    async fn verify(&self, asset: &ReleaseAsset, executable: &Path) -> Result<()> {
        let checksums_url = format!(
            "{}/{}",
            self.options.base_url.trim_end_matches('/'),
            CHECKSUMS_ASSET
        );

        let checksums = Fetcher::new(&checksums_url)
            .fetch_text()
            .await
            .map_err(|e| Error::DownloadFailed(format!("{}: {}", checksums_url, e)))?;

        let expected = find_checksum(&checksums, asset.name).ok_or_else(|| {
            Error::DownloadFailed(format!("no checksum published for {}", asset.name))
        })?;
        let actual = file_system::sha256_file(executable).await?;

        if !expected.eq_ignore_ascii_case(&actual) {
            return Err(Error::ChecksumMismatch { expected, actual });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Checksum verified for {}", asset.name);

        Ok(())
    }
}

/// Finds the checksum of an asset in a `sha256sum`-style listing.
fn find_checksum(listing: &str, asset_name: &str) -> Option<String> {
    listing.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let name = parts.next()?.trim_start_matches('*');

        (name == asset_name).then(|| digest.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn assets_per_platform() {
        let windows = ReleaseAsset::for_platform(&Platform::Windows).unwrap();
        assert_eq!(
            windows.url(RELEASE_BASE_URL),
            "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp.exe"
        );
        assert_eq!(windows.file_name, "yt-dlp.exe");

        let linux = ReleaseAsset::for_platform(&Platform::Linux).unwrap();
        assert_eq!(linux.name, "yt-dlp_linux");
        assert_eq!(linux.file_name, "yt-dlp");

        let mac = ReleaseAsset::for_platform(&Platform::Mac).unwrap();
        assert_eq!(mac.name, "yt-dlp_macos");
        assert_eq!(mac.file_name, "yt-dlp");
    }

    #[test]
    fn checksum_lookup() {
        let listing = format!("{}  yt-dlp_linux\nffff  yt-dlp.exe\n", HELLO_SHA256);

        assert_eq!(
            find_checksum(&listing, "yt-dlp_linux").as_deref(),
            Some(HELLO_SHA256)
        );
        assert_eq!(find_checksum(&listing, "yt-dlp_macos"), None);
    }

    #[tokio::test]
    async fn unsupported_platform_fails_before_any_request() {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("bin");

        let options = ProvisionOptions::default()
            .with_destination(&destination)
            .with_platform("freebsd")
            .with_base_url(mock_server.uri());

        let result = BinaryInstaller::new(options).install().await;

        assert!(matches!(result, Err(Error::UnsupportedPlatform(tag)) if tag == "freebsd"));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn installs_platform_binary() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/yt-dlp.exe"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("bin");
        let options = ProvisionOptions::default()
            .with_destination(&destination)
            .with_platform("win32")
            .with_base_url(mock_server.uri());

        let path = BinaryInstaller::new(options).install().await.unwrap();

        assert_eq!(path, destination.join("yt-dlp.exe"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn existing_binary_is_overwritten() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/yt-dlp_linux"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("yt-dlp"), b"an older, longer binary").unwrap();

        let options = ProvisionOptions::default()
            .with_destination(dir.path())
            .with_platform("linux")
            .with_base_url(mock_server.uri());

        let path = BinaryInstaller::new(options).install().await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn network_failure_is_download_failed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let options = ProvisionOptions::default()
            .with_destination(dir.path())
            .with_platform("darwin")
            .with_base_url(mock_server.uri());

        let result = BinaryInstaller::new(options).install().await;
        assert!(matches!(result, Err(Error::DownloadFailed(_))));
    }

    #[tokio::test]
    async fn checksum_verification() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/yt-dlp_linux"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello".to_vec()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/SHA2-256SUMS"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("{}  yt-dlp_linux\n", HELLO_SHA256)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad/yt-dlp_linux"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tampered".to_vec()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad/SHA2-256SUMS"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("{}  yt-dlp_linux\n", HELLO_SHA256)),
            )
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let options = ProvisionOptions::default()
            .with_destination(dir.path().join("good"))
            .with_platform("linux")
            .with_base_url(mock_server.uri())
            .with_checksum(true);
        BinaryInstaller::new(options).install().await.unwrap();

        let options = ProvisionOptions::default()
            .with_destination(dir.path().join("bad"))
            .with_platform("linux")
            .with_base_url(format!("{}/bad", mock_server.uri()))
            .with_checksum(true);
        let result = BinaryInstaller::new(options).install().await;

        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
        assert!(!dir.path().join("bad").join("yt-dlp").exists());
        assert!(!dir.path().join("bad").join("yt-dlp.part").exists());
    }

    #[tokio::test]
    async fn rejected_binary_keeps_previous_install() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/yt-dlp_linux"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tampered".to_vec()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/SHA2-256SUMS"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("{}  yt-dlp_linux\n", HELLO_SHA256)),
            )
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let installed = dir.path().join("yt-dlp");
        std::fs::write(&installed, b"previous release").unwrap();

        let options = ProvisionOptions::default()
            .with_destination(dir.path())
            .with_platform("linux")
            .with_base_url(mock_server.uri())
            .with_checksum(true);
        let result = BinaryInstaller::new(options).install().await;

        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
        assert_eq!(std::fs::read(&installed).unwrap(), b"previous release");
        assert!(!dir.path().join("yt-dlp.part").exists());
    }
}
