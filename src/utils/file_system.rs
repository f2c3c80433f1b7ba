//! Tools for working with the file system.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncReadExt;

/// Creates a new file at the given destination, truncating any existing content.
///
/// # Arguments
///
/// * `destination` - The path to create the file at.
pub async fn create_file(destination: impl AsRef<Path>) -> Result<File> {
    let mut open_options = OpenOptions::new();
    open_options.read(true);
    open_options.write(true);
    open_options.create(true);
    open_options.truncate(true);

    #[cfg(not(target_os = "windows"))]
    {
        open_options.mode(0o755);
    }

    let file = open_options.open(destination).await?;
    Ok(file)
}

/// Creates a new directory at the given destination.
/// If the directory already exists, nothing is done.
///
/// # Arguments
///
/// * `destination` - The path to create the directory at.
pub fn create_dir(destination: impl AsRef<Path>) -> Result<()> {
    std::fs::create_dir_all(destination)?;
    Ok(())
}

/// Creates the parent directory of the given destination.
/// If the parent directory already exists, nothing is done.
///
/// # Arguments
///
/// * `destination` - The path to create the parent directory for.
pub fn create_parent_dir(destination: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = destination.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    } else {
        std::fs::create_dir_all(destination.as_ref())?;
    }

    Ok(())
}

/// Sets the executable bit on the given file.
///
/// # Arguments
///
/// * `executable` - The path to the executable file.
#[cfg(not(target_os = "windows"))]
pub fn set_executable(executable: impl AsRef<Path>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(executable.as_ref())?.permissions();

    perms.set_mode(0o755);
    std::fs::set_permissions(executable, perms)?;

    Ok(())
}

/// No-op implementation for Windows, as Windows doesn't use executable bits.
#[cfg(target_os = "windows")]
pub fn set_executable(_executable: impl AsRef<Path>) -> Result<()> {
    Ok(())
}

/// Computes the lowercase hex SHA-256 digest of a file.
///
/// # Arguments
///
/// * `path` - The file to hash.
pub async fn sha256_file(path: impl AsRef<Path>) -> Result<String> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 64 * 1024];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }

        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Removes a temporary file and logs any errors.
/// Does not propagate errors to avoid interrupting the execution flow.
///
/// # Arguments
///
/// * `file_path` - The path of the file to delete
///
/// # Returns
///
/// `true` if the file was successfully deleted, `false` otherwise
pub async fn remove_temp_file(file_path: impl AsRef<Path> + std::fmt::Debug) -> bool {
    let result = tokio::fs::remove_file(&file_path).await;

    #[cfg(feature = "tracing")]
    if let Err(ref e) = result {
        tracing::warn!("Failed to remove temporary file {:?}: {}", file_path, e);
    }

    result.is_ok()
}
