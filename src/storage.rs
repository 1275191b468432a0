//! Output directory layout and snapshot file naming.
//!
//! Snapshots land in `<root>/<YYYYmmdd_HHMMSS>/`, one directory per run,
//! with file names of the form `<case>_<YYYYmmdd_HHMMSS>_<count>.jpg`.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default root directory, relative to the working directory.
pub const DEFAULT_ROOT: &str = "Pictures";

/// Extension of saved snapshots.
pub const IMAGE_EXTENSION: &str = "jpg";

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A local timestamp rendered as `YYYYmmdd_HHMMSS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStamp(String);

impl SessionStamp {
    /// Stamp for the current local time.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime(time: &DateTime<Local>) -> Self {
        Self(time.format(STAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filesystem errors surfaced while preparing output.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to resolve working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("Failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' exists but is not a directory", path.display())]
    NotADirectory { path: PathBuf },
}

/// Resolve the output root: absolute paths are used as-is, relative ones
/// are anchored at the current working directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf, StorageError> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(StorageError::WorkingDir)?;
    Ok(cwd.join(root))
}

/// Create `<root>/<stamp>` (and any missing parents) and return it.
///
/// An existing directory is reused, so calling this twice with the same
/// stamp yields the same path.
pub fn create_output_dir(root: &Path, stamp: &SessionStamp) -> Result<PathBuf, StorageError> {
    let path = root.join(stamp.as_str());
    if path.exists() && !path.is_dir() {
        return Err(StorageError::NotADirectory { path });
    }
    std::fs::create_dir_all(&path).map_err(|source| StorageError::CreateDir {
        path: path.clone(),
        source,
    })?;
    log::info!("Saving snapshots under {}", path.display());
    Ok(path)
}

/// Check that `part` can go into a file name without leaving the session
/// directory: non-empty, no path separators, no `..`, no NUL.
pub fn check_name_part(part: &str) -> Result<(), String> {
    if part.is_empty() {
        return Err("must not be empty".to_string());
    }
    if part.contains(['/', '\\', '\0']) {
        return Err(format!("'{}' must not contain path separators", part));
    }
    if part.contains("..") {
        return Err(format!("'{}' must not contain '..'", part));
    }
    Ok(())
}

/// Label used both as the file stem and as the watermark text.
pub fn image_label(test_case_name: &str, stamp: &SessionStamp, count: &str) -> String {
    format!("{}_{}_{}", test_case_name, stamp, count)
}

/// File name for a snapshot: `<label>.jpg`.
pub fn image_file_name(test_case_name: &str, stamp: &SessionStamp, count: &str) -> String {
    format!(
        "{}.{}",
        image_label(test_case_name, stamp, count),
        IMAGE_EXTENSION
    )
}
