//! Scratch space for downloaded archives
//!
//! Bundles are saved to a staging directory and only then unpacked into the SDK home, so
//! a failed download never touches an existing `licenses` or `skins` directory. Staging
//! directories live under an absolute temp root even when `TMPDIR` is relative.

use std::env;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{ProvisionError, Result};

const STAGING_PREFIX: &str = "avd-setup-";

/// Absolute temp root; a relative `TMPDIR` falls back to the platform default
pub fn temp_dir_base() -> PathBuf {
    let dir = env::temp_dir();
    if dir.is_absolute() {
        return dir;
    }

    #[cfg(windows)]
    {
        env::var("TEMP")
            .or_else(|_| env::var("TMP"))
            .map(PathBuf::from)
            .ok()
            .filter(|p| p.is_absolute())
            .unwrap_or_else(|| PathBuf::from("C:\\Windows\\Temp"))
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp")
    }
}

/// Fresh staging directory, removed when dropped
pub fn staging_dir() -> Result<TempDir> {
    staging_dir_in(&temp_dir_base())
}

fn staging_dir_in(base: &Path) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(base)
        .map_err(|e| ProvisionError::file_write(base, &e))
}
