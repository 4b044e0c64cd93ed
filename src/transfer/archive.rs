//! ZIP extraction

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{ProvisionError, Result};

/// Local file header signature
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";
/// End-of-central-directory signature, the first bytes of an empty archive
const EMPTY_ZIP_MAGIC: &[u8; 4] = b"PK\x05\x06";

pub trait Unpacker {
    /// Extract every entry of `archive` below `dest` and return the written files
    fn unzip(&self, archive: &Path, dest: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Default)]
pub struct ZipUnpacker;

impl Unpacker for ZipUnpacker {
    fn unzip(&self, archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
        let archive_failed = |reason: String| ProvisionError::ArchiveFailed {
            archive: archive.display().to_string(),
            reason,
        };

        let file = File::open(archive).map_err(|e| ProvisionError::file_read(archive, &e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| archive_failed(e.to_string()))?;
        fs::create_dir_all(dest).map_err(|e| ProvisionError::file_write(dest, &e))?;

        let mut extracted = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| archive_failed(e.to_string()))?;

            let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
                tracing::warn!("Skipping unsafe archive entry: {}", entry.name());
                continue;
            };
            let target = dest.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| ProvisionError::file_write(&target, &e))?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ProvisionError::file_write(parent, &e))?;
            }

            let mut out =
                File::create(&target).map_err(|e| ProvisionError::file_write(&target, &e))?;
            io::copy(&mut entry, &mut out).map_err(|e| ProvisionError::file_write(&target, &e))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&target, fs::Permissions::from_mode(mode))
                    .map_err(|e| ProvisionError::file_write(&target, &e))?;
            }

            extracted.push(target);
        }

        tracing::debug!(
            "Extracted {} files from {} into {}",
            extracted.len(),
            archive.display(),
            dest.display()
        );
        Ok(extracted)
    }
}

/// Whether the file at `path` starts with a ZIP signature
pub fn is_zip_payload(path: &Path) -> Result<bool> {
    let mut file = File::open(path).map_err(|e| ProvisionError::file_read(path, &e))?;
    let mut magic = [0u8; 4];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == ZIP_MAGIC || &magic == EMPTY_ZIP_MAGIC),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(ProvisionError::file_read(path, &e)),
    }
}
