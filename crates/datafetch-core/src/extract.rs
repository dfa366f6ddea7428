//! ZIP extraction into the data folder.
//!
//! Every entry is written below the destination with its archive-relative
//! path; existing files are overwritten. Names that would leave the
//! destination lose their root and `..` components instead.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

#[cfg(windows)]
const SEPARATORS: &[char] = &['/', '\\'];
#[cfg(not(windows))]
const SEPARATORS: &[char] = &['/'];

/// Unpack `archive_path` into `dest`. Returns the paths of the files written
/// (directory entries are created but not listed).
pub fn extract(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let archive_err = |source| Error::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(|e| Error::fs(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(archive_err)?;
    tracing::debug!(
        archive = %archive_path.display(),
        entries = archive.len(),
        "extracting"
    );

    let mut written = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_err)?;
        let Some(relative) = sanitize_entry_name(entry.name()) else {
            tracing::warn!(entry = entry.name(), "skipping archive entry with empty path");
            continue;
        };
        if relative.as_os_str() != entry.name().trim_end_matches('/') {
            tracing::warn!(entry = entry.name(), to = %relative.display(), "rewrote unsafe entry name");
        }
        let outpath = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| Error::fs(&outpath, e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
        }
        let mut out = File::create(&outpath).map_err(|e| Error::fs(&outpath, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| copy_error(archive_path, &outpath, e))?;

        // Keep recorded mode bits but never write a file the next run cannot overwrite.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                let mode = (mode & 0o7777) | 0o200;
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))
                    .map_err(|e| Error::fs(&outpath, e))?;
            }
        }

        written.push(outpath);
    }

    tracing::info!(
        archive = %archive_path.display(),
        files = written.len(),
        "extraction complete"
    );
    Ok(written)
}

/// Relative path for an entry name: root, empty, `.` and `..` components
/// are dropped. None when nothing is left.
fn sanitize_entry_name(name: &str) -> Option<PathBuf> {
    let path: PathBuf = name
        .split(SEPARATORS)
        .filter(|c| !c.is_empty() && *c != "." && *c != "..")
        .collect();
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Bad compressed data surfaces from the entry reader as `InvalidData`;
/// that is an archive problem, anything else is the destination's fault.
fn copy_error(archive_path: &Path, outpath: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::InvalidData {
        Error::Archive {
            path: archive_path.to_path_buf(),
            source: zip::result::ZipError::Io(e),
        }
    } else {
        Error::fs(outpath, e)
    }
}
