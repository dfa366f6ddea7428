//! Error type shared by every stage of the pipeline.
//!
//! All errors are fatal: nothing is retried or contained locally, each one
//! propagates up to the process boundary.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse category of an [`Error`], used by callers and tests that only care
/// about which stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Integrity,
    Archive,
    Filesystem,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("malformed config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config has no dataset entry named {key:?}")]
    MissingDataset { key: String },

    #[error("dataset entry {key:?} is invalid: {source}")]
    InvalidDataset {
        key: String,
        source: toml::de::Error,
    },

    #[error("GET {url} failed: {source}")]
    Transport { url: String, source: curl::Error },

    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },

    #[error(
        "MD5 does not match for {} (expected {expected}, got {actual}): file is corrupt. \
         Delete the file and retry the download.",
        .path.display()
    )]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("invalid archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("{}: {source}", .path.display())]
    Filesystem { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigRead { .. }
            | Error::ConfigParse { .. }
            | Error::MissingDataset { .. }
            | Error::InvalidDataset { .. } => ErrorKind::Config,
            Error::Transport { .. } | Error::Http { .. } => ErrorKind::Transport,
            Error::Integrity { .. } => ErrorKind::Integrity,
            Error::Archive { .. } => ErrorKind::Archive,
            Error::Filesystem { .. } => ErrorKind::Filesystem,
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}
