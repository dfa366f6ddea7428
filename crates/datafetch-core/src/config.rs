//! Dataset catalog: a TOML file mapping dataset keys to download descriptors.
//!
//! ```toml
//! [tensile_tests]
//! url = "https://zenodo.org/record/1234/files/data.zip"
//! name = "data.zip"
//! md5 = "0123456789abcdef0123456789abcdef"   # optional
//! ```
//!
//! The catalog itself is not validated; only the entry the caller asks for
//! has to match [`DatasetDescriptor`].

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "zenodo_urls.toml";
/// Catalog entry fetched when none is given.
pub const DEFAULT_DATASET: &str = "tensile_tests";
/// Folder the archive is downloaded to and unpacked in.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Whole parsed catalog: nested string-keyed mapping.
pub type Catalog = toml::Table;

/// One downloadable archive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetDescriptor {
    /// Source location.
    pub url: String,
    /// File name inside the data folder.
    pub name: String,
    /// Expected lowercase hex MD5 of the file; skip verification if absent.
    #[serde(default)]
    pub md5: Option<String>,
}

impl DatasetDescriptor {
    /// Extract the entry named `key` from an already parsed catalog.
    pub fn from_catalog(catalog: &Catalog, key: &str) -> Result<Self> {
        let entry = catalog.get(key).ok_or_else(|| Error::MissingDataset {
            key: key.to_string(),
        })?;
        entry
            .clone()
            .try_into()
            .map_err(|source| Error::InvalidDataset {
                key: key.to_string(),
                source,
            })
    }
}

/// Read and parse the catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let data = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the catalog at `path` and return its `key` entry.
pub fn load_dataset(path: &Path, key: &str) -> Result<DatasetDescriptor> {
    let catalog = load_catalog(path)?;
    let dataset = DatasetDescriptor::from_catalog(&catalog, key)?;
    tracing::debug!(config = %path.display(), key, ?dataset, "loaded dataset descriptor");
    Ok(dataset)
}

/// Where the pipeline reads its catalog and writes its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub config_path: PathBuf,
    pub dataset: String,
    pub data_dir: PathBuf,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            dataset: DEFAULT_DATASET.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}
