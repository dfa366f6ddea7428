//! MD5 integrity check for downloaded archives.

use crate::error::{Error, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute the MD5 of a file and return the digest as lowercase hex.
/// Reads in chunks; the digest is the same as hashing the whole content at once.
pub fn md5_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).map_err(|e| Error::fs(path, e))?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(|e| Error::fs(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// True if the file's MD5 equals `expected`. Case-sensitive: `expected`
/// must be lowercase hex to ever match.
pub fn checksum_matches(path: &Path, expected: &str) -> Result<bool> {
    let actual = md5_path(path)?;
    Ok(actual == expected)
}
