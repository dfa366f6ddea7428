//! Conditional download of a dataset archive into the data folder.
//!
//! A file already present at the target path is never downloaded again; if
//! the dataset carries an MD5, it is verified either way.

use crate::checksum;
use crate::config::DatasetDescriptor;
use crate::error::{Error, Result};
use crate::progress::{Console, Progress};
use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str;

/// Moves the bytes at `url` into the file at `dest`.
pub trait Transport {
    /// Stream `url` to `dest`, calling `progress` after each chunk.
    /// Returns the number of bytes written.
    fn download(&self, url: &str, dest: &Path, progress: &mut dyn Progress) -> Result<u64>;
}

/// Blocking single-GET transport on libcurl.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

const MAX_REDIRECTS: u32 = 10;

impl Transport for CurlTransport {
    fn download(&self, url: &str, dest: &Path, progress: &mut dyn Progress) -> Result<u64> {
        let transport_err = |source| Error::Transport {
            url: url.to_string(),
            source,
        };

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(transport_err)?;
        easy.follow_location(true).map_err(transport_err)?;
        easy.max_redirections(MAX_REDIRECTS).map_err(transport_err)?;
        // Error statuses abort before any body is written, so no file is created.
        easy.fail_on_error(true).map_err(transport_err)?;

        let total: Cell<Option<u64>> = Cell::new(None);
        let written = Cell::new(0u64);
        let write_error: RefCell<Option<io::Error>> = RefCell::new(None);
        let mut file: Option<File> = None;

        let result = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(line) = str::from_utf8(data) {
                        match parse_header_line(line) {
                            HeaderLine::Status => total.set(None),
                            HeaderLine::ContentLength(n) => total.set(Some(n)),
                            HeaderLine::Other => {}
                        }
                    }
                    true
                })
                .map_err(transport_err)?;
            transfer
                .write_function(|data| {
                    if file.is_none() {
                        match File::create(dest) {
                            Ok(f) => file = Some(f),
                            Err(e) => {
                                *write_error.borrow_mut() = Some(e);
                                return Ok(0); // abort transfer
                            }
                        }
                    }
                    let Some(out) = file.as_mut() else {
                        return Ok(0);
                    };
                    if let Err(e) = out.write_all(data) {
                        tracing::warn!("write to {} failed: {}", dest.display(), e);
                        *write_error.borrow_mut() = Some(e);
                        return Ok(0);
                    }
                    let done = written.get() + data.len() as u64;
                    written.set(done);
                    progress.record(done, total.get());
                    Ok(data.len())
                })
                .map_err(transport_err)?;
            transfer.perform()
        };

        if let Some(e) = write_error.into_inner() {
            return Err(Error::fs(dest, e));
        }
        if let Err(e) = result {
            if e.is_http_returned_error() {
                let code = easy.response_code().unwrap_or(0);
                return Err(Error::Http {
                    url: url.to_string(),
                    code,
                });
            }
            return Err(transport_err(e));
        }

        let code = easy.response_code().map_err(transport_err)?;
        if !(200..300).contains(&code) {
            return Err(Error::Http {
                url: url.to_string(),
                code,
            });
        }

        // Empty body: nothing triggered the lazy create.
        match file {
            Some(mut f) => f.flush().map_err(|e| Error::fs(dest, e))?,
            None => {
                File::create(dest).map_err(|e| Error::fs(dest, e))?;
            }
        }
        Ok(written.get())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum HeaderLine {
    /// Start of a response (a redirect hop or the final one).
    Status,
    ContentLength(u64),
    Other,
}

fn parse_header_line(line: &str) -> HeaderLine {
    let line = line.trim();
    if line.starts_with("HTTP/") {
        return HeaderLine::Status;
    }
    if let Some((name, value)) = line.split_once(':') {
        if name.trim().eq_ignore_ascii_case("content-length") {
            if let Ok(n) = value.trim().parse::<u64>() {
                return HeaderLine::ContentLength(n);
            }
        }
    }
    HeaderLine::Other
}

/// Places datasets in a local folder using a [`Transport`].
pub struct Fetcher<T> {
    transport: T,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Make sure `dataset` is present (and valid, if it has an MD5) under
    /// `data_folder`, and return its local path.
    pub fn fetch<W: Write>(
        &self,
        data_folder: &Path,
        dataset: &DatasetDescriptor,
        console: &mut Console<W>,
    ) -> Result<PathBuf> {
        if !data_folder.is_dir() {
            // Single level only: a missing parent is an error.
            fs::create_dir(data_folder).map_err(|e| Error::fs(data_folder, e))?;
            tracing::debug!("created data folder {}", data_folder.display());
        }

        let local_path = data_folder.join(&dataset.name);
        if local_path.exists() {
            tracing::info!(
                "{} already present, skipping download",
                local_path.display()
            );
        } else {
            tracing::info!(url = %dataset.url, dest = %local_path.display(), "downloading");
            console.begin_progress(format!("Downloading file \"{}\"", dataset.name));
            let res = self.transport.download(&dataset.url, &local_path, console);
            console.finish_progress();
            let bytes = res?;
            tracing::info!(bytes, "download finished");
        }

        if let Some(expected) = dataset.md5.as_deref() {
            verify(&local_path, expected)?;
            console.say("MD5 validated. Download complete.");
        }

        Ok(local_path)
    }
}

fn verify(path: &Path, expected: &str) -> Result<()> {
    if !checksum::checksum_matches(path, expected)? {
        // Mismatch is fatal; hash again only to report the digest.
        let actual = checksum::md5_path(path)?;
        tracing::warn!(path = %path.display(), %expected, %actual, "MD5 mismatch");
        return Err(Error::Integrity {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    tracing::debug!(path = %path.display(), "MD5 validated");
    Ok(())
}
