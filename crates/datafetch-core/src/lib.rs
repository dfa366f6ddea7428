//! Download a dataset archive named in a TOML catalog, verify its MD5 and
//! unpack it into a local folder.

pub mod checksum;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod logging;
pub mod pipeline;
pub mod progress;

pub use error::{Error, ErrorKind, Result};
