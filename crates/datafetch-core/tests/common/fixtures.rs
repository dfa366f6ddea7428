//! ZIP fixture and catalog helpers shared by the integration tests.

use md5::{Digest, Md5};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

pub const ENTRIES: [(&str, &[u8]); 2] = [
    ("specimen_01.csv", b"strain,stress\n0.000,0.0\n0.001,210.5\n0.002,418.9\n"),
    ("specimens/metadata.txt", b"material: S355\nsamples: 1\n"),
];

/// Two-entry ZIP built in memory.
pub fn zip_fixture() -> Vec<u8> {
    let mut zw = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in ENTRIES {
        zw.start_file(name, SimpleFileOptions::default()).unwrap();
        zw.write_all(body).unwrap();
    }
    zw.finish().unwrap().into_inner()
}

pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

/// Write a catalog with a single `tensile_tests` entry and return its path.
pub fn write_catalog(dir: &Path, url: &str, name: &str, md5: Option<&str>) -> PathBuf {
    let mut toml = format!("[tensile_tests]\nurl = \"{}\"\nname = \"{}\"\n", url, name);
    if let Some(md5) = md5 {
        toml.push_str(&format!("md5 = \"{}\"\n", md5));
    }
    let path = dir.join("zenodo_urls.toml");
    std::fs::write(&path, toml).unwrap();
    path
}

/// Assert every fixture entry sits under `data_dir` with identical bytes.
pub fn assert_fixture_extracted(data_dir: &Path) {
    for (name, body) in ENTRIES {
        let got = std::fs::read(data_dir.join(name))
            .unwrap_or_else(|e| panic!("{} missing: {}", name, e));
        assert_eq!(got, body, "content of {}", name);
    }
}
