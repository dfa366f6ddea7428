//! Read config, fetch, verify, extract. Runs start to finish on the calling
//! thread; the first error ends the run.

use crate::config::{self, RunSettings};
use crate::error::Result;
use crate::extract;
use crate::fetcher::{CurlTransport, Fetcher, Transport};
use crate::progress::Console;
use std::io::Write;
use std::path::PathBuf;

/// What a successful run left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub archive: PathBuf,
    pub extracted: Vec<PathBuf>,
}

pub struct Pipeline<T, W: Write> {
    fetcher: Fetcher<T>,
    console: Console<W>,
}

impl<T: Transport, W: Write> Pipeline<T, W> {
    pub fn new(transport: T, console: Console<W>) -> Self {
        Self {
            fetcher: Fetcher::new(transport),
            console,
        }
    }

    pub fn run(&mut self, settings: &RunSettings) -> Result<RunReport> {
        let dataset = config::load_dataset(&settings.config_path, &settings.dataset)?;
        tracing::info!(dataset = %settings.dataset, url = %dataset.url, "config loaded");

        let archive = self
            .fetcher
            .fetch(&settings.data_dir, &dataset, &mut self.console)?;

        self.console.say_partial("Unzipping...");
        let extracted = extract::extract(&archive, &settings.data_dir)?;
        self.console.say("complete.");

        Ok(RunReport { archive, extracted })
    }

    pub fn transport(&self) -> &T {
        self.fetcher.transport()
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }
}

/// Run with the given settings over libcurl, printing to stdout.
pub fn run_with(settings: &RunSettings) -> Result<RunReport> {
    Pipeline::new(CurlTransport, Console::stdout()).run(settings)
}

/// Run with the default config file, dataset and data folder.
pub fn run() -> Result<RunReport> {
    run_with(&RunSettings::default())
}
