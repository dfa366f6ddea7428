//! CLI for datafetch. With no arguments it fetches the default dataset.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use datafetch_core::config::RunSettings;
use std::path::PathBuf;

use commands::{run_checksum, run_pipeline};

/// Download, verify and unpack the dataset archive named in the catalog.
#[derive(Debug, Parser)]
#[command(name = "datafetch")]
#[command(about = "Download, verify and unpack a dataset archive", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Overrides for the fixed defaults (`zenodo_urls.toml`, `tensile_tests`, `data`).
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Dataset catalog (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Catalog entry to fetch.
    #[arg(long, value_name = "KEY")]
    pub dataset: Option<String>,

    /// Folder to download into and unpack in.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

impl RunArgs {
    pub fn into_settings(self) -> RunSettings {
        let defaults = RunSettings::default();
        RunSettings {
            config_path: self.config.unwrap_or(defaults.config_path),
            dataset: self.dataset.unwrap_or(defaults.dataset),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the MD5 of a file, for the `md5` field of a catalog entry.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        tracing::debug!("parsed args: {:?}", cli);

        match cli.command {
            Some(CliCommand::Checksum { path }) => run_checksum(&path)?,
            None => run_pipeline(&cli.run.into_settings())?,
        }

        Ok(())
    }
}
