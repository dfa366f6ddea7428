//! Default command: fetch, verify and unpack the configured dataset.

use anyhow::{Context, Result};
use datafetch_core::config::RunSettings;
use datafetch_core::pipeline;

pub fn run_pipeline(settings: &RunSettings) -> Result<()> {
    let report = pipeline::run_with(settings)
        .with_context(|| format!("dataset {:?}", settings.dataset))?;
    tracing::info!(
        archive = %report.archive.display(),
        files = report.extracted.len(),
        "run finished"
    );
    Ok(())
}
