//! The conversion command.

use std::io::{self, Write};

use anyhow::{Context, Result};
use lightex_pages::{JsonReporter, Pipeline, RunSummary, TextReporter};

use crate::config::{Format, Settings};

/// Run a conversion, printing status lines to stdout.
pub fn run(settings: Settings) -> Result<RunSummary> {
    let stdout = io::stdout();
    run_with_output(settings, stdout.lock())
}

/// Run a conversion, writing status lines to `out`.
pub fn run_with_output<W: Write>(settings: Settings, out: W) -> Result<RunSummary> {
    tracing::debug!(
        "Renderer: {}, root: {}",
        settings.renderer.program().display(),
        settings.pipeline.root.display()
    );

    let pipeline =
        Pipeline::new(settings.pipeline, settings.renderer).context("Failed to load page template")?;

    let summary = match settings.format {
        Format::Text => pipeline.run(&mut TextReporter::new(out)),
        Format::Json => pipeline.run(&mut JsonReporter::new(out)),
    }
    .context("Failed to enumerate documents")?;

    Ok(summary)
}
