//! LighTeX batch converter - renders every problem statement under a
//! directory into a standalone HTML page.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod convert;

use config::{Format, Overrides};

#[derive(Parser)]
#[command(name = "lightex-batch")]
#[command(about = "Render LighTeX problem statements into standalone HTML pages")]
#[command(version)]
pub struct Cli {
    /// Directory scanned recursively for .tex documents
    root: PathBuf,

    /// Path to a lightex.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Renderer executable, invoked as `<renderer> <input> <output>`
    #[arg(short, long)]
    renderer: Option<PathBuf>,

    /// Kill the renderer after this many seconds (0 waits forever)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Status line format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Directory for per-document scratch files
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Custom page template
    #[arg(long)]
    template: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Status lines own stdout; logs go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = config::load_config(cli.config.as_deref())?.into_settings(
        cli.root,
        Overrides {
            renderer: cli.renderer,
            timeout_secs: cli.timeout,
            format: cli.format,
            work_dir: cli.work_dir,
            template: cli.template,
        },
    );

    convert::run(settings)?;

    Ok(())
}
