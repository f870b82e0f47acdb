//! Configuration file (`lightex.toml`) and command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use lightex_pages::{Asset, PageAssets, PipelineConfig, DEFAULT_PAGE_FILE};
use lightex_render::ProcessRenderer;
use serde::Deserialize;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lightex.toml";

/// Renderer location in a default LighTeX build tree.
const DEFAULT_RENDERER: &str = "./build/parse_program_to_html";

/// Format of the per-document status lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `<path> <exit-code>`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Configuration file structure (lightex.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    renderer: RendererConfig,
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    page: PageConfig,
}

#[derive(Debug, Deserialize)]
struct RendererConfig {
    #[serde(default = "default_program")]
    program: PathBuf,
    /// Arguments placed before the input and output paths
    #[serde(default)]
    args: Vec<String>,
    /// 0 waits forever
    #[serde(default)]
    timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            timeout_secs: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutputConfig {
    #[serde(default = "default_file_name")]
    file_name: String,
    #[serde(default)]
    format: Format,
    work_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            format: Format::default(),
            work_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct PageConfig {
    template: Option<PathBuf>,
    stylesheets: Option<Vec<Asset>>,
    scripts: Option<Vec<Asset>>,
}

fn default_program() -> PathBuf {
    PathBuf::from(DEFAULT_RENDERER)
}
fn default_file_name() -> String {
    DEFAULT_PAGE_FILE.to_string()
}

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub renderer: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub format: Option<Format>,
    pub work_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

/// Everything a run needs, after merging file and command line.
#[derive(Debug)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub renderer: ProcessRenderer,
    pub format: Format,
}

/// Load configuration.
///
/// An explicitly named file must exist. Without one, `lightex.toml` in the
/// working directory is used if present. A malformed file is always an error.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

impl ConfigFile {
    /// Merge with command-line overrides into run settings.
    pub fn into_settings(self, root: PathBuf, overrides: Overrides) -> Settings {
        let program = overrides.renderer.unwrap_or(self.renderer.program);
        let timeout_secs = overrides.timeout_secs.unwrap_or(self.renderer.timeout_secs);
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let defaults = PageAssets::default();
        let assets = PageAssets {
            stylesheets: self.page.stylesheets.unwrap_or(defaults.stylesheets),
            scripts: self.page.scripts.unwrap_or(defaults.scripts),
        };

        Settings {
            pipeline: PipelineConfig {
                root,
                page_file_name: self.output.file_name,
                work_dir: overrides.work_dir.or(self.output.work_dir),
                assets,
                template_path: overrides.template.or(self.page.template),
            },
            renderer: ProcessRenderer::new(program)
                .with_args(self.renderer.args)
                .with_timeout(timeout),
            format: overrides.format.unwrap_or(self.output.format),
        }
    }
}
