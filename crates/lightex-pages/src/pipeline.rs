//! The batch conversion pipeline.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use lightex_render::{render_document, RenderOutcome, Renderer, TransientPair};

use crate::assembler::{PageAssembler, DEFAULT_PAGE_FILE};
use crate::locator::{DiscoveryError, Locator, SourceDocument};
use crate::report::Reporter;
use crate::templates::{PageAssets, TemplateEngine, TemplateError};

/// Configuration for a conversion run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for source documents
    pub root: PathBuf,

    /// File name of the page written beside each document
    pub page_file_name: String,

    /// Parent directory for per-document scratch files (system temp dir if unset)
    pub work_dir: Option<PathBuf>,

    /// Stylesheets and scripts referenced by every page
    pub assets: PageAssets,

    /// Custom page template replacing the built-in one
    pub template_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            page_file_name: DEFAULT_PAGE_FILE.to_string(),
            work_dir: None,
            assets: PageAssets::default(),
            template_path: None,
        }
    }
}

/// Step at which a document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the source document
    Read,
    /// Wrapping, running the renderer or collecting its output
    Render,
    /// Rendering or writing the page
    Assemble,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Read => "read",
            Stage::Render => "render",
            Stage::Assemble => "assemble",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// The renderer succeeded and the page was written.
    Assembled { page: PathBuf },

    /// The renderer rejected the document; no page was written.
    Rejected { code: Option<i32> },

    /// Something other than the renderer's verdict went wrong.
    Failed { stage: Stage, error: String },
}

impl DocumentStatus {
    /// Exit code reported by the renderer, if it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DocumentStatus::Assembled { .. } => Some(0),
            DocumentStatus::Rejected { code } => *code,
            DocumentStatus::Failed { .. } => None,
        }
    }
}

/// Outcome of one document, handed to the [`Reporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub document: SourceDocument,
    pub status: DocumentStatus,
}

/// Totals for a run. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub assembled: usize,
    pub rejected: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    fn record(&mut self, status: &DocumentStatus) {
        self.discovered += 1;
        match status {
            DocumentStatus::Assembled { .. } => self.assembled += 1,
            DocumentStatus::Rejected { .. } => self.rejected += 1,
            DocumentStatus::Failed { .. } => self.failed += 1,
        }
    }
}

/// Converts every document under a root, one at a time.
pub struct Pipeline<R> {
    config: PipelineConfig,
    renderer: R,
    assembler: PageAssembler,
}

impl<R: Renderer> Pipeline<R> {
    /// Create a pipeline. Fails only if a custom template cannot be loaded.
    pub fn new(config: PipelineConfig, renderer: R) -> Result<Self, TemplateError> {
        let templates = match &config.template_path {
            Some(path) => {
                tracing::info!("Using page template {}", path.display());
                TemplateEngine::from_file(path)?
            }
            None => TemplateEngine::new()?,
        };

        let assembler =
            PageAssembler::new(templates, config.assets.clone(), config.page_file_name.clone());

        Ok(Self {
            config,
            renderer,
            assembler,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Convert every document under the root.
    ///
    /// Each document produces exactly one report, in discovery order, before
    /// the next one is started. Only a root that cannot be enumerated is an error.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<RunSummary, DiscoveryError> {
        let start = Instant::now();
        let documents = Locator::new(&self.config.root).documents()?;

        tracing::info!(
            "Converting documents under {} with {}",
            self.config.root.display(),
            self.renderer.name()
        );

        let mut summary = RunSummary::default();
        for document in documents {
            let status = self.process(&document);
            summary.record(&status);

            let report = DocumentReport { document, status };
            if let Err(e) = reporter.report(&report) {
                tracing::warn!(
                    "Failed to report status for {}: {}",
                    report.document.path().display(),
                    e
                );
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Processed {} documents: {} assembled, {} rejected, {} failed in {}ms",
            summary.discovered,
            summary.assembled,
            summary.rejected,
            summary.failed,
            summary.duration_ms
        );

        Ok(summary)
    }

    /// Convert a single document. Never fails; every problem becomes a status.
    pub fn process(&self, document: &SourceDocument) -> DocumentStatus {
        let span = tracing::info_span!(
            "document",
            path = %document.path().display(),
            renderer = self.renderer.name()
        );
        let _enter = span.enter();

        let text = match fs::read_to_string(document.path()) {
            Ok(text) => text,
            Err(e) => return failed(Stage::Read, e),
        };

        let transient = match self.transient_pair() {
            Ok(pair) => pair,
            Err(e) => return failed(Stage::Render, e),
        };
        tracing::debug!("Scratch files in {}", transient.dir().display());

        let content = match render_document(&self.renderer, &transient, &text) {
            Ok(RenderOutcome::Success { content }) => content,
            Ok(RenderOutcome::Failure { code }) => {
                tracing::warn!("Renderer rejected document (exit code {:?})", code);
                return DocumentStatus::Rejected { code };
            }
            Err(e) => return failed(Stage::Render, e),
        };

        match self.assembler.assemble(document, &content) {
            Ok(page) => {
                tracing::debug!("Wrote {}", page.display());
                DocumentStatus::Assembled { page }
            }
            Err(e) => failed(Stage::Assemble, e),
        }
    }

    fn transient_pair(&self) -> std::io::Result<TransientPair> {
        match &self.config.work_dir {
            Some(dir) => TransientPair::new_in(dir),
            None => TransientPair::new(),
        }
    }
}

fn failed(stage: Stage, error: impl fmt::Display) -> DocumentStatus {
    tracing::warn!("Failed to {} document: {}", stage, error);
    DocumentStatus::Failed {
        stage,
        error: error.to_string(),
    }
}
