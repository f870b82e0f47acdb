//! Batch conversion of LighTeX problem statements into standalone HTML pages.
//!
//! Finds every `.tex` document under a root directory, renders each one through
//! a [`lightex_render::Renderer`], and writes a `lightex.html` page next to it.
//! A failing document never stops the run; only an unreadable root does.

pub mod assembler;
pub mod locator;
pub mod pipeline;
pub mod report;
pub mod templates;

pub use assembler::{AssembleError, PageAssembler, DEFAULT_PAGE_FILE};
pub use locator::{DiscoveryError, Documents, Locator, SourceDocument};
pub use pipeline::{
    DocumentReport, DocumentStatus, Pipeline, PipelineConfig, RunSummary, Stage,
};
pub use report::{CollectingReporter, JsonReporter, Reporter, TextReporter};
pub use templates::{Asset, PageAssets, PageContext, TemplateEngine, TemplateError};
