//! Turns renderer output into the final page beside the source document.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::locator::SourceDocument;
use crate::templates::{PageAssets, PageContext, TemplateEngine, TemplateError};

/// File name of the generated page.
pub const DEFAULT_PAGE_FILE: &str = "lightex.html";

/// Errors that can occur while assembling a page.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to write page {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Renders pages and writes them next to their source documents.
#[derive(Debug)]
pub struct PageAssembler {
    templates: TemplateEngine,
    assets: PageAssets,
    file_name: String,
}

impl PageAssembler {
    pub fn new(templates: TemplateEngine, assets: PageAssets, file_name: impl Into<String>) -> Self {
        Self {
            templates,
            assets,
            file_name: file_name.into(),
        }
    }

    /// Where the page for `document` is written.
    pub fn page_path(&self, document: &SourceDocument) -> PathBuf {
        document.page_path(&self.file_name)
    }

    /// Render the page for `document` around the renderer output `content`.
    pub fn render(&self, document: &SourceDocument, content: &str) -> Result<String, AssembleError> {
        let problem_id = document.identifier();
        let context = PageContext {
            problem_id: &problem_id,
            content,
            stylesheets: &self.assets.stylesheets,
            scripts: &self.assets.scripts,
        };

        Ok(self.templates.render_page(&context)?)
    }

    /// Render and write the page, replacing any page from an earlier run.
    pub fn assemble(
        &self,
        document: &SourceDocument,
        content: &str,
    ) -> Result<PathBuf, AssembleError> {
        let html = self.render(document, content)?;
        let path = self.page_path(document);

        fs::write(&path, html).map_err(|source| AssembleError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn assembler() -> PageAssembler {
        PageAssembler::new(
            TemplateEngine::new().unwrap(),
            PageAssets::default(),
            DEFAULT_PAGE_FILE,
        )
    }

    #[test]
    fn writes_page_beside_source() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("probA");
        fs::create_dir_all(&dir).unwrap();
        let document = SourceDocument::new(dir.join("statement.tex"));

        let path = assembler().assemble(&document, "<b>Hello</b>").unwrap();

        assert_eq!(path, dir.join("lightex.html"));
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("<title>Problem probA</title>"));
        assert!(html.contains("<b>Hello</b>"));
    }

    #[test]
    fn overwrites_existing_page() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("probA");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("lightex.html"), "stale").unwrap();
        let document = SourceDocument::new(dir.join("statement.tex"));

        assembler().assemble(&document, "<i>fresh</i>").unwrap();

        let html = fs::read_to_string(dir.join("lightex.html")).unwrap();
        assert!(!html.contains("stale"));
        assert!(html.contains("<i>fresh</i>"));
    }

    #[test]
    fn uses_configured_file_name() {
        let temp = tempdir().unwrap();
        let document = SourceDocument::new(temp.path().join("statement.tex"));
        let assembler = PageAssembler::new(
            TemplateEngine::new().unwrap(),
            PageAssets::default(),
            "index.html",
        );

        let path = assembler.assemble(&document, "").unwrap();

        assert_eq!(path, temp.path().join("index.html"));
    }

    #[test]
    fn reports_write_failure() {
        let temp = tempdir().unwrap();
        let document = SourceDocument::new(temp.path().join("gone/statement.tex"));

        let err = assembler().assemble(&document, "").unwrap_err();

        assert!(matches!(err, AssembleError::Write { .. }));
    }
}
