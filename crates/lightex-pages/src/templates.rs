//! Template engine for rendering problem statement pages.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::{Deserialize, Serialize};

/// Name the page template is registered under.
pub const PAGE_TEMPLATE: &str = "lightex.html";

/// A stylesheet or script referenced from the page head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// URL of the resource
    pub href: String,

    /// Subresource integrity hash; adds `crossorigin="anonymous"` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl Asset {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            integrity: None,
        }
    }

    pub fn with_integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }
}

/// Static resources included in every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAssets {
    pub stylesheets: Vec<Asset>,
    pub scripts: Vec<Asset>,
}

impl Default for PageAssets {
    fn default() -> Self {
        Self {
            stylesheets: vec![
                Asset::new("../irunner2.css"),
                Asset::new("https://cdnjs.cloudflare.com/ajax/libs/KaTeX/0.7.1/katex.min.css")
                    .with_integrity(
                        "sha384-wITovz90syo1dJWVh32uuETPVEtGigN07tkttEqPv+uR2SE/mbQcG7ATL28aI9H0",
                    ),
            ],
            scripts: vec![
                Asset::new("https://cdnjs.cloudflare.com/ajax/libs/KaTeX/0.7.1/katex.min.js")
                    .with_integrity(
                        "sha384-/y1Nn9+QQAipbNQWU65krzJralCnuOasHncUFXGkdwntGeSvQicrYkiUBwsgUqc1",
                    ),
            ],
        }
    }
}

/// Context for rendering the page template.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext<'a> {
    /// Document identifier shown in the title
    pub problem_id: &'a str,
    /// Renderer output, embedded verbatim
    pub content: &'a str,
    pub stylesheets: &'a [Asset],
    pub scripts: &'a [Asset],
}

/// Errors from loading or rendering the page template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid template: {0}")]
    Invalid(#[source] minijinja::Error),

    #[error("Failed to render template: {0}")]
    Render(#[source] minijinja::Error),
}

/// Template engine using minijinja.
///
/// The page template is registered under an `.html` name, so every value is
/// HTML-escaped unless the template marks it `safe`. Renderer output is
/// trusted and goes into the page with `{{ content | safe }}`.
#[derive(Debug)]
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine with the built-in page template.
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_source(DEFAULT_TEMPLATE.to_string())
    }

    /// Create an engine whose page template is read from `path`.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_source(source)
    }

    fn with_source(source: String) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template_owned(PAGE_TEMPLATE.to_string(), source)
            .map_err(TemplateError::Invalid)?;

        Ok(Self { env })
    }

    /// Render a page.
    pub fn render_page(&self, context: &PageContext<'_>) -> Result<String, TemplateError> {
        let tmpl = self
            .env
            .get_template(PAGE_TEMPLATE)
            .map_err(TemplateError::Invalid)?;

        tmpl.render(context).map_err(TemplateError::Render)
    }
}

const DEFAULT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
{%- for style in stylesheets %}
        <link rel="stylesheet" type="text/css" href="{{ style.href }}"{% if style.integrity %} integrity="{{ style.integrity }}" crossorigin="anonymous"{% endif %}>
{%- endfor %}
{%- for script in scripts %}
        <script src="{{ script.href }}"{% if script.integrity %} integrity="{{ script.integrity }}" crossorigin="anonymous"{% endif %}></script>
{%- endfor %}
        <title>Problem {{ problem_id }}</title>
    </head>
    <body>
        <div class="ir-problem-statement">{{ content | safe }}</div>
    </body>
</html>
"##;
