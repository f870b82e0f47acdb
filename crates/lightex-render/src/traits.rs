//! The renderer seam and the types that cross it.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// How a renderer run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderExit {
    code: Option<i32>,
}

impl RenderExit {
    /// A run that exited with `code`.
    pub fn with_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// A run that was terminated without an exit code (for example by a signal).
    pub fn terminated() -> Self {
        Self { code: None }
    }

    /// Exit code, if the process exited normally.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Whether the renderer accepted the document.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for RenderExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Result of rendering one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The renderer exited with status 0; `content` is the HTML fragment it wrote.
    Success { content: String },

    /// The renderer rejected the document. `code` is `None` when the process
    /// was killed before it could exit.
    Failure { code: Option<i32> },
}

impl RenderOutcome {
    /// The exit code this outcome corresponds to.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RenderOutcome::Success { .. } => Some(0),
            RenderOutcome::Failure { code } => *code,
        }
    }
}

/// Errors that prevent a renderer outcome from being produced at all.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to launch renderer {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for renderer {}: {source}", program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Renderer {} did not finish within {secs}s", program.display())]
    TimedOut { program: PathBuf, secs: u64 },

    #[error("Failed to prepare transient files: {0}")]
    Transient(#[source] io::Error),

    #[error("Failed to read renderer output {}: {source}", path.display())]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Something that turns a wrapped document file into an HTML fragment file.
pub trait Renderer {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Render `input` into `output` and report how the run finished.
    ///
    /// A non-zero exit is not an error: it is returned as a [`RenderExit`]
    /// and only means no page is produced. `Err` is reserved for runs that
    /// could not be started or observed.
    fn render(&self, input: &Path, output: &Path) -> Result<RenderExit, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(&self, input: &Path, output: &Path) -> Result<RenderExit, RenderError> {
        (**self).render(input, output)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(&self, input: &Path, output: &Path) -> Result<RenderExit, RenderError> {
        (**self).render(input, output)
    }
}
