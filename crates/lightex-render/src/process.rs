//! Runs the external renderer binary as a child process.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, error, warn};
use wait_timeout::ChildExt;

use crate::traits::{RenderError, RenderExit, Renderer};

/// Renderer backed by an executable invoked as
/// `<program> [args...] <input> <output>`.
///
/// Anything the renderer prints goes to the driver's stderr, leaving stdout
/// to the status lines. Its output is never inspected; the exit status is
/// the only signal.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    program: PathBuf,
    name: String,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ProcessRenderer {
    /// Create a renderer that runs `program` and waits for it indefinitely.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        Self {
            name: program.display().to_string(),
            program,
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Arguments passed before the input and output paths.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kill the renderer if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The executable this renderer runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::from(io::stderr()));
        cmd
    }

    fn wait_error(&self, source: io::Error) -> RenderError {
        RenderError::Wait {
            program: self.program.clone(),
            source,
        }
    }
}

impl Renderer for ProcessRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, input: &Path, output: &Path) -> Result<RenderExit, RenderError> {
        debug!(program = %self.program.display(), "spawning renderer");
        let mut child = match self.command(input, output).spawn() {
            Ok(child) => child,
            Err(source) => {
                error!(program = %self.program.display(), err = %source, "failed to launch renderer");
                return Err(RenderError::Launch {
                    program: self.program.clone(),
                    source,
                });
            }
        };

        let status = match self.timeout {
            None => child.wait().map_err(|e| self.wait_error(e))?,
            Some(timeout) => match child.wait_timeout(timeout).map_err(|e| self.wait_error(e))? {
                Some(status) => status,
                None => {
                    warn!(
                        program = %self.program.display(),
                        timeout_secs = timeout.as_secs(),
                        "renderer timed out, killing"
                    );
                    if let Err(e) = child.kill() {
                        error!(program = %self.program.display(), err = %e, "failed to kill renderer");
                    }
                    child.wait().map_err(|e| self.wait_error(e))?;
                    return Err(RenderError::TimedOut {
                        program: self.program.clone(),
                        secs: timeout.as_secs(),
                    });
                }
            },
        };

        debug!(exit_code = ?status.code(), "renderer finished");
        Ok(RenderExit::from(status))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Run `script` through `/bin/sh` so tests never exec a freshly written file.
    fn shell_renderer(dir: &Path, script: &str) -> ProcessRenderer {
        let path = dir.join("renderer.sh");
        fs::write(&path, script).unwrap();
        ProcessRenderer::new("/bin/sh").with_args([path])
    }

    #[test]
    fn passes_input_and_output_paths() {
        let temp = tempdir().unwrap();
        let renderer = shell_renderer(temp.path(), "tr a-z A-Z < \"$1\" > \"$2\"\n");
        let input = temp.path().join("in.tex");
        let output = temp.path().join("out.html");
        fs::write(&input, "hello").unwrap();

        let exit = renderer.render(&input, &output).unwrap();

        assert!(exit.success());
        assert_eq!(fs::read_to_string(&output).unwrap(), "HELLO");
    }

    #[test]
    fn reports_non_zero_exit() {
        let temp = tempdir().unwrap();
        let renderer = shell_renderer(temp.path(), "exit 3\n");

        let exit = renderer
            .render(&temp.path().join("in.tex"), &temp.path().join("out.html"))
            .unwrap();

        assert!(!exit.success());
        assert_eq!(exit.code(), Some(3));
    }

    #[test]
    fn reports_missing_executable_as_launch_error() {
        let temp = tempdir().unwrap();
        let renderer = ProcessRenderer::new(temp.path().join("no-such-renderer"));

        let err = renderer
            .render(&temp.path().join("in.tex"), &temp.path().join("out.html"))
            .unwrap_err();

        assert!(matches!(err, RenderError::Launch { .. }));
    }

    #[test]
    fn reports_signal_termination() {
        let temp = tempdir().unwrap();
        let renderer = shell_renderer(temp.path(), "kill -9 $$\n");

        let exit = renderer
            .render(&temp.path().join("in.tex"), &temp.path().join("out.html"))
            .unwrap();

        assert_eq!(exit, RenderExit::terminated());
        assert!(!exit.success());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn renderer_stdout_goes_to_stderr() {
        let temp = tempdir().unwrap();
        let renderer = shell_renderer(
            temp.path(),
            "echo \"Parsing $1\"\nif [ /dev/stdout -ef /dev/stderr ]; then exit 0; else exit 9; fi\n",
        );

        let exit = renderer
            .render(&temp.path().join("in.tex"), &temp.path().join("out.html"))
            .unwrap();

        assert_eq!(exit.code(), Some(0));
    }

    #[test]
    fn name_is_program_path() {
        let renderer = ProcessRenderer::new("./build/parse_program_to_html");

        assert_eq!(renderer.name(), "./build/parse_program_to_html");
    }

    #[test]
    fn kills_renderer_after_timeout() {
        let temp = tempdir().unwrap();
        let renderer = shell_renderer(temp.path(), "sleep 5\n")
            .with_timeout(Some(Duration::from_millis(200)));

        let err = renderer
            .render(&temp.path().join("in.tex"), &temp.path().join("out.html"))
            .unwrap_err();

        assert!(matches!(err, RenderError::TimedOut { .. }));
    }

    #[test]
    fn finishes_within_timeout() {
        let temp = tempdir().unwrap();
        let renderer =
            shell_renderer(temp.path(), "exit 0\n").with_timeout(Some(Duration::from_secs(10)));

        let exit = renderer
            .render(&temp.path().join("in.tex"), &temp.path().join("out.html"))
            .unwrap();

        assert!(exit.success());
    }
}
