//! Private scratch files for a single renderer invocation.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};

const DIR_PREFIX: &str = "lightex-";
const INPUT_FILE: &str = "input.tex";
const OUTPUT_FILE: &str = "output.html";

/// A uniquely named scratch directory holding the wrapped input and the
/// renderer output for one document.
///
/// Every document gets its own pair, so no two conversions can observe each
/// other's files. The directory and both files are removed when the pair is
/// dropped.
#[derive(Debug)]
pub struct TransientPair {
    dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl TransientPair {
    /// Allocate a pair under the system temporary directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self::from_dir(Builder::new().prefix(DIR_PREFIX).tempdir()?))
    }

    /// Allocate a pair under `parent`.
    pub fn new_in(parent: &Path) -> io::Result<Self> {
        Ok(Self::from_dir(
            Builder::new().prefix(DIR_PREFIX).tempdir_in(parent)?,
        ))
    }

    fn from_dir(dir: TempDir) -> Self {
        let input = dir.path().join(INPUT_FILE);
        let output = dir.path().join(OUTPUT_FILE);
        Self { dir, input, output }
    }

    /// Path the wrapped document is written to.
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Path the renderer is asked to write its fragment to.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// The scratch directory itself.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
