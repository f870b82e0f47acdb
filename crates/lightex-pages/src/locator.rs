//! Discovery of source documents under a root directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extension of LighTeX source documents.
pub const EXTENSION: &str = "tex";

/// A discovered source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: PathBuf,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document as discovered.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the document.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }

    /// Human-readable identifier: the name of the directory containing the document.
    ///
    /// Relative paths such as `./statement.tex` have no usable directory name,
    /// so the directory is resolved against the filesystem in that case.
    pub fn identifier(&self) -> String {
        let directory = self.directory();
        if let Some(name) = directory.file_name() {
            return name.to_string_lossy().into_owned();
        }

        let resolved = if directory.as_os_str().is_empty() {
            fs::canonicalize(".")
        } else {
            fs::canonicalize(directory)
        };

        resolved
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default()
    }

    /// Path of the page named `file_name` beside the document.
    pub fn page_path(&self, file_name: &str) -> PathBuf {
        self.directory().join(file_name)
    }
}

/// Errors that make the root impossible to enumerate.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Root directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Root is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to read root directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Enumerates source documents under a root directory.
#[derive(Debug, Clone)]
pub struct Locator {
    root: PathBuf,
}

impl Locator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start enumerating documents.
    ///
    /// The root itself is checked eagerly; everything below it is walked
    /// lazily in file-name order at every level.
    pub fn documents(&self) -> Result<Documents, DiscoveryError> {
        let metadata = fs::metadata(&self.root).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                DiscoveryError::NotFound {
                    path: self.root.clone(),
                }
            } else {
                DiscoveryError::Unreadable {
                    path: self.root.clone(),
                    source,
                }
            }
        })?;

        if !metadata.is_dir() {
            return Err(DiscoveryError::NotADirectory {
                path: self.root.clone(),
            });
        }

        fs::read_dir(&self.root).map_err(|source| DiscoveryError::Unreadable {
            path: self.root.clone(),
            source,
        })?;

        Ok(Documents {
            inner: WalkDir::new(&self.root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter(),
        })
    }
}

/// Lazy sequence of documents produced by [`Locator::documents`].
pub struct Documents {
    inner: walkdir::IntoIter,
}

impl Iterator for Documents {
    type Item = SourceDocument;

    fn next(&mut self) -> Option<SourceDocument> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && is_source(entry.path()) {
                return Some(SourceDocument::new(entry.into_path()));
            }
        }
    }
}

fn is_source(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(EXTENSION)
}
