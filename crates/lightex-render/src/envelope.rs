//! The `rawproblem` envelope the renderer expects around every document.

use std::fs;
use std::io;
use std::path::Path;

/// Opening marker, including its trailing newline.
pub const PREFIX: &str = "\\begin{rawproblem}{input.txt}{output.txt}\n";

/// Closing marker, including the newline that separates it from the content.
pub const SUFFIX: &str = "\n\\end{rawproblem}\n";

/// Wrap raw document text in the envelope.
///
/// The content is inserted as-is, without any escaping.
pub fn wrap(text: &str) -> String {
    let mut payload = String::with_capacity(PREFIX.len() + text.len() + SUFFIX.len());
    payload.push_str(PREFIX);
    payload.push_str(text);
    payload.push_str(SUFFIX);
    payload
}

/// Wrap `text` and write it to `path` as UTF-8, replacing whatever was there.
pub fn write_payload(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, wrap(text))
}
