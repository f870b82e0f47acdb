//! Wrap, invoke and collect: one document through the renderer.

use std::fs;

use crate::envelope;
use crate::traits::{RenderError, RenderOutcome, Renderer};
use crate::transient::TransientPair;

/// Render the raw document `text` using the scratch files in `transient`.
///
/// The renderer output is only read when the renderer exits with status 0;
/// otherwise whatever it left behind is ignored.
pub fn render_document<R: Renderer + ?Sized>(
    renderer: &R,
    transient: &TransientPair,
    text: &str,
) -> Result<RenderOutcome, RenderError> {
    envelope::write_payload(transient.input_path(), text).map_err(RenderError::Transient)?;

    let exit = renderer.render(transient.input_path(), transient.output_path())?;
    if !exit.success() {
        return Ok(RenderOutcome::Failure { code: exit.code() });
    }

    let content =
        fs::read_to_string(transient.output_path()).map_err(|source| RenderError::ReadOutput {
            path: transient.output_path().to_path_buf(),
            source,
        })?;

    Ok(RenderOutcome::Success { content })
}
