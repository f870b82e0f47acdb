//! Envelope wrapping and external renderer invocation.
//!
//! This crate owns everything that happens between reading a LighTeX source
//! document and holding the HTML fragment the external renderer produced for it:
//! wrapping the text in the `rawproblem` envelope, allocating a private pair of
//! scratch files, running the renderer process, and collapsing its exit status
//! into a [`RenderOutcome`].

pub mod convert;
pub mod envelope;
pub mod process;
pub mod traits;
pub mod transient;

pub use convert::render_document;
pub use envelope::{wrap, PREFIX, SUFFIX};
pub use process::ProcessRenderer;
pub use traits::{RenderError, RenderExit, RenderOutcome, Renderer};
pub use transient::TransientPair;
