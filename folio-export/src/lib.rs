//! # folio-export
//!
//! Export pipeline for folio articles.
//!
//! Renders an article into converter input, runs the external compilers
//! (format converter, TeX engine, paged-media engine) in an isolated
//! scratch workspace, and returns the resulting artifact bytes.

pub mod compiler;
pub mod error;
pub mod pipeline;
pub mod workspace;

pub use compiler::{CompilerRunner, Tool, ToolStatus};
pub use error::ExportError;
pub use pipeline::{artifact_file_name, Artifact, Exporter, OutputKind, PdfBackend};
pub use workspace::ScratchWorkspace;
