//! Shared infrastructure for the `velac` pipeline: source locations,
//! source file storage, and diagnostic collection.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::{FileId, SourceFile, SourceMap, Span};
