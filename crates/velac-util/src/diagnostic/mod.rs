//! Diagnostic collection and reporting.
//!
//! `spec.md` §6 fixes the two diagnostic line formats this compiler ever
//! prints: `(L:C) ERROR: <message>` and `(L:C) WARNING: <message>`. This
//! module is the write-line-to-a-sink abstraction `spec.md` §9 calls for,
//! so tests can capture diagnostics instead of asserting on real stderr.

use crate::Span;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "ERROR"),
            Level::Warning => write!(f, "WARNING"),
        }
    }
}

/// A single diagnostic line, already tied to the span that produced it.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            span,
        }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.span, self.level, self.message)
    }
}

/// Collects diagnostics emitted during a compilation run and writes each
/// one to stderr as it arrives, per `spec.md` §6.
///
/// Kept as a `RefCell`-backed collector rather than a plain `Vec` so it can
/// be shared by `&self` across the checker's recursive methods the way
/// `faxc-util`'s `Handler` is, without threading `&mut` through every call.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Records an error and writes it to stderr.
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::error(message, span));
    }

    /// Records a warning and writes it to stderr.
    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::warning(message, span));
    }

    fn emit(&self, diag: Diagnostic) {
        eprintln!("{diag}");
        self.diagnostics.borrow_mut().push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// All diagnostics recorded so far, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_spec_wire_format() {
        let span = Span::new(0, 0, 2, 5);
        let diag = Diagnostic::error("expected ';'", span);
        assert_eq!(diag.to_string(), "(2:5) ERROR: expected ';'");

        let diag = Diagnostic::warning("garbage token: `@`", span);
        assert_eq!(diag.to_string(), "(2:5) WARNING: garbage token: `@`");
    }

    #[test]
    fn handler_tracks_error_count_but_not_warnings() {
        let handler = Handler::new();
        handler.warning("garbage token", Span::DUMMY);
        assert!(!handler.has_errors());
        assert_eq!(handler.error_count(), 0);

        handler.error("expected expression", Span::DUMMY);
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.diagnostics().len(), 2);
    }
}
