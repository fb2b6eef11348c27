//! Source map: owns loaded source files and renders a [`Span`] back into
//! a source line for diagnostics.

use std::sync::Arc;

use super::{FileId, Span};

/// A single loaded source file plus its precomputed line table.
#[derive(Clone)]
pub struct SourceFile {
    id: FileId,
    name: String,
    content: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self {
            id,
            name: name.into(),
            content,
            line_starts,
        }
    }

    fn compute_line_starts(content: &str) -> Arc<[usize]> {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .char_indices()
                .filter(|&(_, ch)| ch == '\n')
                .map(|(i, _)| i + 1),
        );
        line_starts.into()
    }

    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns a specific source line, 1-indexed, with its trailing
    /// newline trimmed. `None` past the last line.
    pub fn line_at(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.content.len());
        Some(self.content[start..end].trim_end_matches(['\n', '\r']))
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("lines", &self.line_starts.len())
            .finish()
    }
}

/// Owns every source file loaded during a compilation session.
///
/// `spec.md` §1 scopes this compiler to a single file, but keeping a map
/// (rather than a bare `String`) lets the driver and the diagnostic
/// renderer share one type, and costs nothing when there is only one
/// entry.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<Arc<SourceFile>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(Arc::new(SourceFile::new(id, name, content)));
        id
    }

    pub fn get(&self, id: FileId) -> Option<Arc<SourceFile>> {
        self.files.get(id.0).cloned()
    }

    /// Renders a span as a source snippet with a caret line underneath,
    /// e.g. for attaching extra context to a diagnostic.
    pub fn render_snippet(&self, span: Span) -> Option<String> {
        let file = self.get(span.file_id)?;
        let line = file.line_at(span.line)?;
        let mut out = format!("{} | {}\n", span.line, line);
        let pad = span.line.to_string().len() + 3;
        out.push_str(&" ".repeat(pad + span.column.saturating_sub(1) as usize));
        out.push('^');
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_at_returns_trimmed_lines() {
        let file = SourceFile::new(FileId(0), "t.vl", "let a = 1;\nreturn a;\n");
        assert_eq!(file.line_at(1), Some("let a = 1;"));
        assert_eq!(file.line_at(2), Some("return a;"));
        assert_eq!(file.line_at(3), None);
    }

    #[test]
    fn source_map_round_trips_added_files() {
        let mut map = SourceMap::new();
        let id = map.add_file("t.vl", "def f(): void { }");
        let file = map.get(id).unwrap();
        assert_eq!(file.name(), "t.vl");
        assert_eq!(file.content(), "def f(): void { }");
    }

    #[test]
    fn render_snippet_includes_caret_under_column() {
        let mut map = SourceMap::new();
        let id = map.add_file("t.vl", "let x = y;");
        let span = Span::with_file(8, 9, id, 1, 9);
        let snippet = map.render_snippet(span).unwrap();
        assert!(snippet.contains("let x = y;"));
        assert!(snippet.trim_end().ends_with('^'));
    }
}
