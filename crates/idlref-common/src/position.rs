//! Line/column mapping for byte offsets into a source text.

use serde::Serialize;

/// A 1-based line/column pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// Byte offsets of every line start in a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Location of `offset`. Columns count bytes from the line start.
    pub fn location(&self, offset: u32) -> Location {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        Location {
            line: line as u32 + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }

    /// Render the lines around `offset` with a gutter and a caret under the
    /// offending column.
    ///
    /// ```text
    ///   2 | interface Foo {
    ///   3 |   attribute long;
    ///     |                 ^
    /// ```
    pub fn context_snippet(&self, text: &str, offset: u32, lines_before: usize) -> String {
        let loc = self.location(offset);
        let target = loc.line as usize - 1;
        let first = target.saturating_sub(lines_before);
        let width = (target + 1).to_string().len();
        let mut out = String::new();
        for line in first..=target {
            let start = self.line_starts[line] as usize;
            let end = self
                .line_starts
                .get(line + 1)
                .map_or(text.len(), |&next| next as usize);
            let content = text
                .get(start..end)
                .unwrap_or_default()
                .trim_end_matches(['\n', '\r']);
            out.push_str(&format!("{:>width$} | {content}\n", line + 1));
        }
        out.push_str(&format!(
            "{:>width$} | {}^",
            "",
            " ".repeat(loc.column as usize - 1)
        ));
        out
    }
}
