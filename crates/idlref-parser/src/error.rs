use idlref_common::LineMap;

/// A block of IDL text that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset into the block source.
    pub offset: u32,
    pub line: u32,
    pub column: u32,
    /// Source excerpt with a caret under the offending column.
    pub context: String,
}

impl SyntaxError {
    pub(crate) fn at(source: &str, offset: u32, message: impl Into<String>) -> Self {
        let map = LineMap::build(source);
        let loc = map.location(offset);
        Self {
            message: message.into(),
            offset,
            line: loc.line,
            column: loc.column,
            context: map.context_snippet(source, offset, 2),
        }
    }
}
