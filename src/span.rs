use serde::{Deserialize, Serialize};

/// Byte-offset span into the text a diagnostic is reported against
/// (the snapshot document, a config file, or a single type reference).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a 1-based line/column position, as reported by serde_json.
    pub fn at_line_col(source: &str, line: usize, column: usize) -> Self {
        let mut offset = 0;
        for (idx, text) in source.split_inclusive('\n').enumerate() {
            if idx + 1 == line {
                let col = column.saturating_sub(1).min(text.len());
                offset += col;
                return Self::new(offset, offset);
            }
            offset += text.len();
        }
        Self::new(source.len(), source.len())
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A value annotated with its source span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}
