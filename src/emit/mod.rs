//! Indentation-aware text emitter shared by both synthesizers.
//!
//! Each artifact gets its own `CodeWriter`; it holds nothing between episodes.

pub mod signature;

pub const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    indent: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new line at the current indentation.
    pub fn line(&mut self) -> Line<'_> {
        self.write_indent();
        Line { w: self }
    }

    /// Write a whole line at the current indentation.
    pub fn emit_line(&mut self, text: &str) {
        self.line().push(text).end();
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write `header {` and indent.
    pub fn open(&mut self, header: &str) {
        self.line().push(header).push(" {").end();
        self.indent();
    }

    /// Dedent and write `}`.
    pub fn close(&mut self) {
        self.dedent();
        self.emit_line("}");
    }

    /// `header { ... }` with `body` emitted one level deeper.
    pub fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.open(header);
        body(self);
        self.close();
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str(INDENT);
        }
    }
}

/// One line under construction; dropped without `end()` it stays open so the
/// caller can keep appending.
pub struct Line<'a> {
    w: &'a mut CodeWriter,
}

impl<'a> Line<'a> {
    pub fn push(self, text: &str) -> Self {
        self.w.buf.push_str(text);
        self
    }

    pub fn end(self) {
        self.w.buf.push('\n');
    }
}
