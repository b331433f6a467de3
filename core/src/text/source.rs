use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;

/// Zero-based line and column of a byte offset. Columns count `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

// Displayed one-based, the way editors and compilers print locations.
impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Byte offsets of every line start, for O(log n) offset to line lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(text.bytes().enumerate().filter(|(_, b)| *b == b'\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn text_len(&self) -> usize {
        self.len
    }

    /// Line containing `offset`; offsets past the end map to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.len)
    }

    /// Byte range of `line` without its `\n` terminator.
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let start = self.line_start(line);
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.len,
        };
        start..end.max(start)
    }

    pub fn line_col(&self, text: &str, offset: usize) -> LineCol {
        let offset = floor_char_boundary(text, offset.min(self.len));
        let line = self.line_of(offset);
        let start = self.line_start(line);
        let column = text[start..offset].chars().count();
        LineCol::new(line as u32, column as u32)
    }

    /// Column of `offset` in UTF-16 code units, as the LSP wire format counts them.
    pub fn utf16_col(&self, text: &str, offset: usize) -> u32 {
        let offset = floor_char_boundary(text, offset.min(self.len));
        let start = self.line_start(self.line_of(offset));
        text[start..offset].chars().map(|c| c.len_utf16() as u32).sum()
    }

    /// Inverse of [`LineIndex::line_col`], clamped to the end of the line.
    pub fn offset_of(&self, text: &str, pos: LineCol) -> usize {
        let line = pos.line as usize;
        if line >= self.line_count() {
            return self.len;
        }
        let range = self.line_range(line);
        let line_text = &text[range.clone()];
        match line_text.char_indices().nth(pos.column as usize) {
            Some((i, _)) => range.start + i,
            None => range.end,
        }
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

pub fn offset_to_line_col(text: &str, offset: usize) -> LineCol {
    LineIndex::new(text).line_col(text, offset)
}

/// Immutable snapshot of one document plus its line index.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: Arc<str>,
    lines: Arc<LineIndex>,
}

impl SourceText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let lines = Arc::new(LineIndex::new(&text));
        Self { text, lines }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    pub fn line_col(&self, offset: usize) -> LineCol {
        self.lines.line_col(&self.text, offset)
    }

    pub fn utf16_col(&self, offset: usize) -> u32 {
        self.lines.utf16_col(&self.text, offset)
    }

    pub fn line(&self, line: usize) -> &str {
        let range = self.lines.line_range(line);
        self.text[range].trim_end_matches('\r')
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
