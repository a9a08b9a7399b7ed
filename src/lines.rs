//! Line table: byte offsets and indentation for every source line.
//!
//! Built once per parse and only read afterwards. Block rules address
//! lines by index and never re-split the input.

use memchr::memchr;

/// Offsets and indentation of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Line {
    /// Byte offset of the first byte of the line.
    pub begin: usize,
    /// Byte offset one past the last content byte (excludes `\n` and `\r`).
    pub end: usize,
    /// Number of leading whitespace bytes (spaces and tabs).
    pub shift: usize,
    /// Leading indentation in columns, with tabs expanded to 4-column stops.
    pub indent: usize,
}

impl Line {
    /// Offset of the first non-whitespace byte.
    #[inline]
    pub fn content_start(&self) -> usize {
        self.begin + self.shift
    }

    /// True when the line holds only whitespace.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.content_start() >= self.end
    }
}

/// All lines of a document.
///
/// Indexing one past the last line yields an empty sentinel line positioned
/// at the end of input, so forward scans can peek without bounds checks.
#[derive(Debug, Clone)]
pub struct LineTable {
    lines: Vec<Line>,
    sentinel: Line,
}

impl LineTable {
    /// Split `input` into lines.
    ///
    /// A trailing newline does not produce an extra empty line.
    pub fn new(input: &[u8]) -> Self {
        let mut lines = Vec::with_capacity(input.len() / 32 + 1);
        let mut begin = 0;

        while begin < input.len() {
            let (end, next) = match memchr(b'\n', &input[begin..]) {
                Some(offset) => (begin + offset, begin + offset + 1),
                None => (input.len(), input.len()),
            };
            let end = if end > begin && input[end - 1] == b'\r' { end - 1 } else { end };
            lines.push(measure(input, begin, end));
            begin = next;
        }

        Self {
            lines,
            sentinel: Line {
                begin: input.len(),
                end: input.len(),
                ..Line::default()
            },
        }
    }

    /// Number of lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the document has no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index`, or the end-of-input sentinel.
    #[inline]
    pub fn get(&self, index: usize) -> &Line {
        self.lines.get(index).unwrap_or(&self.sentinel)
    }
}

fn measure(input: &[u8], begin: usize, end: usize) -> Line {
    let mut pos = begin;
    let mut indent = 0;
    while pos < end {
        match input[pos] {
            b' ' => indent += 1,
            b'\t' => indent += 4 - indent % 4,
            _ => break,
        }
        pos += 1;
    }
    Line {
        begin,
        end,
        shift: pos - begin,
        indent,
    }
}
