//! Mark collection for inline parsing.
//!
//! Marks are candidate delimiter positions (backtick runs, emphasis runs,
//! escapes and line breaks) gathered in one pass before resolution.

use crate::limits;

/// Flags for mark state.
pub mod flags {
    pub const POTENTIAL_OPENER: u8 = 0b0001;
    pub const POTENTIAL_CLOSER: u8 = 0b0010;
    pub const RESOLVED: u8 = 0b0100;
    /// Mark lies inside a code span.
    pub const IN_CODE: u8 = 0b1000;
}

/// A candidate delimiter.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    /// Start position in text.
    pub pos: u32,
    /// End position (exclusive).
    pub end: u32,
    /// Kind byte: `` ` ``, `*`, `_`, `\\` or `\n`.
    pub ch: u8,
    /// State flags.
    pub flags: u8,
}

impl Mark {
    #[inline]
    pub fn new(pos: u32, end: u32, ch: u8, flags: u8) -> Self {
        Self { pos, end, ch, flags }
    }

    /// Length of the delimiter run.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    #[inline]
    pub fn can_open(&self) -> bool {
        self.flags & flags::POTENTIAL_OPENER != 0 && self.flags & flags::RESOLVED == 0
    }

    #[inline]
    pub fn can_close(&self) -> bool {
        self.flags & flags::POTENTIAL_CLOSER != 0 && self.flags & flags::RESOLVED == 0
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.flags & flags::RESOLVED != 0
    }

    #[inline]
    pub fn in_code(&self) -> bool {
        self.flags & flags::IN_CODE != 0
    }

    #[inline]
    pub fn resolve(&mut self) {
        self.flags |= flags::RESOLVED;
    }
}

/// Reusable buffer of marks.
#[derive(Debug, Default)]
pub struct MarkBuffer {
    marks: Vec<Mark>,
}

impl MarkBuffer {
    pub fn new() -> Self {
        Self {
            marks: Vec::with_capacity(32),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Add a mark unless the limit is reached.
    #[inline]
    pub fn push(&mut self, mark: Mark) {
        if self.marks.len() < limits::MAX_INLINE_MARKS {
            self.marks.push(mark);
        }
    }

    #[inline]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[inline]
    pub fn marks_mut(&mut self) -> &mut [Mark] {
        &mut self.marks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Bytes that may start a mark.
static SPECIAL_CHARS: [bool; 256] = {
    let mut table = [false; 256];
    table[b'`' as usize] = true;
    table[b'*' as usize] = true;
    table[b'_' as usize] = true;
    table[b'\\' as usize] = true;
    table[b'\n' as usize] = true;
    table
};

/// Scan `text` and collect marks into `buffer`.
pub fn collect_marks(text: &[u8], buffer: &mut MarkBuffer) {
    buffer.clear();

    let mut pos = 0;
    let len = text.len();

    while pos < len {
        let b = text[pos];

        if !SPECIAL_CHARS[b as usize] {
            pos += 1;
            continue;
        }

        match b {
            b'`' => {
                let start = pos;
                while pos < len && text[pos] == b'`' {
                    pos += 1;
                }
                if pos - start <= limits::MAX_CODE_SPAN_BACKTICKS {
                    buffer.push(Mark::new(
                        start as u32,
                        pos as u32,
                        b'`',
                        flags::POTENTIAL_OPENER | flags::POTENTIAL_CLOSER,
                    ));
                }
            }

            b'*' | b'_' => {
                let start = pos;
                while pos < len && text[pos] == b {
                    pos += 1;
                }
                let before = if start > 0 { text[start - 1] } else { b' ' };
                let after = if pos < len { text[pos] } else { b' ' };

                let flags = compute_emphasis_flags(b, before, after);
                if flags != 0 {
                    buffer.push(Mark::new(start as u32, pos as u32, b, flags));
                }
            }

            b'\\' => match text.get(pos + 1) {
                Some(b'\n') => {
                    buffer.push(Mark::new(pos as u32, (pos + 2) as u32, b'\n', 0));
                    pos += 2;
                }
                Some(&next) if is_escapable(next) => {
                    buffer.push(Mark::new(pos as u32, (pos + 2) as u32, b'\\', 0));
                    pos += 2;
                }
                _ => pos += 1,
            },

            b'\n' => {
                let mut start = pos;
                while start > 0 && text[start - 1] == b' ' {
                    start -= 1;
                }
                buffer.push(Mark::new(start as u32, (pos + 1) as u32, b'\n', 0));
                pos += 1;
            }

            _ => pos += 1,
        }
    }
}

/// Opener/closer flags from the left- and right-flanking rules.
fn compute_emphasis_flags(ch: u8, before: u8, after: u8) -> u8 {
    let before_space = is_whitespace(before);
    let after_space = is_whitespace(after);
    let before_punct = is_punctuation(before);
    let after_punct = is_punctuation(after);

    let left_flanking = !after_space && (!after_punct || before_space || before_punct);
    let right_flanking = !before_space && (!before_punct || after_space || after_punct);

    let mut result = 0;
    if ch == b'*' {
        if left_flanking {
            result |= flags::POTENTIAL_OPENER;
        }
        if right_flanking {
            result |= flags::POTENTIAL_CLOSER;
        }
    } else {
        // `_` may not open or close inside a word
        if left_flanking && (!right_flanking || before_punct) {
            result |= flags::POTENTIAL_OPENER;
        }
        if right_flanking && (!left_flanking || after_punct) {
            result |= flags::POTENTIAL_CLOSER;
        }
    }
    result
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0)
}

#[inline]
fn is_punctuation(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// Characters that can be escaped with a backslash.
#[inline]
fn is_escapable(b: u8) -> bool {
    b.is_ascii_punctuation()
}
