//! Marker scanning shared by the disclosure and list rules.

use crate::limits::{MAX_LIST_MARKER_DIGITS, MIN_DISCLOSURE_RUN};

/// Glyph of a disclosure marker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// `+`: the disclosure starts expanded.
    Plus,
    /// `>`: the disclosure starts collapsed.
    Chevron,
}

impl Glyph {
    /// Classify a byte.
    #[inline]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Self::Plus),
            b'>' => Some(Self::Chevron),
            _ => None,
        }
    }

    /// The glyph byte.
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Self::Plus => b'+',
            Self::Chevron => b'>',
        }
    }

    /// Initial state of a disclosure opened with this glyph.
    #[inline]
    pub fn expanded(self) -> bool {
        self == Self::Plus
    }
}

/// A maximal run of one disclosure glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRun {
    pub glyph: Glyph,
    pub start: usize,
    pub end: usize,
}

impl MarkerRun {
    /// Scan the run starting at `pos`. Any length is returned; callers
    /// check [`MarkerRun::is_opener`] or compare lengths.
    pub fn scan(input: &[u8], pos: usize, max: usize) -> Option<Self> {
        let glyph = Glyph::from_byte(*input.get(pos).filter(|_| pos < max)?)?;
        Some(Self::scan_glyph(input, pos, max, glyph))
    }

    /// Scan a run of `glyph` starting at `pos` (possibly empty).
    pub fn scan_glyph(input: &[u8], pos: usize, max: usize, glyph: Glyph) -> Self {
        let byte = glyph.byte();
        let mut end = pos;
        while end < max && input[end] == byte {
            end += 1;
        }
        Self { glyph, start: pos, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Long enough to open a disclosure.
    #[inline]
    pub fn is_opener(&self) -> bool {
        self.len() >= MIN_DISCLOSURE_RUN
    }
}

/// Kind of a recognized list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `*`, `-` or `+`.
    Bullet,
    /// 1-9 digit numeral followed by `.` or `)`.
    Ordered { value: u32 },
}

/// A list marker found at the start of a line's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: MarkerKind,
    /// Offset of the first marker byte.
    pub start: usize,
    /// Offset one past the marker.
    pub end: usize,
}

impl ListMarker {
    /// Last byte of the marker: the bullet glyph or the ordered delimiter.
    #[inline]
    pub fn glyph(&self, input: &[u8]) -> u8 {
        input[self.end - 1]
    }
}

#[inline]
fn followed_by_space(input: &[u8], pos: usize, max: usize) -> bool {
    pos >= max || matches!(input[pos], b' ' | b'\t')
}

/// Ordered marker at `pos`: `1.`, `23)`, ... followed by whitespace or EOL.
pub fn scan_ordered(input: &[u8], pos: usize, max: usize) -> Option<ListMarker> {
    // digit + delimiter at least
    if pos + 1 >= max {
        return None;
    }

    let mut end = pos;
    let mut value: u32 = 0;
    while end < max && input[end].is_ascii_digit() {
        if end - pos >= MAX_LIST_MARKER_DIGITS {
            return None;
        }
        value = value * 10 + u32::from(input[end] - b'0');
        end += 1;
    }
    if end == pos || end >= max || !matches!(input[end], b'.' | b')') {
        return None;
    }
    end += 1;

    followed_by_space(input, end, max).then_some(ListMarker {
        kind: MarkerKind::Ordered { value },
        start: pos,
        end,
    })
}

/// Bullet marker at `pos`: `*`, `-` or `+` followed by whitespace or EOL.
pub fn scan_bullet(input: &[u8], pos: usize, max: usize) -> Option<ListMarker> {
    if pos >= max || !matches!(input[pos], b'*' | b'-' | b'+') {
        return None;
    }
    followed_by_space(input, pos + 1, max).then_some(ListMarker {
        kind: MarkerKind::Bullet,
        start: pos,
        end: pos + 1,
    })
}

/// Either kind of list marker, ordered first.
#[inline]
pub fn scan_list_marker(input: &[u8], pos: usize, max: usize) -> Option<ListMarker> {
    scan_ordered(input, pos, max).or_else(|| scan_bullet(input, pos, max))
}

/// True when the raw line `[begin, end)` reads: optional indentation, a
/// list marker, exactly one space, then a disclosure opener run.
///
/// Only the text is inspected; the nested content may still fail to form
/// a disclosure.
pub fn is_expandable(input: &[u8], begin: usize, end: usize) -> bool {
    let mut pos = begin;
    while pos < end && matches!(input[pos], b' ' | b'\t') {
        pos += 1;
    }
    let Some(marker) = scan_list_marker(input, pos, end) else {
        return false;
    };
    let pos = marker.end;
    if pos >= end || input[pos] != b' ' {
        return false;
    }
    MarkerRun::scan(input, pos + 1, end).is_some_and(|run| run.is_opener())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(s: &str) -> Option<ListMarker> {
        scan_ordered(s.as_bytes(), 0, s.len())
    }

    fn bullet(s: &str) -> Option<ListMarker> {
        scan_bullet(s.as_bytes(), 0, s.len())
    }

    #[test]
    fn test_marker_run() {
        let input = b"++++ title";
        let run = MarkerRun::scan(input, 0, input.len()).unwrap();
        assert_eq!(run.glyph, Glyph::Plus);
        assert_eq!(run.len(), 4);
        assert!(run.is_opener());

        let input = b">> x";
        let run = MarkerRun::scan(input, 0, input.len()).unwrap();
        assert!(!run.is_opener());
        assert!(!run.glyph.expanded());

        assert!(MarkerRun::scan(b"--- x", 0, 5).is_none());
        assert!(MarkerRun::scan(b"", 0, 0).is_none());
    }

    #[test]
    fn test_ordered_marker() {
        let m = ordered("1. one").unwrap();
        assert_eq!(m.kind, MarkerKind::Ordered { value: 1 });
        assert_eq!(m.end, 2);
        assert_eq!(m.glyph(b"1. one"), b'.');

        assert_eq!(ordered("42)").unwrap().kind, MarkerKind::Ordered { value: 42 });
        assert_eq!(ordered("123456789. x").unwrap().end, 10);
        assert!(ordered("1234567890. x").is_none());
        assert!(ordered("1.x").is_none());
        assert!(ordered("1").is_none());
        assert!(ordered("a. x").is_none());
        assert!(ordered(". x").is_none());
    }

    #[test]
    fn test_bullet_marker() {
        for s in ["- x", "* x", "+ x", "-", "-\tx"] {
            assert!(bullet(s).is_some(), "{s}");
        }
        assert!(bullet("-x").is_none());
        assert!(bullet("x").is_none());
        assert!(bullet("").is_none());
    }

    #[test]
    fn test_expandable() {
        let yes = ["- +++ Nested", "- >>> Closed", "  * ++++", "1. +++ x"];
        for s in yes {
            assert!(is_expandable(s.as_bytes(), 0, s.len()), "{s}");
        }
        let no = ["- ++ x", "-  +++ x", "- +>+ x", "+++ x", "- text"];
        for s in no {
            assert!(!is_expandable(s.as_bytes(), 0, s.len()), "{s}");
        }
    }
}
