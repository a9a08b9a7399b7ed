//! Inline phrase parser.
//!
//! Three phases:
//! 1. Mark collection: one pass recording delimiter positions
//! 2. Mark resolution: code spans first, then emphasis
//! 3. Event emission: walk the resolved points in source order

mod code_span;
mod emphasis;
pub mod event;
pub mod marks;

pub use event::InlineEvent;

use crate::Range;
use code_span::{CodeSpan, resolve_code_spans};
use emphasis::{EmphasisMatch, resolve_emphasis};
use marks::{MarkBuffer, collect_marks};

/// A resolved construct covering `[start, end)` of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmitPoint {
    start: u32,
    end: u32,
    kind: EmitKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitKind {
    Code { start: u32, end: u32 },
    Open(u32),
    Close(u32),
    Escape(u8),
    SoftBreak,
    HardBreak,
}

/// Inline parser with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct InlineParser {
    mark_buffer: MarkBuffer,
    code_spans: Vec<CodeSpan>,
    emphasis: Vec<EmphasisMatch>,
    points: Vec<EmitPoint>,
}

impl InlineParser {
    /// Create a new inline parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and append events to `events`.
    ///
    /// Every range in the output is shifted by `base`, so passing the
    /// offset `text` was sliced from yields ranges into the whole input.
    pub fn parse(&mut self, text: &[u8], base: u32, events: &mut Vec<InlineEvent>) {
        collect_marks(text, &mut self.mark_buffer);

        if self.mark_buffer.is_empty() {
            if !text.is_empty() {
                events.push(InlineEvent::Text(Range::from_usize(0, text.len()).offset_by(base)));
            }
            return;
        }

        resolve_code_spans(self.mark_buffer.marks_mut(), &mut self.code_spans);
        resolve_emphasis(self.mark_buffer.marks_mut(), &mut self.emphasis);

        self.points.clear();
        for span in &self.code_spans {
            let (start, end) = span.content_range(text);
            self.points.push(EmitPoint {
                start: span.opener_pos,
                end: span.closer_end,
                kind: EmitKind::Code { start, end },
            });
        }
        for m in &self.emphasis {
            self.points.push(EmitPoint {
                start: m.opener_start,
                end: m.opener_end,
                kind: EmitKind::Open(m.count),
            });
            self.points.push(EmitPoint {
                start: m.closer_start,
                end: m.closer_end,
                kind: EmitKind::Close(m.count),
            });
        }
        for mark in self.mark_buffer.marks() {
            if mark.in_code() {
                continue;
            }
            let kind = match mark.ch {
                b'\\' => EmitKind::Escape(text[mark.pos as usize + 1]),
                b'\n' if is_hard_break(text, mark.pos, mark.end) => EmitKind::HardBreak,
                b'\n' => EmitKind::SoftBreak,
                _ => continue,
            };
            self.points.push(EmitPoint {
                start: mark.pos,
                end: mark.end,
                kind,
            });
        }
        self.points.sort_by_key(|p| p.start);

        let mut cursor = 0u32;
        for point in &self.points {
            if point.start < cursor {
                continue;
            }
            if point.start > cursor {
                events.push(InlineEvent::Text(Range::new(cursor, point.start).offset_by(base)));
            }
            events.push(match point.kind {
                EmitKind::Code { start, end } => {
                    InlineEvent::Code(Range::new(start, end).offset_by(base))
                }
                EmitKind::Open(1) => InlineEvent::EmphasisStart,
                EmitKind::Open(_) => InlineEvent::StrongStart,
                EmitKind::Close(1) => InlineEvent::EmphasisEnd,
                EmitKind::Close(_) => InlineEvent::StrongEnd,
                EmitKind::Escape(b) => InlineEvent::EscapedChar(b),
                EmitKind::SoftBreak => InlineEvent::SoftBreak,
                EmitKind::HardBreak => InlineEvent::HardBreak,
            });
            cursor = point.end;
        }
        if (cursor as usize) < text.len() {
            let tail = Range::from_usize(cursor as usize, text.len());
            events.push(InlineEvent::Text(tail.offset_by(base)));
        }
    }
}

/// A newline mark is a hard break when a backslash or two spaces lead it.
#[inline]
fn is_hard_break(text: &[u8], pos: u32, end: u32) -> bool {
    text[pos as usize] == b'\\' || end - pos >= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_inline(text: &str) -> Vec<InlineEvent> {
        let mut parser = InlineParser::new();
        let mut events = Vec::new();
        parser.parse(text.as_bytes(), 0, &mut events);
        events
    }

    fn slice<'a>(text: &'a str, range: &Range) -> &'a str {
        range.try_slice_str(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_plain_text() {
        let events = parse_inline("hello world");
        assert_eq!(events, vec![InlineEvent::Text(Range::new(0, 11))]);
    }

    #[test]
    fn test_code_span() {
        let text = "a `b` c";
        let events = parse_inline(text);
        assert_eq!(events.len(), 3);
        match &events[1] {
            InlineEvent::Code(range) => assert_eq!(slice(text, range), "b"),
            other => panic!("Expected Code, got {other:?}"),
        }
    }

    #[test]
    fn test_emphasis_and_strong() {
        let events = parse_inline("*a* **b**");
        assert_eq!(events[0], InlineEvent::EmphasisStart);
        assert_eq!(events[2], InlineEvent::EmphasisEnd);
        assert_eq!(events[4], InlineEvent::StrongStart);
        assert_eq!(events[6], InlineEvent::StrongEnd);
    }

    #[test]
    fn test_emphasis_not_in_code() {
        let events = parse_inline("`*a*`");
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InlineEvent::Code(_)));
    }

    #[test]
    fn test_backslash_escape() {
        let text = "\\*not em\\*";
        let events = parse_inline(text);
        assert_eq!(events[0], InlineEvent::EscapedChar(b'*'));
        assert_eq!(events[2], InlineEvent::EscapedChar(b'*'));
    }

    #[test]
    fn test_breaks() {
        let events = parse_inline("a\nb  \nc\\\nd");
        let breaks: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, InlineEvent::SoftBreak | InlineEvent::HardBreak))
            .collect();
        assert_eq!(
            breaks,
            [&InlineEvent::SoftBreak, &InlineEvent::HardBreak, &InlineEvent::HardBreak]
        );
        assert_eq!(events[2], InlineEvent::Text(Range::new(2, 3)));
    }

    #[test]
    fn test_base_offset_shifts_ranges() {
        let mut parser = InlineParser::new();
        let mut events = Vec::new();
        parser.parse(b"x *y*", 10, &mut events);
        assert_eq!(events[0], InlineEvent::Text(Range::new(10, 12)));
        assert_eq!(events[2], InlineEvent::Text(Range::new(13, 14)));
    }
}
