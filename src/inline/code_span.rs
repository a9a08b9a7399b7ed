//! Code span resolution.
//!
//! Code spans bind tighter than emphasis. Backtick runs match only runs
//! of the same length.

use super::marks::{Mark, flags};

/// A resolved code span, positions relative to the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpan {
    /// Start of the opening backticks.
    pub opener_pos: u32,
    /// End of the opening backticks.
    pub opener_end: u32,
    /// Start of the closing backticks.
    pub closer_pos: u32,
    /// End of the closing backticks.
    pub closer_end: u32,
}

impl CodeSpan {
    /// Content between the backticks, with one space of padding stripped
    /// from each side when both sides have it and the content is not all
    /// spaces.
    pub fn content_range(&self, text: &[u8]) -> (u32, u32) {
        let (start, end) = (self.opener_end, self.closer_pos);
        let content = &text[start as usize..end as usize];
        let padded = |b: &u8| matches!(b, b' ' | b'\n');
        if content.len() >= 2
            && content.first().is_some_and(padded)
            && content.last().is_some_and(padded)
            && !content.iter().all(padded)
        {
            (start + 1, end - 1)
        } else {
            (start, end)
        }
    }
}

/// Pair backtick marks and collect the spans they form.
///
/// Marks between a matched pair are flagged `IN_CODE`.
pub fn resolve_code_spans(marks: &mut [Mark], spans: &mut Vec<CodeSpan>) {
    spans.clear();
    let len = marks.len();
    let mut i = 0;

    while i < len {
        if marks[i].ch != b'`' || marks[i].is_resolved() {
            i += 1;
            continue;
        }

        let opener_len = marks[i].len();
        let closer = ((i + 1)..len).find(|&j| marks[j].ch == b'`' && marks[j].len() == opener_len);

        match closer {
            Some(j) => {
                marks[i].resolve();
                marks[j].resolve();
                for mark in &mut marks[i + 1..j] {
                    mark.flags |= flags::IN_CODE;
                }
                spans.push(CodeSpan {
                    opener_pos: marks[i].pos,
                    opener_end: marks[i].end,
                    closer_pos: marks[j].pos,
                    closer_end: marks[j].end,
                });
                i = j + 1;
            }
            None => i += 1,
        }
    }
}
