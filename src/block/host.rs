//! Host grammar rules: paragraphs, headings, thematic breaks and code.
//!
//! Just enough of the base grammar for disclosures and lists to nest in.

use crate::Range;
use crate::error::ParseError;
use crate::limits::CODE_INDENT;

use super::engine::{BlockEngine, BlockRule, Mode};
use super::event::{BlockEvent, LineSpan};
use super::state::{BlockState, ParentKind};

/// Contexts the host's interrupting rules may end.
const INTERRUPTS_ALL: &[ParentKind] = &[
    ParentKind::Paragraph,
    ParentKind::Reference,
    ParentKind::Blockquote,
    ParentKind::List,
];

/// Same as [`INTERRUPTS_ALL`] minus lists.
const INTERRUPTS_PARAGRAPH: &[ParentKind] = &[
    ParentKind::Paragraph,
    ParentKind::Reference,
    ParentKind::Blockquote,
];

#[inline]
fn is_code_indented(state: &BlockState<'_>, line: usize) -> bool {
    state.indent(line) >= state.blk_indent + CODE_INDENT
}

/// Emit one `Code` event per line, stripping `columns` of indentation.
fn push_code_lines(state: &mut BlockState<'_>, start: usize, end: usize, columns: usize) {
    for line in start..end {
        let (virtual_spaces, text_start) = state.strip_columns(line, columns);
        if virtual_spaces > 0 {
            let spaces = virtual_spaces.min(u8::MAX as usize) as u8;
            state.push(BlockEvent::VirtualSpaces(spaces), LineSpan::line(line));
        }
        let range = Range::from_usize(text_start, state.line_end(line).max(text_start));
        state.push(BlockEvent::Code(range), LineSpan::line(line));
    }
}

/// Code block made of lines indented by four or more columns.
pub struct IndentedCode;

impl BlockRule for IndentedCode {
    fn name(&self) -> &'static str {
        "indented_code"
    }

    fn probe(
        &self,
        _engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError> {
        if !is_code_indented(state, start) {
            return Ok(false);
        }
        if mode == Mode::Validate {
            return Ok(true);
        }

        let mut next = start + 1;
        let mut last = next;
        while next < end {
            if state.is_blank(next) {
                next += 1;
                continue;
            }
            if is_code_indented(state, next) {
                next += 1;
                last = next;
                continue;
            }
            break;
        }

        let span = LineSpan::new(start, last);
        state.push(BlockEvent::CodeBlockStart { info: None }, span);
        let columns = state.blk_indent + CODE_INDENT;
        push_code_lines(state, start, last, columns);
        state.push(BlockEvent::CodeBlockEnd, span);
        state.line = last;
        Ok(true)
    }
}

/// Fenced code block (backticks or tildes).
pub struct FencedCode;

impl BlockRule for FencedCode {
    fn name(&self) -> &'static str {
        "fence"
    }

    fn terminates(&self) -> &'static [ParentKind] {
        INTERRUPTS_ALL
    }

    fn probe(
        &self,
        _engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError> {
        if is_code_indented(state, start) {
            return Ok(false);
        }
        let pos = state.content_start(start);
        let max = state.line_end(start);
        if pos + 3 > max {
            return Ok(false);
        }
        let fence_char = match state.byte_at(pos) {
            Some(b @ (b'`' | b'~')) => b,
            _ => return Ok(false),
        };
        let run_end = state.skip_byte(pos, max, fence_char);
        let fence_len = run_end - pos;
        if fence_len < 3 {
            return Ok(false);
        }

        let info = Range::from_usize(run_end, max).trim(state.input());
        if fence_char == b'`' && info.slice(state.input()).contains(&b'`') {
            return Ok(false);
        }
        if mode == Mode::Validate {
            return Ok(true);
        }

        let mut next = start;
        let mut closed = false;
        loop {
            next += 1;
            if next >= end {
                break;
            }
            let pos = state.content_start(next);
            let max = state.line_end(next);
            if pos < max && state.indent(next) < state.blk_indent {
                break;
            }
            if state.byte_at(pos) != Some(fence_char) || pos >= max {
                continue;
            }
            if is_code_indented(state, next) {
                continue;
            }
            let run_end = state.skip_byte(pos, max, fence_char);
            if run_end - pos < fence_len {
                continue;
            }
            if state.skip_spaces(run_end, max) < max {
                continue;
            }
            closed = true;
            break;
        }

        let consumed = if closed { next + 1 } else { next };
        let span = LineSpan::new(start, consumed);
        let info = (!info.is_empty()).then_some(info);
        state.push(BlockEvent::CodeBlockStart { info }, span);
        let columns = state.indent(start);
        push_code_lines(state, start + 1, next, columns);
        state.push(BlockEvent::CodeBlockEnd, span);
        state.line = consumed;
        Ok(true)
    }
}

/// Thematic break: three or more `*`, `-` or `_`, optionally spaced.
pub struct ThematicBreak;

impl BlockRule for ThematicBreak {
    fn name(&self) -> &'static str {
        "thematic_break"
    }

    fn terminates(&self) -> &'static [ParentKind] {
        INTERRUPTS_ALL
    }

    fn probe(
        &self,
        _engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        _end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError> {
        if is_code_indented(state, start) {
            return Ok(false);
        }
        let pos = state.content_start(start);
        let max = state.line_end(start);
        let marker = match state.byte_at(pos) {
            Some(b @ (b'*' | b'-' | b'_')) if pos < max => b,
            _ => return Ok(false),
        };

        let mut count = 0;
        for &b in &state.input()[pos..max] {
            if b == marker {
                count += 1;
            } else if b != b' ' && b != b'\t' {
                return Ok(false);
            }
        }
        if count < 3 {
            return Ok(false);
        }
        if mode == Mode::Validate {
            return Ok(true);
        }

        state.push(BlockEvent::ThematicBreak, LineSpan::line(start));
        state.line = start + 1;
        Ok(true)
    }
}

/// ATX heading (`#` through `######`).
pub struct AtxHeading;

impl BlockRule for AtxHeading {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn terminates(&self) -> &'static [ParentKind] {
        INTERRUPTS_PARAGRAPH
    }

    fn probe(
        &self,
        _engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        _end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError> {
        if is_code_indented(state, start) {
            return Ok(false);
        }
        let pos = state.content_start(start);
        let max = state.line_end(start);
        if pos >= max || state.byte_at(pos) != Some(b'#') {
            return Ok(false);
        }

        let after = state.skip_byte(pos, max, b'#');
        let level = after - pos;
        if level > 6 || (after < max && !matches!(state.byte_at(after), Some(b' ' | b'\t'))) {
            return Ok(false);
        }
        if mode == Mode::Validate {
            return Ok(true);
        }

        let content = trim_closing_sequence(state.input(), after, max);
        let span = LineSpan::line(start);
        let level = level as u8;
        state.push(BlockEvent::HeadingStart { level }, span);
        if !content.is_empty() {
            state.push(BlockEvent::Text(content), span);
        }
        state.push(BlockEvent::HeadingEnd { level }, span);
        state.line = start + 1;
        Ok(true)
    }
}

/// Trim whitespace and an optional closing `#` sequence from heading text.
fn trim_closing_sequence(input: &[u8], start: usize, end: usize) -> Range {
    let trimmed = Range::from_usize(start, end).trim(input);
    let (start, mut end) = (trimmed.start_usize(), trimmed.end_usize());

    let mut hashes = end;
    while hashes > start && input[hashes - 1] == b'#' {
        hashes -= 1;
    }
    if hashes < end && (hashes == start || matches!(input[hashes - 1], b' ' | b'\t')) {
        end = hashes;
    }
    Range::from_usize(start, end).trim(input)
}

/// Paragraph: consecutive non-blank lines up to an interrupting block.
pub struct Paragraph;

impl BlockRule for Paragraph {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn probe(
        &self,
        engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        _end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError> {
        if mode == Mode::Validate {
            return Ok(true);
        }

        // Lazy continuation may run past the caller's range, up to line_max.
        let end = state.line_max;
        let mut next = start + 1;
        {
            let mut para = state.scope();
            para.parent = ParentKind::Paragraph;
            while next < end && !para.is_blank(next) {
                if para.indent(next) > para.blk_indent + 3 {
                    next += 1;
                    continue;
                }
                if engine.interrupts(&mut para, ParentKind::Paragraph, next, end)? {
                    break;
                }
                next += 1;
            }
        }

        let span = LineSpan::new(start, next);
        state.push(BlockEvent::ParagraphStart, span);
        for line in start..next {
            let range = Range::from_usize(state.content_start(line), state.line_end(line));
            state.push(BlockEvent::Text(range), LineSpan::line(line));
        }
        state.push(BlockEvent::ParagraphEnd, span);
        state.line = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::block::{BlockEngine, BlockEvent};

    fn parse(input: &str) -> Vec<BlockEvent> {
        BlockEngine::default()
            .parse(input.as_bytes())
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    fn text<'a>(input: &'a str, event: &BlockEvent) -> &'a str {
        match event {
            BlockEvent::Text(range) | BlockEvent::Code(range) => {
                range.try_slice_str(input.as_bytes()).unwrap()
            }
            other => panic!("Expected Text or Code event, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_paragraph() {
        let input = "Hello, world!";
        let events = parse(input);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], BlockEvent::ParagraphStart);
        assert_eq!(text(input, &events[1]), "Hello, world!");
        assert_eq!(events[2], BlockEvent::ParagraphEnd);
    }

    #[test]
    fn test_multiline_paragraph() {
        let input = "Line 1\n  Line 2\nLine 3";
        let events = parse(input);
        assert_eq!(events.len(), 5);
        assert_eq!(text(input, &events[2]), "Line 2");
    }

    #[test]
    fn test_paragraphs_separated_by_blank() {
        let events = parse("Para 1\n\nPara 2");
        assert_eq!(events.len(), 6);
        assert_eq!(events[3], BlockEvent::ParagraphStart);
    }

    #[test]
    fn test_thematic_break_variants() {
        for input in ["---", "***", "___", "- - -", " * * *"] {
            assert_eq!(parse(input), vec![BlockEvent::ThematicBreak], "{input}");
        }
        assert_eq!(parse("--")[0], BlockEvent::ParagraphStart);
        assert_eq!(parse("-*-")[0], BlockEvent::ParagraphStart);
    }

    #[test]
    fn test_thematic_break_interrupts_paragraph() {
        let events = parse("Text\n***");
        assert_eq!(events[2], BlockEvent::ParagraphEnd);
        assert_eq!(events[3], BlockEvent::ThematicBreak);
    }

    #[test]
    fn test_atx_heading() {
        let input = "## Heading ##";
        let events = parse(input);
        assert_eq!(events[0], BlockEvent::HeadingStart { level: 2 });
        assert_eq!(text(input, &events[1]), "Heading");
        assert_eq!(events[2], BlockEvent::HeadingEnd { level: 2 });
    }

    #[test]
    fn test_atx_heading_invalid() {
        assert_eq!(parse("####### Heading")[0], BlockEvent::ParagraphStart);
        assert_eq!(parse("#Heading")[0], BlockEvent::ParagraphStart);
        assert_eq!(parse("#").len(), 2);
    }

    #[test]
    fn test_heading_interrupts_paragraph() {
        let events = parse("Text\n# Heading");
        assert_eq!(events[2], BlockEvent::ParagraphEnd);
        assert_eq!(events[3], BlockEvent::HeadingStart { level: 1 });
    }

    #[test]
    fn test_code_fence_with_info() {
        let input = "```rust\nfn main() {}\n```";
        let events = parse(input);
        assert_eq!(events.len(), 3);
        match &events[0] {
            BlockEvent::CodeBlockStart { info: Some(info) } => {
                assert_eq!(info.try_slice_str(input.as_bytes()).unwrap(), "rust");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(text(input, &events[1]), "fn main() {}");
        assert_eq!(events[2], BlockEvent::CodeBlockEnd);
    }

    #[test]
    fn test_code_fence_unclosed_runs_to_end() {
        let input = "````\ncode\n```";
        let events = parse(input);
        assert_eq!(events.len(), 4);
        assert_eq!(text(input, &events[2]), "```");
    }

    #[test]
    fn test_code_fence_backtick_in_info_invalid() {
        assert_eq!(parse("```rust`extra\ncode\n```")[0], BlockEvent::ParagraphStart);
    }

    #[test]
    fn test_indented_code() {
        let input = "    let x = 1;\n\n      y\nafter";
        let events = parse(input);
        assert_eq!(events[0], BlockEvent::CodeBlockStart { info: None });
        assert_eq!(text(input, &events[1]), "let x = 1;");
        assert_eq!(text(input, &events[2]), "");
        assert_eq!(text(input, &events[3]), "  y");
        assert_eq!(events[4], BlockEvent::CodeBlockEnd);
        assert_eq!(events[5], BlockEvent::ParagraphStart);
    }

    #[test]
    fn test_indented_line_continues_paragraph() {
        let events = parse("Text\n    more");
        assert_eq!(events.len(), 4);
    }
}
