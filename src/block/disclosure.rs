//! Disclosure blocks: `+++ Title` (expanded) or `>>> Title` (collapsed),
//! closed by a line holding a run of the same glyph at least as long.
//!
//! ```text
//! +++ Section that starts open
//! - one
//! - two
//! +++
//! ```
//!
//! A block without a closing line ends where its enclosing scope ends.

use log::debug;

use crate::Range;
use crate::error::ParseError;
use crate::inline::InlineParser;
use crate::limits::CODE_INDENT;

use super::engine::{BlockEngine, BlockRule, Mode};
use super::event::{BlockEvent, LineSpan};
use super::marker::MarkerRun;
use super::state::{BlockState, ParentKind};

/// Block rule for disclosure blocks.
pub struct DisclosureRule;

/// An opening line that passed every check.
struct Opener {
    run: MarkerRun,
    title: Range,
}

impl DisclosureRule {
    fn scan_opener(state: &BlockState<'_>, line: usize) -> Option<Opener> {
        if state.indent(line) >= state.blk_indent + CODE_INDENT {
            return None;
        }
        let input = state.input();
        let pos = state.content_start(line);
        let max = state.line_end(line);

        let run = MarkerRun::scan(input, pos, max).filter(MarkerRun::is_opener)?;
        let title = Range::from_usize(run.end, max).trim(input);
        if title.is_empty() {
            return None;
        }
        // `+++ Title +++` would close itself on one line
        if title.ends_with_run(input, run.glyph.byte(), run.len()) {
            return None;
        }
        Some(Opener { run, title })
    }

    /// True when `line` closes a block opened by `open`.
    fn is_closer(state: &BlockState<'_>, line: usize, open: &MarkerRun) -> bool {
        let pos = state.content_start(line);
        let max = state.line_end(line);
        if state.indent(line) >= state.blk_indent + CODE_INDENT {
            return false;
        }
        let run = MarkerRun::scan_glyph(state.input(), pos, max, open.glyph);
        run.len() >= open.len() && state.skip_spaces(run.end, max) >= max
    }
}

impl BlockRule for DisclosureRule {
    fn name(&self) -> &'static str {
        "disclosure"
    }

    fn terminates(&self) -> &'static [ParentKind] {
        &[
            ParentKind::Paragraph,
            ParentKind::Reference,
            ParentKind::Blockquote,
            ParentKind::List,
        ]
    }

    fn probe(
        &self,
        engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError> {
        let Some(Opener { run, title }) = Self::scan_opener(state, start) else {
            return Ok(false);
        };
        if mode == Mode::Validate {
            return Ok(true);
        }

        let mut next = start;
        let mut closed = false;
        let mut has_content = false;
        loop {
            next += 1;
            if next >= end {
                break;
            }
            let blank = state.is_blank(next);
            // Non-blank line below the block indent belongs to a parent.
            if !blank && state.indent(next) < state.blk_indent {
                break;
            }
            if !blank && Self::is_closer(state, next, &run) {
                closed = true;
                break;
            }
            has_content |= !blank;
        }

        if !has_content {
            debug!("disclosure at line {start} declined: empty body");
            return Ok(false);
        }
        if !closed {
            debug!("disclosure at line {start} auto-closed at line {next}");
        }

        let consumed = if closed { next + 1 } else { next };
        let span = LineSpan::new(start, consumed);
        let input = state.input();

        state.push(
            BlockEvent::DisclosureStart {
                markup: Range::from_usize(run.start, run.end),
                expanded: run.glyph.expanded(),
            },
            span,
        );

        let mut children = Vec::new();
        InlineParser::new().parse(title.slice(input), title.start, &mut children);
        state.push(BlockEvent::DisclosureSummary { title, children }, LineSpan::line(start));

        {
            let mut body = state.scope();
            body.parent = ParentKind::Reference;
            // Lazy paragraph continuation must not run past the close line.
            body.line_max = next;
            engine.tokenize(&mut body, start + 1, next)?;
        }

        state.push(BlockEvent::DisclosureEnd, span);
        state.line = consumed;
        Ok(true)
    }
}
