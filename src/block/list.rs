//! Ordered and bullet lists that tag items opening a disclosure.
//!
//! Item indentation and tight/loose detection follow the host's list
//! grammar. An item whose first line reads `- +++ Title` (or any marker,
//! one space, then a `+++`/`>>>` run) is flagged expandable; the flag
//! only depends on that text.

use log::trace;

use crate::error::ParseError;
use crate::limits::CODE_INDENT;

use super::engine::{BlockEngine, BlockRule, Mode};
use super::event::{BlockEvent, LineSpan, ListKind};
use super::marker::{
    ListMarker, MarkerKind, is_expandable, scan_bullet, scan_list_marker, scan_ordered,
};
use super::state::{BlockState, ParentKind};

/// Block rule for ordered and bullet lists.
pub struct ClassyList;

impl BlockRule for ClassyList {
    fn name(&self) -> &'static str {
        "classy_list"
    }

    fn terminates(&self) -> &'static [ParentKind] {
        &[ParentKind::Paragraph, ParentKind::Reference, ParentKind::Blockquote]
    }

    fn probe(
        &self,
        engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError> {
        let indent = state.indent(start);
        if indent >= state.blk_indent + CODE_INDENT {
            return Ok(false);
        }

        //  - item 1
        //      - this one is a paragraph continuation
        if let Some(list_indent) = state.list_indent {
            if indent >= list_indent + CODE_INDENT && indent < state.blk_indent {
                return Ok(false);
            }
        }

        let interrupting = mode == Mode::Validate
            && state.parent == ParentKind::Paragraph
            && indent >= state.blk_indent;

        let pos = state.content_start(start);
        let max = state.line_end(start);
        let Some(marker) = scan_list_marker(state.input(), pos, max) else {
            return Ok(false);
        };

        if interrupting {
            // "1984. was a year" stays in the paragraph
            if matches!(marker.kind, MarkerKind::Ordered { value } if value != 1) {
                return Ok(false);
            }
            if state.skip_spaces(marker.end, max) >= max {
                return Ok(false);
            }
        }

        if mode == Mode::Validate {
            return Ok(true);
        }

        commit(engine, state, start, end, marker)?;
        Ok(true)
    }
}

/// Consume the list starting at `start`, whose first marker is `first`.
fn commit(
    engine: &BlockEngine,
    state: &mut BlockState<'_>,
    start: usize,
    end: usize,
    first: ListMarker,
) -> Result<(), ParseError> {
    let input = state.input();
    let glyph = first.glyph(input);
    let kind = match first.kind {
        MarkerKind::Ordered { value } => ListKind::Ordered {
            start: value,
            delimiter: glyph,
        },
        MarkerKind::Bullet => ListKind::Unordered,
    };

    let list_level = state.level;
    let list_idx = state.push(
        BlockEvent::ListStart {
            kind,
            tight: true,
            marker: glyph,
            style_level: list_level,
        },
        LineSpan::new(start, start),
    );

    let mut tight = true;
    let mut prev_empty_end = false;
    let mut next = start;
    let mut marker = first;

    {
        let mut list = state.scope();
        list.parent = ParentKind::List;

        while next < end {
            let item_start = next;
            let max = list.line_end(item_start);
            let initial = list.indent(item_start) + (marker.end - list.content_start(item_start));

            let mut offset = initial;
            let mut pos = marker.end;
            while pos < max {
                match input[pos] {
                    b'\t' => offset += 4 - offset % 4,
                    b' ' => offset += 1,
                    _ => break,
                }
                pos += 1;
            }
            let content_start = pos;

            // "-    \n  3": empty first line, indent is 1
            let mut indent_after = if content_start >= max { 1 } else { offset - initial };
            // More than four spaces: the rest is indented code
            if indent_after > CODE_INDENT {
                indent_after = 1;
            }
            let item_indent = initial + indent_after;

            let expandable = is_expandable(input, marker.start, max);
            let number = match marker.kind {
                MarkerKind::Ordered { value } => Some(value),
                MarkerKind::Bullet => None,
            };
            let style_level = list.level;
            let item_idx = list.push(
                BlockEvent::ListItemStart {
                    style_level,
                    expandable,
                    number,
                },
                LineSpan::new(item_start, item_start),
            );

            let item_tight = {
                let mut item = list.scope();
                item.list_indent = Some(item.blk_indent);
                item.blk_indent = item_indent;
                item.tight = true;
                item.set_item_line(item_start, content_start, offset);

                if content_start >= max && item.is_blank(item_start + 1) {
                    // "-\n\n  foo": the item is empty and the list ends
                    item.line = (item_start + 2).min(end);
                } else {
                    engine.tokenize(&mut item, item_start, end)?;
                }
                item.tight
            };

            if !item_tight || prev_empty_end {
                tight = false;
            }
            // A trailing blank only loosens the list if another item follows.
            prev_empty_end = list.line - item_start > 1 && list.is_blank(list.line - 1);

            next = list.line;
            list.push(BlockEvent::ListItemEnd, LineSpan::new(item_start, next));
            list.close_span(item_idx, next);

            if next >= end {
                break;
            }
            if list.indent(next) < list.blk_indent {
                break;
            }
            if list.indent(next) >= list.blk_indent + CODE_INDENT {
                break;
            }
            if engine.interrupts(&mut list, ParentKind::List, next, end)? {
                break;
            }

            let pos = list.content_start(next);
            let max = list.line_end(next);
            let found = if kind.is_ordered() {
                scan_ordered(input, pos, max)
            } else {
                scan_bullet(input, pos, max)
            };
            match found {
                Some(found) if found.glyph(input) == glyph => marker = found,
                _ => {
                    trace!("list at line {start} ends at line {next}: no matching marker");
                    break;
                }
            }
        }
    }

    state.push(BlockEvent::ListEnd { kind, tight }, LineSpan::new(start, next));
    state.close_span(list_idx, next);
    if let BlockEvent::ListStart { tight: t, .. } = &mut state.events_mut()[list_idx].kind {
        *t = tight;
    }
    state.line = next;

    if tight {
        hide_paragraphs(state, list_idx, list_level + 2);
    }
    Ok(())
}

/// Hide paragraph wrappers directly inside the items of a tight list.
fn hide_paragraphs(state: &mut BlockState<'_>, list_idx: usize, level: usize) {
    for event in &mut state.events_mut()[list_idx + 1..] {
        if event.level == level
            && matches!(event.kind, BlockEvent::ParagraphStart | BlockEvent::ParagraphEnd)
        {
            event.hidden = true;
        }
    }
}
