//! Parse context shared by all block rules.
//!
//! `BlockState` is owned by a single parse. Rules that descend into nested
//! content open a [`ScopeGuard`], change indentation or bounds through it,
//! and get the previous values back when the guard is dropped, whichever
//! way the nested call exits.

use std::ops::{Deref, DerefMut};

use crate::lines::{Line, LineTable};

use super::event::{BlockEvent, Event, LineSpan};

/// Kind of block enclosing the rule being probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    /// Top of the document or a list item body.
    Root,
    /// Inside a paragraph (probing for interruptions).
    Paragraph,
    /// Inside a disclosure body.
    Reference,
    /// Inside a blockquote.
    Blockquote,
    /// Inside a list (probing for list termination).
    List,
}

impl ParentKind {
    /// Number of parent kinds.
    pub const COUNT: usize = 5;

    /// Dense index for per-kind tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Root => 0,
            Self::Paragraph => 1,
            Self::Reference => 2,
            Self::Blockquote => 3,
            Self::List => 4,
        }
    }
}

/// Shift applied to the first line of a list item, so nested rules see
/// the item content rather than the list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemLine {
    line: usize,
    shift: usize,
    indent: usize,
}

/// The fields a scope guard restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scope {
    line_max: usize,
    blk_indent: usize,
    list_indent: Option<usize>,
    tight: bool,
    parent: ParentKind,
    level: usize,
    item_line: Option<ItemLine>,
}

/// Mutable state of one block parse.
pub struct BlockState<'a> {
    input: &'a [u8],
    lines: &'a LineTable,
    /// Cursor: first line not yet consumed.
    pub(crate) line: usize,
    /// Upper bound for lazy continuation.
    pub(crate) line_max: usize,
    /// Indentation column of the current block container.
    pub(crate) blk_indent: usize,
    /// Indentation column of the enclosing list, if any.
    pub(crate) list_indent: Option<usize>,
    /// Cleared when blank lines separate blocks of the current container.
    pub(crate) tight: bool,
    /// Kind of the enclosing block.
    pub(crate) parent: ParentKind,
    /// Current nesting level.
    pub(crate) level: usize,
    item_line: Option<ItemLine>,
    events: Vec<Event>,
}

impl<'a> BlockState<'a> {
    /// Create a fresh context covering every line of `lines`.
    pub fn new(input: &'a [u8], lines: &'a LineTable) -> Self {
        Self {
            input,
            lines,
            line: 0,
            line_max: lines.len(),
            blk_indent: 0,
            list_indent: None,
            tight: false,
            parent: ParentKind::Root,
            level: 0,
            item_line: None,
            events: Vec::with_capacity((input.len() / 16).max(16)),
        }
    }

    /// Source bytes.
    #[inline]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Current cursor line.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Upper line bound for lazy continuation.
    #[inline]
    pub fn line_max(&self) -> usize {
        self.line_max
    }

    /// Indentation column of the current block container.
    #[inline]
    pub fn blk_indent(&self) -> usize {
        self.blk_indent
    }

    /// Indentation column of the enclosing list.
    #[inline]
    pub fn list_indent(&self) -> Option<usize> {
        self.list_indent
    }

    /// Kind of the enclosing block.
    #[inline]
    pub fn parent(&self) -> ParentKind {
        self.parent
    }

    /// Current nesting level.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Events emitted so far.
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consume the state, returning the event stream.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    #[inline]
    fn raw(&self, line: usize) -> &Line {
        self.lines.get(line)
    }

    /// Offset of the first content byte of `line`.
    #[inline]
    pub fn content_start(&self, line: usize) -> usize {
        let raw = self.raw(line);
        match self.item_line {
            Some(item) if item.line == line => raw.begin + item.shift,
            _ => raw.content_start(),
        }
    }

    /// Offset of the first byte of `line`, ignoring indentation.
    #[inline]
    pub fn line_begin(&self, line: usize) -> usize {
        self.raw(line).begin
    }

    /// Offset one past the last content byte of `line`.
    #[inline]
    pub fn line_end(&self, line: usize) -> usize {
        self.raw(line).end
    }

    /// Indentation of `line` in columns.
    #[inline]
    pub fn indent(&self, line: usize) -> usize {
        match self.item_line {
            Some(item) if item.line == line => item.indent,
            _ => self.raw(line).indent,
        }
    }

    /// True when `line` has no content (past-the-end lines count as blank).
    #[inline]
    pub fn is_blank(&self, line: usize) -> bool {
        self.content_start(line) >= self.line_end(line)
    }

    /// First non-blank line at or after `from`, bounded by `line_max`.
    pub fn skip_blank_lines(&self, mut from: usize) -> usize {
        while from < self.line_max && self.is_blank(from) {
            from += 1;
        }
        from
    }

    /// Byte at `pos`, if inside the input.
    #[inline]
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.get(pos).copied()
    }

    /// Skip spaces and tabs starting at `pos`, stopping at `max`.
    pub fn skip_spaces(&self, mut pos: usize, max: usize) -> usize {
        while pos < max && matches!(self.input[pos], b' ' | b'\t') {
            pos += 1;
        }
        pos
    }

    /// Skip a run of `byte` starting at `pos`, stopping at `max`.
    pub fn skip_byte(&self, mut pos: usize, max: usize, byte: u8) -> usize {
        while pos < max && self.input[pos] == byte {
            pos += 1;
        }
        pos
    }

    /// Strip up to `columns` columns of indentation from `line`.
    ///
    /// Bytes before the line's content start count as one column each, so
    /// the marker of a list item's first line is stripped like indentation.
    /// Returns the number of virtual spaces left over from a partially
    /// consumed tab and the offset where the remaining text starts.
    pub fn strip_columns(&self, line: usize, columns: usize) -> (usize, usize) {
        let begin = self.line_begin(line);
        let end = self.line_end(line);
        let shift = self.content_start(line) - begin;
        let mut col = 0;
        let mut pos = begin;

        while pos < end && col < columns {
            match self.input[pos] {
                b'\t' => col += 4 - col % 4,
                b' ' => col += 1,
                _ if pos - begin < shift => col += 1,
                _ => break,
            }
            pos += 1;
        }

        (col.saturating_sub(columns), pos)
    }

    /// Override the content start and indentation of a list item's first line.
    pub(crate) fn set_item_line(&mut self, line: usize, content_start: usize, indent: usize) {
        let shift = content_start - self.line_begin(line);
        self.item_line = Some(ItemLine { line, shift, indent });
    }

    /// Append an event, tracking the nesting level. Returns its index.
    pub(crate) fn push(&mut self, kind: BlockEvent, span: LineSpan) -> usize {
        let nesting = kind.nesting();
        if nesting < 0 {
            self.level = self.level.saturating_sub(1);
        }
        self.events.push(Event {
            kind,
            span,
            level: self.level,
            hidden: false,
        });
        if nesting > 0 {
            self.level += 1;
        }
        self.events.len() - 1
    }

    /// Finalize the span of a block opened at `index`.
    pub(crate) fn close_span(&mut self, index: usize, end: usize) {
        if let Some(event) = self.events.get_mut(index) {
            event.span.end = end;
        }
    }

    pub(crate) fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    /// Open a scope whose field changes are undone when it is dropped.
    pub fn scope(&mut self) -> ScopeGuard<'_, 'a> {
        ScopeGuard::new(self)
    }

    fn snapshot(&self) -> Scope {
        Scope {
            line_max: self.line_max,
            blk_indent: self.blk_indent,
            list_indent: self.list_indent,
            tight: self.tight,
            parent: self.parent,
            level: self.level,
            item_line: self.item_line,
        }
    }

    fn restore(&mut self, scope: Scope) {
        self.line_max = scope.line_max;
        self.blk_indent = scope.blk_indent;
        self.list_indent = scope.list_indent;
        self.tight = scope.tight;
        self.parent = scope.parent;
        self.level = scope.level;
        self.item_line = scope.item_line;
    }
}

/// Snapshot of the scoped context fields, restored on drop.
///
/// Dereferences to the guarded [`BlockState`], so nested calls take
/// `&mut *guard` and guards can be stacked.
pub struct ScopeGuard<'s, 'a> {
    state: &'s mut BlockState<'a>,
    saved: Scope,
}

impl<'s, 'a> ScopeGuard<'s, 'a> {
    /// Snapshot `state`.
    pub fn new(state: &'s mut BlockState<'a>) -> Self {
        let saved = state.snapshot();
        Self { state, saved }
    }
}

impl<'a> Deref for ScopeGuard<'_, 'a> {
    type Target = BlockState<'a>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for ScopeGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        self.state.restore(self.saved);
    }
}
