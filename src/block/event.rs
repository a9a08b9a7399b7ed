//! Block-level event types.

use crate::Range;
use crate::inline::InlineEvent;

/// Half-open range of source lines `[start, end)` covered by a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSpan {
    /// First line of the block.
    pub start: usize,
    /// One past the last line consumed by the block.
    pub end: usize,
}

impl LineSpan {
    /// Create a new span.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of a single line.
    #[inline]
    pub const fn line(line: usize) -> Self {
        Self { start: line, end: line + 1 }
    }

    /// Number of lines covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when no line is covered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Type of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bullet list (`*`, `-` or `+`).
    Unordered,
    /// Ordered list with starting number and delimiter.
    Ordered {
        /// Number of the first item.
        start: u32,
        /// Delimiter character (`.` or `)`).
        delimiter: u8,
    },
}

impl ListKind {
    /// True for ordered lists.
    #[inline]
    pub fn is_ordered(self) -> bool {
        matches!(self, Self::Ordered { .. })
    }

    /// Starting number when it differs from the default of 1.
    #[inline]
    pub fn start_value(self) -> Option<u32> {
        match self {
            Self::Ordered { start, .. } if start != 1 => Some(start),
            _ => None,
        }
    }
}

/// Events emitted by the block rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    /// Start of a paragraph.
    ParagraphStart,
    /// End of a paragraph.
    ParagraphEnd,

    /// Start of an ATX heading.
    HeadingStart {
        /// Heading level (1-6).
        level: u8,
    },
    /// End of an ATX heading.
    HeadingEnd {
        /// Heading level (1-6).
        level: u8,
    },

    /// Start of a fenced or indented code block.
    CodeBlockStart {
        /// Info string of a fenced block.
        info: Option<Range>,
    },
    /// End of a code block.
    CodeBlockEnd,
    /// One line of raw code (not inline-parsed).
    Code(Range),
    /// Virtual spaces to prepend to the next code line (from tab expansion).
    VirtualSpaces(u8),

    /// A thematic break.
    ThematicBreak,

    /// One line of inline content, to be parsed by the inline parser.
    Text(Range),

    /// Start of a collapsible disclosure block.
    DisclosureStart {
        /// The opening marker run (`+++`, `>>>>`, ...).
        markup: Range,
        /// `+` opens expanded, `>` opens collapsed.
        expanded: bool,
    },
    /// Summary line of a disclosure block.
    DisclosureSummary {
        /// Trimmed title text.
        title: Range,
        /// Inline events of the title; ranges index the input.
        children: Vec<InlineEvent>,
    },
    /// End of a disclosure block.
    DisclosureEnd,

    /// Start of a list.
    ListStart {
        /// List type (ordered or unordered).
        kind: ListKind,
        /// Whether the list is tight.
        tight: bool,
        /// Marker character (`-`, `*`, `+`, `.` or `)`).
        marker: u8,
        /// Nesting level the list was opened at.
        style_level: usize,
    },
    /// End of a list.
    ListEnd {
        /// List type (ordered or unordered).
        kind: ListKind,
        /// Whether the list is tight.
        tight: bool,
    },

    /// Start of a list item.
    ListItemStart {
        /// Nesting level the item was opened at.
        style_level: usize,
        /// The item's first line looks like a disclosure opener.
        expandable: bool,
        /// Number of an ordered item.
        number: Option<u32>,
    },
    /// End of a list item.
    ListItemEnd,
}

impl BlockEvent {
    /// `1` for events that open a block, `-1` for events that close one,
    /// `0` otherwise.
    pub fn nesting(&self) -> i8 {
        match self {
            Self::ParagraphStart
            | Self::HeadingStart { .. }
            | Self::CodeBlockStart { .. }
            | Self::DisclosureStart { .. }
            | Self::ListStart { .. }
            | Self::ListItemStart { .. } => 1,
            Self::ParagraphEnd
            | Self::HeadingEnd { .. }
            | Self::CodeBlockEnd
            | Self::DisclosureEnd
            | Self::ListEnd { .. }
            | Self::ListItemEnd => -1,
            Self::Code(_)
            | Self::VirtualSpaces(_)
            | Self::ThematicBreak
            | Self::Text(_)
            | Self::DisclosureSummary { .. } => 0,
        }
    }
}

/// A block event with its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub kind: BlockEvent,
    /// Lines covered by the block this event belongs to.
    pub span: LineSpan,
    /// Nesting level the event sits at.
    pub level: usize,
    /// Suppressed from rendering (paragraph wrappers in tight lists).
    pub hidden: bool,
}
