//! Inline-level event types.

use crate::Range;

/// Events emitted by the inline phrase parser.
///
/// Ranges index the buffer handed to the parser, shifted by its base
/// offset, so summary titles resolve straight against the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineEvent {
    /// Plain text content.
    Text(Range),

    /// Code span content, backticks and padding stripped.
    Code(Range),

    /// Start of emphasis (`*em*` or `_em_`).
    EmphasisStart,
    /// End of emphasis.
    EmphasisEnd,

    /// Start of strong emphasis (`**strong**` or `__strong__`).
    StrongStart,
    /// End of strong emphasis.
    StrongEnd,

    /// Soft line break (newline in source).
    SoftBreak,

    /// Hard line break (two spaces or a backslash before the newline).
    HardBreak,

    /// Backslash escape: the escaped character.
    EscapedChar(u8),
}
