//! DoS prevention constants and grammar limits.
//!
//! These bound recursion and scanning so that adversarial input fails
//! deterministically instead of exhausting the stack.

/// Default maximum nesting level for block containers
/// (disclosures, lists and list items each add one level).
pub const MAX_BLOCK_NESTING: usize = 32;

/// Maximum digits in an ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Minimum length of a disclosure marker run (`+++` or `>>>`).
pub const MIN_DISCLOSURE_RUN: usize = 3;

/// Columns of indentation that turn a line into indented code.
pub const CODE_INDENT: usize = 4;

/// Maximum backtick run length for code spans (prevents O(n^2) matching)
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum number of marks collected during inline parsing
pub const MAX_INLINE_MARKS: usize = 4096;
