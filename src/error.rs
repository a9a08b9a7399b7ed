//! Hard parse failures.
//!
//! Rules that do not match return `Ok(false)`; only conditions that make
//! the whole parse unsound are reported through `ParseError`.

use thiserror::Error;

/// Errors that abort a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Block containers are nested deeper than the configured limit.
    #[error("block nesting exceeds the limit of {limit} at line {}", .line + 1)]
    NestingTooDeep {
        /// Zero-based line where the limit was hit.
        line: usize,
        /// Configured maximum nesting level.
        limit: usize,
    },
    /// A rule reported a match without consuming its start line.
    #[error("block rule `{rule}` matched at line {} without consuming it", .line + 1)]
    NoProgress {
        /// Zero-based line the rule was probed at.
        line: usize,
        /// Name of the offending rule.
        rule: &'static str,
    },
}

impl ParseError {
    /// Zero-based line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::NestingTooDeep { line, .. } | Self::NoProgress { line, .. } => *line,
        }
    }
}
