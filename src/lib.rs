//! foldmark: line-oriented Markdown parsing with collapsible disclosure
//! blocks and classed lists.
//!
//! Two block constructs sit on top of a small markdown-it style host
//! grammar (paragraphs, headings, code, thematic breaks):
//!
//! - **Disclosure blocks.** `+++ Title` opens a block that starts expanded,
//!   `>>> Title` one that starts collapsed. A line holding a run of the
//!   same glyph at least as long closes it; without one the block ends with
//!   its enclosing scope.
//! - **Classy lists.** Ordered and bullet lists whose items carry a nesting
//!   level class, and an `expandable` flag when the item opens with a
//!   disclosure marker.
//!
//! # Design Principles
//! - Events, not an AST: ranges index the input buffer
//! - Rules probe in validate mode before they commit
//! - Context changes around nested parses are undone by scope guards
//! - Nesting depth is bounded; exceeding it is an error, not a stack overflow
//!
//! # Example
//! ```
//! let html = foldmark::to_html("+++ Details\nHidden *text*\n+++").unwrap();
//! assert!(html.starts_with("<details class=\"collapsible\" open>"));
//! assert!(html.contains("<em>text</em>"));
//! ```

pub mod block;
pub mod error;
pub mod inline;
pub mod limits;
pub mod lines;
pub mod range;
pub mod render;

pub use block::{BlockEngine, BlockEvent, Event, LineSpan, ListKind};
pub use error::ParseError;
pub use inline::{InlineEvent, InlineParser};
pub use lines::LineTable;
pub use range::Range;
pub use render::{HtmlRenderer, HtmlWriter};

/// Parsing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum block nesting level; deeper input fails with
    /// [`ParseError::NestingTooDeep`].
    pub max_nesting: usize,
    /// Recognize `+++` / `>>>` disclosure blocks.
    pub disclosures: bool,
    /// Recognize lists. When off, list syntax reads as paragraph text.
    pub classy_lists: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_nesting: limits::MAX_BLOCK_NESTING,
            disclosures: true,
            classy_lists: true,
        }
    }
}

/// Parse `input` into block events.
///
/// # Example
/// ```
/// use foldmark::{parse, BlockEvent};
///
/// let events = parse(">>> Closed\nbody").unwrap();
/// assert!(matches!(
///     events[0].kind,
///     BlockEvent::DisclosureStart { expanded: false, .. }
/// ));
/// ```
pub fn parse(input: &str) -> Result<Vec<Event>, ParseError> {
    parse_with_options(input, &Options::default())
}

/// Parse `input` into block events with options.
pub fn parse_with_options(input: &str, options: &Options) -> Result<Vec<Event>, ParseError> {
    BlockEngine::new(options).parse(input.as_bytes())
}

/// Convert Markdown to HTML.
///
/// # Example
/// ```
/// let html = foldmark::to_html("- one\n- two").unwrap();
/// assert_eq!(
///     html,
///     "<ul class=\"lvl-0\">\n<li class=\"lvl-1\">one</li>\n<li class=\"lvl-1\">two</li>\n</ul>\n"
/// );
/// ```
pub fn to_html(input: &str) -> Result<String, ParseError> {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> Result<String, ParseError> {
    let events = parse_with_options(input, options)?;
    Ok(HtmlRenderer::new(input.as_bytes()).render(&events))
}
