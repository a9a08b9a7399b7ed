//! Block-level parser.
//!
//! Line-oriented and rule driven. The engine tries each registered rule in
//! order; container rules (disclosures and list items) call back into the
//! engine for their bodies. Rules:
//! - Indented and fenced code
//! - Disclosure blocks (`+++` / `>>>`)
//! - Thematic breaks
//! - Lists
//! - ATX headings
//! - Paragraphs

mod disclosure;
mod engine;
mod event;
mod host;
mod list;
mod marker;
mod state;

pub use engine::{BlockEngine, BlockRule, Mode};
pub use event::{BlockEvent, Event, LineSpan, ListKind};
pub use state::{BlockState, ParentKind, ScopeGuard};
