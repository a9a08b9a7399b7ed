//! Rule table and the shared block tokenizer.

use log::{debug, trace};

use crate::Options;
use crate::error::ParseError;
use crate::lines::LineTable;

use super::disclosure::DisclosureRule;
use super::event::Event;
use super::host::{AtxHeading, FencedCode, IndentedCode, Paragraph, ThematicBreak};
use super::list::ClassyList;
use super::state::{BlockState, ParentKind};

/// How a rule is being asked about a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report whether the rule would match; no state change, no events.
    Validate,
    /// Consume lines and emit events on a match.
    Commit,
}

/// A block-recognition rule.
///
/// `probe` returns `Ok(false)` when the rule does not match at `start`.
/// On a committed match it must advance `state.line` past `start`.
pub trait BlockRule: Send + Sync {
    /// Rule name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Enclosing contexts this rule may interrupt.
    fn terminates(&self) -> &'static [ParentKind] {
        &[]
    }

    /// Try the rule at line `start`, scanning no further than `end`.
    fn probe(
        &self,
        engine: &BlockEngine,
        state: &mut BlockState<'_>,
        start: usize,
        end: usize,
        mode: Mode,
    ) -> Result<bool, ParseError>;
}

/// Ordered block rules plus the tokenizer that dispatches over them.
///
/// The rule order is fixed at construction; earlier rules win.
pub struct BlockEngine {
    rules: Vec<Box<dyn BlockRule>>,
    terminators: [Vec<usize>; ParentKind::COUNT],
    max_nesting: usize,
}

impl BlockEngine {
    /// Build the rule table for `options`.
    pub fn new(options: &Options) -> Self {
        let mut rules: Vec<Box<dyn BlockRule>> = Vec::with_capacity(7);
        rules.push(Box::new(IndentedCode));
        if options.disclosures {
            rules.push(Box::new(DisclosureRule));
        }
        rules.push(Box::new(FencedCode));
        rules.push(Box::new(ThematicBreak));
        if options.classy_lists {
            rules.push(Box::new(ClassyList));
        }
        rules.push(Box::new(AtxHeading));
        rules.push(Box::new(Paragraph));

        let mut terminators: [Vec<usize>; ParentKind::COUNT] = Default::default();
        for (idx, rule) in rules.iter().enumerate() {
            for parent in rule.terminates() {
                terminators[parent.index()].push(idx);
            }
        }

        Self {
            rules,
            terminators,
            max_nesting: options.max_nesting,
        }
    }

    /// Names of the registered rules, in priority order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Parse a whole document.
    pub fn parse(&self, input: &[u8]) -> Result<Vec<Event>, ParseError> {
        let lines = LineTable::new(input);
        let mut state = BlockState::new(input, &lines);
        self.tokenize(&mut state, 0, lines.len())?;
        Ok(state.into_events())
    }

    /// Tokenize lines `[start, end)` into `state`.
    ///
    /// Stops early at the first line indented less than the current block
    /// indent; `state.line` tells the caller where tokenizing ended. On
    /// error the cursor and nesting level are put back to their values on
    /// entry.
    pub fn tokenize(
        &self,
        state: &mut BlockState<'_>,
        start: usize,
        end: usize,
    ) -> Result<(), ParseError> {
        let (entry_line, entry_level) = (state.line, state.level);
        let result = self.tokenize_lines(state, start, end);
        if result.is_err() {
            state.line = entry_line;
            state.level = entry_level;
        }
        result
    }

    fn tokenize_lines(
        &self,
        state: &mut BlockState<'_>,
        start: usize,
        end: usize,
    ) -> Result<(), ParseError> {
        let mut line = start;
        let mut has_blank_lines = false;

        while line < end {
            line = state.skip_blank_lines(line);
            state.line = line;
            if line >= end {
                break;
            }

            // Content belongs to an enclosing container.
            if state.indent(line) < state.blk_indent {
                break;
            }

            if state.level >= self.max_nesting {
                debug!("nesting limit {} reached at line {}", self.max_nesting, line);
                return Err(ParseError::NestingTooDeep {
                    line,
                    limit: self.max_nesting,
                });
            }

            self.dispatch(state, line, end)?;

            state.tight = !has_blank_lines;
            if state.is_blank(state.line.saturating_sub(1)) {
                has_blank_lines = true;
            }

            line = state.line;
            if line < end && state.is_blank(line) {
                has_blank_lines = true;
                line += 1;
                state.line = line;
            }
        }

        Ok(())
    }

    /// Run the first matching rule at `line`.
    fn dispatch(
        &self,
        state: &mut BlockState<'_>,
        line: usize,
        end: usize,
    ) -> Result<(), ParseError> {
        for rule in &self.rules {
            if rule.probe(self, state, line, end, Mode::Commit)? {
                if state.line <= line {
                    return Err(ParseError::NoProgress {
                        line,
                        rule: rule.name(),
                    });
                }
                trace!("{} matched lines {}..{}", rule.name(), line, state.line);
                return Ok(());
            }
        }
        Err(ParseError::NoProgress {
            line,
            rule: "<none>",
        })
    }

    /// True when a rule that may interrupt `parent` matches at `line`.
    pub fn interrupts(
        &self,
        state: &mut BlockState<'_>,
        parent: ParentKind,
        line: usize,
        end: usize,
    ) -> Result<bool, ParseError> {
        for &idx in &self.terminators[parent.index()] {
            let rule = &self.rules[idx];
            if rule.probe(self, state, line, end, Mode::Validate)? {
                trace!("{} interrupts {:?} at line {}", rule.name(), parent, line);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for BlockEngine {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}
