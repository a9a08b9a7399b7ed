//! Emphasis and strong emphasis resolution.
//!
//! Openers wait on one stack per delimiter byte. A closer consumes
//! delimiters from the nearest compatible opener, two at a time when both
//! sides have two, and keeps closing while it has delimiters left.

use smallvec::SmallVec;

use super::marks::Mark;

/// A matched opener/closer delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmphasisMatch {
    /// Start position of the opener delimiters.
    pub opener_start: u32,
    /// End position of the opener delimiters.
    pub opener_end: u32,
    /// Start position of the closer delimiters.
    pub closer_start: u32,
    /// End position of the closer delimiters.
    pub closer_end: u32,
    /// 1 for emphasis, 2 for strong.
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
struct Opener {
    idx: usize,
    /// Run length before any delimiters were consumed.
    orig_len: u32,
    /// The run could also have closed.
    both: bool,
}

type Stack = SmallVec<[Opener; 8]>;

/// Resolve emphasis over `marks`, appending matches to `matches`.
pub fn resolve_emphasis(marks: &mut [Mark], matches: &mut Vec<EmphasisMatch>) {
    matches.clear();
    let mut stars: Stack = SmallVec::new();
    let mut underscores: Stack = SmallVec::new();

    for i in 0..marks.len() {
        let mark = marks[i];
        if !matches!(mark.ch, b'*' | b'_') || mark.in_code() {
            continue;
        }
        let orig_len = mark.len();
        let both = mark.can_open() && mark.can_close();

        if mark.can_close() {
            loop {
                let stack = if mark.ch == b'*' { &mut stars } else { &mut underscores };
                let Some(pos) = find_opener(stack, orig_len, both) else {
                    break;
                };
                let opener = stack[pos];
                // Delimiters between the pair can no longer match.
                stack.truncate(pos + 1);
                let other = if mark.ch == b'*' { &mut underscores } else { &mut stars };
                other.retain(|o| o.idx < opener.idx);

                let count = if marks[opener.idx].len() >= 2 && marks[i].len() >= 2 { 2 } else { 1 };
                let (opener_mark, closer_mark) = (marks[opener.idx], marks[i]);
                matches.push(EmphasisMatch {
                    opener_start: opener_mark.end - count,
                    opener_end: opener_mark.end,
                    closer_start: closer_mark.pos,
                    closer_end: closer_mark.pos + count,
                    count,
                });

                let opener_mark = &mut marks[opener.idx];
                opener_mark.end -= count;
                if opener_mark.len() == 0 {
                    opener_mark.resolve();
                    let stack = if mark.ch == b'*' { &mut stars } else { &mut underscores };
                    stack.pop();
                }
                let closer_mark = &mut marks[i];
                closer_mark.pos += count;
                if closer_mark.len() == 0 {
                    closer_mark.resolve();
                    break;
                }
            }
        }

        let mark = marks[i];
        if mark.can_open() {
            let stack = if mark.ch == b'*' { &mut stars } else { &mut underscores };
            stack.push(Opener { idx: i, orig_len, both });
        }
    }
}

/// Index in `stack` of the nearest opener the closer may pair with.
fn find_opener(stack: &Stack, closer_len: u32, closer_both: bool) -> Option<usize> {
    stack.iter().rposition(|opener| {
        // Rule of three: a run that can both open and close only pairs when
        // the lengths do not sum to a multiple of three, unless both are.
        !((opener.both || closer_both)
            && (opener.orig_len + closer_len) % 3 == 0
            && !(opener.orig_len % 3 == 0 && closer_len % 3 == 0))
    })
}
