// Copyright 2016 The Fancy Regex Authors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! Backtracking VM that walks the block graph produced by the compiler.
//!
//! The VM keeps one logical thread alive at a time: a `(block, pc, index)`
//! triple. Most ops just advance `pc` (and sometimes `index`). `Split`
//! is the interesting one: it spawns a second path to try later. Rather
//! than recursing, we push a snapshot of the current thread onto an
//! explicit backtrack stack and keep going down the first arm. If that
//! arm eventually dead-ends, we "unwind": peek or pop the stack and
//! resume the other arm.
//!
//! A small instruction sequence for `ab|ac`, in block form:
//!
//! ```text
//! block 0: Split(1, 2)
//! block 1: Char('a') Char('b') Jump(3)
//! block 2: Char('a') Char('c') Jump(3)
//! block 3: End
//! ```
//!
//! Matching `"ac"` against it: block 0 pushes a snapshot remembering block 2
//! as the not-yet-tried alternative, then enters block 1. `Char('a')`
//! matches, `Char('b')` doesn't (next byte is `'c'`), so the thread dead-ends.
//! Unwinding finds the snapshot's `next_split` set to block 2, restores the
//! index from it, and resumes there. Both `Char('a')` and `Char('c')` match,
//! and block 3's `End` reports success.

use std::collections::HashMap;
use std::rc::Rc;

use crate::compiler::{ListItem, Op, Program};
use crate::error::{Error, Result};

/// Maximum depth of the backtrack stack before a match attempt is aborted
/// with `Error::StackOverflow`. Pathological patterns like nested
/// quantifiers over long inputs can otherwise grow this stack without
/// bound.
const MAX_STACK: usize = 1_000_000;

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_digit_byte(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_whitespace_byte(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | b' ')
}

fn list_item_matches(item: &ListItem, b: u8) -> bool {
    match *item {
        ListItem::Char(c) => c == b,
        ListItem::Range(lo, hi) => b >= lo && b <= hi,
        ListItem::Whitespace { negate } => is_whitespace_byte(b) != negate,
        ListItem::Word { negate } => is_word_byte(b) != negate,
        ListItem::Digit { negate } => is_digit_byte(b) != negate,
    }
}

fn list_matches(items: &[ListItem], b: u8) -> bool {
    items.iter().any(|item| list_item_matches(item, b))
}

/// The result of a successful match: the whole match's span plus one span
/// per capture group (absent groups are `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub groups: Vec<Option<(usize, usize)>>,
}

/// The state of one logical thread of execution.
///
/// `captures` and `capture_stack` are reference-counted so that a `Split`
/// can snapshot the thread cheaply: the clone and the original start out
/// pointing at the same data, and only the first side to mutate through
/// `Rc::make_mut` actually pays for a copy. This gives the same
/// copy-on-write discipline as a pair of explicit "already copied" flags,
/// without needing to track them by hand.
#[derive(Debug, Clone)]
struct ThreadState {
    block: usize,
    pc: usize,
    index: usize,
    /// Set when this thread is the "A" arm of a `split`; holds the "B" arm
    /// to try once this path dead-ends.
    next_split: Option<usize>,
    capture_stack: Rc<Vec<usize>>,
    captures: Rc<Vec<Option<(usize, usize)>>>,
}

impl ThreadState {
    fn fresh(index: usize, num_groups: usize) -> ThreadState {
        ThreadState {
            block: 0,
            pc: 0,
            index,
            next_split: None,
            capture_stack: Rc::new(Vec::new()),
            captures: Rc::new(vec![None; num_groups]),
        }
    }
}

/// Run `program` against `input`, searching for the leftmost match starting
/// at or after index 0. Returns `Ok(None)` on no match; the only error is
/// `Error::StackOverflow`.
pub(crate) fn run(program: &Program, input: &[u8], trace: bool) -> Result<Option<RawMatch>> {
    let mut match_from_index = 0usize;
    let mut current = ThreadState::fresh(match_from_index, program.num_groups);
    let mut stack: Vec<ThreadState> = Vec::new();
    let mut progress: HashMap<usize, usize> = HashMap::new();

    loop {
        // Break from this loop to fail, which triggers an unwind below.
        'fail: loop {
            let block = &program.blocks[current.block];
            if current.pc >= block.ops.len() {
                break 'fail;
            }
            let op = &block.ops[current.pc];
            if trace {
                println!(
                    "{}\t{}:{} {:?}",
                    current.index, current.block, current.pc, op
                );
            }
            match *op {
                Op::Char(b) => {
                    if current.index < input.len() && input[current.index] == b {
                        current.index += 1;
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::Wildcard => {
                    if current.index < input.len() {
                        current.index += 1;
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::Whitespace { negate } => {
                    if current.index < input.len()
                        && is_whitespace_byte(input[current.index]) != negate
                    {
                        current.index += 1;
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::Word { negate } => {
                    if current.index < input.len() && is_word_byte(input[current.index]) != negate
                    {
                        current.index += 1;
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::Digit { negate } => {
                    if current.index < input.len()
                        && is_digit_byte(input[current.index]) != negate
                    {
                        current.index += 1;
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::Range(lo, hi) => {
                    if current.index < input.len()
                        && input[current.index] >= lo
                        && input[current.index] <= hi
                    {
                        current.index += 1;
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::List { idx, negate } => {
                    if current.index < input.len()
                        && list_matches(&program.lists[idx], input[current.index]) != negate
                    {
                        current.index += 1;
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::EndOfInput => {
                    if current.index == input.len() {
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::StartOfInput => {
                    if current.index == 0 {
                        current.pc += 1;
                    } else {
                        break 'fail;
                    }
                }
                Op::StartCapture(_) => {
                    Rc::make_mut(&mut current.capture_stack).push(current.index);
                    current.pc += 1;
                }
                Op::EndCapture(g) => {
                    let start = Rc::make_mut(&mut current.capture_stack)
                        .pop()
                        .expect("end_capture without a matching start_capture");
                    let caps = Rc::make_mut(&mut current.captures);
                    if caps.len() <= g {
                        caps.resize(g + 1, None);
                    }
                    caps[g] = Some((start, current.index));
                    current.pc += 1;
                }
                Op::Jump(target) => {
                    current.block = target;
                    current.pc = 0;
                }
                Op::Split(a, b) => {
                    current.pc += 1;
                    if stack.len() >= MAX_STACK {
                        return Err(Error::StackOverflow);
                    }
                    stack.push(current.clone());
                    current.next_split = Some(b);
                    current.block = a;
                    current.pc = 0;
                }
                Op::Progress(id) => {
                    if progress.get(&id) == Some(&current.index) {
                        break 'fail;
                    }
                    progress.insert(id, current.index);
                    current.pc += 1;
                }
                Op::End => {
                    let groups = (0..program.num_groups)
                        .map(|g| current.captures.get(g).copied().flatten())
                        .collect();
                    return Ok(Some(RawMatch {
                        start: match_from_index,
                        end: current.index,
                        groups,
                    }));
                }
            }
        }

        // Unwind: resume a saved alternative, restart the match one byte
        // further in (unanchored substring search), or give up.
        if let Some(b) = current.next_split {
            let top = stack.last().expect("next_split implies a pushed parent");
            current.index = top.index;
            current.captures = Rc::clone(&top.captures);
            current.capture_stack = Rc::clone(&top.capture_stack);
            current.block = b;
            current.pc = 0;
            current.next_split = None;
        } else if let Some(parent) = stack.pop() {
            current = parent;
        } else if match_from_index < input.len() {
            match_from_index += 1;
            current = ThreadState::fresh(match_from_index, program.num_groups);
        } else {
            return Ok(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::parser::parse;
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use rand::Rng;

    fn run_pattern(pattern: &[u8], input: &[u8]) -> Option<RawMatch> {
        let ast = parse(pattern).unwrap();
        let program = compile(&ast);
        run(&program, input, false).unwrap()
    }

    #[test]
    fn literal_match() {
        let m = run_pattern(b"a", b"a").unwrap();
        assert_eq!((m.start, m.end), (0, 1));
    }

    #[test]
    fn one_or_more_greedy() {
        let m = run_pattern(b"a+", b"aaaaaaa").unwrap();
        assert_eq!((m.start, m.end), (0, 7));
    }

    #[test]
    fn optional_group_absent() {
        let m = run_pattern(b"(a|b)?c", b"c").unwrap();
        assert_eq!((m.start, m.end), (0, 1));
        assert_eq!(m.groups[0], None);
    }

    #[test]
    fn nested_group_captures() {
        let m = run_pattern(b"((.).)", b"ab").unwrap();
        assert_eq!((m.start, m.end), (0, 2));
        let g1 = m.groups[0].unwrap();
        let g2 = m.groups[1].unwrap();
        assert_eq!(&b"ab"[g1.0..g1.1], b"ab");
        assert_eq!(&b"ab"[g2.0..g2.1], b"a");
    }

    #[test]
    fn lazy_vs_greedy_quantifier() {
        let greedy = run_pattern(b"<(.+)>", b"<html>xyz</html>").unwrap();
        let lazy = run_pattern(b"<(.+?)>", b"<html>xyz</html>").unwrap();
        let g = greedy.groups[0].unwrap();
        let l = lazy.groups[0].unwrap();
        assert!((g.1 - g.0) >= (l.1 - l.0));
        assert_eq!((l.0, l.1), (1, 5));
    }

    #[test]
    fn progress_prevents_infinite_loop_on_empty_body() {
        let m = run_pattern(b"(a*)*", b"aaaa").unwrap();
        assert_eq!((m.start, m.end), (0, 4));
        let g = m.groups[0].unwrap();
        assert_eq!(&b"aaaa"[g.0..g.1], b"aaaa");

        let m = run_pattern(b"(a*)*", b"").unwrap();
        assert_eq!((m.start, m.end), (0, 0));
        assert_eq!(m.groups[0], None);
    }

    #[test]
    fn unanchored_search_finds_leftmost() {
        let m = run_pattern(br"\d+(...)", b"12345abc").unwrap();
        assert_eq!((m.start, m.end), (0, 8));
        let g = m.groups[0].unwrap();
        assert_eq!(g, (5, 8));
    }

    #[test]
    fn end_anchor_requires_end_of_input() {
        assert!(run_pattern(b"0x[0-9a-f]+$", b"0xdeadbeef").is_some());
        assert!(run_pattern(b"0x[0-9a-f]+$", b"0xcodecafe").is_none());
    }

    #[test]
    fn no_match_returns_none() {
        assert!(run_pattern(b"xyz", b"abc").is_none());
    }

    // Property tests alongside the plain unit tests, using a
    // quickcheck! property block driven by a hand-rolled Arbitrary impl.

    #[derive(Clone, Debug)]
    struct AsciiInput(Vec<u8>);

    impl Arbitrary for AsciiInput {
        fn arbitrary<G: Gen>(g: &mut G) -> Self {
            let len = g.gen_range(0, 12);
            let bytes = (0..len).map(|_| *g.choose(b"ab01 _").unwrap()).collect();
            AsciiInput(bytes)
        }
    }

    fn greedy_len_at_least_lazy_len(input: AsciiInput) -> bool {
        let greedy = run_pattern(b"a*", &input.0);
        let lazy = run_pattern(b"a*?", &input.0);
        match (greedy, lazy) {
            (Some(g), Some(l)) => (g.end - g.start) >= (l.end - l.start),
            _ => true,
        }
    }

    fn list_matches_same_as_alternation(input: AsciiInput) -> bool {
        let class = run_pattern(b"[ab01]", &input.0);
        let alt = run_pattern(b"a|b|0|1", &input.0);
        match (class, alt) {
            (Some(c), Some(a)) => c.start == a.start,
            (None, None) => true,
            _ => false,
        }
    }

    fn star_of_star_terminates(input: AsciiInput) -> bool {
        // Only the termination guarantee is being checked here: reaching
        // this point at all (instead of hanging) is the property.
        let _ = run_pattern(b"(a*)*", &input.0);
        true
    }

    quickcheck! {
        fn prop_greedy_len_at_least_lazy_len(input: AsciiInput) -> bool {
            greedy_len_at_least_lazy_len(input)
        }

        fn prop_list_matches_same_as_alternation(input: AsciiInput) -> bool {
            list_matches_same_as_alternation(input)
        }

        fn prop_star_of_star_terminates(input: AsciiInput) -> bool {
            star_of_star_terminates(input)
        }
    }
}
