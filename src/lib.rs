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

//! A small backtracking, byte-oriented regular expression engine.
//!
//! Patterns are compiled through four stages: [`token`], [`ast`],
//! [`compiler`], and [`vm`]. Each lives in its own module, in the order
//! [`Regex::new`] drives them. None of the stages are meant to be driven
//! directly by callers; `Regex` is the supported entry point.
//!
//! ```
//! use brex::Regex;
//!
//! let re = Regex::new(r"(\d+)-(\d+)").unwrap();
//! let input = b"room 12-34 please";
//! let m = re.find(input).unwrap();
//! assert_eq!(m.as_bytes(input), b"12-34");
//! assert_eq!(m.group(1).unwrap(), (5, 7));
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod parser;
pub mod token;
pub mod vm;

pub use error::{Error, Result};

use compiler::Program;

/// Bitflags controlling what is printed while compiling and matching.
/// Each stage's dump uses that stage's own `{:3}: {:?}` formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugConfig {
    /// Dump the token stream before parsing.
    pub trace_tokens: bool,
    /// Dump the AST arenas after parsing.
    pub trace_ast: bool,
    /// Dump the block graph after compiling.
    pub trace_blocks: bool,
    /// Trace every VM instruction executed while matching.
    pub trace_exec: bool,
}

/// A compiled pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    program: Program,
    debug: DebugConfig,
}

/// A single match against a `Regex`, borrowing nothing: spans are plain
/// byte offsets, so the caller slices the original input themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    raw: vm::RawMatch,
}

impl Match {
    /// The whole match's span.
    pub fn whole(&self) -> (usize, usize) {
        (self.raw.start, self.raw.end)
    }

    /// The byte slice of `input` the whole match covers.
    ///
    /// `input` must be the same slice the match was produced from.
    pub fn as_bytes<'i>(&self, input: &'i [u8]) -> &'i [u8] {
        &input[self.raw.start..self.raw.end]
    }

    /// The span of capture group `n`, numbered from `1` in the order their
    /// `(` opened (group `0` is reserved and always `None`; use [`whole`]
    /// for the entire match). `None` if `n` is out of range or that group
    /// didn't participate in the match.
    ///
    /// [`whole`]: Match::whole
    pub fn group(&self, n: usize) -> Option<(usize, usize)> {
        let index = n.checked_sub(1)?;
        self.raw.groups.get(index).copied().flatten()
    }

    /// Every capture group's span, in declaration order.
    pub fn groups(&self) -> &[Option<(usize, usize)>] {
        &self.raw.groups
    }
}

impl Regex {
    /// Parse and compile a pattern with default (silent) debug tracing.
    pub fn new(pattern: &str) -> Result<Regex> {
        Regex::compile(pattern.as_bytes(), DebugConfig::default())
    }

    /// Parse and compile a pattern, optionally dumping intermediate stages
    /// to stdout per `debug`.
    pub fn compile(pattern: &[u8], debug: DebugConfig) -> Result<Regex> {
        if debug.trace_tokens {
            let tokens = token::tokenize(pattern)?;
            println!("tokens:");
            for (i, t) in tokens.iter().enumerate() {
                println!("  {:3}: {:?}", i, t);
            }
        }
        let ast = parser::parse(pattern)?;
        if debug.trace_ast {
            ast.debug_print();
        }
        let program = compiler::compile(&ast);
        if debug.trace_blocks {
            program.debug_print();
        }
        Ok(Regex { program, debug })
    }

    /// Find the leftmost match anywhere in `input`.
    ///
    /// A pathologically backtracking pattern can exhaust the VM's backtrack
    /// stack; this convenience wrapper folds that case into "no match" the
    /// same as any other failed match. Use [`try_find`] to tell the two
    /// apart.
    ///
    /// [`try_find`]: Regex::try_find
    pub fn find(&self, input: &[u8]) -> Option<Match> {
        self.try_find(input).unwrap_or(None)
    }

    /// Find the leftmost match anywhere in `input`, surfacing
    /// `Error::StackOverflow` rather than folding it into "no match".
    pub fn try_find(&self, input: &[u8]) -> Result<Option<Match>> {
        Ok(vm::run(&self.program, input, self.debug.trace_exec)?.map(|raw| Match { raw }))
    }

    /// Whether `input` contains a match anywhere.
    pub fn is_match(&self, input: &[u8]) -> bool {
        self.find(input).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_find_and_groups() {
        let re = Regex::new(r"(\w+)@(\w+)").unwrap();
        let input = b"contact: jdoe@example now";
        let m = re.find(input).unwrap();
        assert_eq!(m.as_bytes(input), b"jdoe@example");
        let (s, e) = m.group(1).unwrap();
        assert_eq!(&input[s..e], b"jdoe");
        let (s, e) = m.group(2).unwrap();
        assert_eq!(&input[s..e], b"example");
        assert!(m.group(0).is_none());
    }

    #[test]
    fn facade_try_find_agrees_with_find_on_ordinary_patterns() {
        let re = Regex::new(r"(\w+)@(\w+)").unwrap();
        let input = b"contact: jdoe@example now";
        let via_try = re.try_find(input).unwrap().unwrap();
        let via_plain = re.find(input).unwrap();
        assert_eq!(via_try.whole(), via_plain.whole());
    }

    #[test]
    fn facade_is_match() {
        let re = Regex::new("abc$").unwrap();
        assert!(re.is_match(b"xxabc"));
        assert!(!re.is_match(b"abcxx"));
    }

    #[test]
    fn facade_propagates_parse_errors() {
        assert!(Regex::new("(abc").is_err());
        assert!(Regex::new(r"a\").is_err());
    }

    #[test]
    fn facade_no_match() {
        let re = Regex::new("zzz").unwrap();
        assert!(re.find(b"abc").is_none());
    }
}
