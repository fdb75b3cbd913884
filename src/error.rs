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

//! Errors for this crate.

use std::error;
use std::fmt;

/// An error from parsing or compiling a pattern.
///
/// Matching itself never produces an `Error`: a failed match is a plain
/// `None`, not an error condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `\` was the last byte of the pattern.
    UnterminatedEscape {
        /// Byte offset of the trailing backslash.
        position: usize,
    },
    /// A class range `a-b` had `b < a`.
    InvalidRange {
        /// Start byte of the range.
        start: u8,
        /// End byte of the range.
        end: u8,
        /// Byte offset of the range's start literal.
        position: usize,
    },
    /// The token stream ran out while the parser expected more input.
    OutOfBounds {
        /// Byte offset at which the parser ran out of tokens.
        position: usize,
    },
    /// A structural parse error: an unexpected token, an unclosed group or
    /// class, or a quantifier with nothing to quantify.
    ParseError {
        /// Human-readable description.
        message: String,
        /// Byte offset at which the error was detected.
        position: usize,
    },
    /// The VM's backtrack stack grew past its configured limit.
    ///
    /// This is a run-time error (unlike the variants above, which are all
    /// raised by `Regex::compile`). It guards against pathological
    /// backtracking and is not part of ordinary match failure.
    StackOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::UnterminatedEscape { position } => {
                write!(f, "unterminated escape at byte {}", position)
            }
            Error::InvalidRange {
                start,
                end,
                position,
            } => write!(
                f,
                "invalid range {}-{} at byte {}",
                start as char, end as char, position
            ),
            Error::OutOfBounds { position } => {
                write!(f, "unexpected end of pattern at byte {}", position)
            }
            Error::ParseError {
                ref message,
                position,
            } => write!(f, "parse error at byte {}: {}", position, message),
            Error::StackOverflow => write!(f, "backtrack stack overflow"),
        }
    }
}

impl error::Error for Error {}

/// Convenience alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, Error>;
