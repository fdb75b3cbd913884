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

//! Command-line driver: `brex [-t] <pattern> <input>`.
//!
//! Prints the whole match's span and bytes, then one line per capture
//! group that participated. Exits `1` on a usage or compile error, `0`
//! with "no match" on a clean non-match.

use std::env;
use std::process;

use brex::{DebugConfig, Regex};

fn usage(program: &str) -> String {
    format!("usage: {} [-t] <pattern> <input>", program)
}

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut debug = DebugConfig::default();
    if args.first().map(String::as_str) == Some("-t") {
        debug = DebugConfig {
            trace_tokens: true,
            trace_ast: true,
            trace_blocks: true,
            trace_exec: true,
        };
        args.remove(0);
    }

    if args.len() != 2 {
        eprintln!("{}", usage(&program));
        process::exit(1);
    }
    let pattern = &args[0];
    let input = args[1].as_bytes();

    let re = match Regex::compile(pattern.as_bytes(), debug) {
        Ok(re) => re,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    match re.find(input) {
        Some(m) => {
            let (start, end) = m.whole();
            println!("match {}..{}: {:?}", start, end, String::from_utf8_lossy(m.as_bytes(input)));
            for (i, group) in m.groups().iter().enumerate() {
                let n = i + 1;
                match group {
                    Some((s, e)) => println!(
                        "  group {}: {}..{}: {:?}",
                        n,
                        s,
                        e,
                        String::from_utf8_lossy(&input[*s..*e])
                    ),
                    None => println!("  group {}: (no match)", n),
                }
            }
        }
        None => println!("no match"),
    }
}
