// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Line-oriented song input.
//!
//! Build inputs are text files with one song per line, either as
//! comma-separated decimal codes or as encoded fingerprint tokens. Blank
//! lines are skipped so trailing newlines and spacer lines are harmless.

use std::io::BufRead;

use crate::error::{DecodeError, Result};
use crate::fingerprint::decode_fingerprint;

/// Parse one line of comma-separated decimal codes.
///
/// Whitespace around each code is ignored. An empty line is an empty song.
pub fn parse_code_line(line: &str) -> std::result::Result<Vec<u32>, DecodeError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<u32>().map_err(|_| DecodeError::InvalidCode {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Songs from a reader of CSV code lines.
pub fn read_code_lines<R: BufRead>(reader: R) -> CodeLines<R> {
    CodeLines {
        reader,
        format: LineFormat::Csv,
        buf: String::new(),
    }
}

/// Songs from a reader of encoded fingerprint lines.
pub fn read_fingerprint_lines<R: BufRead>(reader: R) -> CodeLines<R> {
    CodeLines {
        reader,
        format: LineFormat::Fingerprint,
        buf: String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineFormat {
    Csv,
    Fingerprint,
}

/// Iterator over the songs of a line-oriented input.
///
/// Yields one code sequence per non-blank line. I/O and parse failures are
/// yielded as errors; iteration may continue past a bad line.
#[derive(Debug)]
pub struct CodeLines<R> {
    reader: R,
    format: LineFormat,
    buf: String,
}

impl<R: BufRead> Iterator for CodeLines<R> {
    type Item = Result<Vec<u32>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            let parsed = match self.format {
                LineFormat::Csv => parse_code_line(line),
                LineFormat::Fingerprint => decode_fingerprint(line),
            };
            return Some(parsed.map_err(Into::into));
        }
    }
}
