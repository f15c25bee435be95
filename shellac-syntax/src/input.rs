// This file is part of shellac, a shell script parser and formatter.
// Copyright (C) 2026 the shellac authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Methods for feeding the parser with source code
//!
//! The parser reads source code line by line through the [`Input`] trait.
//! Reading stops at each line so that an interactive parser only consumes
//! the lines it needs; the reader may block until the user provides the
//! next line.
//!
//! [`Memory`] is an input that yields a string prepared in memory.
//! [`Lines`] adapts any [`BufRead`] reader.

use std::io::BufRead;

/// Error returned by an [`Input`]
#[derive(Debug)]
pub enum InputError {
    /// The underlying reader failed.
    Io(std::io::Error),
    /// The line read is not valid UTF-8.
    ///
    /// The payload is the number of leading bytes of the line that are
    /// valid, which positions the error for diagnostics.
    InvalidUtf8 {
        /// Number of valid bytes before the offending sequence
        valid_up_to: usize,
    },
}

impl From<std::io::Error> for InputError {
    fn from(error: std::io::Error) -> Self {
        InputError::Io(error)
    }
}

/// Line-oriented source of code to parse
pub trait Input {
    /// Reads the next line of source code.
    ///
    /// The line includes its trailing newline, except possibly for the last
    /// line of the input. `Ok(None)` signals the end of input. An
    /// interactive implementation may block until a line is available.
    fn next_line(&mut self) -> Result<Option<String>, InputError>;
}

/// Input function that returns a pre-prepared string
#[derive(Clone, Debug)]
pub struct Memory {
    code: Option<String>,
}

impl Memory {
    /// Creates an input that yields the given string.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Memory {
            code: Some(code.into()),
        }
    }
}

impl Input for Memory {
    fn next_line(&mut self) -> Result<Option<String>, InputError> {
        // The whole string is handed over at once; the lexer does not care
        // whether a "line" contains embedded newlines.
        Ok(self.code.take().filter(|code| !code.is_empty()))
    }
}

/// Input function that reads lines from a [`BufRead`] reader
#[derive(Debug)]
pub struct Lines<R: BufRead> {
    reader: R,
}

impl<R: BufRead> Lines<R> {
    /// Creates an input that reads from the given reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Lines { reader }
    }
}

impl<R: BufRead> Input for Lines<R> {
    fn next_line(&mut self) -> Result<Option<String>, InputError> {
        let mut bytes = Vec::new();
        let n = self.reader.read_until(b'\n', &mut bytes)?;
        if n == 0 {
            return Ok(None);
        }
        match String::from_utf8(bytes) {
            Ok(line) => Ok(Some(line)),
            Err(error) => Err(InputError::InvalidUtf8 {
                valid_up_to: error.utf8_error().valid_up_to(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn memory_yields_once() {
        let mut input = Memory::new("echo hi\necho ho\n");
        assert_eq!(input.next_line().unwrap().unwrap(), "echo hi\necho ho\n");
        assert_matches!(input.next_line(), Ok(None));
    }

    #[test]
    fn empty_memory_is_end_of_input() {
        let mut input = Memory::new("");
        assert_matches!(input.next_line(), Ok(None));
    }

    #[test]
    fn lines_reads_one_line_at_a_time() {
        let mut input = Lines::new(&b"one\ntwo"[..]);
        assert_eq!(input.next_line().unwrap().unwrap(), "one\n");
        assert_eq!(input.next_line().unwrap().unwrap(), "two");
        assert_matches!(input.next_line(), Ok(None));
    }

    #[test]
    fn lines_reports_invalid_utf8() {
        let mut input = Lines::new(&b"ab\xFFcd\n"[..]);
        assert_matches!(
            input.next_line(),
            Err(InputError::InvalidUtf8 { valid_up_to: 2 })
        );
    }
}
