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

//! Syntax parser for the shell language
//!
//! The parser is hand-written recursive descent with one token of
//! lookahead. The lexer is a subordinate of the parser: tokens are produced
//! on demand, and the grammar functions switch the lexer between the
//! contexts of the language (words, quotes, parameter expansions,
//! arithmetic, test clauses, here-documents) as they descend.
//!
//! # Usage
//!
//! Create a [`Parser`], adjust its options, and call one of the entry
//! points:
//!
//! ```
//! # use shellac_syntax::parser::Parser;
//! let mut parser = Parser::new();
//! let file = parser.parse("echo hi\n".as_bytes(), "hi.sh").unwrap();
//! assert_eq!(file.stmts.len(), 1);
//! ```
//!
//! [`Parser::stmts`] and [`Parser::interactive`] deliver statements
//! incrementally, calling back after each newline-terminated batch;
//! [`Parser::incomplete`] reports whether the parser is in the middle of an
//! unclosed construct, which an interactive reader can use to decide
//! between a primary and a continuation prompt.

mod arithm;
mod error;
mod heredoc;
mod lex;
mod param;
mod stmt;
mod test;
mod word;

pub use error::{Error, ErrorCause, LexError, Result, SyntaxError};

use crate::input::{Input, Lines, Memory};
use crate::source::Pos;
use crate::syntax::{ArithmExpr, Comment, File, Stmt, Word};
use crate::token::{Keyword, LangVariant, Operator};
use heredoc::PendingHeredoc;
use std::cell::Cell;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read};
use std::rc::Rc;

/// The shell syntax parser
///
/// A `Parser` holds the options that affect parsing and can be reused for
/// any number of inputs; the state of each parse is scoped to the entry
/// point call.
#[derive(Debug)]
#[must_use = "Parser must be used to parse syntax"]
pub struct Parser {
    lang: LangVariant,
    keep_comments: bool,
    stop_at: Option<String>,
    recover_errors: usize,
    incomplete: Rc<Cell<bool>>,
    recovered: Vec<Error>,
}

impl Parser {
    /// Creates a parser with default settings: the Bash dialect, comments
    /// dropped, no stop token, and no error recovery.
    pub fn new() -> Self {
        Parser {
            lang: LangVariant::default(),
            keep_comments: false,
            stop_at: None,
            recover_errors: 0,
            incomplete: Rc::new(Cell::new(false)),
            recovered: Vec::new(),
        }
    }

    /// Selects the dialect to parse.
    ///
    /// [`LangVariant::Auto`] infers the dialect from the shebang line of
    /// the input, falling back to the file name extension and finally to
    /// Bash.
    pub fn lang(&mut self, lang: LangVariant) -> &mut Self {
        self.lang = lang;
        self
    }

    /// Makes the parser attach comments to the resulting
    /// [`File`](crate::syntax::File), in source order. Off by default.
    pub fn keep_comments(&mut self, keep: bool) -> &mut Self {
        self.keep_comments = keep;
        self
    }

    /// Makes the parser stop lexing as if it hit the end of input when it
    /// reaches the given token at the start of a word, outside of quotes.
    ///
    /// This is useful for templating languages that embed shell, such as
    /// stopping at `$$` or at `--`.
    pub fn stop_at(&mut self, word: impl Into<String>) -> &mut Self {
        self.stop_at = Some(word.into());
        self
    }

    /// Allows the parser to continue past up to `n` parse errors, on a
    /// best-effort basis.
    ///
    /// When recovery is active, a failing statement is skipped up to the
    /// next newline, the error is recorded, and parsing continues. The
    /// recorded errors are available from
    /// [`recovered_errors`](Self::recovered_errors) alongside the partial
    /// tree.
    pub fn recover_errors(&mut self, n: usize) -> &mut Self {
        self.recover_errors = n;
        self
    }

    /// Returns the errors recovered from during the most recent parse.
    #[must_use]
    pub fn recovered_errors(&self) -> &[Error] {
        &self.recovered
    }

    /// Reports whether the parser is in the middle of an unclosed
    /// construct: an unterminated quote, a pending here-document, an open
    /// `if`, and so on.
    ///
    /// The value is only meaningful while [`interactive`](Self::interactive)
    /// (or [`stmts`](Self::stmts)) is running; it may be queried from the
    /// input reader while it waits for more input, via a clone of the
    /// handle taken before parsing started.
    #[must_use]
    pub fn incomplete(&self) -> bool {
        self.incomplete.get()
    }

    /// Returns a handle that shares the [`incomplete`](Self::incomplete)
    /// state, for use from an input reader.
    #[must_use]
    pub fn incomplete_handle(&self) -> IncompleteHandle {
        IncompleteHandle(Rc::clone(&self.incomplete))
    }

    /// Parses a complete source file.
    pub fn parse<R: Read>(&mut self, reader: R, name: &str) -> Result<File> {
        let input = Lines::new(BufReader::new(reader));
        let mut p = self.begin(Box::new(input), name);
        let result = p.file();
        self.finish(p, result)
    }

    /// Parses statements incrementally.
    ///
    /// After each newline-terminated batch of complete statements, the
    /// callback is invoked with the batch; parsing stops when the callback
    /// returns false or the input ends. Here-document bodies are attached
    /// before the callback sees the statements.
    pub fn stmts<R: Read>(
        &mut self,
        reader: R,
        f: impl FnMut(Vec<Stmt>) -> bool,
    ) -> Result<()> {
        let input = Lines::new(BufReader::new(reader));
        let mut p = self.begin(Box::new(input), "");
        let result = p.stmt_batches(f);
        self.finish(p, result)
    }

    /// Parses statements from an interactive reader.
    ///
    /// This behaves like [`stmts`](Self::stmts), but the reader is expected
    /// to block until the user provides more input. Between callbacks, the
    /// [`incomplete`](Self::incomplete) query reports whether a construct
    /// is still open.
    pub fn interactive<R: BufRead>(
        &mut self,
        reader: R,
        f: impl FnMut(Vec<Stmt>) -> bool,
    ) -> Result<()> {
        let input = Lines::new(reader);
        let mut p = self.begin(Box::new(input), "");
        let result = p.stmt_batches(f);
        self.finish(p, result)
    }

    /// Parses words, delimited by blanks and newlines, calling back for
    /// each one until the callback returns false or the input ends.
    pub fn words<R: Read>(&mut self, reader: R, f: impl FnMut(Word) -> bool) -> Result<()> {
        let input = Lines::new(BufReader::new(reader));
        let mut p = self.begin(Box::new(input), "");
        let result = p.word_sequence(f);
        self.finish(p, result)
    }

    /// Parses exactly one word and fails if any input follows it.
    pub fn word(&mut self, source: &str) -> Result<Word> {
        let mut p = self.begin(Box::new(Memory::new(source)), "");
        let result = p.single_word();
        self.finish(p, result)
    }

    /// Parses one arithmetic expression spanning the whole input.
    pub fn arithm(&mut self, source: &str) -> Result<ArithmExpr> {
        let mut p = self.begin(Box::new(Memory::new(source)), "");
        let result = p.single_arithm();
        self.finish(p, result)
    }

    /// Parses the input as the body of a here-document with an unquoted
    /// delimiter: expansions are recognized, everything else is literal.
    pub fn document<R: Read>(&mut self, reader: R) -> Result<Word> {
        let input = Lines::new(BufReader::new(reader));
        let mut p = self.begin(Box::new(input), "");
        let result = p.whole_document();
        self.finish(p, result)
    }

    fn begin<'a>(&self, input: Box<dyn Input + 'a>, name: &str) -> P<'a> {
        self.incomplete.set(false);
        P {
            input,
            src: String::new(),
            offset: 0,
            line: 1,
            col: 1,
            input_done: false,
            lang: self.lang,
            auto_lang: self.lang == LangVariant::Auto,
            keep_comments: self.keep_comments,
            stop_at: self.stop_at.clone(),
            name: name.to_string(),
            cur: None,
            comments: Vec::new(),
            heredocs: VecDeque::new(),
            filled: Vec::new(),
            sub_depth: 0,
            bq: false,
            construct_depth: 0,
            incomplete: Rc::clone(&self.incomplete),
            recover_budget: self.recover_errors,
            recovered: Vec::new(),
        }
    }

    fn finish<T>(&mut self, p: P<'_>, result: Result<T>) -> Result<T> {
        self.recovered = p.recovered;
        self.incomplete.set(false);
        result
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a parser's incomplete state
///
/// See [`Parser::incomplete_handle`].
#[derive(Clone, Debug)]
pub struct IncompleteHandle(Rc<Cell<bool>>);

impl IncompleteHandle {
    /// Reports whether the parser is inside an unclosed construct.
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.get()
    }
}

/// Token identifier used between the lexer and the parser
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tok {
    /// End of input (or the `stop_at` token)
    Eof,
    /// Newline
    Newl,
    /// A control or redirection operator
    Op(Operator),
    /// Digits immediately preceding a redirection operator
    IoNumber,
    /// Any other token, lexed as a word
    Word,
    /// The closing backquote of a backquoted command substitution
    BquoteEnd,
}

/// One token of lookahead
#[derive(Clone, Debug)]
pub(crate) struct Token {
    pub id: Tok,
    pub pos: Pos,
    pub end: Pos,
    /// The word value; meaningful for `Word` and `IoNumber` tokens
    pub word: Word,
    /// The keyword this word spells, if any
    ///
    /// Only honored by the parser at positions where the grammar reserves
    /// the word.
    pub kw: Option<Keyword>,
}

/// State of one parse, scoped to a single entry point call
pub(crate) struct P<'a> {
    input: Box<dyn Input + 'a>,
    /// Source code read so far
    pub(crate) src: String,
    /// Byte offset of the next character to lex
    pub(crate) offset: usize,
    pub(crate) line: u64,
    pub(crate) col: u64,
    /// Whether the input has been exhausted
    pub(crate) input_done: bool,

    pub(crate) lang: LangVariant,
    auto_lang: bool,
    pub(crate) keep_comments: bool,
    stop_at: Option<String>,
    pub(crate) name: String,

    /// Token lookahead; `None` when the next token has not been lexed
    pub(crate) cur: Option<Token>,
    pub(crate) comments: Vec<Comment>,
    /// Here-documents whose bodies have not been read yet
    pub(crate) heredocs: VecDeque<PendingHeredoc>,
    /// Bodies read but not yet attached, keyed by the operator position
    pub(crate) filled: Vec<(Pos, Word)>,
    /// Nesting depth of word-level substitutions (`$(...)`, `<(...)`,
    /// backquotes); governs which pending here-documents a newline fills
    pub(crate) sub_depth: usize,
    /// Whether lexing inside a backquoted substitution
    pub(crate) bq: bool,
    /// Number of currently open constructs, for the incomplete query
    pub(crate) construct_depth: usize,
    incomplete: Rc<Cell<bool>>,

    recover_budget: usize,
    recovered: Vec<Error>,
}

impl P<'_> {
    /// Pulls one more line from the input into the source buffer.
    ///
    /// Returns false when the input is exhausted. NUL bytes are dropped
    /// silently.
    pub(crate) fn pull_line(&mut self) -> Result<bool> {
        if self.input_done {
            return Ok(false);
        }
        self.incomplete.set(
            self.construct_depth > 0 || !self.heredocs.is_empty() || self.cur.is_some(),
        );
        match self.input.next_line() {
            Ok(Some(mut line)) => {
                if line.contains('\0') {
                    line.retain(|c| c != '\0');
                }
                self.src.push_str(&line);
                if self.auto_lang {
                    self.resolve_auto_lang();
                }
                Ok(true)
            }
            Ok(None) => {
                self.input_done = true;
                if self.auto_lang {
                    self.resolve_auto_lang();
                }
                Ok(false)
            }
            Err(error) => {
                self.input_done = true;
                Err(self.input_error(error))
            }
        }
    }

    fn input_error(&self, error: crate::input::InputError) -> Error {
        use crate::input::InputError;
        match error {
            InputError::Io(e) => Error {
                cause: e.into(),
                name: self.name.clone(),
                pos: self.pos(),
            },
            InputError::InvalidUtf8 { valid_up_to } => {
                // The error position is past the buffered source plus the
                // valid prefix of the failed line.
                let offset = self.src.len() + valid_up_to;
                Error {
                    cause: LexError::InvalidUtf8.into(),
                    name: self.name.clone(),
                    pos: Pos::new(offset, self.line, self.col + (offset - self.offset) as u64),
                }
            }
        }
    }

    /// Decides the dialect for `LangVariant::Auto` once the first line is
    /// available.
    fn resolve_auto_lang(&mut self) {
        self.auto_lang = false;
        let first_line = self.src.lines().next().unwrap_or("");
        let lang = if let Some(rest) = first_line.strip_prefix("#!") {
            // `env` is an indirection, not a shell; the shell name is the
            // next word.
            let interp = rest
                .split_whitespace()
                .flat_map(|part| part.rsplit('/').next())
                .find(|base| matches!(*base, "sh" | "bash" | "mksh" | "bats" | "dash" | "ash"));
            match interp {
                Some("bash") => LangVariant::Bash,
                Some("mksh") => LangVariant::MirBsdKorn,
                Some("bats") => LangVariant::Bats,
                Some(_) => LangVariant::Posix,
                None => LangVariant::Bash,
            }
        } else if let Some(ext) = self.name.rsplit_once('.').map(|(_, ext)| ext) {
            match ext {
                "mksh" => LangVariant::MirBsdKorn,
                "bats" => LangVariant::Bats,
                _ => LangVariant::Bash,
            }
        } else {
            LangVariant::Bash
        };
        self.lang = lang;
    }

    /// Builds an error value at the given position.
    pub(crate) fn error_at(&self, pos: Pos, cause: impl Into<ErrorCause>) -> Error {
        Error {
            cause: cause.into(),
            name: self.name.clone(),
            pos,
        }
    }

    /// Builds an error at the given position.
    pub(crate) fn err<T>(&self, pos: Pos, cause: impl Into<ErrorCause>) -> Result<T> {
        Err(self.error_at(pos, cause))
    }

    /// Records a recovered error and skips input to the next line, or
    /// propagates the error when the recovery budget is exhausted.
    pub(crate) fn recover(&mut self, error: Error) -> Result<()> {
        if self.recover_budget == 0 || error.is_incomplete() {
            return Err(error);
        }
        self.recover_budget -= 1;
        self.recovered.push(error);
        self.cur = None;
        self.heredocs.clear();
        // Resynchronize at the next line.
        loop {
            match self.peek_raw_char()? {
                None => break,
                Some('\n') => {
                    self.advance_char();
                    break;
                }
                Some(_) => {
                    self.advance_char();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
