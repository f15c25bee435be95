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

//! Fundamental building blocks of the lexer
//!
//! The lexer shares its state with the parser: these methods maintain the
//! byte cursor over the accumulated source buffer and produce the coarse
//! token stream (operators, newlines, words) consumed at command position.
//! Word-internal lexing lives in the sibling modules.

use super::error::{LexError, Result, SyntaxError};
use super::{P, Tok, Token};
use crate::source::Pos;
use crate::syntax::{Comment, Lit, Word, WordPart};
use crate::token::{Keyword, LangVariant, Operator};

impl P<'_> {
    /// Returns the position of the next character to lex.
    pub(crate) fn pos(&self) -> Pos {
        Pos::new(self.offset, self.line, self.col)
    }

    /// Moves the cursor to an earlier position.
    ///
    /// Rewinding is only valid to a position previously returned by
    /// [`pos`](Self::pos); the buffer retains everything read.
    pub(crate) fn seek(&mut self, pos: Pos) {
        self.offset = pos.offset();
        self.line = pos.line();
        self.col = pos.col();
    }

    /// Makes sure at least `n` bytes are buffered past the cursor, pulling
    /// input as needed. Fewer bytes remain only at the end of input.
    pub(crate) fn ensure(&mut self, n: usize) -> Result<()> {
        while self.src.len() - self.offset < n {
            if !self.pull_line()? {
                break;
            }
        }
        Ok(())
    }

    /// Returns the byte `ahead` bytes past the cursor, if any.
    pub(crate) fn byte_at(&mut self, ahead: usize) -> Result<Option<u8>> {
        self.ensure(ahead + 1)?;
        Ok(self.src.as_bytes().get(self.offset + ahead).copied())
    }

    /// Peeks the next character without consuming it.
    pub(crate) fn peek_raw_char(&mut self) -> Result<Option<char>> {
        self.ensure(4)?;
        Ok(self.src[self.offset..].chars().next())
    }

    /// Tests whether the upcoming input starts with the given string.
    pub(crate) fn starts_with(&mut self, s: &str) -> Result<bool> {
        self.ensure(s.len())?;
        Ok(self.src[self.offset..].starts_with(s))
    }

    /// Consumes the next character, updating the line and column.
    ///
    /// # Panics
    ///
    /// If the buffer is empty; a character must have been peeked first.
    pub(crate) fn advance_char(&mut self) -> char {
        let c = self.src[self.offset..]
            .chars()
            .next()
            .expect("a character must be peeked before being consumed");
        let len = c.len_utf8();
        self.offset += len;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += len as u64;
        }
        c
    }

    /// Consumes `n` bytes of ASCII input on the current line.
    pub(crate) fn advance_bytes(&mut self, n: usize) {
        debug_assert!(self.src.is_char_boundary(self.offset + n));
        self.offset += n;
        self.col += n as u64;
    }

    /// Skips one escaped newline if the cursor is at one.
    ///
    /// A backslash immediately followed by a newline (or CRLF) joins two
    /// physical lines into one logical line. Callers in every context but
    /// single quotes and here-document bodies go through this.
    pub(crate) fn skip_line_cont(&mut self) -> Result<bool> {
        if self.starts_with("\\\n")? {
            self.advance_bytes(1);
            self.advance_char();
            Ok(true)
        } else if self.starts_with("\\\r\n")? {
            self.advance_bytes(2);
            self.advance_char();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Skips blanks and escaped newlines.
    ///
    /// A carriage return not followed by a newline is treated as a blank
    /// too; one followed by a newline is left for the newline token.
    pub(crate) fn skip_blanks(&mut self) -> Result<()> {
        loop {
            if self.skip_line_cont()? {
                continue;
            }
            match self.byte_at(0)? {
                Some(b' ') | Some(b'\t') => self.advance_bytes(1),
                Some(b'\r') if self.byte_at(1)? != Some(b'\n') => self.advance_bytes(1),
                _ => return Ok(()),
            }
        }
    }

    /// Returns a reference to the current token, lexing it if needed.
    pub(crate) fn peek(&mut self) -> Result<&Token> {
        if self.cur.is_none() {
            let token = self.next_token()?;
            self.cur = Some(token);
        }
        Ok(self.cur.as_ref().unwrap())
    }

    /// Consumes and returns the current token.
    pub(crate) fn take(&mut self) -> Result<Token> {
        self.peek()?;
        Ok(self.cur.take().unwrap())
    }

    /// Consumes the current token if it is the given operator, returning
    /// its position.
    pub(crate) fn take_op(&mut self, op: Operator) -> Result<Option<Pos>> {
        if self.peek()?.id == Tok::Op(op) {
            Ok(Some(self.take()?.pos))
        } else {
            Ok(None)
        }
    }

    /// Consumes the current token if it is the given keyword, returning its
    /// position.
    pub(crate) fn take_kw(&mut self, kw: Keyword) -> Result<Option<Pos>> {
        if self.peek()?.kw == Some(kw) {
            Ok(Some(self.take()?.pos))
        } else {
            Ok(None)
        }
    }

    /// Requires the given keyword, with distinct errors for end of input
    /// (incomplete) and for any other token (malformed).
    pub(crate) fn expect_kw(
        &mut self,
        kw: Keyword,
        on_eof: SyntaxError,
        what: &'static str,
    ) -> Result<Pos> {
        let (id, found_kw, pos) = {
            let token = self.peek()?;
            (token.id, token.kw, token.pos)
        };
        if found_kw == Some(kw) {
            Ok(self.take()?.pos)
        } else if id == Tok::Eof {
            self.err(pos, on_eof)
        } else {
            self.err(pos, SyntaxError::Expected { what })
        }
    }

    /// Requires the given operator, with distinct errors for end of input
    /// and for any other token.
    pub(crate) fn expect_op(
        &mut self,
        op: Operator,
        on_eof: SyntaxError,
        what: &'static str,
    ) -> Result<Pos> {
        let (id, pos) = {
            let token = self.peek()?;
            (token.id, token.pos)
        };
        if id == Tok::Op(op) {
            Ok(self.take()?.pos)
        } else if id == Tok::Eof {
            self.err(pos, on_eof)
        } else {
            self.err(pos, SyntaxError::Expected { what })
        }
    }

    /// Lexes the next token at command position.
    fn next_token(&mut self) -> Result<Token> {
        loop {
            self.skip_blanks()?;

            if let Some(stop) = self.stop_at.take() {
                let stopped = self.starts_with(&stop)?;
                self.stop_at = Some(stop);
                if stopped {
                    let pos = self.pos();
                    return Ok(Token {
                        id: Tok::Eof,
                        pos,
                        end: pos,
                        word: Word::default(),
                        kw: None,
                    });
                }
            }

            let pos = self.pos();
            let Some(c) = self.peek_raw_char()? else {
                return Ok(Token {
                    id: Tok::Eof,
                    pos,
                    end: pos,
                    word: Word::default(),
                    kw: None,
                });
            };

            match c {
                '#' => {
                    self.lex_comment()?;
                    continue;
                }
                '\n' => {
                    self.advance_char();
                    return Ok(Token {
                        id: Tok::Newl,
                        pos,
                        end: pos.after(1),
                        word: Word::default(),
                        kw: None,
                    });
                }
                '\r' if self.byte_at(1)? == Some(b'\n') => {
                    self.advance_bytes(1);
                    self.advance_char();
                    return Ok(Token {
                        id: Tok::Newl,
                        pos,
                        end: pos.after(2),
                        word: Word::default(),
                        kw: None,
                    });
                }
                '`' if self.bq => {
                    self.advance_bytes(1);
                    return Ok(Token {
                        id: Tok::BquoteEnd,
                        pos,
                        end: pos.after(1),
                        word: Word::default(),
                        kw: None,
                    });
                }
                ';' | '&' | '|' | '(' | ')' => {
                    let op = self.scan_operator(pos)?;
                    return Ok(Token {
                        id: Tok::Op(op),
                        pos,
                        end: pos.after(op.as_str().len()),
                        word: Word::default(),
                        kw: None,
                    });
                }
                '<' | '>' => {
                    // `<(...)` and `>(...)` start a word, not an operator.
                    if self.byte_at(1)? == Some(b'(') && self.lang.is_extended() {
                        return self.word_token(pos);
                    }
                    let op = self.scan_operator(pos)?;
                    return Ok(Token {
                        id: Tok::Op(op),
                        pos,
                        end: pos.after(op.as_str().len()),
                        word: Word::default(),
                        kw: None,
                    });
                }
                '0'..='9' => {
                    // Digits directly followed by a redirection operator
                    // are a file descriptor number.
                    let mut n = 1;
                    while matches!(self.byte_at(n)?, Some(b'0'..=b'9')) {
                        n += 1;
                    }
                    let redir = match self.byte_at(n)? {
                        Some(b'<') | Some(b'>') => self.byte_at(n + 1)? != Some(b'('),
                        _ => false,
                    };
                    if !redir {
                        return self.word_token(pos);
                    }
                    let value = self.src[self.offset..self.offset + n].to_string();
                    self.advance_bytes(n);
                    let end = self.pos();
                    let lit = Lit {
                        value_pos: pos,
                        value_end: end,
                        value,
                    };
                    return Ok(Token {
                        id: Tok::IoNumber,
                        pos,
                        end,
                        word: Word {
                            parts: vec![WordPart::Lit(lit)],
                        },
                        kw: None,
                    });
                }
                _ => return self.word_token(pos),
            }
        }
    }

    fn word_token(&mut self, pos: Pos) -> Result<Token> {
        let word = self.lex_word(super::word::WordMode::Normal)?;
        let kw = word
            .lit()
            .and_then(|lit| lit.parse::<Keyword>().ok())
            .filter(|kw| kw.is_in(self.lang));
        let end = word.end();
        Ok(Token {
            id: Tok::Word,
            pos,
            end,
            word,
            kw,
        })
    }

    /// Reads a comment up to (but not including) the line end.
    pub(crate) fn lex_comment(&mut self) -> Result<()> {
        let hash = self.pos();
        self.advance_bytes(1);
        let start = self.offset;
        loop {
            match self.peek_raw_char()? {
                None | Some('\n') => break,
                Some('\r') if self.byte_at(1)? == Some(b'\n') => break,
                Some(_) => {
                    self.advance_char();
                }
            }
        }
        if self.keep_comments {
            let text = self.src[start..self.offset].to_string();
            self.comments.push(Comment { hash, text });
        }
        Ok(())
    }

    /// Scans a control or redirection operator using longest match.
    ///
    /// Operator forms that are extensions are rejected in POSIX mode rather
    /// than silently split into smaller operators, since silently changing
    /// the meaning of `a &> b` would be worse than an error.
    fn scan_operator(&mut self, pos: Pos) -> Result<Operator> {
        use Operator::*;
        let ext = self.lang.is_extended();
        let b0 = self.byte_at(0)?.unwrap();
        let b1 = self.byte_at(1)?;
        let b2 = self.byte_at(2)?;
        let (op, forbidden): (Operator, Option<&'static str>) = match b0 {
            b'&' => match b1 {
                Some(b'&') => (AndAnd, None),
                Some(b'>') if b2 == Some(b'>') => {
                    (AndDblGreater, (!ext).then_some("&>>"))
                }
                Some(b'>') => (AndGreater, (!ext).then_some("&>")),
                _ => (And, None),
            },
            b'|' => match b1 {
                Some(b'|') => (BarBar, None),
                Some(b'&') => (BarAnd, (!ext).then_some("|&")),
                _ => (Bar, None),
            },
            b';' => match (b1, b2) {
                (Some(b';'), Some(b'&')) => (DblSemicolonAnd, (!ext).then_some(";;&")),
                (Some(b';'), _) => (DblSemicolon, None),
                (Some(b'&'), _) => (SemicolonAnd, (!ext).then_some(";&")),
                _ => (Semicolon, None),
            },
            b'(' => (OpenParen, None),
            b')' => (CloseParen, None),
            b'<' => match (b1, b2) {
                (Some(b'<'), Some(b'-')) => (DblLessDash, None),
                (Some(b'<'), Some(b'<')) => (TripleLess, (!ext).then_some("<<<")),
                (Some(b'<'), _) => (DblLess, None),
                (Some(b'&'), _) => (LessAnd, None),
                (Some(b'>'), _) => (LessGreater, None),
                _ => (Less, None),
            },
            b'>' => match b1 {
                Some(b'>') => (DblGreater, None),
                Some(b'&') => (GreaterAnd, None),
                Some(b'|') => (GreaterBar, None),
                _ => (Greater, None),
            },
            _ => unreachable!("scan_operator called at a non-operator byte"),
        };
        if let Some(feature) = forbidden {
            return self.err(
                pos,
                LexError::Forbidden {
                    feature,
                    lang: LangVariant::Posix,
                },
            );
        }
        self.advance_bytes(op.as_str().len());
        Ok(op)
    }
}
