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

//! Word lexing
//!
//! A word is lexed part by part. The surrounding construct decides where
//! the word ends and which characters are special, expressed here as a
//! [`WordMode`]. The same byte can be an operator in one mode and literal
//! text in another, which is the heart of shell's context sensitivity.

use super::error::{Result, SyntaxError};
use super::{P, Tok};
use crate::source::Pos;
use crate::syntax::{
    ArithmExp, CmdSubst, DblQuoted, Lit, ParamExp, ProcSubst, SglQuoted, Word, WordPart,
};
use crate::token::{GlobOperator, LangVariant, Operator, ProcOperator};

/// Lexical context of a word
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WordMode {
    /// A word at command position: ends at blanks, newlines, and operators
    Normal,
    /// The value of a parameter expansion modifier: ends at the closing
    /// `}`, and at `/` when lexing the pattern of a replacement
    ParamValue { stop_slash: bool },
    /// An operand inside an arithmetic expression: name and number
    /// characters only
    Arithm,
    /// The right-hand side of `=~`: blanks are literal inside parentheses
    Regex,
    /// An unquoted here-document body, up to the given byte offset:
    /// only `$`, `` ` ``, and `\` are special
    Heredoc { end: usize },
}

impl P<'_> {
    /// Lexes one word in the given mode.
    ///
    /// The returned word is "missing" (has no parts) if the input begins
    /// with a word terminator for the mode.
    pub(crate) fn lex_word(&mut self, mode: WordMode) -> Result<Word> {
        let mut parts = Vec::new();
        // Depth of nested unquoted braces (parameter values), brackets
        // (arithmetic), or parentheses (regexes), shared with the literal
        // lexer so that a closer inside a balanced pair stays literal.
        let mut depth = 0usize;
        loop {
            if !matches!(mode, WordMode::Heredoc { .. }) && self.skip_line_cont()? {
                continue;
            }
            if let WordMode::Heredoc { end } = mode {
                if self.offset >= end {
                    break;
                }
            }
            let Some(c) = self.peek_raw_char()? else {
                break;
            };
            let part = match c {
                '\'' if !matches!(mode, WordMode::Heredoc { .. }) => {
                    WordPart::SglQuoted(self.sgl_quoted()?)
                }
                '"' if !matches!(mode, WordMode::Heredoc { .. }) => {
                    WordPart::DblQuoted(self.dbl_quoted(None)?)
                }
                '$' => self.dollar_part(mode, false)?,
                '`' => {
                    if self.bq {
                        break;
                    }
                    WordPart::CmdSubst(self.backquote_subst()?)
                }
                '<' | '>'
                    if mode == WordMode::Normal
                        && self.byte_at(1)? == Some(b'(')
                        && self.lang.is_extended() =>
                {
                    WordPart::ProcSubst(self.proc_subst()?)
                }
                '?' | '*' | '+' | '@' | '!'
                    if matches!(mode, WordMode::Normal | WordMode::ParamValue { .. })
                        && self.byte_at(1)? == Some(b'(')
                        && self.lang.is_extended() =>
                {
                    WordPart::ExtGlob(self.ext_glob()?)
                }
                c if self.word_break(c, mode, depth) => break,
                _ => {
                    let lit = self.lex_lit(mode, &mut depth)?;
                    if lit.value.is_empty() {
                        break;
                    }
                    WordPart::Lit(lit)
                }
            };
            parts.push(part);
        }
        Ok(Word { parts })
    }

    /// Decides whether a character terminates the word in the given mode.
    fn word_break(&mut self, c: char, mode: WordMode, depth: usize) -> bool {
        match mode {
            WordMode::Normal => matches!(
                c,
                ' ' | '\t' | '\n' | '\r' | ';' | '&' | '|' | '<' | '>' | '(' | ')'
            ),
            WordMode::ParamValue { stop_slash } => match c {
                '}' => depth == 0,
                '/' => stop_slash,
                _ => false,
            },
            WordMode::Arithm => {
                if depth > 0 {
                    // Inside a subscript everything up to the matching `]`
                    // belongs to the word, operators included: `a[i+1]`.
                    false
                } else {
                    !matches!(
                        c,
                        '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' | '@' | '#' | '[' | ']'
                    ) || c == ']'
                }
            }
            WordMode::Regex => match c {
                ' ' | '\t' | '\n' | '\r' => depth == 0,
                ')' => depth == 0,
                _ => false,
            },
            WordMode::Heredoc { .. } => false,
        }
    }

    /// Lexes a run of literal characters.
    fn lex_lit(&mut self, mode: WordMode, depth: &mut usize) -> Result<Lit> {
        let value_pos = self.pos();
        let mut value = String::new();
        loop {
            if !matches!(mode, WordMode::Heredoc { .. }) && self.skip_line_cont()? {
                continue;
            }
            if let WordMode::Heredoc { end } = mode {
                if self.offset >= end {
                    break;
                }
            }
            let Some(c) = self.peek_raw_char()? else {
                break;
            };
            match c {
                '\\' => match mode {
                    WordMode::Arithm => break,
                    WordMode::Heredoc { .. } => {
                        // Only `\$`, `` \` ``, and `\\` escape; the pair is
                        // preserved either way, including `\` + newline.
                        self.advance_char();
                        value.push('\\');
                        if let Some(next) = self.peek_raw_char()? {
                            if matches!(next, '$' | '`' | '\\') {
                                self.advance_char();
                                value.push(next);
                            }
                        }
                    }
                    _ => {
                        // A backslash escapes the next character; both
                        // bytes are preserved in the literal value.
                        self.advance_char();
                        value.push('\\');
                        if let Some(next) = self.peek_raw_char()? {
                            self.advance_char();
                            value.push(next);
                        }
                    }
                },
                '\'' | '"' if !matches!(mode, WordMode::Heredoc { .. }) => break,
                '$' | '`' => break,
                '{' if matches!(mode, WordMode::ParamValue { .. }) => {
                    *depth += 1;
                    self.advance_char();
                    value.push(c);
                }
                '}' if matches!(mode, WordMode::ParamValue { .. }) && *depth > 0 => {
                    *depth -= 1;
                    self.advance_char();
                    value.push(c);
                }
                '[' if mode == WordMode::Arithm => {
                    *depth += 1;
                    self.advance_char();
                    value.push(c);
                }
                ']' if mode == WordMode::Arithm && *depth > 0 => {
                    *depth -= 1;
                    self.advance_char();
                    value.push(c);
                }
                '(' if mode == WordMode::Regex => {
                    *depth += 1;
                    self.advance_char();
                    value.push(c);
                }
                ')' if mode == WordMode::Regex && *depth > 0 => {
                    *depth -= 1;
                    self.advance_char();
                    value.push(c);
                }
                '?' | '*' | '+' | '@' | '!'
                    if matches!(mode, WordMode::Normal | WordMode::ParamValue { .. })
                        && self.byte_at(1)? == Some(b'(')
                        && self.lang.is_extended() =>
                {
                    break;
                }
                c if self.word_break(c, mode, *depth) => break,
                c => {
                    self.advance_char();
                    value.push(c);
                }
            }
        }
        Ok(Lit {
            value_pos,
            value_end: self.pos(),
            value,
        })
    }

    /// Lexes a part starting with `$`. A dollar that opens nothing is a
    /// one-character literal.
    fn dollar_part(&mut self, mode: WordMode, in_dquotes: bool) -> Result<WordPart> {
        // `$'...'` and `$"..."` are only special where quoting is; inside
        // double quotes and here-document bodies the dollar is on its own.
        let quotes_ok = !in_dquotes && !matches!(mode, WordMode::Heredoc { .. });
        let dollar = self.pos();
        let part = match self.byte_at(1)? {
            Some(b'(') if self.byte_at(2)? == Some(b'(') => {
                WordPart::ArithmExp(self.arithm_exp_part(dollar)?)
            }
            Some(b'(') => WordPart::CmdSubst(self.dollar_cmd_subst(dollar)?),
            Some(b'{') => self.braced_param(dollar)?,
            Some(b'\'') if quotes_ok && self.lang.is_extended() => {
                WordPart::SglQuoted(self.dollar_sgl_quoted(dollar)?)
            }
            Some(b'"') if quotes_ok && self.lang.is_extended() => {
                WordPart::DblQuoted(self.dbl_quoted(Some(dollar))?)
            }
            Some(b'[') if self.lang == LangVariant::Bash || self.lang == LangVariant::Bats => {
                WordPart::ArithmExp(self.deprecated_arithm_exp(dollar)?)
            }
            Some(c)
                if c.is_ascii_alphanumeric()
                    || matches!(c, b'_' | b'@' | b'*' | b'#' | b'?' | b'-' | b'$' | b'!') =>
            {
                WordPart::ParamExp(Box::new(self.short_param(dollar)?))
            }
            _ => {
                // A lone dollar is a literal.
                self.advance_bytes(1);
                WordPart::Lit(Lit {
                    value_pos: dollar,
                    value_end: dollar.after(1),
                    value: "$".to_string(),
                })
            }
        };
        Ok(part)
    }

    /// Lexes a `$name` or `$@`-style short parameter expansion after the
    /// dollar has been seen.
    fn short_param(&mut self, dollar: Pos) -> Result<ParamExp> {
        self.advance_bytes(1);
        let value_pos = self.pos();
        let mut value = String::new();
        let first = self.peek_raw_char()?.unwrap();
        if first.is_ascii_digit() || matches!(first, '@' | '*' | '#' | '?' | '-' | '$' | '!') {
            // Special and positional parameters are a single character;
            // `$10` means `${1}0`.
            self.advance_char();
            value.push(first);
        } else {
            while let Some(c) = self.peek_raw_char()? {
                if c.is_ascii_alphanumeric() || c == '_' {
                    self.advance_char();
                    value.push(c);
                } else {
                    break;
                }
            }
        }
        Ok(ParamExp {
            dollar,
            short: true,
            param: Lit {
                value_pos,
                value_end: self.pos(),
                value,
            },
            ..ParamExp::default()
        })
    }

    /// Lexes a `'...'` string. The bytes inside are copied verbatim; the
    /// shell has no escapes inside single quotes, and escaped newlines are
    /// not continuations here.
    fn sgl_quoted(&mut self) -> Result<SglQuoted> {
        let left = self.pos();
        self.advance_bytes(1);
        let start = self.offset;
        loop {
            match self.peek_raw_char()? {
                Some('\'') => break,
                Some(_) => {
                    self.advance_char();
                }
                None => return self.err(left, SyntaxError::UnclosedSingleQuote),
            }
        }
        let value = self.src[start..self.offset].to_string();
        let right = self.pos();
        self.advance_bytes(1);
        Ok(SglQuoted {
            left,
            right,
            dollar: false,
            value,
        })
    }

    /// Lexes a `$'...'` string. Escape pairs are preserved undecoded; a
    /// `\'` does not close the string.
    fn dollar_sgl_quoted(&mut self, dollar: Pos) -> Result<SglQuoted> {
        self.advance_bytes(2);
        let start = self.offset;
        loop {
            match self.peek_raw_char()? {
                Some('\'') => break,
                Some('\\') => {
                    self.advance_char();
                    if self.peek_raw_char()?.is_some() {
                        self.advance_char();
                    }
                }
                Some(_) => {
                    self.advance_char();
                }
                None => return self.err(dollar, SyntaxError::UnclosedSingleQuote),
            }
        }
        let value = self.src[start..self.offset].to_string();
        let right = self.pos();
        self.advance_bytes(1);
        Ok(SglQuoted {
            left: dollar,
            right,
            dollar: true,
            value,
        })
    }

    /// Lexes a `"..."` or `$"..."` string.
    fn dbl_quoted(&mut self, dollar: Option<Pos>) -> Result<DblQuoted> {
        let left = dollar.unwrap_or_else(|| self.pos());
        self.advance_bytes(if dollar.is_some() { 2 } else { 1 });
        self.construct_depth += 1;
        let mut parts = Vec::new();
        let right = loop {
            match self.peek_raw_char()? {
                Some('"') => {
                    let right = self.pos();
                    self.advance_bytes(1);
                    break right;
                }
                Some('$') => parts.push(self.dollar_part(WordMode::Normal, true)?),
                Some('`') => {
                    if self.bq {
                        // The closing backquote of the enclosing
                        // substitution scans ahead of the quote state.
                        return self.err(left, SyntaxError::UnclosedDoubleQuote);
                    }
                    parts.push(WordPart::CmdSubst(self.backquote_subst()?));
                }
                Some(_) => parts.push(WordPart::Lit(self.dquoted_lit()?)),
                None => return self.err(left, SyntaxError::UnclosedDoubleQuote),
            }
        };
        self.construct_depth -= 1;
        Ok(DblQuoted {
            left,
            right,
            dollar: dollar.is_some(),
            parts,
        })
    }

    /// Lexes a literal run inside double quotes.
    ///
    /// Only `\$`, `` \` ``, `\"`, and `\\` are escapes; any other
    /// backslash is an ordinary character. A `\` + newline is a
    /// continuation even here.
    fn dquoted_lit(&mut self) -> Result<Lit> {
        let value_pos = self.pos();
        let mut value = String::new();
        loop {
            if self.skip_line_cont()? {
                continue;
            }
            match self.peek_raw_char()? {
                None | Some('"') | Some('$') | Some('`') => break,
                Some('\\') => {
                    self.advance_char();
                    value.push('\\');
                    match self.peek_raw_char()? {
                        Some(next) if matches!(next, '$' | '`' | '"' | '\\') => {
                            self.advance_char();
                            value.push(next);
                        }
                        _ => {}
                    }
                }
                Some(c) => {
                    self.advance_char();
                    value.push(c);
                }
            }
        }
        Ok(Lit {
            value_pos,
            value_end: self.pos(),
            value,
        })
    }

    /// Lexes a `$(...)` command substitution after the dollar has been
    /// seen.
    fn dollar_cmd_subst(&mut self, dollar: Pos) -> Result<CmdSubst> {
        self.advance_bytes(2);
        self.construct_depth += 1;
        self.sub_depth += 1;
        let stmts = self.stmt_list_until(Tok::Op(Operator::CloseParen))?;
        let right = self.expect_op(Operator::CloseParen, SyntaxError::UnclosedCmdSubst, "`)`")?;
        self.sub_depth -= 1;
        self.construct_depth -= 1;
        Ok(CmdSubst {
            left: dollar,
            right,
            stmts,
            ..CmdSubst::default()
        })
    }

    /// Lexes a `` `...` `` command substitution.
    ///
    /// Nesting backquotes inside backquotes is not supported; `$(...)` is
    /// the nestable form. A backslash before a backquote keeps it literal.
    fn backquote_subst(&mut self) -> Result<CmdSubst> {
        let left = self.pos();
        self.advance_bytes(1);
        self.construct_depth += 1;
        self.sub_depth += 1;
        self.bq = true;
        let stmts = self.stmt_list_until(Tok::BquoteEnd)?;
        let (id, pos) = {
            let token = self.peek()?;
            (token.id, token.pos)
        };
        if id != Tok::BquoteEnd {
            return self.err(
                if id == Tok::Eof { left } else { pos },
                SyntaxError::UnclosedBackquote,
            );
        }
        let right = self.take()?.pos;
        self.bq = false;
        self.sub_depth -= 1;
        self.construct_depth -= 1;
        Ok(CmdSubst {
            left,
            right,
            stmts,
            backquotes: true,
            ..CmdSubst::default()
        })
    }

    /// Lexes a `<(...)` or `>(...)` process substitution.
    fn proc_subst(&mut self) -> Result<ProcSubst> {
        let op_pos = self.pos();
        let op = if self.byte_at(0)?.unwrap() == b'<' {
            ProcOperator::CmdIn
        } else {
            ProcOperator::CmdOut
        };
        self.advance_bytes(2);
        self.construct_depth += 1;
        self.sub_depth += 1;
        let stmts = self.stmt_list_until(Tok::Op(Operator::CloseParen))?;
        let rparen = self.expect_op(Operator::CloseParen, SyntaxError::UnclosedProcSubst, "`)`")?;
        self.sub_depth -= 1;
        self.construct_depth -= 1;
        Ok(ProcSubst {
            op_pos,
            rparen,
            op,
            stmts,
        })
    }

    /// Lexes an extended globbing expression such as `@(a|b)`.
    ///
    /// The pattern is stored raw, including nested parentheses.
    fn ext_glob(&mut self) -> Result<crate::syntax::ExtGlob> {
        let op_pos = self.pos();
        let op = match self.byte_at(0)?.unwrap() {
            b'?' => GlobOperator::ZeroOrOne,
            b'*' => GlobOperator::ZeroOrMore,
            b'+' => GlobOperator::OneOrMore,
            b'@' => GlobOperator::One,
            _ => GlobOperator::Not,
        };
        self.advance_bytes(2);
        let value_pos = self.pos();
        let mut value = String::new();
        let mut depth = 0usize;
        loop {
            match self.peek_raw_char()? {
                Some(')') if depth == 0 => break,
                Some(')') => {
                    depth -= 1;
                    value.push(self.advance_char());
                }
                Some('(') => {
                    depth += 1;
                    value.push(self.advance_char());
                }
                Some('\\') => {
                    value.push(self.advance_char());
                    if self.peek_raw_char()?.is_some() {
                        value.push(self.advance_char());
                    }
                }
                Some(c) => {
                    self.advance_char();
                    value.push(c);
                }
                None => return self.err(op_pos, SyntaxError::UnclosedExtGlob),
            }
        }
        let pattern = Lit {
            value_pos,
            value_end: self.pos(),
            value,
        };
        self.advance_bytes(1);
        Ok(crate::syntax::ExtGlob {
            op_pos,
            op,
            pattern,
        })
    }

    /// Lexes a `$((...))` arithmetic expansion after the dollar has been
    /// seen.
    fn arithm_exp_part(&mut self, dollar: Pos) -> Result<ArithmExp> {
        self.advance_bytes(3);
        self.construct_depth += 1;
        let x = self.arithm_expr_with(super::arithm::ArithmOpts::default())?;
        let right = self.expect_arithm_end(dollar)?;
        self.construct_depth -= 1;
        Ok(ArithmExp {
            left: dollar,
            right,
            bracket: false,
            x,
        })
    }

    /// Lexes the deprecated `$[...]` arithmetic expansion.
    fn deprecated_arithm_exp(&mut self, dollar: Pos) -> Result<ArithmExp> {
        self.advance_bytes(2);
        self.construct_depth += 1;
        let x = self.arithm_expr_with(super::arithm::ArithmOpts::default())?;
        self.skip_arithm_space()?;
        if self.peek_raw_char()? != Some(']') {
            return self.err(dollar, SyntaxError::UnclosedArithmExp);
        }
        let right = self.pos();
        self.advance_bytes(1);
        self.construct_depth -= 1;
        Ok(ArithmExp {
            left: dollar,
            right,
            bracket: true,
            x,
        })
    }
}
