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

//! Parsing of braced parameter expansions
//!
//! Inside `${...}`, the characters after the parameter name become
//! modifier operators, and the modifier operand is a word whose only
//! terminator is the closing brace. The mksh value substitutions
//! `${ cmds;}` and `${|cmds;}` also start with `${` and are dispatched
//! here.

use super::error::{LexError, Result, SyntaxError};
use super::word::WordMode;
use super::P;
use crate::source::Pos;
use crate::syntax::{
    ArithmExpr, CmdSubst, Expansion, Lit, ParamExp, Replace, Slice, Word, WordPart,
};
use crate::token::{Keyword, LangVariant, NamesOperator, ParExpOperator};

impl P<'_> {
    /// Parses a `${...}` form after the `$` has been seen.
    pub(crate) fn braced_param(&mut self, dollar: Pos) -> Result<WordPart> {
        match self.byte_at(2)? {
            Some(b' ') | Some(b'\t') | Some(b'\n') => {
                return Ok(WordPart::CmdSubst(self.value_subst(dollar, false)?));
            }
            Some(b'|') => {
                return Ok(WordPart::CmdSubst(self.value_subst(dollar, true)?));
            }
            _ => {}
        }
        self.advance_bytes(2);
        self.construct_depth += 1;

        let mut exp = ParamExp {
            dollar,
            ..ParamExp::default()
        };

        let excl_pos = self.pos();
        if self.peek_raw_char()? == Some('!') && self.byte_at(1)? != Some(b'}') {
            self.advance_bytes(1);
            exp.excl = true;
        }
        match self.peek_raw_char()? {
            Some('#') if self.byte_at(1)? != Some(b'}') => {
                self.advance_bytes(1);
                exp.length = true;
            }
            Some('%')
                if self.lang == LangVariant::MirBsdKorn && self.byte_at(1)? != Some(b'}') =>
            {
                self.advance_bytes(1);
                exp.width = true;
            }
            _ => {}
        }

        exp.param = self.param_name()?;
        if exp.param.value.is_empty() {
            if exp.excl && self.peek_raw_char()? == Some('}') {
                // `${!}` names the special parameter itself.
                exp.excl = false;
                exp.param = Lit {
                    value_pos: excl_pos,
                    value_end: excl_pos.after(1),
                    value: "!".to_string(),
                };
            } else {
                return self.err(self.pos(), SyntaxError::InvalidParamName);
            }
        }

        if self.peek_raw_char()? == Some('[') {
            if !self.lang.is_extended() {
                return self.err(
                    self.pos(),
                    LexError::Forbidden {
                        feature: "arrays",
                        lang: self.lang,
                    },
                );
            }
            exp.index = Some(self.param_index()?);
        }

        if exp.excl {
            let names = match (self.byte_at(0)?, self.byte_at(1)?) {
                (Some(b'*'), Some(b'}')) => Some(NamesOperator::Prefix),
                (Some(b'@'), Some(b'}')) => Some(NamesOperator::PrefixWords),
                _ => None,
            };
            if let Some(names) = names {
                if self.lang == LangVariant::MirBsdKorn {
                    return self.err(
                        self.pos(),
                        LexError::Forbidden {
                            feature: "${!foo@}",
                            lang: self.lang,
                        },
                    );
                }
                self.advance_bytes(1);
                exp.names = Some(names);
            }
        }

        if self.peek_raw_char()? != Some('}') {
            if exp.length || exp.width {
                return self.err(self.pos(), SyntaxError::InvalidModifier);
            }
            self.param_modifier(&mut exp)?;
        }

        match self.peek_raw_char()? {
            Some('}') => {
                exp.rbrace = self.pos();
                self.advance_bytes(1);
            }
            Some(_) => return self.err(self.pos(), SyntaxError::Expected { what: "`}`" }),
            None => return self.err(dollar, SyntaxError::UnclosedParamExp),
        }
        self.construct_depth -= 1;
        Ok(WordPart::ParamExp(Box::new(exp)))
    }

    /// Parses the mksh `${ cmds;}` and `${|cmds;}` value substitutions.
    fn value_subst(&mut self, dollar: Pos, repl_in: bool) -> Result<CmdSubst> {
        if self.lang != LangVariant::MirBsdKorn {
            return self.err(
                dollar,
                LexError::Forbidden {
                    feature: if repl_in { "${|...;}" } else { "${ ...;}" },
                    lang: self.lang,
                },
            );
        }
        self.advance_bytes(if repl_in { 3 } else { 2 });
        self.construct_depth += 1;
        self.sub_depth += 1;
        let stmts = self.stmt_list_until_kw(Keyword::CloseBrace)?;
        let right = self.expect_kw(
            Keyword::CloseBrace,
            SyntaxError::UnclosedCmdSubst,
            "`}`",
        )?;
        self.sub_depth -= 1;
        self.construct_depth -= 1;
        Ok(CmdSubst {
            left: dollar,
            right,
            stmts,
            temp_file: !repl_in,
            repl_in,
            ..CmdSubst::default()
        })
    }

    /// Reads a parameter name: a variable name, a run of digits, or a
    /// single special-parameter character.
    fn param_name(&mut self) -> Result<Lit> {
        let value_pos = self.pos();
        let mut value = String::new();
        match self.peek_raw_char()? {
            Some(c) if c.is_ascii_digit() => {
                while let Some(c) = self.peek_raw_char()? {
                    if c.is_ascii_digit() {
                        self.advance_char();
                        value.push(c);
                    } else {
                        break;
                    }
                }
            }
            Some(c) if matches!(c, '@' | '*' | '#' | '?' | '-' | '$' | '!') => {
                self.advance_char();
                value.push(c);
            }
            _ => {
                while let Some(c) = self.peek_raw_char()? {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        self.advance_char();
                        value.push(c);
                    } else {
                        break;
                    }
                }
            }
        }
        Ok(Lit {
            value_pos,
            value_end: self.pos(),
            value,
        })
    }

    /// Parses the `[index]` of a subscripted parameter.
    ///
    /// `@` and `*` are valid subscripts even though they are operators in
    /// arithmetic.
    fn param_index(&mut self) -> Result<ArithmExpr> {
        self.advance_bytes(1);
        let index = match (self.byte_at(0)?, self.byte_at(1)?) {
            (Some(b'@'), Some(b']')) | (Some(b'*'), Some(b']')) => {
                let value_pos = self.pos();
                let c = self.advance_char();
                ArithmExpr::Word(Word {
                    parts: vec![WordPart::Lit(Lit {
                        value_pos,
                        value_end: self.pos(),
                        value: c.to_string(),
                    })],
                })
            }
            _ => self.arithm_expr_with(super::arithm::ArithmOpts::default())?,
        };
        self.skip_arithm_space()?;
        if self.peek_raw_char()? != Some(']') {
            return self.err(self.pos(), SyntaxError::Expected { what: "`]`" });
        }
        self.advance_bytes(1);
        Ok(index)
    }

    /// Parses the modifier that follows the parameter name.
    fn param_modifier(&mut self, exp: &mut ParamExp) -> Result<()> {
        use ParExpOperator::*;
        let pos = self.pos();
        let b0 = self.byte_at(0)?.unwrap();
        let b1 = self.byte_at(1)?;
        match b0 {
            b':' if matches!(b1, Some(b'-') | Some(b'=') | Some(b'?') | Some(b'+')) => {
                let op = match b1.unwrap() {
                    b'-' => DefaultUnsetOrNull,
                    b'=' => AssignUnsetOrNull,
                    b'?' => ErrorUnsetOrNull,
                    _ => AlternateUnsetOrNull,
                };
                self.advance_bytes(2);
                exp.exp = Some(self.expansion(op)?);
            }
            b':' => {
                self.check_extended(pos, "slicing")?;
                self.advance_bytes(1);
                exp.slice = Some(self.param_slice()?);
            }
            b'-' | b'=' | b'?' | b'+' => {
                let op = match b0 {
                    b'-' => DefaultUnset,
                    b'=' => AssignUnset,
                    b'?' => ErrorUnset,
                    _ => AlternateUnset,
                };
                self.advance_bytes(1);
                exp.exp = Some(self.expansion(op)?);
            }
            b'#' => {
                let op = if b1 == Some(b'#') {
                    self.advance_bytes(2);
                    RemLargePrefix
                } else {
                    self.advance_bytes(1);
                    RemSmallPrefix
                };
                exp.exp = Some(self.expansion(op)?);
            }
            b'%' => {
                let op = if b1 == Some(b'%') {
                    self.advance_bytes(2);
                    RemLargeSuffix
                } else {
                    self.advance_bytes(1);
                    RemSmallSuffix
                };
                exp.exp = Some(self.expansion(op)?);
            }
            b'/' => {
                self.check_extended(pos, "replacement")?;
                let all = b1 == Some(b'/');
                self.advance_bytes(if all { 2 } else { 1 });
                let orig = self.lex_word(WordMode::ParamValue { stop_slash: true })?;
                let with = if self.peek_raw_char()? == Some('/') {
                    self.advance_bytes(1);
                    self.lex_word(WordMode::ParamValue { stop_slash: false })?
                } else {
                    Word::default()
                };
                exp.repl = Some(Replace { all, orig, with });
            }
            b'^' | b',' => {
                if !matches!(self.lang, LangVariant::Bash | LangVariant::Bats) {
                    return self.err(
                        pos,
                        LexError::Forbidden {
                            feature: if b0 == b'^' { "${foo^}" } else { "${foo,}" },
                            lang: self.lang,
                        },
                    );
                }
                let op = match (b0, b1) {
                    (b'^', Some(b'^')) => UpperAll,
                    (b'^', _) => UpperFirst,
                    (b',', Some(b',')) => LowerAll,
                    _ => LowerFirst,
                };
                self.advance_bytes(op.as_str().len());
                exp.exp = Some(self.expansion(op)?);
            }
            b'@' => {
                self.check_extended(pos, "${foo@op}")?;
                self.advance_bytes(1);
                exp.exp = Some(self.expansion(OtherParamOps)?);
            }
            _ => return self.err(pos, SyntaxError::InvalidModifier),
        }
        Ok(())
    }

    fn expansion(&mut self, op: ParExpOperator) -> Result<Expansion> {
        let word = self.lex_word(WordMode::ParamValue { stop_slash: false })?;
        Ok(Expansion { op, word })
    }

    /// Parses the `${a:x:y}` slice bounds.
    fn param_slice(&mut self) -> Result<Slice> {
        let opts = super::arithm::ArithmOpts {
            slice: true,
            ..super::arithm::ArithmOpts::default()
        };
        let mut slice = Slice::default();
        self.skip_arithm_space()?;
        if !matches!(self.peek_raw_char()?, Some(':') | Some('}')) {
            slice.offset = Some(self.arithm_expr_with(opts)?);
            self.skip_arithm_space()?;
        }
        if self.peek_raw_char()? == Some(':') {
            self.advance_bytes(1);
            self.skip_arithm_space()?;
            if self.peek_raw_char()? != Some('}') {
                slice.length = Some(self.arithm_expr_with(opts)?);
            }
        }
        Ok(slice)
    }

    fn check_extended(&mut self, pos: Pos, feature: &'static str) -> Result<()> {
        if self.lang.is_extended() {
            Ok(())
        } else {
            self.err(
                pos,
                LexError::Forbidden {
                    feature,
                    lang: self.lang,
                },
            )
        }
    }
}
