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

//! Parsing of arithmetic expressions
//!
//! Arithmetic is parsed by precedence climbing over the C operator table
//! (see [`BinAritOperator::precedence`]). Operands are words, so parameter
//! expansions, quotes, and command substitutions all work inside `$(( ))`.
//!
//! The same parser serves `$(( ))`, `(( ))`, `$[ ]`, array indices, slice
//! bounds in `${a:x:y}`, and the word arguments of `let`, each tweaking the
//! rules slightly through [`ArithmOpts`].

use super::error::{Result, SyntaxError};
use super::P;
use super::word::WordMode;
use crate::source::Pos;
use crate::syntax::{ArithmExpr, BinaryArithm, ParenArithm, UnaryArithm};
use crate::token::{BinAritOperator, UnAritOperator};

/// Context tweaks for parsing one arithmetic expression
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ArithmOpts {
    /// In a `let` argument, a blank ends the expression.
    pub let_mode: bool,
    /// In a `${a:x:y}` slice bound, `:` and `?` are not operators.
    pub slice: bool,
}

impl P<'_> {
    /// Skips whitespace between arithmetic tokens: blanks, escaped
    /// newlines, and plain newlines.
    pub(crate) fn skip_arithm_space(&mut self) -> Result<()> {
        loop {
            if self.skip_line_cont()? {
                continue;
            }
            match self.byte_at(0)? {
                Some(b' ') | Some(b'\t') => self.advance_bytes(1),
                Some(b'\n') => {
                    self.advance_char();
                }
                Some(b'\r') if self.byte_at(1)? == Some(b'\n') => {
                    self.advance_bytes(1);
                    self.advance_char();
                }
                _ => return Ok(()),
            }
        }
    }

    fn space(&mut self, opts: ArithmOpts) -> Result<()> {
        if opts.let_mode {
            // Blanks separate `let` arguments; only continuations are
            // transparent.
            while self.skip_line_cont()? {}
            Ok(())
        } else {
            self.skip_arithm_space()
        }
    }

    /// Parses one arithmetic expression.
    pub(crate) fn arithm_expr_with(&mut self, opts: ArithmOpts) -> Result<ArithmExpr> {
        self.arithm_binary(opts, 0)
    }

    /// Requires the `))` that closes an arithmetic expansion or command,
    /// returning the position of the first parenthesis.
    pub(crate) fn expect_arithm_end(&mut self, start: Pos) -> Result<Pos> {
        self.skip_arithm_space()?;
        if self.starts_with("))")? {
            let pos = self.pos();
            self.advance_bytes(2);
            Ok(pos)
        } else if self.peek_raw_char()?.is_none() {
            self.err(start, SyntaxError::UnclosedArithmExp)
        } else {
            self.err(self.pos(), SyntaxError::Expected { what: "`))`" })
        }
    }

    fn arithm_binary(&mut self, opts: ArithmOpts, min_prec: u8) -> Result<ArithmExpr> {
        let mut x = self.arithm_unary(opts)?;
        loop {
            self.space(opts)?;
            let Some(op) = self.peek_arithm_binop(opts)? else {
                return Ok(x);
            };
            let prec = op.precedence();
            if prec < min_prec {
                return Ok(x);
            }
            let op_pos = self.pos();
            if op.is_assignment() && !is_lvalue(&x) {
                return self.err(op_pos, SyntaxError::AssignToNonIdentifier);
            }
            self.advance_bytes(op.as_str().len());
            if op == BinAritOperator::TernQuest {
                // `a ? b : c` is a quest node whose right side is a colon
                // node. The middle part is a full expression; the else part
                // climbs at the same level, making `?:` right-associative.
                let then = self.arithm_binary(ArithmOpts { slice: false, ..opts }, 0)?;
                self.space(opts)?;
                if self.peek_raw_char()? != Some(':') {
                    return self.err(self.pos(), SyntaxError::Expected { what: "`:`" });
                }
                let colon_pos = self.pos();
                self.advance_bytes(1);
                let els = self.arithm_binary(opts, prec)?;
                let colon = BinaryArithm {
                    op_pos: colon_pos,
                    op: BinAritOperator::TernColon,
                    x: then,
                    y: els,
                };
                x = ArithmExpr::Binary(Box::new(BinaryArithm {
                    op_pos,
                    op,
                    x,
                    y: ArithmExpr::Binary(Box::new(colon)),
                }));
                continue;
            }
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let y = self.arithm_binary(opts, next_min)?;
            x = ArithmExpr::Binary(Box::new(BinaryArithm { op_pos, op, x, y }));
        }
    }

    fn arithm_unary(&mut self, opts: ArithmOpts) -> Result<ArithmExpr> {
        self.space(opts)?;
        let pos = self.pos();
        let b0 = self.byte_at(0)?;
        let b1 = self.byte_at(1)?;
        let prefix = match (b0, b1) {
            (Some(b'+'), Some(b'+')) => Some((UnAritOperator::Inc, 2)),
            (Some(b'-'), Some(b'-')) => Some((UnAritOperator::Dec, 2)),
            (Some(b'+'), _) => Some((UnAritOperator::Plus, 1)),
            (Some(b'-'), _) => Some((UnAritOperator::Minus, 1)),
            (Some(b'!'), _) => Some((UnAritOperator::Not, 1)),
            (Some(b'~'), _) => Some((UnAritOperator::BitNegation, 1)),
            _ => None,
        };
        if let Some((op, len)) = prefix {
            self.advance_bytes(len);
            let x = self.arithm_unary(opts)?;
            return Ok(ArithmExpr::Unary(Box::new(UnaryArithm {
                op_pos: pos,
                op,
                post: false,
                x,
            })));
        }
        let mut x = self.arithm_primary(opts)?;
        // Postfix increment and decrement; `a + +b` is not one because the
        // two plus signs are not adjacent.
        self.space(opts)?;
        let (b0, b1) = (self.byte_at(0)?, self.byte_at(1)?);
        let postfix = match (b0, b1) {
            (Some(b'+'), Some(b'+')) => Some(UnAritOperator::Inc),
            (Some(b'-'), Some(b'-')) => Some(UnAritOperator::Dec),
            _ => None,
        };
        if let Some(op) = postfix {
            let op_pos = self.pos();
            self.advance_bytes(2);
            x = ArithmExpr::Unary(Box::new(UnaryArithm {
                op_pos,
                op,
                post: true,
                x,
            }));
        }
        Ok(x)
    }

    fn arithm_primary(&mut self, opts: ArithmOpts) -> Result<ArithmExpr> {
        if self.peek_raw_char()? == Some('(') {
            let lparen = self.pos();
            self.advance_bytes(1);
            let x = self.arithm_binary(ArithmOpts { slice: false, ..opts }, 0)?;
            self.space(opts)?;
            if self.peek_raw_char()? != Some(')') {
                return self.err(self.pos(), SyntaxError::Expected { what: "`)`" });
            }
            let rparen = self.pos();
            self.advance_bytes(1);
            return Ok(ArithmExpr::Paren(Box::new(ParenArithm { lparen, rparen, x })));
        }
        let pos = self.pos();
        let word = self.lex_word(WordMode::Arithm)?;
        if word.is_missing() {
            return self.err(pos, SyntaxError::Expected { what: "an operand" });
        }
        Ok(ArithmExpr::Word(word))
    }

    /// Looks ahead for a binary operator without consuming it, longest
    /// match first.
    fn peek_arithm_binop(&mut self, opts: ArithmOpts) -> Result<Option<BinAritOperator>> {
        use BinAritOperator::*;
        if opts.let_mode {
            // A blank ends the current let argument.
            if matches!(self.byte_at(0)?, Some(b' ') | Some(b'\t')) {
                return Ok(None);
            }
        }
        let b0 = self.byte_at(0)?;
        let b1 = self.byte_at(1)?;
        let b2 = self.byte_at(2)?;
        let op = match (b0, b1, b2) {
            (Some(b'<'), Some(b'<'), Some(b'=')) => ShlAssgn,
            (Some(b'>'), Some(b'>'), Some(b'=')) => ShrAssgn,
            (Some(b'*'), Some(b'*'), _) => Pow,
            (Some(b'<'), Some(b'<'), _) => Shl,
            (Some(b'>'), Some(b'>'), _) => Shr,
            (Some(b'<'), Some(b'='), _) => Leq,
            (Some(b'>'), Some(b'='), _) => Geq,
            (Some(b'='), Some(b'='), _) => Eql,
            (Some(b'!'), Some(b'='), _) => Neq,
            (Some(b'&'), Some(b'&'), _) => AndArit,
            (Some(b'|'), Some(b'|'), _) => OrArit,
            (Some(b'+'), Some(b'='), _) => AddAssgn,
            (Some(b'-'), Some(b'='), _) => SubAssgn,
            (Some(b'*'), Some(b'='), _) => MulAssgn,
            (Some(b'/'), Some(b'='), _) => QuoAssgn,
            (Some(b'%'), Some(b'='), _) => RemAssgn,
            (Some(b'&'), Some(b'='), _) => AndAssgn,
            (Some(b'^'), Some(b'='), _) => XorAssgn,
            (Some(b'|'), Some(b'='), _) => OrAssgn,
            (Some(b'+'), _, _) => Add,
            (Some(b'-'), _, _) => Sub,
            (Some(b'*'), _, _) => Mul,
            (Some(b'/'), _, _) => Quo,
            (Some(b'%'), _, _) => Rem,
            (Some(b'<'), _, _) => Lss,
            (Some(b'>'), _, _) => Gtr,
            (Some(b'&'), _, _) => And,
            (Some(b'|'), _, _) => Or,
            (Some(b'^'), _, _) => Xor,
            (Some(b'='), _, _) => Assgn,
            (Some(b','), _, _) => Comma,
            // The colon of a ternary is consumed by the quest branch, so a
            // bare `:` never reads as an operator here; it ends the
            // expression (a slice bound or case pattern follows).
            (Some(b'?'), _, _) if !opts.slice => TernQuest,
            _ => return Ok(None),
        };
        Ok(Some(op))
    }
}

/// Tests whether an expression can be assigned to.
///
/// Assignable operands are words naming a variable, possibly subscripted
/// (`i`, `arr[n+1]`), or words whose name comes out of an expansion
/// (`$ref`, which the shell dereferences to a name). A bare number or a
/// parenthesized expression cannot take an assignment.
fn is_lvalue(expr: &ArithmExpr) -> bool {
    match expr {
        ArithmExpr::Word(word) => match word.lit() {
            Some(lit) => !lit.bytes().all(|b| b.is_ascii_digit()),
            None => true,
        },
        _ => false,
    }
}
