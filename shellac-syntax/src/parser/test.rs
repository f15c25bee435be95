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

//! Parsing of test clauses (`[[ ... ]]`)
//!
//! Within the double brackets, `!` binds tightest, then the binary and
//! unary test operators, then `&&`, then `||`. The right-hand side of `=~`
//! is an extended regular expression, lexed with its own rules so that
//! parentheses, pipes, and the spaces inside groups survive.

use super::error::{Result, SyntaxError};
use super::word::WordMode;
use super::{P, Tok};
use crate::syntax::{BinaryTest, ParenTest, TestClause, TestExpr, UnaryTest, Word};
use crate::token::{BinTestOperator, Keyword, Operator, UnTestOperator};

impl P<'_> {
    /// Parses a `[[ ... ]]` clause; the opening token is the current one.
    pub(crate) fn test_clause(&mut self) -> Result<TestClause> {
        let left = self.take()?.pos;
        self.construct_depth += 1;
        self.skip_test_newlines()?;
        let x = self.test_expr_or()?;
        let right = self.expect_kw(
            Keyword::DblCloseBracket,
            SyntaxError::UnclosedTestClause,
            "`]]`",
        )?;
        self.construct_depth -= 1;
        Ok(TestClause { left, right, x })
    }

    fn skip_test_newlines(&mut self) -> Result<()> {
        while self.peek()?.id == Tok::Newl {
            self.take()?;
            self.read_pending_bodies()?;
        }
        Ok(())
    }

    fn test_expr_or(&mut self) -> Result<TestExpr> {
        let mut x = self.test_expr_and()?;
        while let Some(op_pos) = self.take_op(Operator::BarBar)? {
            self.skip_test_newlines()?;
            let y = self.test_expr_and()?;
            x = TestExpr::Binary(Box::new(BinaryTest {
                op_pos,
                op: BinTestOperator::OrTest,
                x,
                y,
            }));
        }
        Ok(x)
    }

    fn test_expr_and(&mut self) -> Result<TestExpr> {
        let mut x = self.test_expr_not()?;
        while let Some(op_pos) = self.take_op(Operator::AndAnd)? {
            self.skip_test_newlines()?;
            let y = self.test_expr_not()?;
            x = TestExpr::Binary(Box::new(BinaryTest {
                op_pos,
                op: BinTestOperator::AndTest,
                x,
                y,
            }));
        }
        Ok(x)
    }

    fn test_expr_not(&mut self) -> Result<TestExpr> {
        if let Some(op_pos) = self.take_kw(Keyword::Bang)? {
            let x = self.test_expr_not()?;
            return Ok(TestExpr::Unary(Box::new(UnaryTest {
                op_pos,
                op: UnTestOperator::Not,
                x,
            })));
        }
        self.test_primary()
    }

    fn test_primary(&mut self) -> Result<TestExpr> {
        let (id, kw, pos) = {
            let token = self.peek()?;
            (token.id, token.kw, token.pos)
        };
        if id == Tok::Op(Operator::OpenParen) {
            let lparen = self.take()?.pos;
            self.skip_test_newlines()?;
            let x = self.test_expr_or()?;
            let rparen =
                self.expect_op(Operator::CloseParen, SyntaxError::UnclosedTestClause, "`)`")?;
            return Ok(TestExpr::Paren(Box::new(ParenTest { lparen, rparen, x })));
        }
        if kw == Some(Keyword::DblCloseBracket) || id == Tok::Eof {
            return self.err(pos, SyntaxError::EmptyTestClause);
        }
        if id != Tok::Word && id != Tok::IoNumber {
            return self.err(pos, SyntaxError::Expected { what: "a word" });
        }
        let token = self.take()?;

        // A word spelling a unary operator applies to the next word,
        // unless the clause ends right after it, in which case it was an
        // ordinary string operand.
        if let Some(op) = token.word.lit().and_then(|lit| lit.parse::<UnTestOperator>().ok()) {
            let ends = {
                let next = self.peek()?;
                next.kw == Some(Keyword::DblCloseBracket)
                    || matches!(
                        next.id,
                        Tok::Op(Operator::AndAnd)
                            | Tok::Op(Operator::BarBar)
                            | Tok::Op(Operator::CloseParen)
                            | Tok::Eof
                    )
            };
            if !ends {
                let x = self.test_operand()?;
                return Ok(TestExpr::Unary(Box::new(UnaryTest {
                    op_pos: token.pos,
                    op,
                    x: TestExpr::Word(x),
                })));
            }
        }

        let x = TestExpr::Word(token.word);
        self.test_binary_tail(x)
    }

    /// Parses an optional binary operator and right-hand side after a word.
    fn test_binary_tail(&mut self, x: TestExpr) -> Result<TestExpr> {
        let (id, pos) = {
            let token = self.peek()?;
            (token.id, token.pos)
        };
        let op = match id {
            Tok::Op(Operator::Less) => Some(BinTestOperator::Before),
            Tok::Op(Operator::Greater) => Some(BinTestOperator::After),
            Tok::Word => self
                .peek()?
                .word
                .lit()
                .and_then(|lit| lit.parse::<BinTestOperator>().ok()),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(x);
        };
        self.take()?;
        let y = if op == BinTestOperator::ReMatch {
            self.skip_blanks()?;
            let word = self.lex_word(WordMode::Regex)?;
            if word.is_missing() {
                return self.err(self.pos(), SyntaxError::Expected { what: "a regex" });
            }
            word
        } else {
            self.test_operand()?
        };
        Ok(TestExpr::Binary(Box::new(BinaryTest {
            op_pos: pos,
            op,
            x,
            y: TestExpr::Word(y),
        })))
    }

    /// Requires a word token operand.
    fn test_operand(&mut self) -> Result<Word> {
        let (id, pos) = {
            let token = self.peek()?;
            (token.id, token.pos)
        };
        if id != Tok::Word && id != Tok::IoNumber {
            return self.err(pos, SyntaxError::Expected { what: "a word" });
        }
        Ok(self.take()?.word)
    }
}
