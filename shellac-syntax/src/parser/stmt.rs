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

//! Parsing of statements and commands
//!
//! This module covers the statement-level grammar: lists, pipelines,
//! `&&`/`||` chains, simple commands with their assignment and redirection
//! prefixes, and every compound command. Pipes bind tighter than `&&` and
//! `||`, which share one level and associate to the left; `;` and `&`
//! separate list items.

use super::error::{Result, SyntaxError};
use super::word::WordMode;
use super::{P, Tok};
use crate::source::{Pos, valid_name};
use crate::syntax::{
    ArithmExpr, ArrayElem, ArrayExpr, Assign, BinaryCmd, Block, CallExpr, CaseClause, CaseItem,
    Command, CoprocClause, CStyleLoop, DeclClause, Elif, Else, File, ForClause, FuncDecl,
    IfClause, LetClause, Lit, Loop, Redirect, Stmt, Subshell, TestDecl, TimeClause, WhileClause,
    Word, WordIter,
};
use crate::token::{
    BinCmdOperator, CaseOperator, Keyword, LangVariant, Operator, RedirOperator,
};

/// What ends a statement list
#[derive(Clone, Copy, Debug)]
enum ListEnd {
    /// Only the end of input
    Eof,
    /// A specific token, e.g. `)` or a closing backquote
    Token(Tok),
    /// Any of the given keywords
    Kws(&'static [Keyword]),
    /// A case item terminator (`;;`, `;&`, `;;&`) or `esac`
    CaseItem,
}

impl ListEnd {
    fn matches(self, id: Tok, kw: Option<Keyword>) -> bool {
        match self {
            ListEnd::Eof => false,
            ListEnd::Token(tok) => id == tok,
            ListEnd::Kws(kws) => kw.is_some_and(|kw| kws.contains(&kw)),
            ListEnd::CaseItem => {
                kw == Some(Keyword::Esac)
                    || matches!(
                        id,
                        Tok::Op(Operator::DblSemicolon)
                            | Tok::Op(Operator::SemicolonAnd)
                            | Tok::Op(Operator::DblSemicolonAnd)
                    )
            }
        }
    }
}

impl P<'_> {
    /// Parses a whole source file.
    pub(crate) fn file(&mut self) -> Result<File> {
        let mut stmts = self.stmt_list(ListEnd::Eof, true)?;
        self.expect_list_end()?;
        self.ensure_no_pending_heredoc()?;
        self.attach_heredocs(&mut stmts);
        Ok(File {
            name: self.name.clone(),
            stmts,
            comments: std::mem::take(&mut self.comments),
        })
    }

    /// Parses statements, delivering each newline-terminated batch to the
    /// callback.
    pub(crate) fn stmt_batches(
        &mut self,
        mut f: impl FnMut(Vec<Stmt>) -> bool,
    ) -> Result<()> {
        let mut batch: Vec<Stmt> = Vec::new();
        loop {
            let (id, kw, pos) = self.peek_info()?;
            match id {
                Tok::Eof => {
                    self.ensure_no_pending_heredoc()?;
                    if !batch.is_empty() {
                        self.attach_heredocs(&mut batch);
                        f(batch);
                    }
                    return Ok(());
                }
                Tok::Newl => {
                    self.take()?;
                    self.read_pending_bodies()?;
                    if !batch.is_empty() {
                        let mut done = std::mem::take(&mut batch);
                        self.attach_heredocs(&mut done);
                        self.incomplete.set(false);
                        if !f(done) {
                            return Ok(());
                        }
                    }
                }
                Tok::Op(Operator::Semicolon) => {
                    self.take()?;
                }
                Tok::Op(Operator::And) => {
                    self.take()?;
                    match batch.last_mut() {
                        Some(last) => last.background = true,
                        None => return self.err(pos, SyntaxError::UnexpectedToken),
                    }
                }
                _ => {
                    let _ = kw;
                    match self.and_or_stmt() {
                        Ok(stmt) => batch.push(stmt),
                        Err(error) => {
                            self.recover(error)?;
                        }
                    }
                }
            }
        }
    }

    /// Parses a stream of words for field-splitting style consumers.
    pub(crate) fn word_sequence(&mut self, mut f: impl FnMut(Word) -> bool) -> Result<()> {
        loop {
            self.skip_blanks()?;
            match self.peek_raw_char()? {
                None => return Ok(()),
                Some('\n') => {
                    self.advance_char();
                }
                Some('\r') if self.byte_at(1)? == Some(b'\n') => {
                    self.advance_bytes(1);
                    self.advance_char();
                }
                Some('#') => {
                    self.lex_comment()?;
                }
                Some(_) => {
                    let pos = self.pos();
                    let word = self.lex_word(WordMode::Normal)?;
                    if word.is_missing() {
                        return self.err(pos, SyntaxError::UnexpectedToken);
                    }
                    let mut word = word;
                    self.attach_heredocs_in_word(&mut word);
                    if !f(word) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Parses exactly one word, requiring the rest of the input to be
    /// whitespace.
    pub(crate) fn single_word(&mut self) -> Result<Word> {
        self.skip_blanks()?;
        let pos = self.pos();
        let mut word = self.lex_word(WordMode::Normal)?;
        if word.is_missing() {
            return self.err(pos, SyntaxError::Expected { what: "a word" });
        }
        self.attach_heredocs_in_word(&mut word);
        self.skip_arithm_space()?;
        if self.peek_raw_char()?.is_some() {
            let pos = self.pos();
            return self.err(pos, SyntaxError::UnexpectedToken);
        }
        Ok(word)
    }

    /// Parses one arithmetic expression spanning the whole input.
    pub(crate) fn single_arithm(&mut self) -> Result<ArithmExpr> {
        let mut x = self.arithm_expr_with(super::arithm::ArithmOpts::default())?;
        self.skip_arithm_space()?;
        if self.peek_raw_char()?.is_some() {
            let pos = self.pos();
            return self.err(pos, SyntaxError::UnexpectedToken);
        }
        super::heredoc::attach_in_arithm(&mut x, &mut self.filled);
        Ok(x)
    }

    /// Parses the whole input as an unquoted here-document body.
    pub(crate) fn whole_document(&mut self) -> Result<Word> {
        let mut word = self.lex_word(WordMode::Heredoc { end: usize::MAX })?;
        self.attach_heredocs_in_word(&mut word);
        Ok(word)
    }

    fn peek_info(&mut self) -> Result<(Tok, Option<Keyword>, Pos)> {
        let token = self.peek()?;
        Ok((token.id, token.kw, token.pos))
    }

    /// After a list delimited by `Eof` ends, anything but the end of input
    /// is a stray token.
    fn expect_list_end(&mut self) -> Result<()> {
        let (id, _, pos) = self.peek_info()?;
        if id == Tok::Eof {
            Ok(())
        } else {
            self.err(pos, SyntaxError::UnexpectedToken)
        }
    }

    pub(crate) fn stmt_list_until(&mut self, end: Tok) -> Result<Vec<Stmt>> {
        self.stmt_list(ListEnd::Token(end), false)
    }

    pub(crate) fn stmt_list_until_kw(&mut self, kw: Keyword) -> Result<Vec<Stmt>> {
        match kw {
            Keyword::CloseBrace => self.stmt_list(ListEnd::Kws(&[Keyword::CloseBrace]), false),
            _ => unreachable!("unsupported list end keyword"),
        }
    }

    /// Parses a statement list until the given end marker.
    fn stmt_list(&mut self, end: ListEnd, recover: bool) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            // Leading newlines and separators between statements.
            loop {
                let (id, _, _) = self.peek_info()?;
                if id == Tok::Newl {
                    self.take()?;
                    self.read_pending_bodies()?;
                } else {
                    break;
                }
            }
            let (id, kw, _) = self.peek_info()?;
            if id == Tok::Eof || end.matches(id, kw) {
                return Ok(stmts);
            }
            match self.and_or_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(error) if recover => {
                    self.recover(error)?;
                    continue;
                }
                Err(error) => return Err(error),
            }
            // Separator after the statement.
            let (id, kw, pos) = self.peek_info()?;
            match id {
                Tok::Op(Operator::Semicolon) => {
                    self.take()?;
                }
                Tok::Op(Operator::And) => {
                    self.take()?;
                    stmts.last_mut().unwrap().background = true;
                }
                Tok::Op(Operator::BarAnd) if self.lang == LangVariant::MirBsdKorn => {
                    self.take()?;
                    stmts.last_mut().unwrap().coprocess = true;
                }
                Tok::Newl | Tok::Eof => {}
                _ if end.matches(id, kw) => {}
                _ => {
                    let error = self.error_at(
                        pos,
                        SyntaxError::Expected {
                            what: "`;`, `&`, or a newline",
                        },
                    );
                    if recover {
                        self.recover(error)?;
                        continue;
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Parses one statement including its `&&`/`||` continuations.
    fn and_or_stmt(&mut self) -> Result<Stmt> {
        let mut x = self.pipeline()?;
        loop {
            let (id, _, _) = self.peek_info()?;
            let op = match id {
                Tok::Op(Operator::AndAnd) => BinCmdOperator::AndStmt,
                Tok::Op(Operator::BarBar) => BinCmdOperator::OrStmt,
                _ => return Ok(x),
            };
            let op_pos = self.take()?.pos;
            self.skip_list_newlines()?;
            let y = self.pipeline()?;
            let position = x.position;
            x = Stmt {
                position,
                cmd: Some(Command::Binary(Box::new(BinaryCmd { op_pos, op, x, y }))),
                ..Stmt::default()
            };
        }
    }

    /// Skips newlines that continue a statement after a binary operator,
    /// reading any pending here-document bodies first.
    fn skip_list_newlines(&mut self) -> Result<()> {
        loop {
            let (id, _, _) = self.peek_info()?;
            if id == Tok::Newl {
                self.take()?;
                self.read_pending_bodies()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Parses one pipeline, possibly negated.
    fn pipeline(&mut self) -> Result<Stmt> {
        let bang = self.take_kw(Keyword::Bang)?;
        let mut x = self.cmd_stmt()?;
        loop {
            let (id, _, _) = self.peek_info()?;
            let op = match id {
                Tok::Op(Operator::Bar) => BinCmdOperator::Pipe,
                Tok::Op(Operator::BarAnd) if self.lang != LangVariant::MirBsdKorn => {
                    BinCmdOperator::PipeAll
                }
                _ => break,
            };
            let op_pos = self.take()?.pos;
            self.skip_list_newlines()?;
            let y = self.cmd_stmt()?;
            let position = x.position;
            x = Stmt {
                position,
                cmd: Some(Command::Binary(Box::new(BinaryCmd { op_pos, op, x, y }))),
                ..Stmt::default()
            };
        }
        if let Some(pos) = bang {
            x.negated = true;
            x.position = pos;
        }
        Ok(x)
    }

    /// Parses one command with its assignment prefix and redirections.
    fn cmd_stmt(&mut self) -> Result<Stmt> {
        let mut stmt = Stmt {
            position: self.peek()?.pos,
            ..Stmt::default()
        };
        // Prefix: assignments and redirections in any order.
        loop {
            if self.peek_redirect()? {
                self.redirect(&mut stmt)?;
                continue;
            }
            let (id, _, _) = self.peek_info()?;
            if id == Tok::Word && stmt.cmd.is_none() {
                if let Some(assign) = self.maybe_assign(false)? {
                    stmt.assigns.push(assign);
                    continue;
                }
            }
            break;
        }
        // The command itself, if any.
        let (id, _, pos) = self.peek_info()?;
        match id {
            Tok::Word => self.cmd_from_word(&mut stmt)?,
            Tok::Op(Operator::OpenParen) => self.paren_cmd(&mut stmt)?,
            _ => {
                if stmt.assigns.is_empty() && stmt.redirs.is_empty() {
                    return self.err(pos, SyntaxError::UnexpectedToken);
                }
            }
        }
        // Suffix redirections after a compound command.
        while self.peek_redirect()? {
            self.redirect(&mut stmt)?;
        }
        Ok(stmt)
    }

    /// Dispatches on the word at command position.
    fn cmd_from_word(&mut self, stmt: &mut Stmt) -> Result<()> {
        // Reserved words are only recognized as the first word of a
        // command; after an assignment or redirection prefix they are
        // ordinary words.
        if !stmt.assigns.is_empty() || !stmt.redirs.is_empty() {
            return self.call_or_func(stmt);
        }
        let (_, kw, pos) = self.peek_info()?;
        let cmd = match kw {
            Some(Keyword::If) => Command::If(self.if_clause()?),
            Some(Keyword::While) => Command::While(self.while_clause(false)?),
            Some(Keyword::Until) => Command::While(self.while_clause(true)?),
            Some(Keyword::For) => Command::For(self.for_clause(false)?),
            Some(Keyword::Select) => Command::For(self.for_clause(true)?),
            Some(Keyword::Case) => Command::Case(self.case_clause()?),
            Some(Keyword::OpenBrace) => Command::Block(self.block()?),
            Some(Keyword::Function) => Command::FuncDecl(self.func_decl_rsrv()?),
            Some(Keyword::DblOpenBracket) => Command::Test(self.test_clause()?),
            Some(Keyword::Time) => Command::Time(self.time_clause()?),
            Some(Keyword::Coproc) => Command::Coproc(self.coproc_clause()?),
            Some(
                Keyword::Then
                | Keyword::Elif
                | Keyword::Else
                | Keyword::Fi
                | Keyword::Do
                | Keyword::Done
                | Keyword::Esac
                | Keyword::In
                | Keyword::CloseBrace
                | Keyword::DblCloseBracket
                | Keyword::Bang,
            ) => return self.err(pos, SyntaxError::UnexpectedToken),
            None => {
                let lit = self.peek()?.word.lit().map(str::to_owned);
                match lit.as_deref() {
                    Some(
                        "declare" | "typeset" | "local" | "export" | "readonly" | "nameref",
                    ) if self.lang.is_extended() => Command::Decl(self.decl_clause()?),
                    Some("let") if self.lang.is_extended() => Command::Let(self.let_clause()?),
                    Some("@test") if self.lang == LangVariant::Bats => {
                        Command::TestDecl(self.test_decl()?)
                    }
                    _ => return self.call_or_func(stmt),
                }
            }
        };
        stmt.cmd = Some(cmd);
        Ok(())
    }

    /// Parses a simple command, or a POSIX-style function declaration when
    /// a lone word is followed by `()`.
    fn call_or_func(&mut self, stmt: &mut Stmt) -> Result<()> {
        let first = self.take()?;
        let (id, _, _) = self.peek_info()?;
        if id == Tok::Op(Operator::OpenParen)
            && stmt.assigns.is_empty()
            && stmt.redirs.is_empty()
        {
            let name = match first.word.lit() {
                Some(lit) if !lit.is_empty() => Lit {
                    value_pos: first.pos,
                    value_end: first.end,
                    value: lit.to_string(),
                },
                _ => return self.err(first.pos, SyntaxError::InvalidFuncName),
            };
            return self.func_decl_parens(stmt, first.pos, name, false);
        }
        let mut call = CallExpr {
            args: vec![first.word],
        };
        loop {
            if self.peek_redirect()? {
                self.redirect(stmt)?;
                continue;
            }
            let (id, _, _) = self.peek_info()?;
            if id == Tok::Word || id == Tok::IoNumber {
                call.args.push(self.take()?.word);
            } else {
                break;
            }
        }
        stmt.cmd = Some(Command::Call(call));
        Ok(())
    }

    /// Parses the `()` and body of a function declaration.
    fn func_decl_parens(
        &mut self,
        stmt: &mut Stmt,
        position: Pos,
        name: Lit,
        rsrv_word: bool,
    ) -> Result<()> {
        self.take()?; // the `(`
        self.expect_op(Operator::CloseParen, SyntaxError::UnclosedSubshell, "`)`")?;
        self.skip_list_newlines()?;
        let body = self.cmd_stmt()?;
        stmt.cmd = Some(Command::FuncDecl(FuncDecl {
            position,
            rsrv_word,
            parens: true,
            name,
            body: Box::new(body),
        }));
        Ok(())
    }

    /// Parses a `function name [()] body` declaration.
    fn func_decl_rsrv(&mut self) -> Result<FuncDecl> {
        let position = self.take()?.pos;
        let (id, _, pos) = self.peek_info()?;
        if id != Tok::Word {
            return self.err(pos, SyntaxError::InvalidFuncName);
        }
        let token = self.take()?;
        let name = match token.word.lit() {
            Some(lit) if !lit.is_empty() => Lit {
                value_pos: token.pos,
                value_end: token.end,
                value: lit.to_string(),
            },
            _ => return self.err(token.pos, SyntaxError::InvalidFuncName),
        };
        let parens = if self.peek_info()?.0 == Tok::Op(Operator::OpenParen) {
            self.take()?;
            self.expect_op(Operator::CloseParen, SyntaxError::UnclosedSubshell, "`)`")?;
            true
        } else {
            false
        };
        self.skip_list_newlines()?;
        let body = self.cmd_stmt()?;
        Ok(FuncDecl {
            position,
            rsrv_word: true,
            parens,
            name,
            body: Box::new(body),
        })
    }

    /// Parses a `( ... )` subshell or a `(( ... ))` arithmetic command.
    fn paren_cmd(&mut self, stmt: &mut Stmt) -> Result<()> {
        // The second parenthesis has not been lexed; the arithmetic form
        // wins when it is present, as in Bash.
        if self.lang.is_extended() && self.peek_raw_second_paren()? {
            let left = self.take()?.pos;
            self.advance_bytes(1);
            self.construct_depth += 1;
            let x = self.arithm_expr_with(super::arithm::ArithmOpts::default())?;
            let right = self.expect_arithm_end(left)?;
            self.construct_depth -= 1;
            stmt.cmd = Some(Command::ArithmCmd(crate::syntax::ArithmCmd { left, right, x }));
            return Ok(());
        }
        let lparen = self.take()?.pos;
        self.construct_depth += 1;
        let stmts = self.stmt_list(ListEnd::Token(Tok::Op(Operator::CloseParen)), false)?;
        let rparen =
            self.expect_op(Operator::CloseParen, SyntaxError::UnclosedSubshell, "`)`")?;
        self.construct_depth -= 1;
        stmt.cmd = Some(Command::Subshell(Subshell {
            lparen,
            rparen,
            stmts,
        }));
        Ok(())
    }

    /// Tests whether the character right after the current `(` token is
    /// another `(`.
    fn peek_raw_second_paren(&mut self) -> Result<bool> {
        debug_assert!(matches!(self.peek()?.id, Tok::Op(Operator::OpenParen)));
        Ok(self.peek_raw_char()? == Some('('))
    }

    fn block(&mut self) -> Result<Block> {
        let lbrace = self.take()?.pos;
        self.construct_depth += 1;
        let stmts = self.stmt_list(ListEnd::Kws(&[Keyword::CloseBrace]), false)?;
        let rbrace = self.expect_kw(Keyword::CloseBrace, SyntaxError::UnclosedBlock, "`}`")?;
        self.construct_depth -= 1;
        Ok(Block {
            lbrace,
            rbrace,
            stmts,
        })
    }

    fn if_clause(&mut self) -> Result<IfClause> {
        let if_pos = self.take()?.pos;
        self.construct_depth += 1;
        let cond = self.stmt_list(ListEnd::Kws(&[Keyword::Then]), false)?;
        let then_pos = self.expect_kw(Keyword::Then, SyntaxError::UnclosedIf, "`then`")?;
        let then_stmts =
            self.stmt_list(ListEnd::Kws(&[Keyword::Elif, Keyword::Else, Keyword::Fi]), false)?;
        let mut elifs = Vec::new();
        while let Some(elif_pos) = self.take_kw(Keyword::Elif)? {
            let cond = self.stmt_list(ListEnd::Kws(&[Keyword::Then]), false)?;
            let then_pos = self.expect_kw(Keyword::Then, SyntaxError::UnclosedIf, "`then`")?;
            let then_stmts = self.stmt_list(
                ListEnd::Kws(&[Keyword::Elif, Keyword::Else, Keyword::Fi]),
                false,
            )?;
            elifs.push(Elif {
                elif_pos,
                then_pos,
                cond,
                then_stmts,
            });
        }
        let else_branch = match self.take_kw(Keyword::Else)? {
            Some(else_pos) => {
                let stmts = self.stmt_list(ListEnd::Kws(&[Keyword::Fi]), false)?;
                Some(Else { else_pos, stmts })
            }
            None => None,
        };
        let fi_pos = self.expect_kw(Keyword::Fi, SyntaxError::UnclosedIf, "`fi`")?;
        self.construct_depth -= 1;
        Ok(IfClause {
            if_pos,
            then_pos,
            fi_pos,
            cond,
            then_stmts,
            elifs,
            else_branch,
        })
    }

    fn while_clause(&mut self, until: bool) -> Result<WhileClause> {
        let while_pos = self.take()?.pos;
        self.construct_depth += 1;
        let cond = self.stmt_list(ListEnd::Kws(&[Keyword::Do]), false)?;
        let do_pos = self.expect_kw(Keyword::Do, SyntaxError::UnclosedDoClause, "`do`")?;
        let do_stmts = self.stmt_list(ListEnd::Kws(&[Keyword::Done]), false)?;
        let done_pos = self.expect_kw(Keyword::Done, SyntaxError::UnclosedDoClause, "`done`")?;
        self.construct_depth -= 1;
        Ok(WhileClause {
            while_pos,
            do_pos,
            done_pos,
            until,
            cond,
            do_stmts,
        })
    }

    fn for_clause(&mut self, select: bool) -> Result<ForClause> {
        let for_pos = self.take()?.pos;
        self.construct_depth += 1;
        let iter = if !select
            && self.peek_info()?.0 == Tok::Op(Operator::OpenParen)
            && self.lang.is_extended()
            && self.peek_raw_second_paren()?
        {
            Loop::CStyle(self.c_style_loop()?)
        } else {
            Loop::WordIter(self.word_iter()?)
        };
        // An optional `;` and newlines before `do`.
        if self.peek_info()?.0 == Tok::Op(Operator::Semicolon) {
            self.take()?;
        }
        self.skip_list_newlines()?;
        let do_pos = self.expect_kw(Keyword::Do, SyntaxError::UnclosedDoClause, "`do`")?;
        let do_stmts = self.stmt_list(ListEnd::Kws(&[Keyword::Done]), false)?;
        let done_pos = self.expect_kw(Keyword::Done, SyntaxError::UnclosedDoClause, "`done`")?;
        self.construct_depth -= 1;
        Ok(ForClause {
            for_pos,
            do_pos,
            done_pos,
            select,
            iter,
            do_stmts,
        })
    }

    fn c_style_loop(&mut self) -> Result<CStyleLoop> {
        let lparen = self.take()?.pos;
        self.advance_bytes(1);
        let init = self.c_style_expr(b';')?;
        self.c_style_sep(b';')?;
        let cond = self.c_style_expr(b';')?;
        self.c_style_sep(b';')?;
        let post = self.c_style_expr(b')')?;
        let rparen = self.expect_arithm_end(lparen)?;
        Ok(CStyleLoop {
            lparen,
            rparen,
            init,
            cond,
            post,
        })
    }

    fn c_style_expr(&mut self, stop: u8) -> Result<Option<ArithmExpr>> {
        self.skip_arithm_space()?;
        if self.byte_at(0)? == Some(stop) {
            return Ok(None);
        }
        Ok(Some(self.arithm_expr_with(super::arithm::ArithmOpts::default())?))
    }

    fn c_style_sep(&mut self, sep: u8) -> Result<()> {
        self.skip_arithm_space()?;
        if self.byte_at(0)? == Some(sep) {
            self.advance_bytes(1);
            Ok(())
        } else {
            let pos = self.pos();
            self.err(pos, SyntaxError::Expected { what: "`;`" })
        }
    }

    fn word_iter(&mut self) -> Result<WordIter> {
        let (id, _, pos) = self.peek_info()?;
        if id != Tok::Word {
            return self.err(pos, SyntaxError::Expected { what: "a variable name" });
        }
        let token = self.take()?;
        let name = match token.word.lit() {
            Some(lit) if valid_name(lit) => Lit {
                value_pos: token.pos,
                value_end: token.end,
                value: lit.to_string(),
            },
            _ => return self.err(token.pos, SyntaxError::Expected { what: "a variable name" }),
        };
        let mut iter = WordIter {
            name,
            in_pos: Pos::default(),
            items: Vec::new(),
        };
        self.skip_list_newlines()?;
        if let Some(in_pos) = self.take_kw(Keyword::In)? {
            iter.in_pos = in_pos;
            loop {
                let (id, _, _) = self.peek_info()?;
                if id == Tok::Word || id == Tok::IoNumber {
                    iter.items.push(self.take()?.word);
                } else {
                    break;
                }
            }
        }
        Ok(iter)
    }

    fn case_clause(&mut self) -> Result<CaseClause> {
        let case_pos = self.take()?.pos;
        self.construct_depth += 1;
        let (id, _, pos) = self.peek_info()?;
        if id != Tok::Word {
            return self.err(pos, SyntaxError::Expected { what: "a word" });
        }
        let word = self.take()?.word;
        self.skip_list_newlines()?;
        let in_pos = self.expect_kw(Keyword::In, SyntaxError::UnclosedCase, "`in`")?;
        let mut items = Vec::new();
        loop {
            self.skip_list_newlines()?;
            let (id, kw, _) = self.peek_info()?;
            if kw == Some(Keyword::Esac) || id == Tok::Eof {
                break;
            }
            items.push(self.case_item()?);
        }
        let esac_pos = self.expect_kw(Keyword::Esac, SyntaxError::UnclosedCase, "`esac`")?;
        self.construct_depth -= 1;
        Ok(CaseClause {
            case_pos,
            in_pos,
            esac_pos,
            word,
            items,
        })
    }

    fn case_item(&mut self) -> Result<CaseItem> {
        self.take_op(Operator::OpenParen)?;
        let mut patterns = Vec::new();
        loop {
            let (id, _, pos) = self.peek_info()?;
            if id != Tok::Word && id != Tok::IoNumber {
                return self.err(pos, SyntaxError::Expected { what: "a pattern" });
            }
            patterns.push(self.take()?.word);
            if self.take_op(Operator::Bar)?.is_none() {
                break;
            }
        }
        self.expect_op(Operator::CloseParen, SyntaxError::UnclosedCase, "`)`")?;
        let stmts = self.stmt_list(ListEnd::CaseItem, false)?;
        let (id, _, _) = self.peek_info()?;
        let (op, op_pos) = match id {
            Tok::Op(Operator::DblSemicolon) => (CaseOperator::Break, self.take()?.pos),
            Tok::Op(Operator::SemicolonAnd) => (CaseOperator::Fallthrough, self.take()?.pos),
            Tok::Op(Operator::DblSemicolonAnd) => (CaseOperator::Resume, self.take()?.pos),
            _ => (CaseOperator::Break, Pos::default()),
        };
        Ok(CaseItem {
            op,
            op_pos,
            patterns,
            stmts,
        })
    }

    fn time_clause(&mut self) -> Result<TimeClause> {
        let time_pos = self.take()?.pos;
        let mut posix_format = false;
        if self.peek_info()?.0 == Tok::Word && self.peek()?.word.lit() == Some("-p") {
            self.take()?;
            posix_format = true;
        }
        let stmt = if self.starts_command()? {
            Some(Box::new(self.pipeline()?))
        } else {
            None
        };
        Ok(TimeClause {
            time_pos,
            posix_format,
            stmt,
        })
    }

    fn coproc_clause(&mut self) -> Result<CoprocClause> {
        let coproc_pos = self.take()?.pos;
        let (id, kw, pos) = self.peek_info()?;
        match id {
            Tok::Word if kw.is_none() => {
                let token = self.take()?;
                if self.starts_compound()? {
                    // `coproc NAME compound-command`
                    let stmt = self.cmd_stmt()?;
                    Ok(CoprocClause {
                        coproc_pos,
                        name: Some(token.word),
                        stmt: Box::new(stmt),
                    })
                } else {
                    // `coproc simple-command ...`: the word was the command
                    // name.
                    let mut stmt = Stmt {
                        position: token.pos,
                        ..Stmt::default()
                    };
                    let mut call = CallExpr {
                        args: vec![token.word],
                    };
                    loop {
                        if self.peek_redirect()? {
                            self.redirect(&mut stmt)?;
                            continue;
                        }
                        let (id, _, _) = self.peek_info()?;
                        if id == Tok::Word || id == Tok::IoNumber {
                            call.args.push(self.take()?.word);
                        } else {
                            break;
                        }
                    }
                    stmt.cmd = Some(Command::Call(call));
                    Ok(CoprocClause {
                        coproc_pos,
                        name: None,
                        stmt: Box::new(stmt),
                    })
                }
            }
            Tok::Word | Tok::Op(Operator::OpenParen) => {
                let stmt = self.cmd_stmt()?;
                Ok(CoprocClause {
                    coproc_pos,
                    name: None,
                    stmt: Box::new(stmt),
                })
            }
            _ => self.err(pos, SyntaxError::Expected { what: "a command" }),
        }
    }

    /// Tests whether the current token can begin a command.
    fn starts_command(&mut self) -> Result<bool> {
        if self.peek_redirect()? {
            return Ok(true);
        }
        let (id, kw, _) = self.peek_info()?;
        Ok(match id {
            Tok::Word => !matches!(
                kw,
                Some(
                    Keyword::Then
                        | Keyword::Elif
                        | Keyword::Else
                        | Keyword::Fi
                        | Keyword::Do
                        | Keyword::Done
                        | Keyword::Esac
                        | Keyword::In
                        | Keyword::CloseBrace
                        | Keyword::DblCloseBracket
                )
            ),
            Tok::Op(Operator::OpenParen) => true,
            _ => false,
        })
    }

    /// Tests whether the current token begins a compound command.
    fn starts_compound(&mut self) -> Result<bool> {
        let (id, kw, _) = self.peek_info()?;
        Ok(match id {
            Tok::Op(Operator::OpenParen) => true,
            Tok::Word => matches!(
                kw,
                Some(
                    Keyword::OpenBrace
                        | Keyword::If
                        | Keyword::While
                        | Keyword::Until
                        | Keyword::For
                        | Keyword::Select
                        | Keyword::Case
                        | Keyword::DblOpenBracket
                )
            ),
            _ => false,
        })
    }

    fn decl_clause(&mut self) -> Result<DeclClause> {
        let token = self.take()?;
        let variant = Lit {
            value_pos: token.pos,
            value_end: token.end,
            value: token.word.lit().unwrap().to_string(),
        };
        let mut args = Vec::new();
        loop {
            if self.peek_redirect()? {
                break;
            }
            let (id, _, _) = self.peek_info()?;
            if id != Tok::Word && id != Tok::IoNumber {
                break;
            }
            if let Some(assign) = self.maybe_assign(true)? {
                args.push(assign);
                continue;
            }
            let token = self.take()?;
            args.push(Assign {
                naked: true,
                value: Some(token.word),
                ..Assign::default()
            });
        }
        Ok(DeclClause { variant, args })
    }

    fn let_clause(&mut self) -> Result<LetClause> {
        let let_pos = self.take()?.pos;
        let mut exprs = Vec::new();
        loop {
            self.skip_blanks()?;
            match self.peek_raw_char()? {
                None | Some('\n') | Some(';') | Some('&') | Some('|') | Some('<') | Some('>')
                | Some(')') | Some('#') => break,
                Some('\r') if self.byte_at(1)? == Some(b'\n') => break,
                Some('`') if self.bq => break,
                Some(_) => {
                    let opts = super::arithm::ArithmOpts {
                        let_mode: true,
                        ..super::arithm::ArithmOpts::default()
                    };
                    exprs.push(self.arithm_expr_with(opts)?);
                }
            }
        }
        if exprs.is_empty() {
            let pos = let_pos;
            return self.err(pos, SyntaxError::MissingLetExpr);
        }
        Ok(LetClause { let_pos, exprs })
    }

    fn test_decl(&mut self) -> Result<TestDecl> {
        let position = self.take()?.pos;
        let (id, _, pos) = self.peek_info()?;
        if id != Tok::Word {
            return self.err(pos, SyntaxError::Expected { what: "a description" });
        }
        let description = self.take()?.word;
        let body = self.cmd_stmt()?;
        Ok(TestDecl {
            position,
            description,
            body: Box::new(body),
        })
    }

    /// Tests whether the current token begins a redirection.
    fn peek_redirect(&mut self) -> Result<bool> {
        let (id, _, _) = self.peek_info()?;
        Ok(match id {
            Tok::IoNumber => true,
            Tok::Op(op) => RedirOperator::try_from(op).is_ok(),
            _ => false,
        })
    }

    /// Parses one redirection onto the statement.
    fn redirect(&mut self, stmt: &mut Stmt) -> Result<()> {
        let n = if self.peek_info()?.0 == Tok::IoNumber {
            let token = self.take()?;
            Some(Lit {
                value_pos: token.pos,
                value_end: token.end,
                value: token.word.lit().unwrap().to_string(),
            })
        } else {
            None
        };
        let token = self.take()?;
        let op = match token.id {
            Tok::Op(op) => RedirOperator::try_from(op)
                .expect("redirect called on a non-redirection operator"),
            _ => unreachable!("redirect called on a non-operator token"),
        };
        let (id, _, pos) = self.peek_info()?;
        if id != Tok::Word && id != Tok::IoNumber {
            let cause = if op.is_heredoc() {
                SyntaxError::MissingHereDocDelimiter
            } else {
                SyntaxError::MissingRedirOperand
            };
            return self.err(pos, cause);
        }
        let word = self.take()?.word;
        let redir = Redirect {
            op_pos: token.pos,
            op,
            n,
            word,
            hdoc: None,
        };
        if op.is_heredoc() {
            self.queue_heredoc(&redir);
        }
        stmt.redirs.push(redir);
        Ok(())
    }

    /// Recognizes an assignment at the cursor, re-lexing in place.
    ///
    /// The current token has already been lexed as a word; if its shape
    /// looks like `name=`, `name+=`, or `name[`, the cursor is rewound to
    /// the word start and the assignment is parsed raw, so that array
    /// indices and values get exact positions. When the shape does not pan
    /// out, the cursor is restored and `None` is returned.
    fn maybe_assign(&mut self, naked_ok: bool) -> Result<Option<Assign>> {
        let (shape, start) = {
            let token = self.peek()?;
            let shape = assign_shape(&token.word);
            (shape, token.pos)
        };
        match shape {
            AssignShape::No => Ok(None),
            AssignShape::NakedName if naked_ok => {
                let token = self.take()?;
                let name = Lit {
                    value_pos: token.pos,
                    value_end: token.end,
                    value: token.word.lit().unwrap().to_string(),
                };
                Ok(Some(Assign {
                    naked: true,
                    name: Some(name),
                    ..Assign::default()
                }))
            }
            AssignShape::NakedName => Ok(None),
            AssignShape::Assign => {
                self.cur = None;
                self.seek(start);
                self.parse_assign(start)
            }
        }
    }

    /// Parses `name[index]?(=|+=)value` raw at the cursor.
    fn parse_assign(&mut self, start: Pos) -> Result<Option<Assign>> {
        let value_pos = self.pos();
        let mut name = String::new();
        while let Some(c) = self.peek_raw_char()? {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance_char();
                name.push(c);
            } else {
                break;
            }
        }
        let name = Lit {
            value_pos,
            value_end: self.pos(),
            value: name,
        };
        let mut assign = Assign {
            name: Some(name),
            ..Assign::default()
        };
        if self.peek_raw_char()? == Some('[') {
            if !self.lang.is_extended() {
                // In POSIX mode `a[0]=x` is an ordinary word.
                self.cur = None;
                self.seek(start);
                return Ok(None);
            }
            self.advance_bytes(1);
            let index = self.arithm_expr_with(super::arithm::ArithmOpts::default())?;
            self.skip_arithm_space()?;
            if self.peek_raw_char()? != Some(']') {
                self.cur = None;
                self.seek(start);
                return Ok(None);
            }
            self.advance_bytes(1);
            assign.index = Some(index);
        }
        match (self.byte_at(0)?, self.byte_at(1)?) {
            (Some(b'+'), Some(b'=')) => {
                assign.append = true;
                self.advance_bytes(2);
            }
            (Some(b'='), _) => {
                self.advance_bytes(1);
            }
            _ => {
                self.cur = None;
                self.seek(start);
                return Ok(None);
            }
        }
        if self.peek_raw_char()? == Some('(') {
            if !self.lang.is_extended() {
                let pos = self.pos();
                return self.err(
                    pos,
                    super::error::LexError::Forbidden {
                        feature: "arrays",
                        lang: self.lang,
                    },
                );
            }
            assign.array = Some(self.array_expr()?);
        } else {
            let value = self.lex_word(WordMode::Normal)?;
            if !value.is_missing() {
                assign.value = Some(value);
            }
        }
        Ok(Some(assign))
    }

    /// Parses a parenthesized array value.
    fn array_expr(&mut self) -> Result<ArrayExpr> {
        let lparen = self.pos();
        self.advance_bytes(1);
        self.construct_depth += 1;
        let mut elems = Vec::new();
        let rparen = loop {
            let (id, _, pos) = self.peek_info()?;
            match id {
                Tok::Newl => {
                    self.take()?;
                    self.read_pending_bodies()?;
                }
                Tok::Op(Operator::CloseParen) => break self.take()?.pos,
                Tok::Word | Tok::IoNumber => elems.push(self.array_elem()?),
                Tok::Eof => return self.err(lparen, SyntaxError::UnclosedArrayValue),
                _ => return self.err(pos, SyntaxError::Expected { what: "a word or `)`" }),
            }
        };
        self.construct_depth -= 1;
        Ok(ArrayExpr {
            lparen,
            rparen,
            elems,
        })
    }

    /// Parses one array element, optionally keyed as `[index]=value`.
    fn array_elem(&mut self) -> Result<ArrayElem> {
        let (starts_index, start) = {
            let token = self.peek()?;
            let starts = matches!(
                token.word.parts.first(),
                Some(crate::syntax::WordPart::Lit(lit)) if lit.value.starts_with('[')
            );
            (starts, token.pos)
        };
        if starts_index {
            self.cur = None;
            self.seek(start);
            self.advance_bytes(1);
            let index = self.arithm_expr_with(super::arithm::ArithmOpts::default())?;
            self.skip_arithm_space()?;
            if self.peek_raw_char()? == Some(']') && self.byte_at(1)? == Some(b'=') {
                self.advance_bytes(2);
                let value = self.lex_word(WordMode::Normal)?;
                return Ok(ArrayElem {
                    index: Some(index),
                    value,
                });
            }
            // Not a keyed element after all; re-lex as a plain word.
            self.cur = None;
            self.seek(start);
        }
        let value = self.take()?.word;
        Ok(ArrayElem { index: None, value })
    }
}

/// Shape of a word at an assignment-capable position
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AssignShape {
    /// Not an assignment
    No,
    /// A bare valid name, an assignment only after declaration utilities
    NakedName,
    /// `name=`, `name+=`, or `name[`, worth re-lexing as an assignment
    Assign,
}

/// Classifies the shape of an already-lexed word.
fn assign_shape(word: &Word) -> AssignShape {
    let Some(crate::syntax::WordPart::Lit(lit)) = word.parts.first() else {
        return AssignShape::No;
    };
    let value = &lit.value;
    let name_len = value
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if name_len == 0 || value.as_bytes()[0].is_ascii_digit() {
        return AssignShape::No;
    }
    match value.as_bytes().get(name_len) {
        Some(b'=') => AssignShape::Assign,
        Some(b'+') if value.as_bytes().get(name_len + 1) == Some(&b'=') => AssignShape::Assign,
        Some(b'[') => AssignShape::Assign,
        None if word.parts.len() == 1 && valid_name(value) => AssignShape::NakedName,
        _ => AssignShape::No,
    }
}
