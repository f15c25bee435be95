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

//! Here-document handling
//!
//! When a `<<` or `<<-` redirection is parsed, its delimiter is recorded in
//! a FIFO queue; the body is not where the operator is. Once the parser
//! consumes the newline that ends the line the operator appeared on, the
//! queued bodies are read back to back, in declaration order.
//!
//! Bodies read this way are kept aside keyed by the redirection operator's
//! position (which is unique), and attached to their `Redirect` nodes by a
//! mutable walk once the surrounding tree has been built. A here-document
//! declared inside a command substitution is not filled by newlines inside
//! deeper substitutions; the queue records the nesting depth at declaration
//! to decide.

use super::error::{Result, SyntaxError};
use super::P;
use super::word::WordMode;
use crate::source::Pos;
use crate::syntax::{
    ArithmExpr, Command, Lit, Loop, Redirect, Stmt, TestExpr, Word, WordPart,
};
use crate::token::RedirOperator;
use std::collections::VecDeque;

/// A here-document whose body has not been read yet
#[derive(Clone, Debug)]
pub(crate) struct PendingHeredoc {
    /// Position of the `<<` or `<<-` operator, used as the attachment key
    pub op_pos: Pos,
    /// The delimiter, after quote removal
    pub delim: String,
    /// Whether any part of the delimiter was quoted, which suppresses
    /// expansions in the body
    pub quoted: bool,
    /// Whether leading tabs are stripped when matching the delimiter
    /// (`<<-`)
    pub strip_tabs: bool,
    /// Substitution nesting depth at the operator
    pub depth: usize,
}

impl P<'_> {
    /// Records a here-document redirection for later body reading.
    pub(crate) fn queue_heredoc(&mut self, redir: &Redirect) {
        let (delim, quoted) = unquote_delim(&redir.word);
        self.heredocs.push_back(PendingHeredoc {
            op_pos: redir.op_pos,
            delim,
            quoted,
            strip_tabs: redir.op == RedirOperator::HereDocDash,
            depth: self.sub_depth,
        });
    }

    /// Reads the bodies of the queued here-documents that belong to the
    /// newline just consumed.
    ///
    /// Entries declared in an outer substitution stay queued; their bodies
    /// begin after a newline at their own depth.
    pub(crate) fn read_pending_bodies(&mut self) -> Result<()> {
        if self.heredocs.is_empty() {
            return Ok(());
        }
        let mut kept = VecDeque::new();
        while let Some(entry) = self.heredocs.pop_front() {
            if entry.depth < self.sub_depth {
                kept.push_back(entry);
                continue;
            }
            let body = self.read_body(&entry)?;
            self.filled.push((entry.op_pos, body));
        }
        self.heredocs = kept;
        Ok(())
    }

    /// Requires the here-document queue to be empty, as it must be when
    /// the input ends.
    pub(crate) fn ensure_no_pending_heredoc(&mut self) -> Result<()> {
        match self.heredocs.front() {
            None => Ok(()),
            Some(entry) => {
                let pos = entry.op_pos;
                self.err(pos, SyntaxError::MissingHereDocContent)
            }
        }
    }

    /// Reads one here-document body starting at the cursor.
    fn read_body(&mut self, entry: &PendingHeredoc) -> Result<Word> {
        let body_start = self.pos();
        let body_end = loop {
            let line_start = self.pos();
            let mut at_eof = false;
            loop {
                match self.peek_raw_char()? {
                    Some('\n') => {
                        self.advance_char();
                        break;
                    }
                    Some(_) => {
                        self.advance_char();
                    }
                    None => {
                        at_eof = true;
                        break;
                    }
                }
            }
            let mut content = &self.src[line_start.offset()..self.offset];
            content = content.strip_suffix('\n').unwrap_or(content);
            content = content.strip_suffix('\r').unwrap_or(content);
            if entry.strip_tabs {
                content = content.trim_start_matches('\t');
            }
            if content == entry.delim {
                break line_start;
            }
            if at_eof {
                return self.err(
                    entry.op_pos,
                    SyntaxError::UnclosedHereDoc {
                        delim: entry.delim.clone(),
                    },
                );
            }
        };
        let after_delim = self.pos();
        let word = if body_start.offset() == body_end.offset() {
            Word::default()
        } else if entry.quoted {
            let value = self.src[body_start.offset()..body_end.offset()].to_string();
            Word {
                parts: vec![WordPart::Lit(Lit {
                    value_pos: body_start,
                    value_end: body_end,
                    value,
                })],
            }
        } else {
            self.seek(body_start);
            let word = self.lex_word(WordMode::Heredoc {
                end: body_end.offset(),
            })?;
            self.seek(after_delim);
            word
        };
        Ok(word)
    }

    /// Attaches the bodies read so far to their redirections within the
    /// given statements.
    pub(crate) fn attach_heredocs(&mut self, stmts: &mut [Stmt]) {
        if self.filled.is_empty() {
            return;
        }
        let filled = &mut self.filled;
        for stmt in stmts {
            attach_in_stmt(stmt, filled);
        }
    }

    /// Attaches bodies to redirections within one word, for the
    /// word-oriented entry points.
    pub(crate) fn attach_heredocs_in_word(&mut self, word: &mut Word) {
        if self.filled.is_empty() {
            return;
        }
        let filled = &mut self.filled;
        attach_in_word(word, filled);
    }
}

/// Computes the delimiter string of a here-document, removing quotes, and
/// reports whether any quoting was present.
fn unquote_delim(word: &Word) -> (String, bool) {
    let mut delim = String::new();
    let mut quoted = false;
    for part in &word.parts {
        match part {
            WordPart::Lit(lit) => {
                let mut chars = lit.value.chars();
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        quoted = true;
                        if let Some(next) = chars.next() {
                            delim.push(next);
                        }
                    } else {
                        delim.push(c);
                    }
                }
            }
            WordPart::SglQuoted(sgl) => {
                quoted = true;
                delim.push_str(&sgl.value);
            }
            WordPart::DblQuoted(dbl) => {
                quoted = true;
                for part in &dbl.parts {
                    if let WordPart::Lit(lit) = part {
                        let mut chars = lit.value.chars();
                        while let Some(c) = chars.next() {
                            if c == '\\' {
                                if let Some(next) = chars.next() {
                                    delim.push(next);
                                }
                            } else {
                                delim.push(c);
                            }
                        }
                    }
                }
            }
            // Expansions in a delimiter are not expanded by the shell
            // either; their source text would be matched literally. They
            // are rare enough that the delimiter simply ends here.
            _ => break,
        }
    }
    (delim, quoted)
}

fn take_filled(filled: &mut Vec<(Pos, Word)>, op_pos: Pos) -> Option<Word> {
    let i = filled.iter().position(|(pos, _)| *pos == op_pos)?;
    Some(filled.remove(i).1)
}

fn attach_in_stmt(stmt: &mut Stmt, filled: &mut Vec<(Pos, Word)>) {
    for assign in &mut stmt.assigns {
        if let Some(value) = &mut assign.value {
            attach_in_word(value, filled);
        }
        if let Some(array) = &mut assign.array {
            for elem in &mut array.elems {
                attach_in_word(&mut elem.value, filled);
            }
        }
    }
    for redir in &mut stmt.redirs {
        attach_in_word(&mut redir.word, filled);
        if redir.op.is_heredoc() && redir.hdoc.is_none() {
            redir.hdoc = take_filled(filled, redir.op_pos);
        }
        if let Some(hdoc) = &mut redir.hdoc {
            attach_in_word(hdoc, filled);
        }
    }
    if let Some(cmd) = &mut stmt.cmd {
        attach_in_cmd(cmd, filled);
    }
}

fn attach_in_cmd(cmd: &mut Command, filled: &mut Vec<(Pos, Word)>) {
    match cmd {
        Command::Call(call) => {
            for word in &mut call.args {
                attach_in_word(word, filled);
            }
        }
        Command::Block(block) => {
            for stmt in &mut block.stmts {
                attach_in_stmt(stmt, filled);
            }
        }
        Command::Subshell(subshell) => {
            for stmt in &mut subshell.stmts {
                attach_in_stmt(stmt, filled);
            }
        }
        Command::If(clause) => {
            for stmt in clause.cond.iter_mut().chain(&mut clause.then_stmts) {
                attach_in_stmt(stmt, filled);
            }
            for elif in &mut clause.elifs {
                for stmt in elif.cond.iter_mut().chain(&mut elif.then_stmts) {
                    attach_in_stmt(stmt, filled);
                }
            }
            if let Some(else_branch) = &mut clause.else_branch {
                for stmt in &mut else_branch.stmts {
                    attach_in_stmt(stmt, filled);
                }
            }
        }
        Command::While(clause) => {
            for stmt in clause.cond.iter_mut().chain(&mut clause.do_stmts) {
                attach_in_stmt(stmt, filled);
            }
        }
        Command::For(clause) => {
            match &mut clause.iter {
                Loop::WordIter(iter) => {
                    for word in &mut iter.items {
                        attach_in_word(word, filled);
                    }
                }
                Loop::CStyle(cstyle) => {
                    for expr in [&mut cstyle.init, &mut cstyle.cond, &mut cstyle.post]
                        .into_iter()
                        .flatten()
                    {
                        attach_in_arithm(expr, filled);
                    }
                }
            }
            for stmt in &mut clause.do_stmts {
                attach_in_stmt(stmt, filled);
            }
        }
        Command::Case(clause) => {
            attach_in_word(&mut clause.word, filled);
            for item in &mut clause.items {
                for pattern in &mut item.patterns {
                    attach_in_word(pattern, filled);
                }
                for stmt in &mut item.stmts {
                    attach_in_stmt(stmt, filled);
                }
            }
        }
        Command::FuncDecl(decl) => attach_in_stmt(&mut decl.body, filled),
        Command::ArithmCmd(cmd) => attach_in_arithm(&mut cmd.x, filled),
        Command::Test(clause) => attach_in_test(&mut clause.x, filled),
        Command::Decl(decl) => {
            for assign in &mut decl.args {
                if let Some(value) = &mut assign.value {
                    attach_in_word(value, filled);
                }
                if let Some(array) = &mut assign.array {
                    for elem in &mut array.elems {
                        attach_in_word(&mut elem.value, filled);
                    }
                }
            }
        }
        Command::Let(clause) => {
            for expr in &mut clause.exprs {
                attach_in_arithm(expr, filled);
            }
        }
        Command::Time(clause) => {
            if let Some(stmt) = &mut clause.stmt {
                attach_in_stmt(stmt, filled);
            }
        }
        Command::Coproc(clause) => {
            if let Some(name) = &mut clause.name {
                attach_in_word(name, filled);
            }
            attach_in_stmt(&mut clause.stmt, filled);
        }
        Command::Binary(binary) => {
            attach_in_stmt(&mut binary.x, filled);
            attach_in_stmt(&mut binary.y, filled);
        }
        Command::TestDecl(decl) => {
            attach_in_word(&mut decl.description, filled);
            attach_in_stmt(&mut decl.body, filled);
        }
    }
}

fn attach_in_word(word: &mut Word, filled: &mut Vec<(Pos, Word)>) {
    for part in &mut word.parts {
        attach_in_part(part, filled);
    }
}

fn attach_in_part(part: &mut WordPart, filled: &mut Vec<(Pos, Word)>) {
    match part {
        WordPart::Lit(_) | WordPart::SglQuoted(_) => {}
        WordPart::DblQuoted(dbl) => {
            for part in &mut dbl.parts {
                attach_in_part(part, filled);
            }
        }
        WordPart::ParamExp(exp) => {
            if let Some(index) = &mut exp.index {
                attach_in_arithm(index, filled);
            }
            if let Some(slice) = &mut exp.slice {
                for bound in [&mut slice.offset, &mut slice.length].into_iter().flatten() {
                    attach_in_arithm(bound, filled);
                }
            }
            if let Some(repl) = &mut exp.repl {
                attach_in_word(&mut repl.orig, filled);
                attach_in_word(&mut repl.with, filled);
            }
            if let Some(exp) = &mut exp.exp {
                attach_in_word(&mut exp.word, filled);
            }
        }
        WordPart::CmdSubst(subst) => {
            for stmt in &mut subst.stmts {
                attach_in_stmt(stmt, filled);
            }
        }
        WordPart::ArithmExp(exp) => attach_in_arithm(&mut exp.x, filled),
        WordPart::ProcSubst(subst) => {
            for stmt in &mut subst.stmts {
                attach_in_stmt(stmt, filled);
            }
        }
        WordPart::ExtGlob(_) => {}
        WordPart::BraceExp(brace) => {
            for word in &mut brace.elems {
                attach_in_word(word, filled);
            }
        }
    }
}

pub(crate) fn attach_in_arithm(expr: &mut ArithmExpr, filled: &mut Vec<(Pos, Word)>) {
    match expr {
        ArithmExpr::Binary(binary) => {
            attach_in_arithm(&mut binary.x, filled);
            attach_in_arithm(&mut binary.y, filled);
        }
        ArithmExpr::Unary(unary) => attach_in_arithm(&mut unary.x, filled),
        ArithmExpr::Paren(paren) => attach_in_arithm(&mut paren.x, filled),
        ArithmExpr::Word(word) => attach_in_word(word, filled),
    }
}

fn attach_in_test(expr: &mut TestExpr, filled: &mut Vec<(Pos, Word)>) {
    match expr {
        TestExpr::Binary(binary) => {
            attach_in_test(&mut binary.x, filled);
            attach_in_test(&mut binary.y, filled);
        }
        TestExpr::Unary(unary) => attach_in_test(&mut unary.x, filled),
        TestExpr::Paren(paren) => attach_in_test(&mut paren.x, filled),
        TestExpr::Word(word) => attach_in_word(word, filled),
    }
}
