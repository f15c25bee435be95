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

//! Printing of syntax trees as canonical shell source
//!
//! The printer walks the tree in source order and emits formatted shell
//! code. Its one binding contract is that parsing the output yields a tree
//! equivalent to the one printed; everything else (indentation style,
//! where binary operators break, how case branches indent) is governed by
//! [`Printer`]'s options.
//!
//! Here-document bodies are not emitted where their operator is; they are
//! queued and flushed at the next newline, in declaration order, exactly as
//! the shell reads them back. Comments are re-interleaved from the
//! [`File`]'s flat list by position.

use crate::syntax::{
    ArithmExpr, Assign, BinaryCmd, CallExpr, CaseClause, Command, Comment, File, IfClause,
    Loop, ParamExp, Redirect, Stmt, TestExpr, Word, WordPart,
};
use crate::token::RedirOperator;
use std::io::{self, Write};

/// The shell syntax printer
///
/// A printer holds formatting options and can be reused for any number of
/// trees; the state of each print call is scoped to the call.
#[derive(Clone, Debug)]
#[must_use = "Printer must be used to print syntax"]
pub struct Printer {
    indent: u32,
    binary_next_line: bool,
    switch_case_indent: bool,
    space_redirects: bool,
    keep_padding: bool,
    function_next_line: bool,
    minify: bool,
    single_line: bool,
}

impl Printer {
    /// Creates a printer with default settings: tab indentation and all
    /// style options off.
    pub fn new() -> Self {
        Printer {
            indent: 0,
            binary_next_line: false,
            switch_case_indent: false,
            space_redirects: false,
            keep_padding: false,
            function_next_line: false,
            minify: false,
            single_line: false,
        }
    }

    /// Sets the number of spaces used per indentation level. Zero, the
    /// default, means hard tabs.
    pub fn indent(&mut self, spaces: u32) -> &mut Self {
        self.indent = spaces;
        self
    }

    /// Makes binary operators like `&&` start the next line when a binary
    /// command spans two lines, instead of ending the previous one.
    pub fn binary_next_line(&mut self, on: bool) -> &mut Self {
        self.binary_next_line = on;
        self
    }

    /// Indents case branches one extra level.
    pub fn switch_case_indent(&mut self, on: bool) -> &mut Self {
        self.switch_case_indent = on;
        self
    }

    /// Puts a space after redirection operators: `> file` instead of
    /// `>file`.
    pub fn space_redirects(&mut self, on: bool) -> &mut Self {
        self.space_redirects = on;
        self
    }

    /// Preserves the column alignment of words that were aligned in the
    /// source, counted in bytes.
    pub fn keep_padding(&mut self, on: bool) -> &mut Self {
        self.keep_padding = on;
        self
    }

    /// Places the `{` of a function declaration on its own line.
    pub fn function_next_line(&mut self, on: bool) -> &mut Self {
        self.function_next_line = on;
        self
    }

    /// Omits all optional whitespace and indentation. Implies
    /// simplification of the tree before printing.
    pub fn minify(&mut self, on: bool) -> &mut Self {
        self.minify = on;
        self
    }

    /// Never emits newlines inside control structures.
    pub fn single_line(&mut self, on: bool) -> &mut Self {
        self.single_line = on;
        self
    }

    /// Prints a whole file.
    pub fn print<W: Write>(&self, w: &mut W, file: &File) -> io::Result<()> {
        if self.minify {
            let mut file = file.clone();
            crate::simplify::simplify_file(&mut file);
            let mut e = Emitter::new(self, w, &file.comments);
            e.file(&file)?;
            return Ok(());
        }
        let mut e = Emitter::new(self, w, &file.comments);
        e.file(file)
    }

    /// Prints one statement, followed by a newline.
    pub fn print_stmt<W: Write>(&self, w: &mut W, stmt: &Stmt) -> io::Result<()> {
        let mut e = Emitter::new(self, w, &[]);
        e.stmt(stmt)?;
        e.end_line()
    }

    /// Prints one word.
    pub fn print_word<W: Write>(&self, w: &mut W, word: &Word) -> io::Result<()> {
        let mut e = Emitter::new(self, w, &[]);
        e.word(word)
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one print call
struct Emitter<'a, 'w> {
    cfg: &'a Printer,
    w: &'w mut dyn Write,
    /// Current column, in bytes since the last newline
    col: usize,
    /// Current indentation level
    level: u32,
    /// Source line of the last token printed, for blank-line preservation
    last_line: u64,
    /// Here-document bodies waiting for the next newline
    pending_heredocs: Vec<&'a Redirect>,
    comments: &'a [Comment],
    /// Index of the next comment to interleave
    next_comment: usize,
    /// Whether the last byte written was a newline
    wrote_newline: bool,
    /// Whether anything has been written yet
    started: bool,
}

impl<'a> Emitter<'a, '_> {
    fn new<'w>(cfg: &'a Printer, w: &'w mut dyn Write, comments: &'a [Comment]) -> Emitter<'a, 'w> {
        Emitter {
            cfg,
            w,
            col: 0,
            level: 0,
            last_line: 1,
            pending_heredocs: Vec::new(),
            comments,
            next_comment: 0,
            wrote_newline: true,
            started: false,
        }
    }

    /// Whether control structures spread over multiple lines.
    fn vertical(&self) -> bool {
        !self.cfg.minify && !self.cfg.single_line
    }

    fn ws(&mut self, s: &str) -> io::Result<()> {
        self.w.write_all(s.as_bytes())?;
        match s.rfind('\n') {
            Some(i) => self.col = s.len() - i - 1,
            None => self.col += s.len(),
        }
        if !s.is_empty() {
            self.wrote_newline = s.ends_with('\n');
            self.started = true;
        }
        Ok(())
    }

    /// Ends the current line, flushing any pending here-document bodies
    /// first.
    fn end_line(&mut self) -> io::Result<()> {
        self.ws("\n")?;
        if self.pending_heredocs.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending_heredocs);
        for redir in pending {
            // The body bytes are emitted verbatim; `<<-` bodies keep their
            // stored tabs. The closing line is the delimiter after quote
            // removal.
            if let Some(hdoc) = &redir.hdoc {
                if !hdoc.is_missing() {
                    self.word(hdoc)?;
                    self.last_line = self.last_line.max(hdoc.end().line() + 1);
                }
            }
            self.last_line = self.last_line.max(redir.word.end().line() + 1);
            let delim = heredoc_end(&redir.word);
            self.ws(&delim)?;
            self.ws("\n")?;
        }
        Ok(())
    }

    /// Writes the indentation for the current level.
    fn write_indent(&mut self) -> io::Result<()> {
        if self.cfg.minify {
            return Ok(());
        }
        if self.cfg.indent == 0 {
            for _ in 0..self.level {
                self.ws("\t")?;
            }
        } else {
            for _ in 0..self.level * self.cfg.indent {
                self.ws(" ")?;
            }
        }
        Ok(())
    }

    /// Writes the statement separator used in inline statement lists.
    fn inline_sep(&mut self) -> io::Result<()> {
        if self.cfg.minify {
            self.ws(";")
        } else {
            self.ws("; ")
        }
    }

    /// Writes the separator between an inline statement list and whatever
    /// closes it. A trailing `&` is already a terminator; following it
    /// with `;` would be invalid.
    fn close_sep(&mut self, stmts: &[Stmt]) -> io::Result<()> {
        let terminated = stmts
            .last()
            .is_some_and(|last| last.background || last.coprocess);
        if terminated {
            self.space()
        } else {
            self.inline_sep()
        }
    }

    fn space(&mut self) -> io::Result<()> {
        self.ws(" ")
    }

    /// Writes the gap before a word, preserving source column alignment
    /// when `keep_padding` is on.
    fn word_gap(&mut self, prev_end: crate::source::Pos, next: crate::source::Pos) -> io::Result<()> {
        if self.cfg.keep_padding
            && !self.cfg.minify
            && prev_end.line() == next.line()
            && next.col() > prev_end.col()
        {
            let n = (next.col() - prev_end.col()) as usize;
            for _ in 0..n {
                self.ws(" ")?;
            }
            return Ok(());
        }
        self.space()
    }

    /// Emits the comments recorded before the given position, each on its
    /// own line at the current level; a comment on the same line as the
    /// last printed token stays inline, separated by two spaces.
    fn comments_before(&mut self, pos: crate::source::Pos) -> io::Result<()> {
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.hash >= pos {
                break;
            }
            self.next_comment += 1;
            if self.cfg.minify {
                continue;
            }
            let text = comment.text.trim_end_matches('\r').to_string();
            if !self.wrote_newline && comment.hash.line() == self.last_line {
                self.ws("  #")?;
                self.ws(&text)?;
            } else {
                if !self.wrote_newline {
                    self.end_line()?;
                }
                self.blank_line_before(comment.hash.line())?;
                self.write_indent()?;
                self.ws("#")?;
                self.ws(&text)?;
                self.end_line()?;
            }
            self.last_line = comment.hash.line();
        }
        Ok(())
    }

    /// Preserves at most one blank line before an element that had one or
    /// more in the source.
    fn blank_line_before(&mut self, line: u64) -> io::Result<()> {
        if self.vertical() && self.started && line > self.last_line + 1 {
            self.ws("\n")?;
        }
        Ok(())
    }

    fn file(&mut self, file: &'a File) -> io::Result<()> {
        if self.cfg.minify {
            self.stmt_list_inline(&file.stmts)?;
            if !file.stmts.is_empty() {
                self.end_line()?;
            }
        } else {
            self.stmt_list_vertical(&file.stmts)?;
        }
        // Trailing comments after the last statement.
        self.comments_before(crate::source::Pos::new(usize::MAX, u64::MAX, 0))?;
        Ok(())
    }

    /// Prints statements one per line at the current level. Used for the
    /// top level and for the bodies of control structures.
    fn stmt_list_vertical(&mut self, stmts: &'a [Stmt]) -> io::Result<()> {
        for stmt in stmts {
            self.comments_before(stmt.pos())?;
            self.blank_line_before(stmt.pos().line())?;
            self.write_indent()?;
            self.stmt(stmt)?;
            self.last_line = self.last_line.max(stmt.end().line());
            // An inline comment on the same line as the statement.
            self.inline_comment(stmt.end())?;
            self.end_line()?;
        }
        Ok(())
    }

    fn inline_comment(&mut self, end: crate::source::Pos) -> io::Result<()> {
        if let Some(comment) = self.comments.get(self.next_comment) {
            if comment.hash.line() == end.line() {
                self.next_comment += 1;
                if !self.cfg.minify {
                    let text = comment.text.trim_end_matches('\r').to_string();
                    self.ws("  #")?;
                    self.ws(&text)?;
                }
            }
        }
        Ok(())
    }

    /// Prints statements separated by `;` on the current line. A statement
    /// already terminated by `&` takes only a space.
    fn stmt_list_inline(&mut self, stmts: &'a [Stmt]) -> io::Result<()> {
        let mut prev: Option<&Stmt> = None;
        for stmt in stmts {
            if let Some(prev) = prev {
                if prev.background || prev.coprocess {
                    self.space()?;
                } else {
                    self.inline_sep()?;
                }
            }
            self.stmt(stmt)?;
            prev = Some(stmt);
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &'a Stmt) -> io::Result<()> {
        if stmt.negated {
            self.ws("! ")?;
        }
        let mut first = true;
        let mut prev_end = stmt.position;
        for assign in &stmt.assigns {
            if !first {
                self.word_gap(prev_end, assign.pos())?;
            }
            self.assign(assign)?;
            prev_end = assign.end();
            first = false;
        }
        match &stmt.cmd {
            Some(Command::Call(call)) => {
                self.call_expr(call, &stmt.redirs, first, prev_end)?;
            }
            Some(cmd) => {
                if !first {
                    self.space()?;
                }
                self.command(cmd)?;
                for redir in &stmt.redirs {
                    self.space()?;
                    self.redirect(redir)?;
                }
            }
            None => {
                for redir in &stmt.redirs {
                    if !first {
                        self.space()?;
                    }
                    self.redirect(redir)?;
                    first = false;
                }
            }
        }
        if stmt.background {
            self.ws(" &")?;
        }
        if stmt.coprocess {
            self.ws(" |&")?;
        }
        Ok(())
    }

    /// Prints a simple command, interleaving its redirections after the
    /// arguments in source order.
    fn call_expr(
        &mut self,
        call: &'a CallExpr,
        redirs: &'a [Redirect],
        mut first: bool,
        mut prev_end: crate::source::Pos,
    ) -> io::Result<()> {
        let mut redirs = redirs.iter().peekable();
        for word in &call.args {
            while let Some(redir) = redirs.peek() {
                if redir.pos() < word.pos() {
                    if !first {
                        self.word_gap(prev_end, redir.pos())?;
                    }
                    prev_end = redir.end();
                    first = false;
                    self.redirect(redir)?;
                    redirs.next();
                } else {
                    break;
                }
            }
            if !first {
                self.word_gap(prev_end, word.pos())?;
            }
            self.word(word)?;
            prev_end = word.end();
            first = false;
        }
        for redir in redirs {
            if !first {
                self.word_gap(prev_end, redir.pos())?;
            }
            prev_end = redir.end();
            first = false;
            self.redirect(redir)?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: &'a Command) -> io::Result<()> {
        match cmd {
            Command::Call(call) => self.call_expr(call, &[], true, crate::source::Pos::default()),
            Command::Binary(binary) => self.binary_cmd(binary),
            Command::Block(block) => {
                if block.stmts.is_empty() {
                    return self.ws("{ }");
                }
                self.ws("{")?;
                if self.vertical() && !block.stmts.is_empty() {
                    self.end_line()?;
                    self.level += 1;
                    self.stmt_list_vertical(&block.stmts)?;
                    self.level -= 1;
                    self.comments_before(block.rbrace)?;
                    self.write_indent()?;
                } else {
                    self.ws(" ")?;
                    self.stmt_list_inline(&block.stmts)?;
                    self.close_sep(&block.stmts)?;
                }
                self.ws("}")
            }
            Command::Subshell(subshell) => {
                self.ws("(")?;
                if let Some(first) = subshell.stmts.first() {
                    // `((` would lex as an arithmetic command.
                    if matches!(
                        &first.cmd,
                        Some(Command::Subshell(_)) | Some(Command::ArithmCmd(_))
                    ) {
                        self.ws(" ")?;
                    }
                }
                self.stmt_list_inline(&subshell.stmts)?;
                self.ws(")")
            }
            Command::If(clause) => self.if_clause(clause),
            Command::While(clause) => {
                self.ws(if clause.until { "until " } else { "while " })?;
                self.stmt_list_inline(&clause.cond)?;
                self.close_sep(&clause.cond)?;
                self.ws("do")?;
                self.body_stmts(&clause.do_stmts, clause.done_pos)?;
                self.ws("done")
            }
            Command::For(clause) => {
                self.ws(if clause.select { "select " } else { "for " })?;
                match &clause.iter {
                    Loop::WordIter(iter) => {
                        self.ws(&iter.name.value)?;
                        if iter.in_pos.is_valid() {
                            self.ws(" in")?;
                            for word in &iter.items {
                                self.space()?;
                                self.word(word)?;
                            }
                        }
                    }
                    Loop::CStyle(cstyle) => {
                        self.ws("((")?;
                        if let Some(init) = &cstyle.init {
                            self.arithm(init, false)?;
                        }
                        self.ws("; ")?;
                        if let Some(cond) = &cstyle.cond {
                            self.arithm(cond, false)?;
                        }
                        self.ws("; ")?;
                        if let Some(post) = &cstyle.post {
                            self.arithm(post, false)?;
                        }
                        self.ws("))")?;
                    }
                }
                self.inline_sep()?;
                self.ws("do")?;
                self.body_stmts(&clause.do_stmts, clause.done_pos)?;
                self.ws("done")
            }
            Command::Case(clause) => self.case_clause(clause),
            Command::FuncDecl(decl) => {
                if decl.rsrv_word {
                    self.ws("function ")?;
                    self.ws(&decl.name.value)?;
                    if decl.parens {
                        self.ws("()")?;
                    }
                } else {
                    self.ws(&decl.name.value)?;
                    self.ws("()")?;
                }
                if self.cfg.function_next_line && self.vertical() {
                    self.end_line()?;
                    self.write_indent()?;
                } else {
                    self.space()?;
                }
                self.stmt(&decl.body)
            }
            Command::ArithmCmd(cmd) => {
                self.ws("((")?;
                self.arithm(&cmd.x, false)?;
                self.ws("))")
            }
            Command::Test(clause) => {
                self.ws("[[ ")?;
                self.test_expr(&clause.x)?;
                self.ws(" ]]")
            }
            Command::Decl(decl) => {
                self.ws(&decl.variant.value)?;
                for arg in &decl.args {
                    self.space()?;
                    self.assign(arg)?;
                }
                Ok(())
            }
            Command::Let(clause) => {
                self.ws("let")?;
                for expr in &clause.exprs {
                    self.space()?;
                    self.arithm(expr, true)?;
                }
                Ok(())
            }
            Command::Time(clause) => {
                self.ws("time")?;
                if clause.posix_format {
                    self.ws(" -p")?;
                }
                if let Some(stmt) = &clause.stmt {
                    self.space()?;
                    self.stmt(stmt)?;
                }
                Ok(())
            }
            Command::Coproc(clause) => {
                self.ws("coproc ")?;
                if let Some(name) = &clause.name {
                    self.word(name)?;
                    self.space()?;
                }
                self.stmt(&clause.stmt)
            }
            Command::TestDecl(decl) => {
                self.ws("@test ")?;
                self.word(&decl.description)?;
                self.space()?;
                self.stmt(&decl.body)
            }
        }
    }

    /// Prints the body of a `do`/`then` clause and positions the cursor
    /// for the closing keyword.
    fn body_stmts(&mut self, stmts: &'a [Stmt], close_pos: crate::source::Pos) -> io::Result<()> {
        if self.vertical() {
            self.end_line()?;
            self.level += 1;
            self.stmt_list_vertical(stmts)?;
            self.level -= 1;
            self.comments_before(close_pos)?;
            self.write_indent()
        } else if stmts.is_empty() {
            self.space()
        } else {
            self.space()?;
            self.stmt_list_inline(stmts)?;
            self.close_sep(stmts)
        }
    }

    fn if_clause(&mut self, clause: &'a IfClause) -> io::Result<()> {
        self.ws("if ")?;
        self.stmt_list_inline(&clause.cond)?;
        self.close_sep(&clause.cond)?;
        self.ws("then")?;
        self.body_stmts(
            &clause.then_stmts,
            clause
                .elifs
                .first()
                .map(|elif| elif.elif_pos)
                .or_else(|| clause.else_branch.as_ref().map(|e| e.else_pos))
                .unwrap_or(clause.fi_pos),
        )?;
        for (i, elif) in clause.elifs.iter().enumerate() {
            self.ws("elif ")?;
            self.stmt_list_inline(&elif.cond)?;
            self.close_sep(&elif.cond)?;
            self.ws("then")?;
            let next = clause
                .elifs
                .get(i + 1)
                .map(|elif| elif.elif_pos)
                .or_else(|| clause.else_branch.as_ref().map(|e| e.else_pos))
                .unwrap_or(clause.fi_pos);
            self.body_stmts(&elif.then_stmts, next)?;
        }
        if let Some(else_branch) = &clause.else_branch {
            self.ws("else")?;
            self.body_stmts(&else_branch.stmts, clause.fi_pos)?;
        }
        self.ws("fi")
    }

    fn case_clause(&mut self, clause: &'a CaseClause) -> io::Result<()> {
        self.ws("case ")?;
        self.word(&clause.word)?;
        self.ws(" in")?;
        if !self.vertical() {
            for item in &clause.items {
                self.space()?;
                for (i, pattern) in item.patterns.iter().enumerate() {
                    if i > 0 {
                        self.ws(" | ")?;
                    }
                    self.word(pattern)?;
                }
                self.ws(") ")?;
                self.stmt_list_inline(&item.stmts)?;
                if !item.stmts.is_empty() {
                    self.space()?;
                }
                self.ws(item.op.as_str())?;
            }
            self.ws(" esac")?;
            return Ok(());
        }
        self.end_line()?;
        if self.cfg.switch_case_indent {
            self.level += 1;
        }
        for item in &clause.items {
            self.comments_before(item.pos())?;
            self.blank_line_before(item.pos().line())?;
            self.write_indent()?;
            for (i, pattern) in item.patterns.iter().enumerate() {
                if i > 0 {
                    self.ws(" | ")?;
                }
                self.word(pattern)?;
            }
            self.ws(")")?;
            if item.stmts.is_empty() {
                self.ws(" ")?;
                self.ws(item.op.as_str())?;
                self.last_line = self.last_line.max(item.end_line());
                self.end_line()?;
                continue;
            }
            self.end_line()?;
            self.level += 1;
            self.stmt_list_vertical(&item.stmts)?;
            self.write_indent()?;
            self.ws(item.op.as_str())?;
            self.level -= 1;
            self.last_line = self.last_line.max(item.end_line());
            self.end_line()?;
        }
        if self.cfg.switch_case_indent {
            self.level -= 1;
        }
        self.comments_before(clause.esac_pos)?;
        self.write_indent()?;
        self.ws("esac")
    }

    fn binary_cmd(&mut self, binary: &'a BinaryCmd) -> io::Result<()> {
        self.stmt(&binary.x)?;
        // Keep the command on one line unless the source broke it.
        let broke = self.vertical()
            && (binary.y.pos().line() > binary.op_pos.line()
                || binary.op_pos.line() > binary.x.end().line());
        if !broke {
            self.space()?;
            self.ws(binary.op.as_str())?;
            self.space()?;
            return self.stmt(&binary.y);
        }
        self.level += 1;
        // With a here-document pending, an escaped newline would land
        // between the operator and the body lines; the operator must end
        // the line so the body starts after a real newline.
        if self.cfg.binary_next_line && self.pending_heredocs.is_empty() {
            // A bare newline would terminate the statement; the operator
            // on the next line needs an escaped newline before it.
            self.ws(" \\")?;
            self.end_line()?;
            self.write_indent()?;
            self.ws(binary.op.as_str())?;
            self.space()?;
        } else {
            self.space()?;
            self.ws(binary.op.as_str())?;
            self.end_line()?;
            self.write_indent()?;
        }
        self.last_line = binary.y.pos().line();
        let result = self.stmt(&binary.y);
        self.level -= 1;
        result
    }

    fn assign(&mut self, assign: &'a Assign) -> io::Result<()> {
        if let Some(name) = &assign.name {
            self.ws(&name.value)?;
            if let Some(index) = &assign.index {
                self.ws("[")?;
                self.arithm(index, true)?;
                self.ws("]")?;
            }
            if !assign.naked {
                self.ws(if assign.append { "+=" } else { "=" })?;
            }
        }
        if let Some(array) = &assign.array {
            self.ws("(")?;
            for (i, elem) in array.elems.iter().enumerate() {
                if i > 0 {
                    self.space()?;
                }
                if let Some(index) = &elem.index {
                    self.ws("[")?;
                    self.arithm(index, true)?;
                    self.ws("]=")?;
                }
                self.word(&elem.value)?;
            }
            self.ws(")")?;
        } else if let Some(value) = &assign.value {
            self.word(value)?;
        }
        Ok(())
    }

    fn redirect(&mut self, redir: &'a Redirect) -> io::Result<()> {
        if let Some(n) = &redir.n {
            self.ws(&n.value)?;
        }
        self.ws(redir.op.as_str())?;
        let dup = matches!(redir.op, RedirOperator::FdIn | RedirOperator::FdOut);
        if self.cfg.space_redirects && !redir.op.is_heredoc() && !dup && !self.cfg.minify {
            self.space()?;
        }
        self.word(&redir.word)?;
        if redir.op.is_heredoc() {
            self.pending_heredocs.push(redir);
        }
        Ok(())
    }

    fn word(&mut self, word: &'a Word) -> io::Result<()> {
        for part in &word.parts {
            self.word_part(part)?;
        }
        Ok(())
    }

    fn word_part(&mut self, part: &'a WordPart) -> io::Result<()> {
        match part {
            WordPart::Lit(lit) => self.ws(&lit.value),
            WordPart::SglQuoted(sgl) => {
                if sgl.dollar {
                    self.ws("$")?;
                }
                self.ws("'")?;
                self.ws(&sgl.value)?;
                self.ws("'")
            }
            WordPart::DblQuoted(dbl) => {
                if dbl.dollar {
                    self.ws("$")?;
                }
                self.ws("\"")?;
                for part in &dbl.parts {
                    self.word_part(part)?;
                }
                self.ws("\"")
            }
            WordPart::ParamExp(exp) => self.param_exp(exp),
            WordPart::CmdSubst(subst) => {
                if subst.backquotes {
                    self.ws("`")?;
                    self.stmt_list_inline(&subst.stmts)?;
                    self.ws("`")
                } else if subst.temp_file || subst.repl_in {
                    self.ws(if subst.repl_in { "${|" } else { "${ " })?;
                    self.stmt_list_inline(&subst.stmts)?;
                    let needs_semi = subst
                        .stmts
                        .last()
                        .is_none_or(|last| !last.background && !last.coprocess);
                    if needs_semi {
                        self.ws(";")?;
                    }
                    self.ws("}")
                } else {
                    self.ws("$(")?;
                    if let Some(first) = subst.stmts.first() {
                        if matches!(
                            &first.cmd,
                            Some(Command::Subshell(_)) | Some(Command::ArithmCmd(_))
                        ) {
                            self.ws(" ")?;
                        }
                    }
                    self.stmt_list_inline(&subst.stmts)?;
                    self.ws(")")
                }
            }
            WordPart::ArithmExp(exp) => {
                if exp.bracket {
                    self.ws("$[")?;
                    self.arithm(&exp.x, false)?;
                    self.ws("]")
                } else {
                    self.ws("$((")?;
                    self.arithm(&exp.x, false)?;
                    self.ws("))")
                }
            }
            WordPart::ProcSubst(subst) => {
                self.ws(subst.op.as_str())?;
                self.stmt_list_inline(&subst.stmts)?;
                self.ws(")")
            }
            WordPart::ExtGlob(glob) => {
                self.ws(glob.op.as_str())?;
                self.ws(&glob.pattern.value)?;
                self.ws(")")
            }
            WordPart::BraceExp(brace) => {
                self.ws("{")?;
                let sep = if brace.sequence { ".." } else { "," };
                for (i, elem) in brace.elems.iter().enumerate() {
                    if i > 0 {
                        self.ws(sep)?;
                    }
                    self.word(elem)?;
                }
                self.ws("}")
            }
        }
    }

    fn param_exp(&mut self, exp: &'a ParamExp) -> io::Result<()> {
        if exp.short {
            self.ws("$")?;
            return self.ws(&exp.param.value);
        }
        self.ws("${")?;
        if exp.excl {
            self.ws("!")?;
        }
        if exp.length {
            self.ws("#")?;
        }
        if exp.width {
            self.ws("%")?;
        }
        self.ws(&exp.param.value)?;
        if let Some(index) = &exp.index {
            self.ws("[")?;
            self.arithm(index, true)?;
            self.ws("]")?;
        }
        if let Some(names) = &exp.names {
            self.ws(names.as_str())?;
        }
        if let Some(slice) = &exp.slice {
            self.ws(":")?;
            if let Some(offset) = &slice.offset {
                if starts_with_sign(offset) {
                    self.space()?;
                }
                self.arithm(offset, true)?;
            }
            if let Some(length) = &slice.length {
                self.ws(":")?;
                self.arithm(length, true)?;
            }
        }
        if let Some(repl) = &exp.repl {
            self.ws(if repl.all { "//" } else { "/" })?;
            self.word(&repl.orig)?;
            self.ws("/")?;
            self.word(&repl.with)?;
        }
        if let Some(expansion) = &exp.exp {
            self.ws(expansion.op.as_str())?;
            self.word(&expansion.word)?;
        }
        self.ws("}")
    }

    /// Prints an arithmetic expression. In compact contexts (array
    /// indices, slices, `let` words) no spaces surround the operators,
    /// since the expression must remain a single shell word.
    fn arithm(&mut self, expr: &'a ArithmExpr, compact: bool) -> io::Result<()> {
        match expr {
            ArithmExpr::Word(word) => self.word(word),
            ArithmExpr::Paren(paren) => {
                self.ws("(")?;
                self.arithm(&paren.x, compact)?;
                self.ws(")")
            }
            ArithmExpr::Unary(unary) => {
                if unary.post {
                    self.arithm(&unary.x, compact)?;
                    self.ws(unary.op.as_str())
                } else {
                    self.ws(unary.op.as_str())?;
                    // `- -x` must not merge into a decrement.
                    if matches!(&unary.x, ArithmExpr::Unary(inner) if !inner.post) {
                        self.space()?;
                    }
                    self.arithm(&unary.x, compact)
                }
            }
            ArithmExpr::Binary(binary) => {
                use crate::token::BinAritOperator::{Comma, TernColon, TernQuest};
                self.arithm(&binary.x, compact)?;
                match binary.op {
                    Comma => {
                        self.ws(",")?;
                        if !compact {
                            self.space()?;
                        }
                    }
                    TernQuest | TernColon => {
                        if compact {
                            self.ws(binary.op.as_str())?;
                        } else {
                            self.space()?;
                            self.ws(binary.op.as_str())?;
                            self.space()?;
                        }
                    }
                    _ => {
                        if compact {
                            self.ws(binary.op.as_str())?;
                        } else {
                            self.space()?;
                            self.ws(binary.op.as_str())?;
                            self.space()?;
                        }
                    }
                }
                self.arithm(&binary.y, compact)
            }
        }
    }

    fn test_expr(&mut self, expr: &'a TestExpr) -> io::Result<()> {
        match expr {
            TestExpr::Word(word) => self.word(word),
            TestExpr::Paren(paren) => {
                self.ws("(")?;
                self.test_expr(&paren.x)?;
                self.ws(")")
            }
            TestExpr::Unary(unary) => {
                self.ws(unary.op.as_str())?;
                self.space()?;
                self.test_expr(&unary.x)
            }
            TestExpr::Binary(binary) => {
                self.test_expr(&binary.x)?;
                self.space()?;
                self.ws(binary.op.as_str())?;
                self.space()?;
                self.test_expr(&binary.y)
            }
        }
    }
}

/// Reports whether the compact form of the expression begins with `-` or
/// `+`, which must not merge with a preceding `:` in a slice.
fn starts_with_sign(expr: &ArithmExpr) -> bool {
    match expr {
        ArithmExpr::Unary(unary) => {
            !unary.post
                && matches!(
                    unary.op,
                    crate::token::UnAritOperator::Minus
                        | crate::token::UnAritOperator::Plus
                        | crate::token::UnAritOperator::Inc
                        | crate::token::UnAritOperator::Dec
                )
        }
        ArithmExpr::Binary(binary) => starts_with_sign(&binary.x),
        ArithmExpr::Paren(_) => false,
        ArithmExpr::Word(word) => {
            matches!(&word.parts.first(), Some(WordPart::Lit(lit)) if lit.value.starts_with(['-', '+']))
        }
    }
}

/// Computes the closing delimiter line of a here-document: the operator's
/// word after quote removal.
fn heredoc_end(word: &Word) -> String {
    let mut delim = String::new();
    for part in &word.parts {
        match part {
            WordPart::Lit(lit) => {
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
            WordPart::SglQuoted(sgl) => delim.push_str(&sgl.value),
            WordPart::DblQuoted(dbl) => {
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
            _ => break,
        }
    }
    delim
}

/// Extra position helpers used only by the printer.
impl crate::syntax::CaseItem {
    fn pos(&self) -> crate::source::Pos {
        self.patterns
            .first()
            .map_or_else(crate::source::Pos::default, Word::pos)
    }

    fn end_line(&self) -> u64 {
        if self.op_pos.is_valid() {
            self.op_pos.line()
        } else {
            self.stmts
                .last()
                .map_or_else(|| self.pos().line(), |stmt| stmt.end().line())
        }
    }
}

#[cfg(test)]
mod tests;
