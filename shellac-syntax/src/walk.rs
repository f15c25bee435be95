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

//! Traversal of syntax trees
//!
//! [`walk`] visits a tree in pre-order. The visitor returns whether the
//! children of the node just visited should be descended into, so a
//! visitor can prune subtrees it does not care about.

use crate::syntax::{
    ArithmExpr, Assign, Command, Comment, File, Loop, Redirect, Stmt, TestExpr, Word, WordPart,
};
use std::io::{self, Write};

/// A borrowed reference to any node of the tree
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    File(&'a File),
    Stmt(&'a Stmt),
    Command(&'a Command),
    Word(&'a Word),
    WordPart(&'a WordPart),
    Redirect(&'a Redirect),
    Assign(&'a Assign),
    ArithmExpr(&'a ArithmExpr),
    TestExpr(&'a TestExpr),
    Comment(&'a Comment),
}

/// Returns the name of the node's variant, e.g. `"CallExpr"` or `"Lit"`.
#[must_use]
pub fn node_type(node: &Node<'_>) -> &'static str {
    match node {
        Node::File(_) => "File",
        Node::Stmt(_) => "Stmt",
        Node::Command(cmd) => match cmd {
            Command::Call(_) => "CallExpr",
            Command::Block(_) => "Block",
            Command::Subshell(_) => "Subshell",
            Command::If(_) => "IfClause",
            Command::While(clause) if clause.until => "UntilClause",
            Command::While(_) => "WhileClause",
            Command::For(_) => "ForClause",
            Command::Case(_) => "CaseClause",
            Command::FuncDecl(_) => "FuncDecl",
            Command::ArithmCmd(_) => "ArithmCmd",
            Command::Test(_) => "TestClause",
            Command::Decl(_) => "DeclClause",
            Command::Let(_) => "LetClause",
            Command::Time(_) => "TimeClause",
            Command::Coproc(_) => "CoprocClause",
            Command::Binary(_) => "BinaryCmd",
            Command::TestDecl(_) => "TestDecl",
        },
        Node::Word(_) => "Word",
        Node::WordPart(part) => match part {
            WordPart::Lit(_) => "Lit",
            WordPart::SglQuoted(_) => "SglQuoted",
            WordPart::DblQuoted(_) => "DblQuoted",
            WordPart::ParamExp(_) => "ParamExp",
            WordPart::CmdSubst(_) => "CmdSubst",
            WordPart::ArithmExp(_) => "ArithmExp",
            WordPart::ProcSubst(_) => "ProcSubst",
            WordPart::ExtGlob(_) => "ExtGlob",
            WordPart::BraceExp(_) => "BraceExp",
        },
        Node::Redirect(_) => "Redirect",
        Node::Assign(_) => "Assign",
        Node::ArithmExpr(expr) => match expr {
            ArithmExpr::Binary(_) => "BinaryArithm",
            ArithmExpr::Unary(_) => "UnaryArithm",
            ArithmExpr::Paren(_) => "ParenArithm",
            ArithmExpr::Word(_) => "Word",
        },
        Node::TestExpr(expr) => match expr {
            TestExpr::Binary(_) => "BinaryTest",
            TestExpr::Unary(_) => "UnaryTest",
            TestExpr::Paren(_) => "ParenTest",
            TestExpr::Word(_) => "Word",
        },
        Node::Comment(_) => "Comment",
    }
}

/// Walks the tree in pre-order.
///
/// The visitor is called for each node; returning false skips the node's
/// children.
pub fn walk<'a>(node: Node<'a>, visit: &mut dyn FnMut(Node<'a>) -> bool) {
    if !visit(node) {
        return;
    }
    match node {
        Node::File(file) => {
            for stmt in &file.stmts {
                walk(Node::Stmt(stmt), visit);
            }
            for comment in &file.comments {
                walk(Node::Comment(comment), visit);
            }
        }
        Node::Stmt(stmt) => {
            for assign in &stmt.assigns {
                walk(Node::Assign(assign), visit);
            }
            if let Some(cmd) = &stmt.cmd {
                walk(Node::Command(cmd), visit);
            }
            for redir in &stmt.redirs {
                walk(Node::Redirect(redir), visit);
            }
        }
        Node::Command(cmd) => walk_command(cmd, visit),
        Node::Word(word) => {
            for part in &word.parts {
                walk(Node::WordPart(part), visit);
            }
        }
        Node::WordPart(part) => walk_word_part(part, visit),
        Node::Redirect(redir) => {
            walk(Node::Word(&redir.word), visit);
            if let Some(hdoc) = &redir.hdoc {
                walk(Node::Word(hdoc), visit);
            }
        }
        Node::Assign(assign) => {
            if let Some(index) = &assign.index {
                walk(Node::ArithmExpr(index), visit);
            }
            if let Some(value) = &assign.value {
                walk(Node::Word(value), visit);
            }
            if let Some(array) = &assign.array {
                for elem in &array.elems {
                    if let Some(index) = &elem.index {
                        walk(Node::ArithmExpr(index), visit);
                    }
                    walk(Node::Word(&elem.value), visit);
                }
            }
        }
        Node::ArithmExpr(expr) => match expr {
            ArithmExpr::Binary(binary) => {
                walk(Node::ArithmExpr(&binary.x), visit);
                walk(Node::ArithmExpr(&binary.y), visit);
            }
            ArithmExpr::Unary(unary) => walk(Node::ArithmExpr(&unary.x), visit),
            ArithmExpr::Paren(paren) => walk(Node::ArithmExpr(&paren.x), visit),
            ArithmExpr::Word(word) => walk(Node::Word(word), visit),
        },
        Node::TestExpr(expr) => match expr {
            TestExpr::Binary(binary) => {
                walk(Node::TestExpr(&binary.x), visit);
                walk(Node::TestExpr(&binary.y), visit);
            }
            TestExpr::Unary(unary) => walk(Node::TestExpr(&unary.x), visit),
            TestExpr::Paren(paren) => walk(Node::TestExpr(&paren.x), visit),
            TestExpr::Word(word) => walk(Node::Word(word), visit),
        },
        Node::Comment(_) => {}
    }
}

fn walk_command<'a>(cmd: &'a Command, visit: &mut dyn FnMut(Node<'a>) -> bool) {
    match cmd {
        Command::Call(call) => {
            for word in &call.args {
                walk(Node::Word(word), visit);
            }
        }
        Command::Block(block) => {
            for stmt in &block.stmts {
                walk(Node::Stmt(stmt), visit);
            }
        }
        Command::Subshell(subshell) => {
            for stmt in &subshell.stmts {
                walk(Node::Stmt(stmt), visit);
            }
        }
        Command::If(clause) => {
            for stmt in clause.cond.iter().chain(&clause.then_stmts) {
                walk(Node::Stmt(stmt), visit);
            }
            for elif in &clause.elifs {
                for stmt in elif.cond.iter().chain(&elif.then_stmts) {
                    walk(Node::Stmt(stmt), visit);
                }
            }
            if let Some(else_branch) = &clause.else_branch {
                for stmt in &else_branch.stmts {
                    walk(Node::Stmt(stmt), visit);
                }
            }
        }
        Command::While(clause) => {
            for stmt in clause.cond.iter().chain(&clause.do_stmts) {
                walk(Node::Stmt(stmt), visit);
            }
        }
        Command::For(clause) => {
            match &clause.iter {
                Loop::WordIter(iter) => {
                    for word in &iter.items {
                        walk(Node::Word(word), visit);
                    }
                }
                Loop::CStyle(cstyle) => {
                    for expr in [&cstyle.init, &cstyle.cond, &cstyle.post]
                        .into_iter()
                        .flatten()
                    {
                        walk(Node::ArithmExpr(expr), visit);
                    }
                }
            }
            for stmt in &clause.do_stmts {
                walk(Node::Stmt(stmt), visit);
            }
        }
        Command::Case(clause) => {
            walk(Node::Word(&clause.word), visit);
            for item in &clause.items {
                for pattern in &item.patterns {
                    walk(Node::Word(pattern), visit);
                }
                for stmt in &item.stmts {
                    walk(Node::Stmt(stmt), visit);
                }
            }
        }
        Command::FuncDecl(decl) => walk(Node::Stmt(&decl.body), visit),
        Command::ArithmCmd(cmd) => walk(Node::ArithmExpr(&cmd.x), visit),
        Command::Test(clause) => walk(Node::TestExpr(&clause.x), visit),
        Command::Decl(decl) => {
            for arg in &decl.args {
                walk(Node::Assign(arg), visit);
            }
        }
        Command::Let(clause) => {
            for expr in &clause.exprs {
                walk(Node::ArithmExpr(expr), visit);
            }
        }
        Command::Time(clause) => {
            if let Some(stmt) = &clause.stmt {
                walk(Node::Stmt(stmt), visit);
            }
        }
        Command::Coproc(clause) => {
            if let Some(name) = &clause.name {
                walk(Node::Word(name), visit);
            }
            walk(Node::Stmt(&clause.stmt), visit);
        }
        Command::Binary(binary) => {
            walk(Node::Stmt(&binary.x), visit);
            walk(Node::Stmt(&binary.y), visit);
        }
        Command::TestDecl(decl) => {
            walk(Node::Word(&decl.description), visit);
            walk(Node::Stmt(&decl.body), visit);
        }
    }
}

fn walk_word_part<'a>(part: &'a WordPart, visit: &mut dyn FnMut(Node<'a>) -> bool) {
    match part {
        WordPart::Lit(_) | WordPart::SglQuoted(_) | WordPart::ExtGlob(_) => {}
        WordPart::DblQuoted(dbl) => {
            for part in &dbl.parts {
                walk(Node::WordPart(part), visit);
            }
        }
        WordPart::ParamExp(exp) => {
            if let Some(index) = &exp.index {
                walk(Node::ArithmExpr(index), visit);
            }
            if let Some(slice) = &exp.slice {
                for bound in [&slice.offset, &slice.length].into_iter().flatten() {
                    walk(Node::ArithmExpr(bound), visit);
                }
            }
            if let Some(repl) = &exp.repl {
                walk(Node::Word(&repl.orig), visit);
                walk(Node::Word(&repl.with), visit);
            }
            if let Some(expansion) = &exp.exp {
                walk(Node::Word(&expansion.word), visit);
            }
        }
        WordPart::CmdSubst(subst) => {
            for stmt in &subst.stmts {
                walk(Node::Stmt(stmt), visit);
            }
        }
        WordPart::ArithmExp(exp) => walk(Node::ArithmExpr(&exp.x), visit),
        WordPart::ProcSubst(subst) => {
            for stmt in &subst.stmts {
                walk(Node::Stmt(stmt), visit);
            }
        }
        WordPart::BraceExp(brace) => {
            for word in &brace.elems {
                walk(Node::Word(word), visit);
            }
        }
    }
}

/// Writes a verbose, indented dump of the node for debugging.
pub fn debug_print<W: Write>(w: &mut W, node: Node<'_>) -> io::Result<()> {
    match node {
        Node::File(x) => writeln!(w, "{x:#?}"),
        Node::Stmt(x) => writeln!(w, "{x:#?}"),
        Node::Command(x) => writeln!(w, "{x:#?}"),
        Node::Word(x) => writeln!(w, "{x:#?}"),
        Node::WordPart(x) => writeln!(w, "{x:#?}"),
        Node::Redirect(x) => writeln!(w, "{x:#?}"),
        Node::Assign(x) => writeln!(w, "{x:#?}"),
        Node::ArithmExpr(x) => writeln!(w, "{x:#?}"),
        Node::TestExpr(x) => writeln!(w, "{x:#?}"),
        Node::Comment(x) => writeln!(w, "{x:#?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn walk_visits_nested_nodes() {
        let file = Parser::new()
            .parse("if foo; then echo $bar; fi\n".as_bytes(), "")
            .unwrap();
        let mut types = Vec::new();
        walk(Node::File(&file), &mut |node| {
            types.push(node_type(&node));
            true
        });
        assert!(types.contains(&"IfClause"));
        assert!(types.contains(&"CallExpr"));
        assert!(types.contains(&"ParamExp"));
        assert_eq!(types[0], "File");
    }

    #[test]
    fn visitor_can_prune_children() {
        let file = Parser::new()
            .parse("if foo; then echo $bar; fi\n".as_bytes(), "")
            .unwrap();
        let mut count = 0;
        walk(Node::File(&file), &mut |node| {
            count += 1;
            // Do not descend into statements at all.
            !matches!(node, Node::Stmt(_))
        });
        // Only the file and its one top-level statement are seen.
        assert_eq!(count, 2);
    }

    #[test]
    fn node_type_names_variants() {
        let file = Parser::new().parse("a | b\n".as_bytes(), "").unwrap();
        let cmd = file.stmts[0].cmd.as_ref().unwrap();
        assert_eq!(node_type(&Node::Command(cmd)), "BinaryCmd");
    }

    #[test]
    fn debug_print_writes_something() {
        let file = Parser::new().parse("echo hi\n".as_bytes(), "").unwrap();
        let mut out = Vec::new();
        debug_print(&mut out, Node::File(&file)).unwrap();
        assert!(!out.is_empty());
    }
}
