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

//! Semantics-preserving tree rewrites
//!
//! [`simplify_file`] applies the rewrites that never change what a script
//! does:
//!
//! - `$i` becomes `i` inside arithmetic expressions, where variables are
//!   dereferenced anyway;
//! - double quotes around plain literal arithmetic operands are dropped;
//! - backslashes before characters that never need escaping are dropped.
//!
//! `${foo:-}` is deliberately *not* rewritten to `${foo-}`: the two differ
//! for a variable that is set but empty.
//!
//! [`split_braces`] is a separate, opt-in rewrite that turns literal brace
//! expressions inside a word into structured [`BraceExp`] parts.

use crate::syntax::{
    ArithmExpr, BraceExp, Command, File, Lit, Loop, Stmt, TestExpr, Word, WordPart,
};

/// Applies all safe simplifications to a file in place.
///
/// Returns true if anything changed. Simplification never grows the
/// printed output.
pub fn simplify_file(file: &mut File) -> bool {
    let mut changed = false;
    for stmt in &mut file.stmts {
        changed |= simplify_stmt(stmt);
    }
    changed
}

fn simplify_stmt(stmt: &mut Stmt) -> bool {
    let mut changed = false;
    for assign in &mut stmt.assigns {
        if let Some(index) = &mut assign.index {
            changed |= simplify_arithm(index);
        }
        if let Some(value) = &mut assign.value {
            changed |= simplify_word(value);
        }
        if let Some(array) = &mut assign.array {
            for elem in &mut array.elems {
                if let Some(index) = &mut elem.index {
                    changed |= simplify_arithm(index);
                }
                changed |= simplify_word(&mut elem.value);
            }
        }
    }
    for redir in &mut stmt.redirs {
        changed |= simplify_word(&mut redir.word);
    }
    if let Some(cmd) = &mut stmt.cmd {
        changed |= simplify_cmd(cmd);
    }
    changed
}

fn simplify_cmd(cmd: &mut Command) -> bool {
    let mut changed = false;
    match cmd {
        Command::Call(call) => {
            for word in &mut call.args {
                changed |= simplify_word(word);
            }
        }
        Command::Block(block) => {
            for stmt in &mut block.stmts {
                changed |= simplify_stmt(stmt);
            }
        }
        Command::Subshell(subshell) => {
            for stmt in &mut subshell.stmts {
                changed |= simplify_stmt(stmt);
            }
        }
        Command::If(clause) => {
            for stmt in clause.cond.iter_mut().chain(&mut clause.then_stmts) {
                changed |= simplify_stmt(stmt);
            }
            for elif in &mut clause.elifs {
                for stmt in elif.cond.iter_mut().chain(&mut elif.then_stmts) {
                    changed |= simplify_stmt(stmt);
                }
            }
            if let Some(else_branch) = &mut clause.else_branch {
                for stmt in &mut else_branch.stmts {
                    changed |= simplify_stmt(stmt);
                }
            }
        }
        Command::While(clause) => {
            for stmt in clause.cond.iter_mut().chain(&mut clause.do_stmts) {
                changed |= simplify_stmt(stmt);
            }
        }
        Command::For(clause) => {
            match &mut clause.iter {
                Loop::WordIter(iter) => {
                    for word in &mut iter.items {
                        changed |= simplify_word(word);
                    }
                }
                Loop::CStyle(cstyle) => {
                    for expr in [&mut cstyle.init, &mut cstyle.cond, &mut cstyle.post]
                        .into_iter()
                        .flatten()
                    {
                        changed |= simplify_arithm(expr);
                    }
                }
            }
            for stmt in &mut clause.do_stmts {
                changed |= simplify_stmt(stmt);
            }
        }
        Command::Case(clause) => {
            changed |= simplify_word(&mut clause.word);
            for item in &mut clause.items {
                // Patterns keep their escapes; a `\*` matches differently
                // from `*`.
                for stmt in &mut item.stmts {
                    changed |= simplify_stmt(stmt);
                }
            }
        }
        Command::FuncDecl(decl) => changed |= simplify_stmt(&mut decl.body),
        Command::ArithmCmd(cmd) => changed |= simplify_arithm(&mut cmd.x),
        Command::Test(clause) => changed |= simplify_test(&mut clause.x),
        Command::Decl(decl) => {
            for arg in &mut decl.args {
                if let Some(value) = &mut arg.value {
                    changed |= simplify_word(value);
                }
            }
        }
        Command::Let(clause) => {
            for expr in &mut clause.exprs {
                changed |= simplify_arithm(expr);
            }
        }
        Command::Time(clause) => {
            if let Some(stmt) = &mut clause.stmt {
                changed |= simplify_stmt(stmt);
            }
        }
        Command::Coproc(clause) => {
            changed |= simplify_stmt(&mut clause.stmt);
        }
        Command::Binary(binary) => {
            changed |= simplify_stmt(&mut binary.x);
            changed |= simplify_stmt(&mut binary.y);
        }
        Command::TestDecl(decl) => changed |= simplify_stmt(&mut decl.body),
    }
    changed
}

fn simplify_test(expr: &mut TestExpr) -> bool {
    match expr {
        TestExpr::Binary(binary) => {
            // The right side of a match keeps its quoting; only descend
            // into the halves as statements would.
            simplify_test(&mut binary.x) | simplify_test(&mut binary.y)
        }
        TestExpr::Unary(unary) => simplify_test(&mut unary.x),
        TestExpr::Paren(paren) => simplify_test(&mut paren.x),
        TestExpr::Word(_) => false,
    }
}

fn simplify_arithm(expr: &mut ArithmExpr) -> bool {
    let mut changed = false;
    match expr {
        ArithmExpr::Binary(binary) => {
            changed |= simplify_arithm(&mut binary.x);
            changed |= simplify_arithm(&mut binary.y);
        }
        ArithmExpr::Unary(unary) => changed |= simplify_arithm(&mut unary.x),
        ArithmExpr::Paren(paren) => changed |= simplify_arithm(&mut paren.x),
        ArithmExpr::Word(word) => changed |= simplify_arithm_word(word),
    }
    changed
}

/// Simplifies one word operand inside an arithmetic expression.
///
/// `$i` dereferences to the same value as `i` here, and double quotes
/// around a plain literal are redundant.
fn simplify_arithm_word(word: &mut Word) -> bool {
    let mut changed = false;
    for part in &mut word.parts {
        match part {
            WordPart::ParamExp(exp)
                if exp.short
                    && crate::source::valid_name(&exp.param.value)
                    && exp.index.is_none() =>
            {
                *part = WordPart::Lit(Lit {
                    value_pos: exp.dollar,
                    value_end: exp.param.value_end,
                    value: exp.param.value.clone(),
                });
                changed = true;
            }
            WordPart::DblQuoted(dbl) if !dbl.dollar && dbl.parts.len() == 1 => {
                if let WordPart::Lit(lit) = &dbl.parts[0] {
                    if !lit.value.is_empty()
                        && lit
                            .value
                            .bytes()
                            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
                    {
                        *part = WordPart::Lit(lit.clone());
                        changed = true;
                    }
                }
            }
            _ => {}
        }
    }
    changed
}

/// Simplifies a word in an ordinary (non-arithmetic) position.
fn simplify_word(word: &mut Word) -> bool {
    let mut changed = false;
    for part in &mut word.parts {
        if let WordPart::Lit(lit) = part {
            changed |= simplify_escapes(lit);
        }
    }
    changed
}

/// Drops backslashes before characters that are never special anywhere a
/// literal can appear: letters, digits, and a few punctuation characters
/// that neither globbing, quoting, nor expansion care about.
fn simplify_escapes(lit: &mut Lit) -> bool {
    if !lit.value.contains('\\') {
        return false;
    }
    let mut out = String::with_capacity(lit.value.len());
    let mut chars = lit.value.chars();
    let mut changed = false;
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next)
                    if next.is_ascii_alphanumeric()
                        || matches!(next, '_' | '+' | '.' | '/' | ':' | '@' | '^' | '-') =>
                {
                    out.push(next);
                    changed = true;
                }
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    if changed {
        lit.value = out;
    }
    changed
}

/// Replaces literal brace expressions in a word with structured
/// [`BraceExp`] parts.
///
/// Only words consisting of a single literal are rewritten; a `{a,b}` or
/// `{1..9}` inside it becomes a `BraceExp` with the surrounding literal
/// pieces kept as `Lit` parts. Returns true if the word changed.
pub fn split_braces(word: &mut Word) -> bool {
    let [WordPart::Lit(lit)] = &word.parts[..] else {
        return false;
    };
    let (parts, found) = split_brace_str(&lit.value, lit.value_pos);
    if !found {
        return false;
    }
    word.parts = parts;
    true
}

fn split_brace_str(s: &str, base: crate::source::Pos) -> (Vec<WordPart>, bool) {
    let mut parts = Vec::new();
    let mut lit_start = 0;
    let mut found = false;
    let mut i = 0;
    let bytes = s.as_bytes();
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some((brace, end)) = parse_brace(s, i, base) {
                let prefix = &s[lit_start..i];
                parts.push(WordPart::Lit(Lit {
                    value_pos: base.after(lit_start),
                    value_end: base.after(i),
                    value: prefix.to_string(),
                }));
                parts.push(WordPart::BraceExp(brace));
                lit_start = end;
                i = end;
                found = true;
                continue;
            }
        }
        i += 1;
    }
    if !found {
        return (Vec::new(), false);
    }
    // The trailing literal is kept even when empty, so that consumers see
    // where the word ends.
    parts.push(WordPart::Lit(Lit {
        value_pos: base.after(lit_start),
        value_end: base.after(s.len()),
        value: s[lit_start..].to_string(),
    }));
    // Drop an empty leading literal; the word must still start at the
    // brace.
    if let Some(WordPart::Lit(first)) = parts.first() {
        if first.value.is_empty() && parts.len() > 1 {
            parts.remove(0);
        }
    }
    (parts, true)
}

/// Tries to parse one brace expression starting at byte `start` (a `{`).
/// Returns the expression and the byte offset just past its `}`.
fn parse_brace(s: &str, start: usize, base: crate::source::Pos) -> Option<(BraceExp, usize)> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut end = None;
    for (i, b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let end = end?;
    let inner = &s[start + 1..end];

    // A sequence expression: `{x..y}` or `{x..y..incr}`.
    let seq_elems: Vec<&str> = inner.split("..").collect();
    if (seq_elems.len() == 2 || seq_elems.len() == 3) && seq_elems.iter().all(|e| !e.is_empty())
    {
        let numeric = seq_elems
            .iter()
            .all(|e| e.strip_prefix(['+', '-']).unwrap_or(e).bytes().all(|b| b.is_ascii_digit()) && !e.trim_start_matches(['+', '-']).is_empty());
        let chars = !numeric
            && seq_elems.len() == 2
            && seq_elems.iter().all(|e| e.len() == 1 && e.as_bytes()[0].is_ascii_alphabetic());
        if numeric || chars {
            let mut offset = start + 1;
            let mut elems = Vec::new();
            for elem in &seq_elems {
                elems.push(Word {
                    parts: vec![WordPart::Lit(Lit {
                        value_pos: base.after(offset),
                        value_end: base.after(offset + elem.len()),
                        value: elem.to_string(),
                    })],
                });
                offset += elem.len() + 2;
            }
            return Some((
                BraceExp {
                    lbrace: base.after(start),
                    rbrace: base.after(end),
                    sequence: true,
                    chars,
                    elems,
                },
                end + 1,
            ));
        }
    }

    // A comma expression needs at least one top-level comma.
    let mut elems = Vec::new();
    let mut elem_start = start + 1;
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().take(end).skip(start + 1) {
        match b {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            b',' if depth == 0 => {
                elems.push((elem_start, i));
                elem_start = i + 1;
            }
            _ => {}
        }
    }
    if elems.is_empty() {
        return None;
    }
    elems.push((elem_start, end));
    let mut words = Vec::new();
    for (from, to) in elems {
        let (inner_parts, inner_found) = split_brace_str(&s[from..to], base.after(from));
        if inner_found {
            words.push(Word { parts: inner_parts });
        } else {
            words.push(Word {
                parts: vec![WordPart::Lit(Lit {
                    value_pos: base.after(from),
                    value_end: base.after(to),
                    value: s[from..to].to_string(),
                })],
            });
        }
    }
    Some((
        BraceExp {
            lbrace: base.after(start),
            rbrace: base.after(end),
            sequence: false,
            chars: false,
            elems: words,
        },
        end + 1,
    ))
}
