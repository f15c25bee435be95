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

//! Typed JSON encoding of syntax trees
//!
//! Every node is encoded as an object with a `Type` field naming its
//! variant, `Pos` and `End` objects (`{Offset, Line, Col}`) where the node
//! carries positions, and its fields in source order with zero values
//! elided. Operator fields are encoded as their stable integer codes (see
//! [`crate::token`]). Decoding dispatches on `Type`; an unknown type is an
//! error.
//!
//! The encoding round-trips: re-encoding a decoded tree produces the same
//! bytes.

use crate::source::Pos;
use crate::syntax::*;
use crate::token::{
    BinAritOperator, BinCmdOperator, BinTestOperator, CaseOperator, GlobOperator, NamesOperator,
    ParExpOperator, ProcOperator, RedirOperator, UnAritOperator, UnknownOperatorCode,
    UnTestOperator,
};
use serde_json::{Map, Value, json};
use std::io::{Read, Write};
use thiserror::Error;

/// Error produced while encoding or decoding a tree
#[derive(Debug, Error)]
pub enum JsonError {
    /// A node object has a `Type` that does not name a node variant.
    #[error("unknown node type {0:?}")]
    UnknownType(String),
    /// A node object is missing a required field or has one of the wrong
    /// shape.
    #[error("malformed {0} node")]
    Malformed(&'static str),
    /// An operator code does not name an operator.
    #[error(transparent)]
    UnknownOperator(#[from] UnknownOperatorCode),
    /// The JSON itself could not be read or written.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Encodes a file to a JSON value.
#[must_use]
pub fn encode_file(file: &File) -> Value {
    enc_file(file)
}

/// Writes a file as JSON.
pub fn write_file<W: Write>(w: W, file: &File) -> Result<(), JsonError> {
    serde_json::to_writer(w, &enc_file(file))?;
    Ok(())
}

/// Decodes a file from a JSON value.
pub fn decode_file(value: &Value) -> Result<File, JsonError> {
    dec_file(value)
}

/// Reads a file from JSON.
pub fn read_file<R: Read>(r: R) -> Result<File, JsonError> {
    let value: Value = serde_json::from_reader(r)?;
    dec_file(&value)
}

// ---- encoding ----

fn obj(type_name: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("Type".to_string(), Value::String(type_name.to_string()));
    map
}

fn pos_value(pos: Pos) -> Value {
    json!({"Offset": pos.offset(), "Line": pos.line(), "Col": pos.col()})
}

fn put_pos(map: &mut Map<String, Value>, key: &str, pos: Pos) {
    if pos.is_valid() {
        map.insert(key.to_string(), pos_value(pos));
    }
}

fn put_span(map: &mut Map<String, Value>, pos: Pos, end: Pos) {
    map.insert("Pos".to_string(), pos_value(pos));
    map.insert("End".to_string(), pos_value(end));
}

fn put_bool(map: &mut Map<String, Value>, key: &str, value: bool) {
    if value {
        map.insert(key.to_string(), Value::Bool(true));
    }
}

fn put_str(map: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn put_op(map: &mut Map<String, Value>, key: &str, code: u32) {
    map.insert(key.to_string(), Value::Number(code.into()));
}

fn put_list(map: &mut Map<String, Value>, key: &str, values: Vec<Value>) {
    if !values.is_empty() {
        map.insert(key.to_string(), Value::Array(values));
    }
}

fn enc_file(file: &File) -> Value {
    let mut map = obj("File");
    put_span(&mut map, file.pos(), file.end());
    put_str(&mut map, "Name", &file.name);
    put_list(&mut map, "Stmts", file.stmts.iter().map(enc_stmt).collect());
    put_list(
        &mut map,
        "Comments",
        file.comments.iter().map(enc_comment).collect(),
    );
    Value::Object(map)
}

fn enc_comment(comment: &Comment) -> Value {
    let mut map = obj("Comment");
    put_span(&mut map, comment.pos(), comment.end());
    put_pos(&mut map, "Hash", comment.hash);
    put_str(&mut map, "Text", &comment.text);
    Value::Object(map)
}

fn enc_stmt(stmt: &Stmt) -> Value {
    let mut map = obj("Stmt");
    put_span(&mut map, stmt.pos(), stmt.end());
    put_pos(&mut map, "Position", stmt.position);
    put_bool(&mut map, "Negated", stmt.negated);
    put_bool(&mut map, "Background", stmt.background);
    put_bool(&mut map, "Coprocess", stmt.coprocess);
    if let Some(cmd) = &stmt.cmd {
        map.insert("Cmd".to_string(), enc_cmd(cmd));
    }
    put_list(
        &mut map,
        "Assigns",
        stmt.assigns.iter().map(enc_assign).collect(),
    );
    put_list(
        &mut map,
        "Redirs",
        stmt.redirs.iter().map(enc_redirect).collect(),
    );
    Value::Object(map)
}

fn enc_cmd(cmd: &Command) -> Value {
    match cmd {
        Command::Call(call) => {
            let mut map = obj("CallExpr");
            put_span(&mut map, call.pos(), call.end());
            put_list(&mut map, "Args", call.args.iter().map(enc_word).collect());
            Value::Object(map)
        }
        Command::Block(block) => {
            let mut map = obj("Block");
            put_span(&mut map, block.pos(), block.end());
            put_pos(&mut map, "Lbrace", block.lbrace);
            put_pos(&mut map, "Rbrace", block.rbrace);
            put_list(&mut map, "Stmts", block.stmts.iter().map(enc_stmt).collect());
            Value::Object(map)
        }
        Command::Subshell(subshell) => {
            let mut map = obj("Subshell");
            put_span(&mut map, subshell.pos(), subshell.end());
            put_pos(&mut map, "Lparen", subshell.lparen);
            put_pos(&mut map, "Rparen", subshell.rparen);
            put_list(
                &mut map,
                "Stmts",
                subshell.stmts.iter().map(enc_stmt).collect(),
            );
            Value::Object(map)
        }
        Command::If(clause) => {
            let mut map = obj("IfClause");
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "IfPos", clause.if_pos);
            put_pos(&mut map, "ThenPos", clause.then_pos);
            put_pos(&mut map, "FiPos", clause.fi_pos);
            put_list(&mut map, "Cond", clause.cond.iter().map(enc_stmt).collect());
            put_list(
                &mut map,
                "ThenStmts",
                clause.then_stmts.iter().map(enc_stmt).collect(),
            );
            put_list(
                &mut map,
                "Elifs",
                clause.elifs.iter().map(enc_elif).collect(),
            );
            if let Some(else_branch) = &clause.else_branch {
                let mut else_map = obj("Else");
                put_pos(&mut else_map, "ElsePos", else_branch.else_pos);
                put_list(
                    &mut else_map,
                    "Stmts",
                    else_branch.stmts.iter().map(enc_stmt).collect(),
                );
                map.insert("Else".to_string(), Value::Object(else_map));
            }
            Value::Object(map)
        }
        Command::While(clause) => {
            let mut map = obj(if clause.until { "UntilClause" } else { "WhileClause" });
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "WhilePos", clause.while_pos);
            put_pos(&mut map, "DoPos", clause.do_pos);
            put_pos(&mut map, "DonePos", clause.done_pos);
            put_list(&mut map, "Cond", clause.cond.iter().map(enc_stmt).collect());
            put_list(
                &mut map,
                "DoStmts",
                clause.do_stmts.iter().map(enc_stmt).collect(),
            );
            Value::Object(map)
        }
        Command::For(clause) => {
            let mut map = obj("ForClause");
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "ForPos", clause.for_pos);
            put_pos(&mut map, "DoPos", clause.do_pos);
            put_pos(&mut map, "DonePos", clause.done_pos);
            put_bool(&mut map, "Select", clause.select);
            map.insert(
                "Iter".to_string(),
                match &clause.iter {
                    Loop::WordIter(iter) => {
                        let mut iter_map = obj("WordIter");
                        iter_map.insert("Name".to_string(), enc_lit(&iter.name));
                        put_pos(&mut iter_map, "InPos", iter.in_pos);
                        put_list(
                            &mut iter_map,
                            "Items",
                            iter.items.iter().map(enc_word).collect(),
                        );
                        Value::Object(iter_map)
                    }
                    Loop::CStyle(cstyle) => {
                        let mut iter_map = obj("CStyleLoop");
                        put_pos(&mut iter_map, "Lparen", cstyle.lparen);
                        put_pos(&mut iter_map, "Rparen", cstyle.rparen);
                        if let Some(init) = &cstyle.init {
                            iter_map.insert("Init".to_string(), enc_arithm(init));
                        }
                        if let Some(cond) = &cstyle.cond {
                            iter_map.insert("Cond".to_string(), enc_arithm(cond));
                        }
                        if let Some(post) = &cstyle.post {
                            iter_map.insert("Post".to_string(), enc_arithm(post));
                        }
                        Value::Object(iter_map)
                    }
                },
            );
            put_list(
                &mut map,
                "DoStmts",
                clause.do_stmts.iter().map(enc_stmt).collect(),
            );
            Value::Object(map)
        }
        Command::Case(clause) => {
            let mut map = obj("CaseClause");
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "CasePos", clause.case_pos);
            put_pos(&mut map, "InPos", clause.in_pos);
            put_pos(&mut map, "EsacPos", clause.esac_pos);
            map.insert("Word".to_string(), enc_word(&clause.word));
            put_list(
                &mut map,
                "Items",
                clause.items.iter().map(enc_case_item).collect(),
            );
            Value::Object(map)
        }
        Command::FuncDecl(decl) => {
            let mut map = obj("FuncDecl");
            put_span(&mut map, decl.pos(), decl.end());
            put_pos(&mut map, "Position", decl.position);
            put_bool(&mut map, "RsrvWord", decl.rsrv_word);
            put_bool(&mut map, "Parens", decl.parens);
            map.insert("Name".to_string(), enc_lit(&decl.name));
            map.insert("Body".to_string(), enc_stmt(&decl.body));
            Value::Object(map)
        }
        Command::ArithmCmd(cmd) => {
            let mut map = obj("ArithmCmd");
            put_span(&mut map, cmd.pos(), cmd.end());
            put_pos(&mut map, "Left", cmd.left);
            put_pos(&mut map, "Right", cmd.right);
            map.insert("X".to_string(), enc_arithm(&cmd.x));
            Value::Object(map)
        }
        Command::Test(clause) => {
            let mut map = obj("TestClause");
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "Left", clause.left);
            put_pos(&mut map, "Right", clause.right);
            map.insert("X".to_string(), enc_test(&clause.x));
            Value::Object(map)
        }
        Command::Decl(decl) => {
            let mut map = obj("DeclClause");
            put_span(&mut map, decl.pos(), decl.end());
            map.insert("Variant".to_string(), enc_lit(&decl.variant));
            put_list(&mut map, "Args", decl.args.iter().map(enc_assign).collect());
            Value::Object(map)
        }
        Command::Let(clause) => {
            let mut map = obj("LetClause");
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "LetPos", clause.let_pos);
            put_list(
                &mut map,
                "Exprs",
                clause.exprs.iter().map(enc_arithm).collect(),
            );
            Value::Object(map)
        }
        Command::Time(clause) => {
            let mut map = obj("TimeClause");
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "TimePos", clause.time_pos);
            put_bool(&mut map, "PosixFormat", clause.posix_format);
            if let Some(stmt) = &clause.stmt {
                map.insert("Stmt".to_string(), enc_stmt(stmt));
            }
            Value::Object(map)
        }
        Command::Coproc(clause) => {
            let mut map = obj("CoprocClause");
            put_span(&mut map, clause.pos(), clause.end());
            put_pos(&mut map, "CoprocPos", clause.coproc_pos);
            if let Some(name) = &clause.name {
                map.insert("Name".to_string(), enc_word(name));
            }
            map.insert("Stmt".to_string(), enc_stmt(&clause.stmt));
            Value::Object(map)
        }
        Command::Binary(binary) => {
            let mut map = obj("BinaryCmd");
            put_span(&mut map, binary.pos(), binary.end());
            put_pos(&mut map, "OpPos", binary.op_pos);
            put_op(&mut map, "Op", binary.op.code());
            map.insert("X".to_string(), enc_stmt(&binary.x));
            map.insert("Y".to_string(), enc_stmt(&binary.y));
            Value::Object(map)
        }
        Command::TestDecl(decl) => {
            let mut map = obj("TestDecl");
            put_span(&mut map, decl.pos(), decl.end());
            put_pos(&mut map, "Position", decl.position);
            map.insert("Description".to_string(), enc_word(&decl.description));
            map.insert("Body".to_string(), enc_stmt(&decl.body));
            Value::Object(map)
        }
    }
}

fn enc_elif(elif: &Elif) -> Value {
    let mut map = obj("Elif");
    put_pos(&mut map, "ElifPos", elif.elif_pos);
    put_pos(&mut map, "ThenPos", elif.then_pos);
    put_list(&mut map, "Cond", elif.cond.iter().map(enc_stmt).collect());
    put_list(
        &mut map,
        "ThenStmts",
        elif.then_stmts.iter().map(enc_stmt).collect(),
    );
    Value::Object(map)
}

fn enc_case_item(item: &CaseItem) -> Value {
    let mut map = obj("CaseItem");
    put_op(&mut map, "Op", item.op.code());
    put_pos(&mut map, "OpPos", item.op_pos);
    put_list(
        &mut map,
        "Patterns",
        item.patterns.iter().map(enc_word).collect(),
    );
    put_list(&mut map, "Stmts", item.stmts.iter().map(enc_stmt).collect());
    Value::Object(map)
}

fn enc_assign(assign: &Assign) -> Value {
    let mut map = obj("Assign");
    put_span(&mut map, assign.pos(), assign.end());
    put_bool(&mut map, "Append", assign.append);
    put_bool(&mut map, "Naked", assign.naked);
    if let Some(name) = &assign.name {
        map.insert("Name".to_string(), enc_lit(name));
    }
    if let Some(index) = &assign.index {
        map.insert("Index".to_string(), enc_arithm(index));
    }
    if let Some(value) = &assign.value {
        map.insert("Value".to_string(), enc_word(value));
    }
    if let Some(array) = &assign.array {
        let mut array_map = obj("ArrayExpr");
        put_pos(&mut array_map, "Lparen", array.lparen);
        put_pos(&mut array_map, "Rparen", array.rparen);
        put_list(
            &mut array_map,
            "Elems",
            array
                .elems
                .iter()
                .map(|elem| {
                    let mut elem_map = obj("ArrayElem");
                    if let Some(index) = &elem.index {
                        elem_map.insert("Index".to_string(), enc_arithm(index));
                    }
                    elem_map.insert("Value".to_string(), enc_word(&elem.value));
                    Value::Object(elem_map)
                })
                .collect(),
        );
        map.insert("Array".to_string(), Value::Object(array_map));
    }
    Value::Object(map)
}

fn enc_redirect(redir: &Redirect) -> Value {
    let mut map = obj("Redirect");
    put_span(&mut map, redir.pos(), redir.end());
    put_pos(&mut map, "OpPos", redir.op_pos);
    put_op(&mut map, "Op", redir.op.code());
    if let Some(n) = &redir.n {
        map.insert("N".to_string(), enc_lit(n));
    }
    map.insert("Word".to_string(), enc_word(&redir.word));
    if let Some(hdoc) = &redir.hdoc {
        map.insert("Hdoc".to_string(), enc_word(hdoc));
    }
    Value::Object(map)
}

fn enc_word(word: &Word) -> Value {
    let mut map = obj("Word");
    put_span(&mut map, word.pos(), word.end());
    put_list(&mut map, "Parts", word.parts.iter().map(enc_part).collect());
    Value::Object(map)
}

fn enc_lit(lit: &Lit) -> Value {
    let mut map = obj("Lit");
    put_span(&mut map, lit.pos(), lit.end());
    put_pos(&mut map, "ValuePos", lit.value_pos);
    put_pos(&mut map, "ValueEnd", lit.value_end);
    put_str(&mut map, "Value", &lit.value);
    Value::Object(map)
}

fn enc_part(part: &WordPart) -> Value {
    match part {
        WordPart::Lit(lit) => enc_lit(lit),
        WordPart::SglQuoted(sgl) => {
            let mut map = obj("SglQuoted");
            put_span(&mut map, sgl.pos(), sgl.end());
            put_pos(&mut map, "Left", sgl.left);
            put_pos(&mut map, "Right", sgl.right);
            put_bool(&mut map, "Dollar", sgl.dollar);
            put_str(&mut map, "Value", &sgl.value);
            Value::Object(map)
        }
        WordPart::DblQuoted(dbl) => {
            let mut map = obj("DblQuoted");
            put_span(&mut map, dbl.pos(), dbl.end());
            put_pos(&mut map, "Left", dbl.left);
            put_pos(&mut map, "Right", dbl.right);
            put_bool(&mut map, "Dollar", dbl.dollar);
            put_list(&mut map, "Parts", dbl.parts.iter().map(enc_part).collect());
            Value::Object(map)
        }
        WordPart::ParamExp(exp) => {
            let mut map = obj("ParamExp");
            put_span(&mut map, exp.pos(), exp.end());
            put_pos(&mut map, "Dollar", exp.dollar);
            put_pos(&mut map, "Rbrace", exp.rbrace);
            put_bool(&mut map, "Short", exp.short);
            put_bool(&mut map, "Excl", exp.excl);
            put_bool(&mut map, "Length", exp.length);
            put_bool(&mut map, "Width", exp.width);
            map.insert("Param".to_string(), enc_lit(&exp.param));
            if let Some(index) = &exp.index {
                map.insert("Index".to_string(), enc_arithm(index));
            }
            if let Some(slice) = &exp.slice {
                let mut slice_map = obj("Slice");
                if let Some(offset) = &slice.offset {
                    slice_map.insert("Offset".to_string(), enc_arithm(offset));
                }
                if let Some(length) = &slice.length {
                    slice_map.insert("Length".to_string(), enc_arithm(length));
                }
                map.insert("Slice".to_string(), Value::Object(slice_map));
            }
            if let Some(repl) = &exp.repl {
                let mut repl_map = obj("Replace");
                put_bool(&mut repl_map, "All", repl.all);
                repl_map.insert("Orig".to_string(), enc_word(&repl.orig));
                repl_map.insert("With".to_string(), enc_word(&repl.with));
                map.insert("Repl".to_string(), Value::Object(repl_map));
            }
            if let Some(names) = &exp.names {
                put_op(&mut map, "Names", names.code());
            }
            if let Some(expansion) = &exp.exp {
                let mut exp_map = obj("Expansion");
                put_op(&mut exp_map, "Op", expansion.op.code());
                exp_map.insert("Word".to_string(), enc_word(&expansion.word));
                map.insert("Exp".to_string(), Value::Object(exp_map));
            }
            Value::Object(map)
        }
        WordPart::CmdSubst(subst) => {
            let mut map = obj("CmdSubst");
            put_span(&mut map, subst.pos(), subst.end());
            put_pos(&mut map, "Left", subst.left);
            put_pos(&mut map, "Right", subst.right);
            put_list(&mut map, "Stmts", subst.stmts.iter().map(enc_stmt).collect());
            put_bool(&mut map, "Backquotes", subst.backquotes);
            put_bool(&mut map, "TempFile", subst.temp_file);
            put_bool(&mut map, "ReplIn", subst.repl_in);
            Value::Object(map)
        }
        WordPart::ArithmExp(exp) => {
            let mut map = obj("ArithmExp");
            put_span(&mut map, exp.pos(), exp.end());
            put_pos(&mut map, "Left", exp.left);
            put_pos(&mut map, "Right", exp.right);
            put_bool(&mut map, "Bracket", exp.bracket);
            map.insert("X".to_string(), enc_arithm(&exp.x));
            Value::Object(map)
        }
        WordPart::ProcSubst(subst) => {
            let mut map = obj("ProcSubst");
            put_span(&mut map, subst.pos(), subst.end());
            put_pos(&mut map, "OpPos", subst.op_pos);
            put_pos(&mut map, "Rparen", subst.rparen);
            put_op(&mut map, "Op", subst.op.code());
            put_list(&mut map, "Stmts", subst.stmts.iter().map(enc_stmt).collect());
            Value::Object(map)
        }
        WordPart::ExtGlob(glob) => {
            let mut map = obj("ExtGlob");
            put_span(&mut map, glob.pos(), glob.end());
            put_pos(&mut map, "OpPos", glob.op_pos);
            put_op(&mut map, "Op", glob.op.code());
            map.insert("Pattern".to_string(), enc_lit(&glob.pattern));
            Value::Object(map)
        }
        WordPart::BraceExp(brace) => {
            let mut map = obj("BraceExp");
            put_span(&mut map, brace.pos(), brace.end());
            put_pos(&mut map, "Lbrace", brace.lbrace);
            put_pos(&mut map, "Rbrace", brace.rbrace);
            put_bool(&mut map, "Sequence", brace.sequence);
            put_bool(&mut map, "Chars", brace.chars);
            put_list(&mut map, "Elems", brace.elems.iter().map(enc_word).collect());
            Value::Object(map)
        }
    }
}

fn enc_arithm(expr: &ArithmExpr) -> Value {
    match expr {
        ArithmExpr::Binary(binary) => {
            let mut map = obj("BinaryArithm");
            put_span(&mut map, binary.pos(), binary.end());
            put_pos(&mut map, "OpPos", binary.op_pos);
            put_op(&mut map, "Op", binary.op.code());
            map.insert("X".to_string(), enc_arithm(&binary.x));
            map.insert("Y".to_string(), enc_arithm(&binary.y));
            Value::Object(map)
        }
        ArithmExpr::Unary(unary) => {
            let mut map = obj("UnaryArithm");
            put_span(&mut map, unary.pos(), unary.end());
            put_pos(&mut map, "OpPos", unary.op_pos);
            put_op(&mut map, "Op", unary.op.code());
            put_bool(&mut map, "Post", unary.post);
            map.insert("X".to_string(), enc_arithm(&unary.x));
            Value::Object(map)
        }
        ArithmExpr::Paren(paren) => {
            let mut map = obj("ParenArithm");
            put_span(&mut map, paren.pos(), paren.end());
            put_pos(&mut map, "Lparen", paren.lparen);
            put_pos(&mut map, "Rparen", paren.rparen);
            map.insert("X".to_string(), enc_arithm(&paren.x));
            Value::Object(map)
        }
        ArithmExpr::Word(word) => enc_word(word),
    }
}

fn enc_test(expr: &TestExpr) -> Value {
    match expr {
        TestExpr::Binary(binary) => {
            let mut map = obj("BinaryTest");
            put_span(&mut map, binary.pos(), binary.end());
            put_pos(&mut map, "OpPos", binary.op_pos);
            put_op(&mut map, "Op", binary.op.code());
            map.insert("X".to_string(), enc_test(&binary.x));
            map.insert("Y".to_string(), enc_test(&binary.y));
            Value::Object(map)
        }
        TestExpr::Unary(unary) => {
            let mut map = obj("UnaryTest");
            put_span(&mut map, unary.pos(), unary.end());
            put_pos(&mut map, "OpPos", unary.op_pos);
            put_op(&mut map, "Op", unary.op.code());
            map.insert("X".to_string(), enc_test(&unary.x));
            Value::Object(map)
        }
        TestExpr::Paren(paren) => {
            let mut map = obj("ParenTest");
            put_span(&mut map, paren.pos(), paren.end());
            put_pos(&mut map, "Lparen", paren.lparen);
            put_pos(&mut map, "Rparen", paren.rparen);
            map.insert("X".to_string(), enc_test(&paren.x));
            Value::Object(map)
        }
        TestExpr::Word(word) => enc_word(word),
    }
}

// ---- decoding ----

fn type_of<'v>(value: &'v Value, context: &'static str) -> Result<&'v str, JsonError> {
    value
        .get("Type")
        .and_then(Value::as_str)
        .ok_or(JsonError::Malformed(context))
}

fn expect_type(value: &Value, name: &'static str) -> Result<(), JsonError> {
    let found = type_of(value, name)?;
    if found == name {
        Ok(())
    } else {
        Err(JsonError::UnknownType(found.to_string()))
    }
}

fn dec_pos(value: Option<&Value>) -> Pos {
    let Some(value) = value else {
        return Pos::default();
    };
    let offset = value.get("Offset").and_then(Value::as_u64).unwrap_or(0);
    let line = value.get("Line").and_then(Value::as_u64).unwrap_or(0);
    let col = value.get("Col").and_then(Value::as_u64).unwrap_or(0);
    Pos::new(offset as usize, line, col)
}

fn dec_bool(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn dec_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn dec_op(value: &Value, key: &str, context: &'static str) -> Result<u32, JsonError> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .map(|code| code as u32)
        .ok_or(JsonError::Malformed(context))
}

fn dec_list<T>(
    value: &Value,
    key: &str,
    dec: impl Fn(&Value) -> Result<T, JsonError>,
) -> Result<Vec<T>, JsonError> {
    match value.get(key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(dec).collect(),
        Some(_) => Err(JsonError::Malformed("list")),
    }
}

fn dec_file(value: &Value) -> Result<File, JsonError> {
    expect_type(value, "File")?;
    Ok(File {
        name: dec_str(value, "Name"),
        stmts: dec_list(value, "Stmts", dec_stmt)?,
        comments: dec_list(value, "Comments", dec_comment)?,
    })
}

fn dec_comment(value: &Value) -> Result<Comment, JsonError> {
    expect_type(value, "Comment")?;
    Ok(Comment {
        hash: dec_pos(value.get("Hash")),
        text: dec_str(value, "Text"),
    })
}

fn dec_stmt(value: &Value) -> Result<Stmt, JsonError> {
    expect_type(value, "Stmt")?;
    Ok(Stmt {
        position: dec_pos(value.get("Position")),
        negated: dec_bool(value, "Negated"),
        background: dec_bool(value, "Background"),
        coprocess: dec_bool(value, "Coprocess"),
        cmd: value.get("Cmd").map(dec_cmd).transpose()?,
        assigns: dec_list(value, "Assigns", dec_assign)?,
        redirs: dec_list(value, "Redirs", dec_redirect)?,
    })
}

fn dec_cmd(value: &Value) -> Result<Command, JsonError> {
    let type_name = type_of(value, "command")?;
    Ok(match type_name {
        "CallExpr" => Command::Call(CallExpr {
            args: dec_list(value, "Args", dec_word)?,
        }),
        "Block" => Command::Block(Block {
            lbrace: dec_pos(value.get("Lbrace")),
            rbrace: dec_pos(value.get("Rbrace")),
            stmts: dec_list(value, "Stmts", dec_stmt)?,
        }),
        "Subshell" => Command::Subshell(Subshell {
            lparen: dec_pos(value.get("Lparen")),
            rparen: dec_pos(value.get("Rparen")),
            stmts: dec_list(value, "Stmts", dec_stmt)?,
        }),
        "IfClause" => Command::If(IfClause {
            if_pos: dec_pos(value.get("IfPos")),
            then_pos: dec_pos(value.get("ThenPos")),
            fi_pos: dec_pos(value.get("FiPos")),
            cond: dec_list(value, "Cond", dec_stmt)?,
            then_stmts: dec_list(value, "ThenStmts", dec_stmt)?,
            elifs: dec_list(value, "Elifs", dec_elif)?,
            else_branch: value
                .get("Else")
                .map(|else_value| {
                    expect_type(else_value, "Else")?;
                    Ok::<_, JsonError>(Else {
                        else_pos: dec_pos(else_value.get("ElsePos")),
                        stmts: dec_list(else_value, "Stmts", dec_stmt)?,
                    })
                })
                .transpose()?,
        }),
        "WhileClause" | "UntilClause" => Command::While(WhileClause {
            while_pos: dec_pos(value.get("WhilePos")),
            do_pos: dec_pos(value.get("DoPos")),
            done_pos: dec_pos(value.get("DonePos")),
            until: type_name == "UntilClause",
            cond: dec_list(value, "Cond", dec_stmt)?,
            do_stmts: dec_list(value, "DoStmts", dec_stmt)?,
        }),
        "ForClause" => Command::For(ForClause {
            for_pos: dec_pos(value.get("ForPos")),
            do_pos: dec_pos(value.get("DoPos")),
            done_pos: dec_pos(value.get("DonePos")),
            select: dec_bool(value, "Select"),
            iter: dec_loop(value.get("Iter").ok_or(JsonError::Malformed("ForClause"))?)?,
            do_stmts: dec_list(value, "DoStmts", dec_stmt)?,
        }),
        "CaseClause" => Command::Case(CaseClause {
            case_pos: dec_pos(value.get("CasePos")),
            in_pos: dec_pos(value.get("InPos")),
            esac_pos: dec_pos(value.get("EsacPos")),
            word: dec_word(value.get("Word").ok_or(JsonError::Malformed("CaseClause"))?)?,
            items: dec_list(value, "Items", dec_case_item)?,
        }),
        "FuncDecl" => Command::FuncDecl(FuncDecl {
            position: dec_pos(value.get("Position")),
            rsrv_word: dec_bool(value, "RsrvWord"),
            parens: dec_bool(value, "Parens"),
            name: dec_lit(value.get("Name").ok_or(JsonError::Malformed("FuncDecl"))?)?,
            body: Box::new(dec_stmt(
                value.get("Body").ok_or(JsonError::Malformed("FuncDecl"))?,
            )?),
        }),
        "ArithmCmd" => Command::ArithmCmd(ArithmCmd {
            left: dec_pos(value.get("Left")),
            right: dec_pos(value.get("Right")),
            x: dec_arithm(value.get("X").ok_or(JsonError::Malformed("ArithmCmd"))?)?,
        }),
        "TestClause" => Command::Test(TestClause {
            left: dec_pos(value.get("Left")),
            right: dec_pos(value.get("Right")),
            x: dec_test(value.get("X").ok_or(JsonError::Malformed("TestClause"))?)?,
        }),
        "DeclClause" => Command::Decl(DeclClause {
            variant: dec_lit(
                value
                    .get("Variant")
                    .ok_or(JsonError::Malformed("DeclClause"))?,
            )?,
            args: dec_list(value, "Args", dec_assign)?,
        }),
        "LetClause" => Command::Let(LetClause {
            let_pos: dec_pos(value.get("LetPos")),
            exprs: dec_list(value, "Exprs", dec_arithm)?,
        }),
        "TimeClause" => Command::Time(TimeClause {
            time_pos: dec_pos(value.get("TimePos")),
            posix_format: dec_bool(value, "PosixFormat"),
            stmt: value
                .get("Stmt")
                .map(|stmt| dec_stmt(stmt).map(Box::new))
                .transpose()?,
        }),
        "CoprocClause" => Command::Coproc(CoprocClause {
            coproc_pos: dec_pos(value.get("CoprocPos")),
            name: value.get("Name").map(dec_word).transpose()?,
            stmt: Box::new(dec_stmt(
                value
                    .get("Stmt")
                    .ok_or(JsonError::Malformed("CoprocClause"))?,
            )?),
        }),
        "BinaryCmd" => Command::Binary(Box::new(BinaryCmd {
            op_pos: dec_pos(value.get("OpPos")),
            op: BinCmdOperator::from_code(dec_op(value, "Op", "BinaryCmd")?)?,
            x: dec_stmt(value.get("X").ok_or(JsonError::Malformed("BinaryCmd"))?)?,
            y: dec_stmt(value.get("Y").ok_or(JsonError::Malformed("BinaryCmd"))?)?,
        })),
        "TestDecl" => Command::TestDecl(TestDecl {
            position: dec_pos(value.get("Position")),
            description: dec_word(
                value
                    .get("Description")
                    .ok_or(JsonError::Malformed("TestDecl"))?,
            )?,
            body: Box::new(dec_stmt(
                value.get("Body").ok_or(JsonError::Malformed("TestDecl"))?,
            )?),
        }),
        other => return Err(JsonError::UnknownType(other.to_string())),
    })
}

fn dec_elif(value: &Value) -> Result<Elif, JsonError> {
    expect_type(value, "Elif")?;
    Ok(Elif {
        elif_pos: dec_pos(value.get("ElifPos")),
        then_pos: dec_pos(value.get("ThenPos")),
        cond: dec_list(value, "Cond", dec_stmt)?,
        then_stmts: dec_list(value, "ThenStmts", dec_stmt)?,
    })
}

fn dec_loop(value: &Value) -> Result<Loop, JsonError> {
    Ok(match type_of(value, "loop")? {
        "WordIter" => Loop::WordIter(WordIter {
            name: dec_lit(value.get("Name").ok_or(JsonError::Malformed("WordIter"))?)?,
            in_pos: dec_pos(value.get("InPos")),
            items: dec_list(value, "Items", dec_word)?,
        }),
        "CStyleLoop" => Loop::CStyle(CStyleLoop {
            lparen: dec_pos(value.get("Lparen")),
            rparen: dec_pos(value.get("Rparen")),
            init: value.get("Init").map(dec_arithm).transpose()?,
            cond: value.get("Cond").map(dec_arithm).transpose()?,
            post: value.get("Post").map(dec_arithm).transpose()?,
        }),
        other => return Err(JsonError::UnknownType(other.to_string())),
    })
}

fn dec_case_item(value: &Value) -> Result<CaseItem, JsonError> {
    expect_type(value, "CaseItem")?;
    Ok(CaseItem {
        op: CaseOperator::from_code(dec_op(value, "Op", "CaseItem")?)?,
        op_pos: dec_pos(value.get("OpPos")),
        patterns: dec_list(value, "Patterns", dec_word)?,
        stmts: dec_list(value, "Stmts", dec_stmt)?,
    })
}

fn dec_assign(value: &Value) -> Result<Assign, JsonError> {
    expect_type(value, "Assign")?;
    Ok(Assign {
        append: dec_bool(value, "Append"),
        naked: dec_bool(value, "Naked"),
        name: value.get("Name").map(dec_lit).transpose()?,
        index: value.get("Index").map(dec_arithm).transpose()?,
        value: value.get("Value").map(dec_word).transpose()?,
        array: value
            .get("Array")
            .map(|array| {
                expect_type(array, "ArrayExpr")?;
                Ok::<_, JsonError>(ArrayExpr {
                    lparen: dec_pos(array.get("Lparen")),
                    rparen: dec_pos(array.get("Rparen")),
                    elems: dec_list(array, "Elems", |elem| {
                        expect_type(elem, "ArrayElem")?;
                        Ok(ArrayElem {
                            index: elem.get("Index").map(dec_arithm).transpose()?,
                            value: dec_word(
                                elem.get("Value").ok_or(JsonError::Malformed("ArrayElem"))?,
                            )?,
                        })
                    })?,
                })
            })
            .transpose()?,
    })
}

fn dec_redirect(value: &Value) -> Result<Redirect, JsonError> {
    expect_type(value, "Redirect")?;
    Ok(Redirect {
        op_pos: dec_pos(value.get("OpPos")),
        op: RedirOperator::from_code(dec_op(value, "Op", "Redirect")?)?,
        n: value.get("N").map(dec_lit).transpose()?,
        word: dec_word(value.get("Word").ok_or(JsonError::Malformed("Redirect"))?)?,
        hdoc: value.get("Hdoc").map(dec_word).transpose()?,
    })
}

fn dec_word(value: &Value) -> Result<Word, JsonError> {
    expect_type(value, "Word")?;
    Ok(Word {
        parts: dec_list(value, "Parts", dec_part)?,
    })
}

fn dec_lit(value: &Value) -> Result<Lit, JsonError> {
    expect_type(value, "Lit")?;
    Ok(Lit {
        value_pos: dec_pos(value.get("ValuePos")),
        value_end: dec_pos(value.get("ValueEnd")),
        value: dec_str(value, "Value"),
    })
}

fn dec_part(value: &Value) -> Result<WordPart, JsonError> {
    Ok(match type_of(value, "word part")? {
        "Lit" => WordPart::Lit(dec_lit(value)?),
        "SglQuoted" => WordPart::SglQuoted(SglQuoted {
            left: dec_pos(value.get("Left")),
            right: dec_pos(value.get("Right")),
            dollar: dec_bool(value, "Dollar"),
            value: dec_str(value, "Value"),
        }),
        "DblQuoted" => WordPart::DblQuoted(DblQuoted {
            left: dec_pos(value.get("Left")),
            right: dec_pos(value.get("Right")),
            dollar: dec_bool(value, "Dollar"),
            parts: dec_list(value, "Parts", dec_part)?,
        }),
        "ParamExp" => WordPart::ParamExp(Box::new(ParamExp {
            dollar: dec_pos(value.get("Dollar")),
            rbrace: dec_pos(value.get("Rbrace")),
            short: dec_bool(value, "Short"),
            excl: dec_bool(value, "Excl"),
            length: dec_bool(value, "Length"),
            width: dec_bool(value, "Width"),
            param: dec_lit(value.get("Param").ok_or(JsonError::Malformed("ParamExp"))?)?,
            index: value.get("Index").map(dec_arithm).transpose()?,
            slice: value
                .get("Slice")
                .map(|slice| {
                    expect_type(slice, "Slice")?;
                    Ok::<_, JsonError>(Slice {
                        offset: slice.get("Offset").map(dec_arithm).transpose()?,
                        length: slice.get("Length").map(dec_arithm).transpose()?,
                    })
                })
                .transpose()?,
            repl: value
                .get("Repl")
                .map(|repl| {
                    expect_type(repl, "Replace")?;
                    Ok::<_, JsonError>(Replace {
                        all: dec_bool(repl, "All"),
                        orig: dec_word(repl.get("Orig").ok_or(JsonError::Malformed("Replace"))?)?,
                        with: dec_word(repl.get("With").ok_or(JsonError::Malformed("Replace"))?)?,
                    })
                })
                .transpose()?,
            names: value
                .get("Names")
                .and_then(Value::as_u64)
                .map(|code| NamesOperator::from_code(code as u32))
                .transpose()?,
            exp: value
                .get("Exp")
                .map(|exp| {
                    expect_type(exp, "Expansion")?;
                    Ok::<_, JsonError>(Expansion {
                        op: ParExpOperator::from_code(dec_op(exp, "Op", "Expansion")?)?,
                        word: dec_word(exp.get("Word").ok_or(JsonError::Malformed("Expansion"))?)?,
                    })
                })
                .transpose()?,
        })),
        "CmdSubst" => WordPart::CmdSubst(CmdSubst {
            left: dec_pos(value.get("Left")),
            right: dec_pos(value.get("Right")),
            stmts: dec_list(value, "Stmts", dec_stmt)?,
            backquotes: dec_bool(value, "Backquotes"),
            temp_file: dec_bool(value, "TempFile"),
            repl_in: dec_bool(value, "ReplIn"),
        }),
        "ArithmExp" => WordPart::ArithmExp(ArithmExp {
            left: dec_pos(value.get("Left")),
            right: dec_pos(value.get("Right")),
            bracket: dec_bool(value, "Bracket"),
            x: dec_arithm(value.get("X").ok_or(JsonError::Malformed("ArithmExp"))?)?,
        }),
        "ProcSubst" => WordPart::ProcSubst(ProcSubst {
            op_pos: dec_pos(value.get("OpPos")),
            rparen: dec_pos(value.get("Rparen")),
            op: ProcOperator::from_code(dec_op(value, "Op", "ProcSubst")?)?,
            stmts: dec_list(value, "Stmts", dec_stmt)?,
        }),
        "ExtGlob" => WordPart::ExtGlob(ExtGlob {
            op_pos: dec_pos(value.get("OpPos")),
            op: GlobOperator::from_code(dec_op(value, "Op", "ExtGlob")?)?,
            pattern: dec_lit(value.get("Pattern").ok_or(JsonError::Malformed("ExtGlob"))?)?,
        }),
        "BraceExp" => WordPart::BraceExp(BraceExp {
            lbrace: dec_pos(value.get("Lbrace")),
            rbrace: dec_pos(value.get("Rbrace")),
            sequence: dec_bool(value, "Sequence"),
            chars: dec_bool(value, "Chars"),
            elems: dec_list(value, "Elems", dec_word)?,
        }),
        other => return Err(JsonError::UnknownType(other.to_string())),
    })
}

fn dec_arithm(value: &Value) -> Result<ArithmExpr, JsonError> {
    Ok(match type_of(value, "arithmetic expression")? {
        "BinaryArithm" => ArithmExpr::Binary(Box::new(BinaryArithm {
            op_pos: dec_pos(value.get("OpPos")),
            op: BinAritOperator::from_code(dec_op(value, "Op", "BinaryArithm")?)?,
            x: dec_arithm(value.get("X").ok_or(JsonError::Malformed("BinaryArithm"))?)?,
            y: dec_arithm(value.get("Y").ok_or(JsonError::Malformed("BinaryArithm"))?)?,
        })),
        "UnaryArithm" => ArithmExpr::Unary(Box::new(UnaryArithm {
            op_pos: dec_pos(value.get("OpPos")),
            op: UnAritOperator::from_code(dec_op(value, "Op", "UnaryArithm")?)?,
            post: dec_bool(value, "Post"),
            x: dec_arithm(value.get("X").ok_or(JsonError::Malformed("UnaryArithm"))?)?,
        })),
        "ParenArithm" => ArithmExpr::Paren(Box::new(ParenArithm {
            lparen: dec_pos(value.get("Lparen")),
            rparen: dec_pos(value.get("Rparen")),
            x: dec_arithm(value.get("X").ok_or(JsonError::Malformed("ParenArithm"))?)?,
        })),
        "Word" => ArithmExpr::Word(dec_word(value)?),
        other => return Err(JsonError::UnknownType(other.to_string())),
    })
}

fn dec_test(value: &Value) -> Result<TestExpr, JsonError> {
    Ok(match type_of(value, "test expression")? {
        "BinaryTest" => TestExpr::Binary(Box::new(BinaryTest {
            op_pos: dec_pos(value.get("OpPos")),
            op: BinTestOperator::from_code(dec_op(value, "Op", "BinaryTest")?)?,
            x: dec_test(value.get("X").ok_or(JsonError::Malformed("BinaryTest"))?)?,
            y: dec_test(value.get("Y").ok_or(JsonError::Malformed("BinaryTest"))?)?,
        })),
        "UnaryTest" => TestExpr::Unary(Box::new(UnaryTest {
            op_pos: dec_pos(value.get("OpPos")),
            op: UnTestOperator::from_code(dec_op(value, "Op", "UnaryTest")?)?,
            x: dec_test(value.get("X").ok_or(JsonError::Malformed("UnaryTest"))?)?,
        })),
        "ParenTest" => TestExpr::Paren(Box::new(ParenTest {
            lparen: dec_pos(value.get("Lparen")),
            rparen: dec_pos(value.get("Rparen")),
            x: dec_test(value.get("X").ok_or(JsonError::Malformed("ParenTest"))?)?,
        })),
        "Word" => TestExpr::Word(dec_word(value)?),
        other => return Err(JsonError::UnknownType(other.to_string())),
    })
}
