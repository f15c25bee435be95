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

use super::*;
use crate::syntax::*;
use crate::token::{BinCmdOperator, BinTestOperator, CaseOperator, ParExpOperator, RedirOperator};
use assert_matches::assert_matches;

fn parse(src: &str) -> File {
    Parser::new().parse(src.as_bytes(), "test.sh").unwrap()
}

fn parse_lang(src: &str, lang: LangVariant) -> Result<File> {
    Parser::new().lang(lang).parse(src.as_bytes(), "test.sh")
}

fn call_args(stmt: &Stmt) -> Vec<String> {
    let Some(Command::Call(call)) = &stmt.cmd else {
        panic!("expected a call expression, got {:?}", stmt.cmd);
    };
    call.args
        .iter()
        .map(|word| word.lit().unwrap_or("<non-literal>").to_string())
        .collect()
}

#[test]
fn empty_input() {
    let file = parse("");
    assert!(file.stmts.is_empty());
    let file = parse("\n\n  \n");
    assert!(file.stmts.is_empty());
}

#[test]
fn shebang_only() {
    let file = parse("#!/bin/sh\n");
    assert!(file.stmts.is_empty());
}

#[test]
fn simple_command() {
    let file = parse("echo hi there\n");
    assert_eq!(file.stmts.len(), 1);
    assert_eq!(call_args(&file.stmts[0]), ["echo", "hi", "there"]);
}

#[test]
fn trailing_whitespace_and_crlf() {
    let file = parse("echo hi   \n");
    assert_eq!(call_args(&file.stmts[0]), ["echo", "hi"]);
    let file = parse("echo hi\r\necho ho\r\n");
    assert_eq!(file.stmts.len(), 2);
    assert_eq!(call_args(&file.stmts[1]), ["echo", "ho"]);
}

#[test]
fn statement_positions() {
    let file = parse("echo hi\n  echo ho\n");
    let first = &file.stmts[0];
    assert_eq!(first.pos().offset(), 0);
    assert_eq!(first.pos().line(), 1);
    assert_eq!(first.pos().col(), 1);
    assert_eq!(first.end().offset(), 7);
    let second = &file.stmts[1];
    assert_eq!(second.pos().line(), 2);
    assert_eq!(second.pos().col(), 3);
    assert!(second.pos() <= second.end());
}

#[test]
fn escaped_newline_joins_words() {
    let file = parse("fo\\\no bar\n");
    assert_eq!(call_args(&file.stmts[0]), ["foo", "bar"]);
    // The literal spans both lines.
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_eq!(call.args[0].pos().line(), 1);
    assert_eq!(call.args[0].end().line(), 2);
}

#[test]
fn escaped_crlf_joins_words() {
    let file = parse("fo\\\r\no\n");
    assert_eq!(call_args(&file.stmts[0]), ["foo"]);
}

#[test]
fn null_bytes_are_skipped() {
    let file = parse("ec\0ho hi\0\n");
    assert_eq!(call_args(&file.stmts[0]), ["echo", "hi"]);
}

#[test]
fn semicolon_and_background_separators() {
    let file = parse("a; b & c\n");
    assert_eq!(file.stmts.len(), 3);
    assert!(!file.stmts[0].background);
    assert!(file.stmts[1].background);
    assert!(!file.stmts[2].background);
}

#[test]
fn negated_statement() {
    let file = parse("! grep -q foo bar\n");
    assert!(file.stmts[0].negated);
    assert_eq!(file.stmts[0].pos().offset(), 0);
}

#[test]
fn and_or_is_left_associative() {
    let file = parse("a && b || c\n");
    let Some(Command::Binary(or)) = &file.stmts[0].cmd else {
        panic!("expected a binary command");
    };
    assert_eq!(or.op, BinCmdOperator::OrStmt);
    assert_eq!(call_args(&or.y), ["c"]);
    let Some(Command::Binary(and)) = &or.x.cmd else {
        panic!("expected a nested binary command");
    };
    assert_eq!(and.op, BinCmdOperator::AndStmt);
    assert_eq!(call_args(&and.x), ["a"]);
    assert_eq!(call_args(&and.y), ["b"]);
}

#[test]
fn pipes_bind_tighter_than_and_or() {
    let file = parse("a | b && c\n");
    let Some(Command::Binary(and)) = &file.stmts[0].cmd else {
        panic!("expected a binary command");
    };
    assert_eq!(and.op, BinCmdOperator::AndStmt);
    let Some(Command::Binary(pipe)) = &and.x.cmd else {
        panic!("expected a pipeline");
    };
    assert_eq!(pipe.op, BinCmdOperator::Pipe);
}

#[test]
fn pipe_all_in_bash() {
    let file = parse("a |& b\n");
    let Some(Command::Binary(pipe)) = &file.stmts[0].cmd else {
        panic!("expected a pipeline");
    };
    assert_eq!(pipe.op, BinCmdOperator::PipeAll);
}

#[test]
fn coprocess_marker_in_mksh() {
    let file = parse_lang("a |&\n", LangVariant::MirBsdKorn).unwrap();
    assert!(file.stmts[0].coprocess);
}

#[test]
fn assignments_move_to_the_statement() {
    let file = parse("FOO=bar BAZ= make -j2\n");
    let stmt = &file.stmts[0];
    assert_eq!(stmt.assigns.len(), 2);
    assert_eq!(stmt.assigns[0].name.as_ref().unwrap().value, "FOO");
    assert_eq!(
        stmt.assigns[0].value.as_ref().unwrap().lit(),
        Some("bar")
    );
    assert_eq!(stmt.assigns[1].name.as_ref().unwrap().value, "BAZ");
    assert!(stmt.assigns[1].value.is_none());
    assert_eq!(call_args(stmt), ["make", "-j2"]);
}

#[test]
fn assignment_only_statement() {
    let file = parse("FOO=bar\n");
    let stmt = &file.stmts[0];
    assert!(stmt.cmd.is_none());
    assert_eq!(stmt.assigns.len(), 1);
}

#[test]
fn append_assignment() {
    let file = parse("PATH+=:/usr/local/bin\n");
    assert!(file.stmts[0].assigns[0].append);
}

#[test]
fn array_assignment() {
    let file = parse("a=(1 2 [5]=x)\n");
    let array = file.stmts[0].assigns[0].array.as_ref().unwrap();
    assert_eq!(array.elems.len(), 3);
    assert!(array.elems[0].index.is_none());
    assert!(array.elems[2].index.is_some());
    assert_eq!(array.elems[2].value.lit(), Some("x"));
}

#[test]
fn indexed_assignment_with_expansion() {
    let file = parse("a[$i+1]=x\n");
    let assign = &file.stmts[0].assigns[0];
    assert_eq!(assign.name.as_ref().unwrap().value, "a");
    assert_matches!(assign.index, Some(ArithmExpr::Binary(_)));
}

#[test]
fn equals_in_arguments_stays_literal() {
    let file = parse("env a=b echo c=d\n");
    let stmt = &file.stmts[0];
    // Only the prefix before the command name is an assignment.
    assert!(stmt.assigns.is_empty());
    assert_eq!(call_args(stmt), ["env", "a=b", "echo", "c=d"]);
}

#[test]
fn redirections() {
    let file = parse("cmd <in >out 2>&1 >>log\n");
    let redirs = &file.stmts[0].redirs;
    assert_eq!(redirs.len(), 4);
    assert_eq!(redirs[0].op, RedirOperator::FileIn);
    assert_eq!(redirs[1].op, RedirOperator::FileOut);
    assert_eq!(redirs[2].op, RedirOperator::FdOut);
    assert_eq!(redirs[2].n.as_ref().unwrap().value, "2");
    assert_eq!(redirs[3].op, RedirOperator::FileAppend);
}

#[test]
fn digits_only_before_redirects_are_fd_numbers() {
    let file = parse("echo 2 >f\n");
    assert_eq!(call_args(&file.stmts[0]), ["echo", "2"]);
    assert!(file.stmts[0].redirs[0].n.is_none());

    let file = parse("echo 2>f\n");
    assert_eq!(call_args(&file.stmts[0]), ["echo"]);
    assert_eq!(file.stmts[0].redirs[0].n.as_ref().unwrap().value, "2");
}

#[test]
fn quoting() {
    let file = parse("echo 'single' \"double $x\" $'esc\\n' plain\\ esc\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::SglQuoted(sgl)] => {
        assert_eq!(sgl.value, "single");
        assert!(!sgl.dollar);
    });
    assert_matches!(&call.args[2].parts[..], [WordPart::DblQuoted(dbl)] => {
        assert_matches!(&dbl.parts[..], [WordPart::Lit(lit), WordPart::ParamExp(exp)] => {
            assert_eq!(lit.value, "double ");
            assert_eq!(exp.param.value, "x");
            assert!(exp.short);
        });
    });
    assert_matches!(&call.args[3].parts[..], [WordPart::SglQuoted(sgl)] => {
        assert_eq!(sgl.value, "esc\\n");
        assert!(sgl.dollar);
    });
    assert_matches!(&call.args[4].parts[..], [WordPart::Lit(lit)] => {
        assert_eq!(lit.value, "plain\\ esc");
    });
}

#[test]
fn unclosed_quotes_are_incomplete() {
    for src in ["echo 'foo", "echo \"foo", "echo $'foo", "echo `foo", "echo $(foo"] {
        let error = Parser::new().parse(src.as_bytes(), "").unwrap_err();
        assert!(error.is_incomplete(), "{src:?} should be incomplete");
    }
}

#[test]
fn command_substitutions() {
    let file = parse("echo $(ls -l) `date`\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::CmdSubst(subst)] => {
        assert!(!subst.backquotes);
        assert_eq!(subst.stmts.len(), 1);
    });
    assert_matches!(&call.args[2].parts[..], [WordPart::CmdSubst(subst)] => {
        assert!(subst.backquotes);
    });
}

#[test]
fn arithmetic_expansion() {
    let file = parse("echo $((1 + 2 * 3))\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::ArithmExp(exp)] => {
        // `*` binds tighter than `+`.
        assert_matches!(&exp.x, ArithmExpr::Binary(add) => {
            assert_eq!(add.op, crate::token::BinAritOperator::Add);
            assert_matches!(&add.y, ArithmExpr::Binary(mul) => {
                assert_eq!(mul.op, crate::token::BinAritOperator::Mul);
            });
        });
    });
}

#[test]
fn deprecated_bracket_arithmetic() {
    let file = parse("echo $[1 + 2]\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::ArithmExp(exp)] => {
        assert!(exp.bracket);
    });
}

#[test]
fn arithmetic_assoc_and_ternary() {
    // `**` and `=` are right-associative; `? :` nests on the right.
    let mut parser = Parser::new();
    let expr = parser.arithm("2 ** 3 ** 2").unwrap();
    assert_matches!(expr, ArithmExpr::Binary(pow) => {
        assert_matches!(&pow.x, ArithmExpr::Word(_));
        assert_matches!(&pow.y, ArithmExpr::Binary(_));
    });

    let expr = parser.arithm("a = b = c").unwrap();
    assert_matches!(expr, ArithmExpr::Binary(assign) => {
        assert_matches!(&assign.y, ArithmExpr::Binary(_));
    });

    let expr = parser.arithm("a ? b : c").unwrap();
    assert_matches!(expr, ArithmExpr::Binary(quest) => {
        assert_eq!(quest.op, crate::token::BinAritOperator::TernQuest);
        assert_matches!(&quest.y, ArithmExpr::Binary(colon) => {
            assert_eq!(colon.op, crate::token::BinAritOperator::TernColon);
        });
    });
}

#[test]
fn arithmetic_assignment_needs_an_lvalue() {
    let mut parser = Parser::new();
    // Names, subscripted names, and expansion-derived names are all
    // assignable.
    assert!(parser.arithm("x = 1").is_ok());
    assert!(parser.arithm("arr[i+1] += 2").is_ok());
    assert!(parser.arithm("$ref = 1").is_ok());
    for src in ["1 = 2", "3 += 4", "(x) = 1"] {
        let error = parser.arithm(src).unwrap_err();
        assert_matches!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::AssignToNonIdentifier),
            "for {src:?}"
        );
    }
    // The same rule applies inside expansions and commands.
    let error = parser.parse("echo $((1 = 2))\n".as_bytes(), "").unwrap_err();
    assert_matches!(
        error.cause,
        ErrorCause::Syntax(SyntaxError::AssignToNonIdentifier)
    );
    assert!(!error.is_incomplete());
}

#[test]
fn arithmetic_subscripts_stay_one_word() {
    let mut parser = Parser::new();
    let expr = parser.arithm("arr[i+1] * 2").unwrap();
    assert_matches!(expr, ArithmExpr::Binary(mul) => {
        assert_eq!(mul.op, crate::token::BinAritOperator::Mul);
        assert_matches!(&mul.x, ArithmExpr::Word(word) => {
            assert_eq!(word.lit(), Some("arr[i+1]"));
        });
    });
}

#[test]
fn increment_operators() {
    let mut parser = Parser::new();
    let expr = parser.arithm("i++").unwrap();
    assert_matches!(expr, ArithmExpr::Unary(unary) => {
        assert!(unary.post);
    });
    let expr = parser.arithm("--i").unwrap();
    assert_matches!(expr, ArithmExpr::Unary(unary) => {
        assert!(!unary.post);
    });
}

#[test]
fn parameter_expansions() {
    let file = parse("echo ${a:-def} ${#b} ${c##*/} ${d/x y/z w} ${e//p/q}\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::ParamExp(exp)] => {
        let expansion = exp.exp.as_ref().unwrap();
        assert_eq!(expansion.op, ParExpOperator::DefaultUnsetOrNull);
        assert_eq!(expansion.word.lit(), Some("def"));
    });
    assert_matches!(&call.args[2].parts[..], [WordPart::ParamExp(exp)] => {
        assert!(exp.length);
        assert_eq!(exp.param.value, "b");
    });
    assert_matches!(&call.args[3].parts[..], [WordPart::ParamExp(exp)] => {
        assert_eq!(exp.exp.as_ref().unwrap().op, ParExpOperator::RemLargePrefix);
    });
    assert_matches!(&call.args[4].parts[..], [WordPart::ParamExp(exp)] => {
        let repl = exp.repl.as_ref().unwrap();
        assert!(!repl.all);
        assert_eq!(repl.orig.lit(), Some("x y"));
        assert_eq!(repl.with.lit(), Some("z w"));
    });
    assert_matches!(&call.args[5].parts[..], [WordPart::ParamExp(exp)] => {
        assert!(exp.repl.as_ref().unwrap().all);
    });
}

#[test]
fn parameter_index_and_names() {
    let file = parse("echo ${a[i+1]} ${b[@]} ${!pre*} ${!pre@} ${!ind}\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::ParamExp(exp)] => {
        assert_matches!(exp.index, Some(ArithmExpr::Binary(_)));
    });
    assert_matches!(&call.args[2].parts[..], [WordPart::ParamExp(exp)] => {
        assert_matches!(&exp.index, Some(ArithmExpr::Word(word)) => {
            assert_eq!(word.lit(), Some("@"));
        });
    });
    assert_matches!(&call.args[3].parts[..], [WordPart::ParamExp(exp)] => {
        assert!(exp.excl);
        assert_eq!(exp.names, Some(crate::token::NamesOperator::Prefix));
    });
    assert_matches!(&call.args[4].parts[..], [WordPart::ParamExp(exp)] => {
        assert_eq!(exp.names, Some(crate::token::NamesOperator::PrefixWords));
    });
    assert_matches!(&call.args[5].parts[..], [WordPart::ParamExp(exp)] => {
        assert!(exp.excl);
        assert!(exp.names.is_none());
    });
}

#[test]
fn parameter_slices() {
    let file = parse("echo ${a:1:2} ${b: -1} ${c:x}\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::ParamExp(exp)] => {
        let slice = exp.slice.as_ref().unwrap();
        assert!(slice.offset.is_some());
        assert!(slice.length.is_some());
    });
    assert_matches!(&call.args[2].parts[..], [WordPart::ParamExp(exp)] => {
        assert_matches!(&exp.slice.as_ref().unwrap().offset, Some(ArithmExpr::Unary(_)));
    });
    assert_matches!(&call.args[3].parts[..], [WordPart::ParamExp(exp)] => {
        let slice = exp.slice.as_ref().unwrap();
        assert!(slice.offset.is_some());
        assert!(slice.length.is_none());
    });
}

#[test]
fn special_parameters() {
    let file = parse("echo $? $# $$ $! $@ $* $- $0 $10\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    // `$10` is `${1}0`.
    assert_matches!(&call.args[9].parts[..], [WordPart::ParamExp(exp), WordPart::Lit(lit)] => {
        assert_eq!(exp.param.value, "1");
        assert_eq!(lit.value, "0");
    });
}

#[test]
fn process_substitution() {
    let file = parse("diff <(sort a) <(sort b)\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::ProcSubst(subst)] => {
        assert_eq!(subst.op, crate::token::ProcOperator::CmdIn);
        assert_eq!(subst.stmts.len(), 1);
    });
}

#[test]
fn extended_globs() {
    let file = parse("rm !(*.keep|backup) @(a|b)\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::ExtGlob(glob)] => {
        assert_eq!(glob.op, crate::token::GlobOperator::Not);
        assert_eq!(glob.pattern.value, "*.keep|backup");
    });
    assert_matches!(&call.args[2].parts[..], [WordPart::ExtGlob(glob)] => {
        assert_eq!(glob.op, crate::token::GlobOperator::One);
    });
}

#[test]
fn if_clause_shape() {
    let file = parse("if a; then b; elif c; then d; else e; fi\n");
    let Some(Command::If(clause)) = &file.stmts[0].cmd else {
        panic!("expected an if clause");
    };
    assert_eq!(clause.cond.len(), 1);
    assert_eq!(clause.then_stmts.len(), 1);
    assert_eq!(clause.elifs.len(), 1);
    assert!(clause.else_branch.is_some());
    assert!(clause.pos() <= clause.end());
}

#[test]
fn while_and_until() {
    let file = parse("while a; do b; done\nuntil c; do d; done\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::While(clause)) if !clause.until);
    assert_matches!(&file.stmts[1].cmd, Some(Command::While(clause)) if clause.until);
}

#[test]
fn for_loops() {
    let file = parse("for i in a b; do echo $i; done\n");
    let Some(Command::For(clause)) = &file.stmts[0].cmd else {
        panic!("expected a for clause");
    };
    assert_matches!(&clause.iter, Loop::WordIter(iter) => {
        assert_eq!(iter.name.value, "i");
        assert!(iter.in_pos.is_valid());
        assert_eq!(iter.items.len(), 2);
    });
}

#[test]
fn for_loop_implicit_args() {
    let file = parse("for i; do echo $i; done\n");
    let Some(Command::For(clause)) = &file.stmts[0].cmd else {
        panic!("expected a for clause");
    };
    assert_matches!(&clause.iter, Loop::WordIter(iter) => {
        assert!(!iter.in_pos.is_valid());
        assert!(iter.items.is_empty());
    });
}

#[test]
fn c_style_for_loop() {
    let file = parse("for ((i = 0; i < 3; i++)); do echo; done\n");
    let Some(Command::For(clause)) = &file.stmts[0].cmd else {
        panic!("expected a for clause");
    };
    assert_matches!(&clause.iter, Loop::CStyle(cstyle) => {
        assert!(cstyle.init.is_some());
        assert!(cstyle.cond.is_some());
        assert!(cstyle.post.is_some());
    });
}

#[test]
fn empty_c_style_loop() {
    let file = parse("for ((;;)); do break; done\n");
    let Some(Command::For(clause)) = &file.stmts[0].cmd else {
        panic!("expected a for clause");
    };
    assert_matches!(&clause.iter, Loop::CStyle(cstyle) => {
        assert!(cstyle.init.is_none());
        assert!(cstyle.cond.is_none());
        assert!(cstyle.post.is_none());
    });
}

#[test]
fn select_is_a_for_clause() {
    let file = parse("select x in a b; do echo $x; done\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::For(clause)) if clause.select);
}

#[test]
fn case_clause_terminators() {
    let file = parse("case $x in a|b) echo 1;; c) echo 2 ;& *) echo 3 ;;& esac\n");
    let Some(Command::Case(clause)) = &file.stmts[0].cmd else {
        panic!("expected a case clause");
    };
    assert_eq!(clause.items.len(), 3);
    assert_eq!(clause.items[0].patterns.len(), 2);
    assert_eq!(clause.items[0].op, CaseOperator::Break);
    assert_eq!(clause.items[1].op, CaseOperator::Fallthrough);
    assert_eq!(clause.items[2].op, CaseOperator::Resume);
}

#[test]
fn case_item_without_terminator() {
    // The final `;;` may be elided when `esac` starts its own command.
    let file = parse("case $x in a) echo 1\nesac\n");
    let Some(Command::Case(clause)) = &file.stmts[0].cmd else {
        panic!("expected a case clause");
    };
    assert_eq!(clause.items[0].op, CaseOperator::Break);
    assert!(!clause.items[0].op_pos.is_valid());
}

#[test]
fn subshell_and_block() {
    let file = parse("(a; b)\n{ c; d; }\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::Subshell(subshell)) => {
        assert_eq!(subshell.stmts.len(), 2);
    });
    assert_matches!(&file.stmts[1].cmd, Some(Command::Block(block)) => {
        assert_eq!(block.stmts.len(), 2);
    });
}

#[test]
fn arithmetic_command() {
    let file = parse("((x > 3))\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::ArithmCmd(_)));
}

#[test]
fn nested_subshell_needs_space() {
    let file = parse("( (a) )\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::Subshell(outer)) => {
        assert_matches!(&outer.stmts[0].cmd, Some(Command::Subshell(_)));
    });
}

#[test]
fn function_declarations() {
    let file = parse("foo() { a; }\nfunction bar { b; }\nfunction baz() { c; }\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::FuncDecl(decl)) => {
        assert!(!decl.rsrv_word);
        assert!(decl.parens);
        assert_eq!(decl.name.value, "foo");
        assert_matches!(&decl.body.cmd, Some(Command::Block(_)));
    });
    assert_matches!(&file.stmts[1].cmd, Some(Command::FuncDecl(decl)) => {
        assert!(decl.rsrv_word);
        assert!(!decl.parens);
    });
    assert_matches!(&file.stmts[2].cmd, Some(Command::FuncDecl(decl)) => {
        assert!(decl.rsrv_word);
        assert!(decl.parens);
    });
}

#[test]
fn function_body_can_carry_redirects() {
    let file = parse("foo() { a; } >log 2>&1\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::FuncDecl(decl)) => {
        assert_eq!(decl.body.redirs.len(), 2);
    });
}

#[test]
fn test_clause_regex() {
    let file = parse("[[ a =~ [ab](c |d) ]]\n");
    let Some(Command::Test(clause)) = &file.stmts[0].cmd else {
        panic!("expected a test clause");
    };
    assert_matches!(&clause.x, TestExpr::Binary(binary) => {
        assert_eq!(binary.op, BinTestOperator::ReMatch);
        // The regex keeps its internal pipe, parens, and space.
        assert_matches!(&binary.y, TestExpr::Word(word) => {
            assert_eq!(word.lit(), Some("[ab](c |d)"));
        });
    });
}

#[test]
fn test_clause_precedence() {
    let file = parse("[[ -f a && -d b || ! -e c ]]\n");
    let Some(Command::Test(clause)) = &file.stmts[0].cmd else {
        panic!("expected a test clause");
    };
    // `&&` binds tighter than `||`.
    assert_matches!(&clause.x, TestExpr::Binary(or) => {
        assert_eq!(or.op, BinTestOperator::OrTest);
        assert_matches!(&or.x, TestExpr::Binary(and) => {
            assert_eq!(and.op, BinTestOperator::AndTest);
        });
        assert_matches!(&or.y, TestExpr::Unary(not) => {
            assert_eq!(not.op, crate::token::UnTestOperator::Not);
        });
    });
}

#[test]
fn declaration_commands() {
    let file = parse("declare -r x=1 y\nlocal z\nexport PATH\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::Decl(decl)) => {
        assert_eq!(decl.variant.value, "declare");
        assert_eq!(decl.args.len(), 3);
        assert!(decl.args[0].naked);
        assert!(decl.args[0].name.is_none());
        assert!(!decl.args[1].naked);
        assert!(decl.args[2].naked);
        assert_eq!(decl.args[2].name.as_ref().unwrap().value, "y");
    });
    assert_matches!(&file.stmts[1].cmd, Some(Command::Decl(decl)) => {
        assert_eq!(decl.variant.value, "local");
    });
}

#[test]
fn let_clause() {
    let file = parse("let a=1+2 b++\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::Let(clause)) => {
        assert_eq!(clause.exprs.len(), 2);
        assert_matches!(&clause.exprs[0], ArithmExpr::Binary(_));
        assert_matches!(&clause.exprs[1], ArithmExpr::Unary(unary) if unary.post);
    });
}

#[test]
fn time_clause() {
    let file = parse("time -p sleep 1\ntime\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::Time(clause)) => {
        assert!(clause.posix_format);
        assert!(clause.stmt.is_some());
    });
    assert_matches!(&file.stmts[1].cmd, Some(Command::Time(clause)) => {
        assert!(clause.stmt.is_none());
    });
}

#[test]
fn coproc_clause() {
    let file = parse("coproc sleep 1\ncoproc NAME { ls; }\n");
    assert_matches!(&file.stmts[0].cmd, Some(Command::Coproc(clause)) => {
        assert!(clause.name.is_none());
    });
    assert_matches!(&file.stmts[1].cmd, Some(Command::Coproc(clause)) => {
        assert_eq!(clause.name.as_ref().unwrap().lit(), Some("NAME"));
        assert_matches!(&clause.stmt.cmd, Some(Command::Block(_)));
    });
}

#[test]
fn bats_test_declaration() {
    let file = parse_lang("@test \"addition\" { run expr 1 + 1; }\n", LangVariant::Bats).unwrap();
    assert_matches!(&file.stmts[0].cmd, Some(Command::TestDecl(decl)) => {
        assert_matches!(&decl.body.cmd, Some(Command::Block(_)));
    });
    // Outside bats, `@test` is an ordinary word.
    let file = parse("@test x\n");
    assert_eq!(call_args(&file.stmts[0]), ["@test", "x"]);
}

#[test]
fn heredoc_basic() {
    let file = parse("cat <<EOF\nhello $name\nEOF\n");
    let redir = &file.stmts[0].redirs[0];
    assert_eq!(redir.op, RedirOperator::HereDoc);
    assert_eq!(redir.word.lit(), Some("EOF"));
    let hdoc = redir.hdoc.as_ref().unwrap();
    assert_matches!(&hdoc.parts[..], [WordPart::Lit(a), WordPart::ParamExp(exp), WordPart::Lit(b)] => {
        assert_eq!(a.value, "hello ");
        assert_eq!(exp.param.value, "name");
        assert_eq!(b.value, "\n");
    });
}

#[test]
fn heredoc_quoted_delimiters_suppress_expansion() {
    for src in [
        "cat <<'EOF'\nno $exp\nEOF\n",
        "cat <<\"EOF\"\nno $exp\nEOF\n",
        "cat <<\\EOF\nno $exp\nEOF\n",
    ] {
        let file = Parser::new().parse(src.as_bytes(), "").unwrap();
        let hdoc = file.stmts[0].redirs[0].hdoc.as_ref().unwrap();
        assert_matches!(&hdoc.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "no $exp\n");
        });
    }
}

#[test]
fn heredoc_empty_body() {
    let file = parse("cat <<EOF\nEOF\n");
    let hdoc = file.stmts[0].redirs[0].hdoc.as_ref().unwrap();
    assert!(hdoc.is_missing());
}

#[test]
fn heredocs_back_to_back() {
    let file = parse("cat <<A <<B\none\nA\ntwo\nB\n");
    let redirs = &file.stmts[0].redirs;
    assert_eq!(redirs[0].hdoc.as_ref().unwrap().lit(), Some("one\n"));
    assert_eq!(redirs[1].hdoc.as_ref().unwrap().lit(), Some("two\n"));
}

#[test]
fn heredoc_dash_strips_tabs_for_matching_only() {
    let file = parse("cat <<-EOF\n\tindented\n\tEOF\n");
    let redir = &file.stmts[0].redirs[0];
    assert_eq!(redir.op, RedirOperator::HereDocDash);
    // The body keeps its tab; only delimiter matching ignores it.
    assert_eq!(redir.hdoc.as_ref().unwrap().lit(), Some("\tindented\n"));
}

#[test]
fn heredoc_inside_command_substitution() {
    let file = parse("echo $(cat <<A\nbody\nA\n) after\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::CmdSubst(subst)] => {
        let hdoc = subst.stmts[0].redirs[0].hdoc.as_ref().unwrap();
        assert_eq!(hdoc.lit(), Some("body\n"));
    });
    assert_eq!(call.args[2].lit(), Some("after"));
}

#[test]
fn heredoc_fills_at_the_statement_newline_not_the_subst_close() {
    // The substitution closes before the newline; the body still belongs
    // to the line as a whole.
    let file = parse("echo $(cat <<A) tail\nbody\nA\n");
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::CmdSubst(subst)] => {
        let hdoc = subst.stmts[0].redirs[0].hdoc.as_ref().unwrap();
        assert_eq!(hdoc.lit(), Some("body\n"));
    });
}

#[test]
fn heredoc_mid_pipeline() {
    let file = parse("cat <<A |\nbody\nA\nwc -l\n");
    let Some(Command::Binary(pipe)) = &file.stmts[0].cmd else {
        panic!("expected a pipeline");
    };
    let hdoc = pipe.x.redirs[0].hdoc.as_ref().unwrap();
    assert_eq!(hdoc.lit(), Some("body\n"));
    assert_eq!(call_args(&pipe.y), ["wc", "-l"]);
}

#[test]
fn heredoc_escaped_newline_is_preserved_in_body() {
    let file = parse("cat <<EOF\nfoo\\\nbar\nEOF\n");
    let hdoc = file.stmts[0].redirs[0].hdoc.as_ref().unwrap();
    assert_eq!(hdoc.lit(), Some("foo\\\nbar\n"));
}

#[test]
fn unterminated_heredocs_are_incomplete() {
    let error = Parser::new().parse("cat <<EOF\nbody\n".as_bytes(), "").unwrap_err();
    assert_matches!(
        &error.cause,
        ErrorCause::Syntax(SyntaxError::UnclosedHereDoc { delim }) if delim == "EOF"
    );
    assert!(error.is_incomplete());

    let error = Parser::new().parse("cat <<EOF".as_bytes(), "").unwrap_err();
    assert_matches!(
        &error.cause,
        ErrorCause::Syntax(SyntaxError::MissingHereDocContent)
    );
    assert!(error.is_incomplete());
}

#[test]
fn incomplete_compound_commands() {
    for (src, expected) in [
        ("if a; then b;", SyntaxError::UnclosedIf),
        ("while a; do b;", SyntaxError::UnclosedDoClause),
        ("case x in", SyntaxError::UnclosedCase),
        ("{ a;", SyntaxError::UnclosedBlock),
        ("(a; b", SyntaxError::UnclosedSubshell),
        ("[[ -f x", SyntaxError::UnclosedTestClause),
    ] {
        let error = Parser::new().parse(src.as_bytes(), "").unwrap_err();
        assert_matches!(&error.cause, ErrorCause::Syntax(e) if *e == expected, "for {src:?}");
        assert!(error.is_incomplete(), "{src:?} should be incomplete");
    }
}

#[test]
fn malformed_inputs() {
    for src in ["fi\n", "a ) b\n", "do echo\n", "if a; fi\n"] {
        let error = Parser::new().parse(src.as_bytes(), "").unwrap_err();
        assert!(!error.is_incomplete(), "{src:?} should be malformed");
    }
}

#[test]
fn error_positions_are_precise() {
    let error = Parser::new().parse("echo hi\nfi\n".as_bytes(), "x.sh").unwrap_err();
    assert_eq!(error.name, "x.sh");
    assert_eq!(error.pos.line(), 2);
    assert_eq!(error.pos.col(), 1);
}

#[test]
fn posix_rejects_bash_extensions() {
    for src in [
        "echo <<<word\n",
        "cmd &>f\n",
        "a |& b\n",
        "echo ${x/a/b}\n",
        "a=(1 2)\n",
        "echo ${a[0]}\n",
    ] {
        let result = parse_lang(src, LangVariant::Posix);
        assert_matches!(
            result.unwrap_err().cause,
            ErrorCause::Lex(LexError::Forbidden { .. }),
            "{src:?} should be forbidden in posix"
        );
    }
}

#[test]
fn posix_treats_reserved_extensions_as_words() {
    let file = parse_lang("[[ x ]]\n", LangVariant::Posix).unwrap();
    assert_eq!(call_args(&file.stmts[0]), ["[[", "x", "]]"]);
    let file = parse_lang("declare -r x\n", LangVariant::Posix).unwrap();
    assert_eq!(call_args(&file.stmts[0]), ["declare", "-r", "x"]);
}

#[test]
fn mksh_value_substitutions() {
    let file = parse_lang("echo ${ ls;} ${|rep;}\n", LangVariant::MirBsdKorn).unwrap();
    let Some(Command::Call(call)) = &file.stmts[0].cmd else {
        unreachable!()
    };
    assert_matches!(&call.args[1].parts[..], [WordPart::CmdSubst(subst)] => {
        assert!(subst.temp_file);
    });
    assert_matches!(&call.args[2].parts[..], [WordPart::CmdSubst(subst)] => {
        assert!(subst.repl_in);
    });
}

#[test]
fn mksh_rejects_prefix_names() {
    let result = parse_lang("echo ${!pre@}\n", LangVariant::MirBsdKorn);
    assert_matches!(
        result.unwrap_err().cause,
        ErrorCause::Lex(LexError::Forbidden { .. })
    );
}

#[test]
fn auto_lang_from_shebang() {
    let mut parser = Parser::new();
    parser.lang(LangVariant::Auto);
    // A POSIX shebang makes bash extensions invalid.
    let result = parser.parse("#!/bin/sh\na |& b\n".as_bytes(), "script");
    assert_matches!(result.unwrap_err().cause, ErrorCause::Lex(_));
    // A bash shebang allows them.
    parser
        .parse("#!/bin/bash\na |& b\n".as_bytes(), "script")
        .unwrap();
}

#[test]
fn comments_kept_only_on_request() {
    let src = "# header\necho hi # inline\n";
    let file = parse(src);
    assert!(file.comments.is_empty());

    let file = Parser::new()
        .keep_comments(true)
        .parse(src.as_bytes(), "")
        .unwrap();
    assert_eq!(file.comments.len(), 2);
    assert_eq!(file.comments[0].text, " header");
    assert_eq!(file.comments[0].hash.line(), 1);
    assert_eq!(file.comments[1].text, " inline");
    assert_eq!(file.comments[1].hash.line(), 2);
}

#[test]
fn stop_at_token() {
    let file = Parser::new()
        .stop_at("$$")
        .parse("echo before $$ echo after\n".as_bytes(), "")
        .unwrap();
    assert_eq!(file.stmts.len(), 1);
    assert_eq!(call_args(&file.stmts[0]), ["echo", "before"]);
}

#[test]
fn recover_errors_collects_and_continues() {
    let mut parser = Parser::new();
    parser.recover_errors(2);
    let file = parser.parse("echo ok )\necho fine\n".as_bytes(), "").unwrap();
    assert_eq!(parser.recovered_errors().len(), 1);
    // The statement before the stray token survives in the partial tree.
    assert_eq!(file.stmts.len(), 2);
    assert_eq!(call_args(&file.stmts[0]), ["echo", "ok"]);
    assert_eq!(call_args(&file.stmts[1]), ["echo", "fine"]);
}

#[test]
fn recovery_budget_is_finite() {
    let mut parser = Parser::new();
    parser.recover_errors(1);
    let result = parser.parse("a )\nb )\nc\n".as_bytes(), "");
    assert!(result.is_err());
    assert_eq!(parser.recovered_errors().len(), 1);
}

#[test]
fn stmts_delivers_batches_per_line() {
    let mut batches = Vec::new();
    Parser::new()
        .stmts("a; b\nc\n".as_bytes(), |stmts| {
            batches.push(stmts.len());
            true
        })
        .unwrap();
    assert_eq!(batches, [2, 1]);
}

#[test]
fn stmts_callback_can_stop_parsing() {
    let mut calls = 0;
    Parser::new()
        .stmts("a\nb\nc\n".as_bytes(), |_| {
            calls += 1;
            false
        })
        .unwrap();
    assert_eq!(calls, 1);
}

#[test]
fn stmts_attaches_heredoc_bodies_before_the_callback() {
    let mut seen = false;
    Parser::new()
        .stmts("cat <<A\nbody\nA\n".as_bytes(), |stmts| {
            let hdoc = stmts[0].redirs[0].hdoc.as_ref().unwrap();
            assert_eq!(hdoc.lit(), Some("body\n"));
            seen = true;
            true
        })
        .unwrap();
    assert!(seen);
}

#[test]
fn interactive_incomplete_flag() {
    let parser = Parser::new();
    let handle = parser.incomplete_handle();
    assert!(!handle.get());
    // The flag is updated as input is pulled; after a finished parse it is
    // reset.
    let mut parser = parser;
    parser
        .interactive("echo hi\n".as_bytes(), |_| true)
        .unwrap();
    assert!(!parser.incomplete());
}

#[test]
fn incomplete_flag_set_while_construct_open() {
    // The reader observes the flag each time the parser asks for a line,
    // the way an interactive prompt callback would.
    use std::cell::RefCell;
    use std::rc::Rc;

    let observed = Rc::new(RefCell::new(Vec::new()));
    let mut parser = Parser::new();
    let handle = parser.incomplete_handle();
    let observed2 = Rc::clone(&observed);
    let reader = LineReader {
        lines: vec![
            "if true; then\n".to_string(),
            "echo hi\n".to_string(),
            "fi\n".to_string(),
        ],
        next: 0,
        buf: Vec::new(),
        pos: 0,
        on_line: Box::new(move || observed2.borrow_mut().push(handle.get())),
    };
    parser.interactive(reader, |_| true).unwrap();
    let observed = observed.borrow();
    // While the `if` was open, at least one read saw the incomplete flag.
    assert!(observed.iter().any(|&b| b));
    assert!(observed.first() == Some(&false));
    assert!(!parser.incomplete());
}

/// A `BufRead` that yields one prepared line per refill and runs a
/// callback whenever a new line is handed out.
struct LineReader {
    lines: Vec<String>,
    next: usize,
    buf: Vec<u8>,
    pos: usize,
    on_line: Box<dyn FnMut()>,
}

impl std::io::Read for LineReader {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        use std::io::BufRead as _;
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl std::io::BufRead for LineReader {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        if self.pos >= self.buf.len() {
            (self.on_line)();
            match self.lines.get(self.next) {
                Some(line) => {
                    self.buf = line.clone().into_bytes();
                    self.pos = 0;
                    self.next += 1;
                }
                None => {
                    self.buf.clear();
                    self.pos = 0;
                }
            }
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos += amt;
    }
}

#[test]
fn words_entry_point() {
    let mut words = Vec::new();
    Parser::new()
        .words("foo 'bar baz' $x\n".as_bytes(), |word| {
            words.push(word);
            true
        })
        .unwrap();
    assert_eq!(words.len(), 3);
    assert_eq!(words[0].lit(), Some("foo"));
    assert_matches!(&words[1].parts[..], [WordPart::SglQuoted(_)]);
    assert_matches!(&words[2].parts[..], [WordPart::ParamExp(_)]);
}

#[test]
fn single_word_entry_point() {
    let mut parser = Parser::new();
    let word = parser.word("foo$bar").unwrap();
    assert_eq!(word.parts.len(), 2);
    assert!(parser.word("foo bar").is_err());
    assert!(parser.word("").is_err());
}

#[test]
fn document_entry_point() {
    let mut parser = Parser::new();
    let word = parser.document("hello $name\nmore\n".as_bytes()).unwrap();
    assert_matches!(&word.parts[..], [WordPart::Lit(a), WordPart::ParamExp(_), WordPart::Lit(b)] => {
        assert_eq!(a.value, "hello ");
        assert_eq!(b.value, "\nmore\n");
    });
}

#[test]
fn parse_errors_are_not_retried() {
    let mut parser = Parser::new();
    assert!(parser.parse("fi\n".as_bytes(), "").is_err());
    // The parser is reusable after an error.
    assert!(parser.parse("echo ok\n".as_bytes(), "").is_ok());
}
