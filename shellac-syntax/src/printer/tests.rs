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
use crate::parser::Parser;
use crate::token::LangVariant;
use pretty_assertions::assert_eq;

fn fmt(src: &str) -> String {
    fmt_with(src, &Printer::new())
}

fn fmt_with(src: &str, printer: &Printer) -> String {
    let file = Parser::new()
        .keep_comments(true)
        .parse(src.as_bytes(), "test.sh")
        .unwrap_or_else(|e| panic!("parse failed for {src:?}: {e}"));
    let mut out = Vec::new();
    printer.print(&mut out, &file).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn collapses_redundant_spaces() {
    assert_eq!(fmt("echo      'foo'\n"), "echo 'foo'\n");
}

#[test]
fn if_clause_layout() {
    assert_eq!(
        fmt("if [ x = y ]; then echo a; fi\n"),
        "if [ x = y ]; then\n\techo a\nfi\n"
    );
}

#[test]
fn if_clause_with_elif_and_else() {
    assert_eq!(
        fmt("if a; then b; elif c; then d; else e; fi\n"),
        "if a; then\n\tb\nelif c; then\n\td\nelse\n\te\nfi\n"
    );
}

#[test]
fn heredoc_is_preserved() {
    let src = "cat <<EOF\nhello $name\nEOF\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn heredoc_dash_body_keeps_tabs() {
    let src = "cat <<-EOF\n\thello\nEOF\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn heredoc_quoted_delimiter_round_trips() {
    assert_eq!(fmt("cat <<'EOF'\n$x\nEOF\n"), "cat <<'EOF'\n$x\nEOF\n");
    assert_eq!(fmt("cat <<\\EOF\n$x\nEOF\n"), "cat <<\\EOF\n$x\nEOF\n");
}

#[test]
fn heredocs_back_to_back_flush_in_order() {
    let src = "cat <<A <<B\none\nA\ntwo\nB\n";
    assert_eq!(fmt(src), src);
}

#[test]
fn heredoc_in_substitution_flushes_after_the_line() {
    assert_eq!(
        fmt("echo $(cat <<X\nhi\nX\n) tail\n"),
        "echo $(cat <<X) tail\nhi\nX\n"
    );
}

#[test]
fn binary_commands_stay_inline_when_written_inline() {
    assert_eq!(fmt("a && b || c\n"), "a && b || c\n");
}

#[test]
fn binary_commands_keep_their_line_break() {
    assert_eq!(fmt("a &&\nb\n"), "a &&\n\tb\n");
}

#[test]
fn binary_next_line_uses_a_continuation() {
    let mut printer = Printer::new();
    printer.binary_next_line(true);
    assert_eq!(fmt_with("a &&\nb\n", &printer), "a \\\n\t&& b\n");
}

#[test]
fn case_clause_layout() {
    assert_eq!(
        fmt("case $x in a|b) echo 1;; c) echo 2 ;& *) echo 3 ;;& esac\n"),
        "case $x in\na | b)\n\techo 1\n\t;;\nc)\n\techo 2\n\t;&\n*)\n\techo 3\n\t;;&\nesac\n"
    );
}

#[test]
fn switch_case_indent_adds_a_level() {
    let mut printer = Printer::new();
    printer.switch_case_indent(true);
    assert_eq!(
        fmt_with("case x in a) b ;; esac\n", &printer),
        "case x in\n\ta)\n\t\tb\n\t\t;;\nesac\n"
    );
}

#[test]
fn empty_case_item_stays_inline() {
    assert_eq!(
        fmt("case x in a) ;; *) b ;; esac\n"),
        "case x in\na) ;;\n*)\n\tb\n\t;;\nesac\n"
    );
}

#[test]
fn spaces_per_level_indentation() {
    let mut printer = Printer::new();
    printer.indent(2);
    assert_eq!(
        fmt_with("if a; then b; fi\n", &printer),
        "if a; then\n  b\nfi\n"
    );
    assert_eq!(
        fmt_with("if a; then if b; then c; fi; fi\n", &printer),
        "if a; then\n  if b; then\n    c\n  fi\nfi\n"
    );
}

#[test]
fn space_redirects_option() {
    let mut printer = Printer::new();
    printer.space_redirects(true);
    assert_eq!(fmt_with("cmd >f <in 2>&1\n", &printer), "cmd > f < in 2>&1\n");
    // Here-document operators never take a space.
    assert_eq!(
        fmt_with("cat <<E\nx\nE\n", &printer),
        "cat <<E\nx\nE\n"
    );
}

#[test]
fn function_next_line_option() {
    let mut printer = Printer::new();
    printer.function_next_line(true);
    assert_eq!(fmt_with("foo() { a; }\n", &printer), "foo()\n{\n\ta\n}\n");
}

#[test]
fn function_declarations() {
    assert_eq!(fmt("foo() { a; }\n"), "foo() {\n\ta\n}\n");
    assert_eq!(fmt("function foo { a; }\n"), "function foo {\n\ta\n}\n");
    assert_eq!(fmt("function foo() { a; }\n"), "function foo() {\n\ta\n}\n");
}

#[test]
fn single_line_collapses_control_structures() {
    let mut printer = Printer::new();
    printer.single_line(true);
    assert_eq!(
        fmt_with("if a; then\nb\nc\nfi\n", &printer),
        "if a; then b; c; fi\n"
    );
    assert_eq!(
        fmt_with("while x; do\ny\ndone\n", &printer),
        "while x; do y; done\n"
    );
    // Top-level statements keep their own lines.
    assert_eq!(fmt_with("a\nb\n", &printer), "a\nb\n");
}

#[test]
fn minify_drops_whitespace() {
    let mut printer = Printer::new();
    printer.minify(true);
    assert_eq!(
        fmt_with("if a; then b; fi\necho x\n", &printer),
        "if a;then b;fi;echo x\n"
    );
    // A trailing `&` already terminates; `;` after it would be invalid.
    assert_eq!(fmt_with("a &\nb\n", &printer), "a & b\n");
    assert_eq!(fmt_with("(a & b)\n", &printer), "(a & b)\n");
}

#[test]
fn minify_keeps_required_heredoc_newlines() {
    let mut printer = Printer::new();
    printer.minify(true);
    // The body still needs its own lines; it flushes after the one
    // newline that ends the joined statement list.
    assert_eq!(
        fmt_with("cat <<E\nbody\nE\necho x\n", &printer),
        "cat <<E;echo x\nbody\nE\n"
    );
}

#[test]
fn keep_padding_preserves_alignment() {
    let mut printer = Printer::new();
    printer.keep_padding(true);
    assert_eq!(fmt_with("echo      'foo'\n", &printer), "echo      'foo'\n");
    assert_eq!(
        fmt_with("alias ll='ls -l'\nalias l='ls'\n", &printer),
        "alias ll='ls -l'\nalias l='ls'\n"
    );
}

#[test]
fn blank_lines_collapse_to_one() {
    assert_eq!(fmt("a\n\n\n\nb\n"), "a\n\nb\n");
    assert_eq!(fmt("a\nb\n"), "a\nb\n");
    // No leading blank line.
    assert_eq!(fmt("\n\na\n"), "a\n");
}

#[test]
fn comments_are_reattached() {
    assert_eq!(
        fmt("# header\necho hi # inline\n"),
        "# header\necho hi  # inline\n"
    );
    assert_eq!(
        fmt("if a; then\n\t# why\n\tb\nfi\n"),
        "if a; then\n\t# why\n\tb\nfi\n"
    );
}

#[test]
fn comment_before_case_item_aligns_with_items() {
    assert_eq!(
        fmt("case $x in\n# first\na) b ;;\nesac\n"),
        "case $x in\n# first\na)\n\tb\n\t;;\nesac\n"
    );
}

#[test]
fn negation_background_and_coprocess() {
    assert_eq!(fmt("! a | b\n"), "! a | b\n");
    assert_eq!(fmt("a &\nb\n"), "a &\nb\n");
    let file = Parser::new()
        .lang(LangVariant::MirBsdKorn)
        .parse("a |&\n".as_bytes(), "")
        .unwrap();
    let mut out = Vec::new();
    Printer::new().print(&mut out, &file).unwrap();
    assert_eq!(out, b"a |&\n");
}

#[test]
fn subshells_stay_inline() {
    assert_eq!(fmt("(cd /tmp && ls)\n"), "(cd /tmp && ls)\n");
    assert_eq!(fmt("( (a) )\n"), "( (a))\n");
}

#[test]
fn redirects_interleave_with_call_arguments() {
    assert_eq!(fmt("echo a >f b\n"), "echo a >f b\n");
    assert_eq!(fmt("{ a; } >log 2>&1 &\n"), "{\n\ta\n} >log 2>&1 &\n");
}

#[test]
fn assignments_and_arrays() {
    assert_eq!(fmt("FOO=bar BAZ= make\n"), "FOO=bar BAZ= make\n");
    assert_eq!(fmt("a=(1 2 [5]=x)\n"), "a=(1 2 [5]=x)\n");
    assert_eq!(fmt("a[$i]+=1\n"), "a[$i]+=1\n");
}

#[test]
fn arithmetic_gets_canonical_spacing() {
    assert_eq!(fmt("echo $((1+2*3))\n"), "echo $((1 + 2 * 3))\n");
    assert_eq!(fmt("((x>3))\n"), "((x > 3))\n");
    assert_eq!(fmt("echo $((a?b:c))\n"), "echo $((a ? b : c))\n");
    // Compact contexts stay compact.
    assert_eq!(fmt("let a=1+2\n"), "let a=1+2\n");
    assert_eq!(fmt("echo ${a[i+1]}\n"), "echo ${a[i+1]}\n");
}

#[test]
fn negative_slice_offset_keeps_its_space() {
    assert_eq!(fmt("echo ${a: -1}\n"), "echo ${a: -1}\n");
    assert_eq!(fmt("echo ${a:1:2}\n"), "echo ${a:1:2}\n");
}

#[test]
fn test_clause_spacing() {
    assert_eq!(
        fmt("[[ -f $f&&$x == y ]]\n"),
        "[[ -f $f && $x == y ]]\n"
    );
    assert_eq!(
        fmt("[[ a =~ [ab](c |d) ]]\n"),
        "[[ a =~ [ab](c |d) ]]\n"
    );
}

#[test]
fn empty_block_prints_parseably() {
    assert_eq!(fmt("{ }\n"), "{ }\n");
}

/// Inputs that exercise most of the grammar; every one must reach a fixed
/// point after a single print.
const CORPUS: &[&str] = &[
    "echo      'foo'\n",
    "if [ x = y ]; then echo a; fi\n",
    "cat <<EOF\nhello $name\nEOF\n",
    "a && b || c\n",
    "case $x in a|b) echo 1;; c) echo 2 ;& *) echo 3 ;;& esac\n",
    "foo() { bar; }\nfunction baz { qux; }\n",
    "for i in 1 2 3; do echo $i; done\n",
    "for ((i = 0; i < 10; i++)); do :; done\n",
    "for i; do echo $i; done\n",
    "while read -r l; do echo \"$l\"; done <f\n",
    "until [ -e f ]; do sleep 1; done\n",
    "select opt in a b; do break; done\n",
    "{ a; b; } >log 2>&1 &\n",
    "(cd /tmp && ls)\n",
    "echo ${a:-b} ${c##*/} \"${d[@]}\" $((x * (y + 2)))\n",
    "echo ${x/a b/c d} ${y//p/q} ${!pre*} ${#z}\n",
    "cat <<-EOF\n\tbody\nEOF\n",
    "cat <<A <<B\n1\nA\n2\nB\n",
    "echo $(cat <<X\nhi\nX\n)\n",
    "[[ -f $f && $x =~ ab(c |d) ]]\n",
    "[[ ! (-d a || -L b) ]]\n",
    "declare -x FOO=bar\nlocal -r x\n",
    "let i+=1 j=i*2\n",
    "time -p make\n",
    "coproc srv { cat; }\n",
    "echo a \\\n  b\n",
    "x=$((1 + 2)) y+=z a[5]=b\n",
    "echo {foo,bar} {1..4} foo{a,b}\n",
    "! true | false\n",
    "a |& b\n",
    "echo $'x\\ty' $\"loc\" \"\" ''\n",
    "echo `date` $(($#))\n",
    "diff <(sort a) <(sort b)\n",
    "rm !(*.keep) ?(x) *(y) +(z) @(w)\n",
    "echo $[1 + 2]\n",
    "echo \"nested $(echo \"inner $x\") done\"\n",
    "# leading\na\n\nb # trailing\n",
    "echo $? $# $$ $! $@ $* $- $0\n",
    "2>&1 cmd\n",
    "esac=3 echo ok\n",
];

#[test]
fn printing_reaches_a_fixed_point() {
    for src in CORPUS {
        let first = fmt(src);
        let second = fmt(&first);
        assert_eq!(second, first, "not a fixed point for {src:?}");
    }
}

#[test]
fn printed_output_parses_to_an_equivalent_tree() {
    for src in CORPUS {
        let file = Parser::new().parse(src.as_bytes(), "").unwrap();
        let mut out = Vec::new();
        Printer::new().print(&mut out, &file).unwrap();
        let reparsed = Parser::new()
            .parse(&out[..], "")
            .unwrap_or_else(|e| panic!("reparse failed for {src:?}: {e}\noutput: {:?}", String::from_utf8_lossy(&out)));
        let mut out2 = Vec::new();
        Printer::new().print(&mut out2, &reparsed).unwrap();
        assert_eq!(
            String::from_utf8(out2).unwrap(),
            String::from_utf8(out).unwrap(),
            "print is not stable for {src:?}"
        );
    }
}

#[test]
fn print_stmt_and_print_word() {
    let file = Parser::new().parse("echo hi >f\n".as_bytes(), "").unwrap();
    let mut out = Vec::new();
    Printer::new().print_stmt(&mut out, &file.stmts[0]).unwrap();
    assert_eq!(out, b"echo hi >f\n");

    let mut parser = Parser::new();
    let word = parser.word("\"a $b\"").unwrap();
    let mut out = Vec::new();
    Printer::new().print_word(&mut out, &word).unwrap();
    assert_eq!(out, b"\"a $b\"");
}
