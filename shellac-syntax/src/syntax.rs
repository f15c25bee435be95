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

//! Shell command language syntax
//!
//! This module contains the types that represent abstract syntax trees of
//! the shell language.
//!
//! ## Syntactic elements
//!
//! A whole script is a [`File`], which owns an ordered list of [`Stmt`]s and
//! an ordered list of [`Comment`]s. A `Stmt` wraps one [`Command`] together
//! with its negation, background, assignment, and redirection context.
//! `Command` is a sum type covering simple commands ([`CallExpr`]) and every
//! compound construct of the language.
//!
//! Tokens that make up commands may contain quotations and expansions: a
//! [`Word`] is a sequence of [`WordPart`]s, which cover literals, quoted
//! strings, parameter expansions, command substitutions, and the other
//! expansion forms.
//!
//! ## Positions
//!
//! Every node knows its start [position](Pos) via `pos()`, and composite
//! nodes compute their end from their children or from a stored terminator
//! position via `end()`. For any node, `pos() <= end()`, and a parent's
//! range encloses the ranges of all its children.
//!
//! Trees are created by [parsing](crate::parser), mutated only by explicit
//! rewriting passes ([`simplify`](crate::simplify), mutable
//! [walks](crate::walk)), and consumed by the [printer](crate::printer) or
//! by the [typed JSON encoding](crate::json).

use crate::source::Pos;
use crate::token::{
    BinAritOperator, BinCmdOperator, BinTestOperator, CaseOperator, GlobOperator, NamesOperator,
    ParExpOperator, ProcOperator, RedirOperator, UnAritOperator, UnTestOperator,
};

/// A complete shell source file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct File {
    /// Name of the source, used in error messages
    pub name: String,
    /// Top-level statements in source order
    pub stmts: Vec<Stmt>,
    /// All comments in source order
    ///
    /// Comments are only collected when the parser's `keep_comments` option
    /// is on. They are kept in this flat list rather than attached to
    /// individual nodes; their positions let the printer re-associate them.
    pub comments: Vec<Comment>,
}

impl File {
    pub fn pos(&self) -> Pos {
        self.stmts.first().map_or_else(Pos::default, Stmt::pos)
    }

    pub fn end(&self) -> Pos {
        self.stmts.last().map_or_else(Pos::default, Stmt::end)
    }
}

/// A single comment
///
/// The text starts after the `#` and does not include the trailing newline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    /// Position of the `#` character
    pub hash: Pos,
    /// Comment text, without the leading `#`
    pub text: String,
}

impl Comment {
    pub fn pos(&self) -> Pos {
        self.hash
    }

    pub fn end(&self) -> Pos {
        self.hash.after(1 + self.text.len())
    }
}

/// A statement: a command with its surrounding modifiers
///
/// Every command in a script is wrapped in a statement, which records
/// negation (`!`), backgrounding (`&`), the mksh coprocess marker (`|&`),
/// assignment prefixes, and redirections.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stmt {
    /// Position of the first token of the statement
    pub position: Pos,
    /// Whether the statement begins with `!`
    pub negated: bool,
    /// Whether the statement ends with `&`
    pub background: bool,
    /// Whether the statement ends with `|&` (mksh coprocess)
    pub coprocess: bool,
    /// The command itself
    ///
    /// This is `None` for statements that consist only of assignments
    /// and/or redirections, such as `FOO=bar` or `>file`.
    pub cmd: Option<Command>,
    /// Assignments preceding the command
    pub assigns: Vec<Assign>,
    /// Redirections, in source order
    pub redirs: Vec<Redirect>,
}

impl Stmt {
    pub fn pos(&self) -> Pos {
        self.position
    }

    pub fn end(&self) -> Pos {
        let mut end = self.position;
        if let Some(cmd) = &self.cmd {
            end = end.max(cmd.end());
        }
        if let Some(assign) = self.assigns.last() {
            end = end.max(assign.end());
        }
        if let Some(redir) = self.redirs.last() {
            end = end.max(redir.end());
        }
        end
    }
}

/// A command: the exclusive part of a statement
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// A simple command
    Call(CallExpr),
    /// `{ ... ; }`
    Block(Block),
    /// `( ... )`
    Subshell(Subshell),
    /// `if ... then ... fi`
    If(IfClause),
    /// `while ... do ... done` or `until ... do ... done`
    While(WhileClause),
    /// `for`/`select` loops
    For(ForClause),
    /// `case ... in ... esac`
    Case(CaseClause),
    /// Function declaration
    FuncDecl(FuncDecl),
    /// `(( ... ))`
    ArithmCmd(ArithmCmd),
    /// `[[ ... ]]`
    Test(TestClause),
    /// `declare`, `local`, `export`, `readonly`, `typeset`, `nameref`
    Decl(DeclClause),
    /// `let ...`
    Let(LetClause),
    /// `time [-p] ...`
    Time(TimeClause),
    /// `coproc ...`
    Coproc(CoprocClause),
    /// Two statements joined by `&&`, `||`, `|`, or `|&`
    Binary(Box<BinaryCmd>),
    /// A Bats `@test` declaration
    TestDecl(TestDecl),
}

impl Command {
    pub fn pos(&self) -> Pos {
        match self {
            Command::Call(x) => x.pos(),
            Command::Block(x) => x.pos(),
            Command::Subshell(x) => x.pos(),
            Command::If(x) => x.pos(),
            Command::While(x) => x.pos(),
            Command::For(x) => x.pos(),
            Command::Case(x) => x.pos(),
            Command::FuncDecl(x) => x.pos(),
            Command::ArithmCmd(x) => x.pos(),
            Command::Test(x) => x.pos(),
            Command::Decl(x) => x.pos(),
            Command::Let(x) => x.pos(),
            Command::Time(x) => x.pos(),
            Command::Coproc(x) => x.pos(),
            Command::Binary(x) => x.pos(),
            Command::TestDecl(x) => x.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Command::Call(x) => x.end(),
            Command::Block(x) => x.end(),
            Command::Subshell(x) => x.end(),
            Command::If(x) => x.end(),
            Command::While(x) => x.end(),
            Command::For(x) => x.end(),
            Command::Case(x) => x.end(),
            Command::FuncDecl(x) => x.end(),
            Command::ArithmCmd(x) => x.end(),
            Command::Test(x) => x.end(),
            Command::Decl(x) => x.end(),
            Command::Let(x) => x.end(),
            Command::Time(x) => x.end(),
            Command::Coproc(x) => x.end(),
            Command::Binary(x) => x.end(),
            Command::TestDecl(x) => x.end(),
        }
    }
}

/// A simple command: a list of words
///
/// A valid call expression has at least one argument; assignments and
/// redirections live on the enclosing [`Stmt`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallExpr {
    /// Command name and arguments
    pub args: Vec<Word>,
}

impl CallExpr {
    pub fn pos(&self) -> Pos {
        self.args.first().map_or_else(Pos::default, Word::pos)
    }

    pub fn end(&self) -> Pos {
        self.args.last().map_or_else(Pos::default, Word::end)
    }
}

/// A brace group: `{ ... ; }`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    /// Position of the `{`
    pub lbrace: Pos,
    /// Position of the `}`
    pub rbrace: Pos,
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn pos(&self) -> Pos {
        self.lbrace
    }

    pub fn end(&self) -> Pos {
        self.rbrace.after(1)
    }
}

/// A subshell: `( ... )`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subshell {
    /// Position of the `(`
    pub lparen: Pos,
    /// Position of the `)`
    pub rparen: Pos,
    pub stmts: Vec<Stmt>,
}

impl Subshell {
    pub fn pos(&self) -> Pos {
        self.lparen
    }

    pub fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

/// An if clause: `if ... then ... [elif ...] [else ...] fi`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IfClause {
    pub if_pos: Pos,
    pub then_pos: Pos,
    pub fi_pos: Pos,
    /// Statements whose exit status decides the branch
    pub cond: Vec<Stmt>,
    /// Statements run when the condition succeeds
    pub then_stmts: Vec<Stmt>,
    /// `elif` branches, in source order
    pub elifs: Vec<Elif>,
    /// Final `else` branch, if any
    pub else_branch: Option<Else>,
}

impl IfClause {
    pub fn pos(&self) -> Pos {
        self.if_pos
    }

    pub fn end(&self) -> Pos {
        self.fi_pos.after(2)
    }
}

/// One `elif ... then ...` branch of an [`IfClause`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Elif {
    pub elif_pos: Pos,
    pub then_pos: Pos,
    pub cond: Vec<Stmt>,
    pub then_stmts: Vec<Stmt>,
}

/// The `else` branch of an [`IfClause`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Else {
    pub else_pos: Pos,
    pub stmts: Vec<Stmt>,
}

/// A while or until loop
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhileClause {
    pub while_pos: Pos,
    pub do_pos: Pos,
    pub done_pos: Pos,
    /// True for `until`, false for `while`
    pub until: bool,
    pub cond: Vec<Stmt>,
    pub do_stmts: Vec<Stmt>,
}

impl WhileClause {
    pub fn pos(&self) -> Pos {
        self.while_pos
    }

    pub fn end(&self) -> Pos {
        self.done_pos.after(4)
    }
}

/// A for or select loop
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForClause {
    pub for_pos: Pos,
    pub do_pos: Pos,
    pub done_pos: Pos,
    /// True for `select` (Bash), false for `for`
    pub select: bool,
    pub iter: Loop,
    pub do_stmts: Vec<Stmt>,
}

impl ForClause {
    pub fn pos(&self) -> Pos {
        self.for_pos
    }

    pub fn end(&self) -> Pos {
        self.done_pos.after(4)
    }
}

/// The iterator of a [`ForClause`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Loop {
    /// `for name [in words]`
    WordIter(WordIter),
    /// `for ((init; cond; post))`
    CStyle(CStyleLoop),
}

/// Iteration over a list of words
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordIter {
    /// The loop variable
    pub name: Lit,
    /// Position of the `in` keyword, invalid when iterating over `"$@"`
    /// implicitly
    pub in_pos: Pos,
    /// Words to iterate over
    pub items: Vec<Word>,
}

/// A C-style three-expression loop header (Bash)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CStyleLoop {
    /// Position of the `((`
    pub lparen: Pos,
    /// Position of the `))`
    pub rparen: Pos,
    pub init: Option<ArithmExpr>,
    pub cond: Option<ArithmExpr>,
    pub post: Option<ArithmExpr>,
}

/// A case clause: `case word in ... esac`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseClause {
    pub case_pos: Pos,
    pub in_pos: Pos,
    pub esac_pos: Pos,
    /// The word being matched
    pub word: Word,
    /// Pattern lists, in source order
    pub items: Vec<CaseItem>,
}

impl CaseClause {
    pub fn pos(&self) -> Pos {
        self.case_pos
    }

    pub fn end(&self) -> Pos {
        self.esac_pos.after(4)
    }
}

/// One pattern list of a [`CaseClause`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseItem {
    /// The terminating operator (`;;`, `;&`, or `;;&`)
    pub op: CaseOperator,
    /// Position of the terminating operator, invalid when it is elided
    /// before `esac`
    pub op_pos: Pos,
    /// Patterns separated by `|`; at least one
    pub patterns: Vec<Word>,
    pub stmts: Vec<Stmt>,
}

/// A function declaration
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FuncDecl {
    pub position: Pos,
    /// Whether the declaration uses the `function` reserved word (Bash)
    pub rsrv_word: bool,
    /// Whether the declaration carries a `()` pair
    pub parens: bool,
    pub name: Lit,
    pub body: Box<Stmt>,
}

impl FuncDecl {
    pub fn pos(&self) -> Pos {
        self.position
    }

    pub fn end(&self) -> Pos {
        self.body.end()
    }
}

/// An arithmetic command: `(( ... ))`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArithmCmd {
    /// Position of the `((`
    pub left: Pos,
    /// Position of the `))`
    pub right: Pos,
    pub x: ArithmExpr,
}

impl ArithmCmd {
    pub fn pos(&self) -> Pos {
        self.left
    }

    pub fn end(&self) -> Pos {
        self.right.after(2)
    }
}

/// A test clause: `[[ ... ]]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestClause {
    /// Position of the `[[`
    pub left: Pos,
    /// Position of the `]]`
    pub right: Pos,
    pub x: TestExpr,
}

impl TestClause {
    pub fn pos(&self) -> Pos {
        self.left
    }

    pub fn end(&self) -> Pos {
        self.right.after(2)
    }
}

/// A declaration command such as `declare`, `local`, or `export`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeclClause {
    /// The declaration utility name
    pub variant: Lit,
    /// Arguments, each parsed as an assignment
    ///
    /// Option words such as `-r` and bare names become
    /// [naked](Assign::naked) assignments without a value.
    pub args: Vec<Assign>,
}

impl DeclClause {
    pub fn pos(&self) -> Pos {
        self.variant.pos()
    }

    pub fn end(&self) -> Pos {
        self.args.last().map_or_else(|| self.variant.end(), Assign::end)
    }
}

/// A `let` command; each argument is an arithmetic expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LetClause {
    pub let_pos: Pos,
    pub exprs: Vec<ArithmExpr>,
}

impl LetClause {
    pub fn pos(&self) -> Pos {
        self.let_pos
    }

    pub fn end(&self) -> Pos {
        self.exprs
            .last()
            .map_or_else(|| self.let_pos.after(3), ArithmExpr::end)
    }
}

/// A `time` command prefix
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeClause {
    pub time_pos: Pos,
    /// Whether the `-p` (POSIX output format) flag is present
    pub posix_format: bool,
    pub stmt: Option<Box<Stmt>>,
}

impl TimeClause {
    pub fn pos(&self) -> Pos {
        self.time_pos
    }

    pub fn end(&self) -> Pos {
        match &self.stmt {
            Some(stmt) => stmt.end(),
            None => self.time_pos.after(4),
        }
    }
}

/// A `coproc` command (Bash)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoprocClause {
    pub coproc_pos: Pos,
    /// Optional name for the coprocess
    pub name: Option<Word>,
    pub stmt: Box<Stmt>,
}

impl CoprocClause {
    pub fn pos(&self) -> Pos {
        self.coproc_pos
    }

    pub fn end(&self) -> Pos {
        self.stmt.end()
    }
}

/// Two statements joined by a binary operator
///
/// `&&` and `||` share one precedence level and associate to the left;
/// `|` and `|&` bind tighter and also associate to the left.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryCmd {
    pub op_pos: Pos,
    pub op: BinCmdOperator,
    pub x: Stmt,
    pub y: Stmt,
}

impl BinaryCmd {
    pub fn pos(&self) -> Pos {
        self.x.pos()
    }

    pub fn end(&self) -> Pos {
        self.y.end()
    }
}

/// A Bats `@test` declaration
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestDecl {
    pub position: Pos,
    /// The test description word
    pub description: Word,
    pub body: Box<Stmt>,
}

impl TestDecl {
    pub fn pos(&self) -> Pos {
        self.position
    }

    pub fn end(&self) -> Pos {
        self.body.end()
    }
}

/// An assignment, e.g. `name=value` or `name[index]+=value`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assign {
    /// Whether the operator is `+=` rather than `=`
    pub append: bool,
    /// Whether the assignment has no `=` at all
    ///
    /// Naked assignments appear as arguments of declaration commands:
    /// a bare `name`, or an option word such as `-r` (in which case
    /// `name` is `None` and `value` holds the word).
    pub naked: bool,
    /// The variable name; `None` for non-assignment declaration arguments
    pub name: Option<Lit>,
    /// Index for `name[index]=value` (Bash arrays)
    pub index: Option<ArithmExpr>,
    /// The assigned value, if any
    pub value: Option<Word>,
    /// The assigned array, if any (e.g. `name=(a b c)`)
    pub array: Option<ArrayExpr>,
}

impl Assign {
    pub fn pos(&self) -> Pos {
        match &self.name {
            Some(name) => name.pos(),
            None => self.value.as_ref().map_or_else(Pos::default, Word::pos),
        }
    }

    pub fn end(&self) -> Pos {
        if let Some(array) = &self.array {
            return array.end();
        }
        if let Some(value) = &self.value {
            return value.end();
        }
        match &self.name {
            // A naked `name` or `name[index]` ends after its final
            // character; the `+=`/`=` suffix of a valueless assignment like
            // `name=` is covered by one extra byte.
            Some(name) => {
                let end = self.index.as_ref().map_or_else(|| name.end(), |index| index.end().after(1));
                if self.naked { end } else { end.after(if self.append { 2 } else { 1 }) }
            }
            None => Pos::default(),
        }
    }
}

/// Parenthesized array value of an [`Assign`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayExpr {
    pub lparen: Pos,
    pub rparen: Pos,
    pub elems: Vec<ArrayElem>,
}

impl ArrayExpr {
    pub fn pos(&self) -> Pos {
        self.lparen
    }

    pub fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

/// One element of an [`ArrayExpr`], optionally keyed by an index
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayElem {
    /// Index for `[index]=value` elements
    pub index: Option<ArithmExpr>,
    pub value: Word,
}

impl ArrayElem {
    pub fn pos(&self) -> Pos {
        match &self.index {
            Some(index) => index.pos(),
            None => self.value.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        self.value.end()
    }
}

/// A redirection
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redirect {
    /// Position of the operator
    pub op_pos: Pos,
    pub op: RedirOperator,
    /// Optional file descriptor digits preceding the operator
    pub n: Option<Lit>,
    /// The operand: target file, here-document delimiter, or here-string
    pub word: Word,
    /// Here-document body, filled once the body has been read
    ///
    /// The body word is "missing" (has no parts) for an empty body.
    pub hdoc: Option<Word>,
}

impl Redirect {
    pub fn pos(&self) -> Pos {
        match &self.n {
            Some(n) => n.pos(),
            None => self.op_pos,
        }
    }

    pub fn end(&self) -> Pos {
        self.word.end()
    }
}

/// A word: one lexical argument made of one or more parts
///
/// A word has at least one part, except when it explicitly marks a missing
/// value (e.g. an empty here-document body); callers must treat such a word
/// as absent.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    /// Returns true if the word marks a missing value.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the literal string value if the word is a single unquoted
    /// literal.
    #[must_use]
    pub fn lit(&self) -> Option<&str> {
        match &self.parts[..] {
            [WordPart::Lit(lit)] => Some(&lit.value),
            _ => None,
        }
    }

    pub fn pos(&self) -> Pos {
        self.parts.first().map_or_else(Pos::default, WordPart::pos)
    }

    pub fn end(&self) -> Pos {
        self.parts.last().map_or_else(Pos::default, WordPart::end)
    }
}

/// One part of a [`Word`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordPart {
    /// Unquoted literal text
    Lit(Lit),
    /// `'...'` or `$'...'`
    SglQuoted(SglQuoted),
    /// `"..."` or `$"..."`
    DblQuoted(DblQuoted),
    /// `$name` or `${...}`
    ParamExp(Box<ParamExp>),
    /// `$(...)`, `` `...` ``, or the mksh `${ ...;}` forms
    CmdSubst(CmdSubst),
    /// `$((...))` or the deprecated `$[...]`
    ArithmExp(ArithmExp),
    /// `<(...)` or `>(...)`
    ProcSubst(ProcSubst),
    /// An extended globbing expression such as `@(a|b)`
    ExtGlob(ExtGlob),
    /// A brace expression, produced by
    /// [`split_braces`](crate::simplify::split_braces)
    BraceExp(BraceExp),
}

impl WordPart {
    pub fn pos(&self) -> Pos {
        match self {
            WordPart::Lit(x) => x.pos(),
            WordPart::SglQuoted(x) => x.pos(),
            WordPart::DblQuoted(x) => x.pos(),
            WordPart::ParamExp(x) => x.pos(),
            WordPart::CmdSubst(x) => x.pos(),
            WordPart::ArithmExp(x) => x.pos(),
            WordPart::ProcSubst(x) => x.pos(),
            WordPart::ExtGlob(x) => x.pos(),
            WordPart::BraceExp(x) => x.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            WordPart::Lit(x) => x.end(),
            WordPart::SglQuoted(x) => x.end(),
            WordPart::DblQuoted(x) => x.end(),
            WordPart::ParamExp(x) => x.end(),
            WordPart::CmdSubst(x) => x.end(),
            WordPart::ArithmExp(x) => x.end(),
            WordPart::ProcSubst(x) => x.end(),
            WordPart::ExtGlob(x) => x.end(),
            WordPart::BraceExp(x) => x.end(),
        }
    }
}

/// An unquoted literal
///
/// The value holds the source text with backslash escapes intact, except
/// that escaped newlines (line continuations) are removed. The end position
/// is stored rather than computed, since removed continuations make the
/// source span longer than the value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Lit {
    pub value_pos: Pos,
    pub value_end: Pos,
    pub value: String,
}

impl Lit {
    pub fn pos(&self) -> Pos {
        self.value_pos
    }

    pub fn end(&self) -> Pos {
        self.value_end
    }
}

/// A single-quoted string
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SglQuoted {
    /// Position of the opening quote, or of the `$` for `$'...'`
    pub left: Pos,
    /// Position of the closing quote
    pub right: Pos,
    /// Whether the string is a `$'...'` string with C-style escapes
    pub dollar: bool,
    /// The bytes between the quotes, verbatim
    pub value: String,
}

impl SglQuoted {
    pub fn pos(&self) -> Pos {
        self.left
    }

    pub fn end(&self) -> Pos {
        self.right.after(1)
    }
}

/// A double-quoted string
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DblQuoted {
    /// Position of the opening quote, or of the `$` for `$"..."`
    pub left: Pos,
    /// Position of the closing quote
    pub right: Pos,
    /// Whether the string is a `$"..."` translated string
    pub dollar: bool,
    pub parts: Vec<WordPart>,
}

impl DblQuoted {
    pub fn pos(&self) -> Pos {
        self.left
    }

    pub fn end(&self) -> Pos {
        self.right.after(1)
    }
}

/// A parameter expansion
///
/// Short expansions (`$name`) set [`short`](Self::short) and use only the
/// [`param`](Self::param) field; all other fields describe the braced form.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParamExp {
    /// Position of the `$`
    pub dollar: Pos,
    /// Position of the closing `}`; invalid for short expansions
    pub rbrace: Pos,
    /// `$a` rather than `${a}`
    pub short: bool,
    /// `${!a}` (indirection, or names-matching with [`names`](Self::names))
    pub excl: bool,
    /// `${#a}` (length)
    pub length: bool,
    /// `${%a}` (width, mksh)
    pub width: bool,
    /// The parameter name
    pub param: Lit,
    /// `${a[i]}` index (Bash)
    pub index: Option<ArithmExpr>,
    /// `${a:x:y}` slice (Bash)
    pub slice: Option<Slice>,
    /// `${a/x/y}` replacement (Bash)
    pub repl: Option<Replace>,
    /// `${!prefix*}` or `${!prefix@}` (Bash)
    pub names: Option<NamesOperator>,
    /// Any other expansion operator with its operand word
    pub exp: Option<Expansion>,
}

impl ParamExp {
    pub fn pos(&self) -> Pos {
        self.dollar
    }

    pub fn end(&self) -> Pos {
        if self.short {
            self.param.end()
        } else {
            self.rbrace.after(1)
        }
    }
}

/// The `${a:x:y}` slice of a [`ParamExp`]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Slice {
    pub offset: Option<ArithmExpr>,
    pub length: Option<ArithmExpr>,
}

/// The `${a/x/y}` replacement of a [`ParamExp`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Replace {
    /// Whether all occurrences are replaced (`${a//x/y}`)
    pub all: bool,
    pub orig: Word,
    pub with: Word,
}

/// An expansion operator with its operand, e.g. the `:-b` of `${a:-b}`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expansion {
    pub op: ParExpOperator,
    /// The operand word; may be missing, as in `${a-}`
    pub word: Word,
}

/// A command substitution
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CmdSubst {
    /// Position of the `$` (or of the opening backquote)
    pub left: Pos,
    /// Position of the closing `)`, backquote, or `}`
    pub right: Pos,
    pub stmts: Vec<Stmt>,
    /// Whether the substitution uses backquotes
    pub backquotes: bool,
    /// Whether the substitution is the mksh `${ stmts;}` form, which runs
    /// in the current shell through a temporary file
    pub temp_file: bool,
    /// Whether the substitution is the mksh `${|stmts;}` form, which
    /// reads the result from the `REPL` variable
    pub repl_in: bool,
}

impl CmdSubst {
    pub fn pos(&self) -> Pos {
        self.left
    }

    pub fn end(&self) -> Pos {
        self.right.after(1)
    }
}

/// An arithmetic expansion: `$((...))` or the deprecated `$[...]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArithmExp {
    /// Position of the `$`
    pub left: Pos,
    /// Position of the closing `))` or `]`
    pub right: Pos,
    /// Whether the deprecated `$[...]` form is used
    pub bracket: bool,
    pub x: ArithmExpr,
}

impl ArithmExp {
    pub fn pos(&self) -> Pos {
        self.left
    }

    pub fn end(&self) -> Pos {
        self.right.after(if self.bracket { 1 } else { 2 })
    }
}

/// A process substitution: `<(...)` or `>(...)`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcSubst {
    /// Position of the operator
    pub op_pos: Pos,
    /// Position of the closing `)`
    pub rparen: Pos,
    pub op: ProcOperator,
    pub stmts: Vec<Stmt>,
}

impl ProcSubst {
    pub fn pos(&self) -> Pos {
        self.op_pos
    }

    pub fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

/// An extended globbing expression (Bash), e.g. `@(a|b)`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtGlob {
    /// Position of the operator
    pub op_pos: Pos,
    pub op: GlobOperator,
    /// The pattern between the parentheses, stored raw
    pub pattern: Lit,
}

impl ExtGlob {
    pub fn pos(&self) -> Pos {
        self.op_pos
    }

    pub fn end(&self) -> Pos {
        self.pattern.end().after(1)
    }
}

/// A brace expression such as `{a,b}` or `{1..4}`
///
/// The parser produces plain literals for brace expressions; this node only
/// appears after [`split_braces`](crate::simplify::split_braces) has been
/// applied to a word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BraceExp {
    /// Position of the `{`
    pub lbrace: Pos,
    /// Position of the `}`
    pub rbrace: Pos,
    /// Whether the expression is a sequence (`{x..y[..incr]}`)
    pub sequence: bool,
    /// Whether a sequence ranges over characters rather than numbers
    pub chars: bool,
    /// The elements between the braces
    pub elems: Vec<Word>,
}

impl BraceExp {
    pub fn pos(&self) -> Pos {
        self.lbrace
    }

    pub fn end(&self) -> Pos {
        self.rbrace.after(1)
    }
}

/// An arithmetic expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArithmExpr {
    Binary(Box<BinaryArithm>),
    Unary(Box<UnaryArithm>),
    Paren(Box<ParenArithm>),
    /// A number, a name, or any other word operand
    Word(Word),
}

impl ArithmExpr {
    pub fn pos(&self) -> Pos {
        match self {
            ArithmExpr::Binary(x) => x.pos(),
            ArithmExpr::Unary(x) => x.pos(),
            ArithmExpr::Paren(x) => x.pos(),
            ArithmExpr::Word(x) => x.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            ArithmExpr::Binary(x) => x.end(),
            ArithmExpr::Unary(x) => x.end(),
            ArithmExpr::Paren(x) => x.end(),
            ArithmExpr::Word(x) => x.end(),
        }
    }
}

/// A binary arithmetic expression
///
/// The ternary `a ? b : c` is encoded as a [`TernQuest`] node whose right
/// operand is a [`TernColon`] node.
///
/// [`TernQuest`]: BinAritOperator::TernQuest
/// [`TernColon`]: BinAritOperator::TernColon
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryArithm {
    pub op_pos: Pos,
    pub op: BinAritOperator,
    pub x: ArithmExpr,
    pub y: ArithmExpr,
}

impl BinaryArithm {
    pub fn pos(&self) -> Pos {
        self.x.pos()
    }

    pub fn end(&self) -> Pos {
        self.y.end()
    }
}

/// A unary arithmetic expression, prefix or postfix
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnaryArithm {
    pub op_pos: Pos,
    pub op: UnAritOperator,
    /// Whether the operator comes after the operand (`x++`)
    pub post: bool,
    pub x: ArithmExpr,
}

impl UnaryArithm {
    pub fn pos(&self) -> Pos {
        if self.post { self.x.pos() } else { self.op_pos }
    }

    pub fn end(&self) -> Pos {
        if self.post {
            self.op_pos.after(self.op.as_str().len())
        } else {
            self.x.end()
        }
    }
}

/// A parenthesized arithmetic expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParenArithm {
    pub lparen: Pos,
    pub rparen: Pos,
    pub x: ArithmExpr,
}

impl ParenArithm {
    pub fn pos(&self) -> Pos {
        self.lparen
    }

    pub fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

/// A test expression, as used within `[[ ... ]]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestExpr {
    Binary(Box<BinaryTest>),
    Unary(Box<UnaryTest>),
    Paren(Box<ParenTest>),
    Word(Word),
}

impl TestExpr {
    pub fn pos(&self) -> Pos {
        match self {
            TestExpr::Binary(x) => x.pos(),
            TestExpr::Unary(x) => x.pos(),
            TestExpr::Paren(x) => x.pos(),
            TestExpr::Word(x) => x.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            TestExpr::Binary(x) => x.end(),
            TestExpr::Unary(x) => x.end(),
            TestExpr::Paren(x) => x.end(),
            TestExpr::Word(x) => x.end(),
        }
    }
}

/// A binary test expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryTest {
    pub op_pos: Pos,
    pub op: BinTestOperator,
    pub x: TestExpr,
    pub y: TestExpr,
}

impl BinaryTest {
    pub fn pos(&self) -> Pos {
        self.x.pos()
    }

    pub fn end(&self) -> Pos {
        self.y.end()
    }
}

/// A unary test expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnaryTest {
    pub op_pos: Pos,
    pub op: UnTestOperator,
    pub x: TestExpr,
}

impl UnaryTest {
    pub fn pos(&self) -> Pos {
        self.op_pos
    }

    pub fn end(&self) -> Pos {
        self.x.end()
    }
}

/// A parenthesized test expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParenTest {
    pub lparen: Pos,
    pub rparen: Pos,
    pub x: TestExpr,
}

impl ParenTest {
    pub fn pos(&self) -> Pos {
        self.lparen
    }

    pub fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(offset: usize, value: &str) -> Lit {
        Lit {
            value_pos: Pos::new(offset, 1, offset as u64 + 1),
            value_end: Pos::new(offset + value.len(), 1, (offset + value.len()) as u64 + 1),
            value: value.to_string(),
        }
    }

    #[test]
    fn word_positions_come_from_parts() {
        let word = Word {
            parts: vec![WordPart::Lit(lit(4, "foo"))],
        };
        assert_eq!(word.pos().offset(), 4);
        assert_eq!(word.end().offset(), 7);
        assert!(!word.is_missing());
        assert_eq!(word.lit(), Some("foo"));
    }

    #[test]
    fn missing_word() {
        let word = Word::default();
        assert!(word.is_missing());
        assert_eq!(word.lit(), None);
        assert!(!word.pos().is_valid());
    }

    #[test]
    fn stmt_end_covers_redirects() {
        let word = Word {
            parts: vec![WordPart::Lit(lit(0, "echo"))],
        };
        let target = Word {
            parts: vec![WordPart::Lit(lit(6, "out"))],
        };
        let stmt = Stmt {
            position: word.pos(),
            cmd: Some(Command::Call(CallExpr { args: vec![word] })),
            redirs: vec![Redirect {
                op_pos: Pos::new(5, 1, 6),
                op: RedirOperator::FileOut,
                n: None,
                word: target,
                hdoc: None,
            }],
            ..Stmt::default()
        };
        assert_eq!(stmt.pos().offset(), 0);
        assert_eq!(stmt.end().offset(), 9);
        assert!(stmt.pos() <= stmt.end());
    }

    #[test]
    fn node_enclosure_invariant() {
        let x = Word {
            parts: vec![WordPart::Lit(lit(0, "a"))],
        };
        let y = Word {
            parts: vec![WordPart::Lit(lit(5, "b"))],
        };
        let cmd = BinaryCmd {
            op_pos: Pos::new(2, 1, 3),
            op: BinCmdOperator::AndStmt,
            x: Stmt {
                position: x.pos(),
                cmd: Some(Command::Call(CallExpr { args: vec![x] })),
                ..Stmt::default()
            },
            y: Stmt {
                position: y.pos(),
                cmd: Some(Command::Call(CallExpr { args: vec![y] })),
                ..Stmt::default()
            },
        };
        assert!(cmd.pos() <= cmd.x.pos());
        assert!(cmd.end() >= cmd.y.end());
    }

    #[test]
    fn unary_arithm_positions() {
        let operand = ArithmExpr::Word(Word {
            parts: vec![WordPart::Lit(lit(0, "i"))],
        });
        let post = UnaryArithm {
            op_pos: Pos::new(1, 1, 2),
            op: UnAritOperator::Inc,
            post: true,
            x: operand.clone(),
        };
        assert_eq!(post.pos().offset(), 0);
        assert_eq!(post.end().offset(), 3);

        let pre = UnaryArithm {
            op_pos: Pos::new(0, 1, 1),
            op: UnAritOperator::Not,
            post: false,
            x: ArithmExpr::Word(Word {
                parts: vec![WordPart::Lit(lit(1, "i"))],
            }),
        };
        assert_eq!(pre.pos().offset(), 0);
        assert_eq!(pre.end().offset(), 2);
    }
}
