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

//! Token identifiers and operator classification
//!
//! This module defines the shell dialects, the reserved words, and the
//! operator enumerations stored in the syntax tree. Every operator knows its
//! canonical string form (its `Display` implementation) and a stable numeric
//! code used by the typed JSON encoding. The numeric codes live in disjoint
//! ranges per enumeration so that a code never decodes as the wrong kind of
//! operator.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shell language dialect
///
/// The dialect selects which grammar features the parser accepts.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LangVariant {
    /// GNU Bash, the default
    #[default]
    Bash,
    /// Strict POSIX sh
    Posix,
    /// MirBSD Korn shell
    MirBsdKorn,
    /// Bats (Bash Automated Testing System)
    Bats,
    /// Infer the dialect from the shebang line or the file name
    Auto,
}

impl LangVariant {
    /// Returns the conventional name of the dialect.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LangVariant::Bash => "bash",
            LangVariant::Posix => "posix",
            LangVariant::MirBsdKorn => "mksh",
            LangVariant::Bats => "bats",
            LangVariant::Auto => "auto",
        }
    }

    /// Returns true for the dialects that extend POSIX sh.
    ///
    /// Most Bash extensions are also accepted by mksh and Bats; the few
    /// that are not are gated individually in the parser.
    #[must_use]
    pub(crate) fn is_extended(self) -> bool {
        !matches!(self, LangVariant::Posix)
    }
}

impl fmt::Display for LangVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error value indicating that a string does not name a dialect
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("not a shell dialect")]
pub struct ParseLangVariantError;

impl FromStr for LangVariant {
    type Err = ParseLangVariantError;

    fn from_str(s: &str) -> Result<Self, ParseLangVariantError> {
        match s {
            "bash" => Ok(LangVariant::Bash),
            "posix" | "sh" => Ok(LangVariant::Posix),
            "mksh" => Ok(LangVariant::MirBsdKorn),
            "bats" => Ok(LangVariant::Bats),
            "auto" => Ok(LangVariant::Auto),
            _ => Err(ParseLangVariantError),
        }
    }
}

/// Error value indicating that a string is not a keyword
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("not a keyword")]
pub struct ParseKeywordError;

/// Token identifier for reserved words
///
/// Whether a token is actually regarded as a reserved word depends on
/// context; the parser only consults this classification at command
/// position or where the grammar calls for a specific word.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Keyword {
    /// `!`
    Bang,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `[[`
    DblOpenBracket,
    /// `]]`
    DblCloseBracket,
    Case,
    Coproc,
    Do,
    Done,
    Elif,
    Else,
    Esac,
    Fi,
    For,
    Function,
    If,
    In,
    Select,
    Then,
    Time,
    Until,
    While,
}

impl Keyword {
    /// Returns the literal string representation of the keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use Keyword::*;
        match self {
            Bang => "!",
            OpenBrace => "{",
            CloseBrace => "}",
            DblOpenBracket => "[[",
            DblCloseBracket => "]]",
            Case => "case",
            Coproc => "coproc",
            Do => "do",
            Done => "done",
            Elif => "elif",
            Else => "else",
            Esac => "esac",
            Fi => "fi",
            For => "for",
            Function => "function",
            If => "if",
            In => "in",
            Select => "select",
            Then => "then",
            Time => "time",
            Until => "until",
            While => "while",
        }
    }

    /// Returns true if the keyword exists in the given dialect.
    #[must_use]
    pub(crate) fn is_in(self, lang: LangVariant) -> bool {
        use Keyword::*;
        match self {
            DblOpenBracket | DblCloseBracket | Function | Select | Coproc | Time => {
                lang.is_extended()
            }
            _ => true,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Keyword {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, ParseKeywordError> {
        use Keyword::*;
        match s {
            "!" => Ok(Bang),
            "{" => Ok(OpenBrace),
            "}" => Ok(CloseBrace),
            "[[" => Ok(DblOpenBracket),
            "]]" => Ok(DblCloseBracket),
            "case" => Ok(Case),
            "coproc" => Ok(Coproc),
            "do" => Ok(Do),
            "done" => Ok(Done),
            "elif" => Ok(Elif),
            "else" => Ok(Else),
            "esac" => Ok(Esac),
            "fi" => Ok(Fi),
            "for" => Ok(For),
            "function" => Ok(Function),
            "if" => Ok(If),
            "in" => Ok(In),
            "select" => Ok(Select),
            "then" => Ok(Then),
            "time" => Ok(Time),
            "until" => Ok(Until),
            "while" => Ok(While),
            _ => Err(ParseKeywordError),
        }
    }
}

/// Operator token identifier
///
/// This enum covers the control and redirection operators recognized at
/// token position. Expansion openers (`$(`, `${`, `<(`, ...) are not
/// operators; they are recognized inside words by the word lexer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// Newline
    Newline,
    /// `&`
    And,
    /// `&&`
    AndAnd,
    /// `&>`
    AndGreater,
    /// `&>>`
    AndDblGreater,
    /// `|`
    Bar,
    /// `|&`
    BarAnd,
    /// `||`
    BarBar,
    /// `;`
    Semicolon,
    /// `;;`
    DblSemicolon,
    /// `;&`
    SemicolonAnd,
    /// `;;&`
    DblSemicolonAnd,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `<`
    Less,
    /// `<&`
    LessAnd,
    /// `<<`
    DblLess,
    /// `<<-`
    DblLessDash,
    /// `<<<`
    TripleLess,
    /// `<>`
    LessGreater,
    /// `>`
    Greater,
    /// `>&`
    GreaterAnd,
    /// `>>`
    DblGreater,
    /// `>|`
    GreaterBar,
}

impl Operator {
    /// Returns the canonical string form of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use Operator::*;
        match self {
            Newline => "\n",
            And => "&",
            AndAnd => "&&",
            AndGreater => "&>",
            AndDblGreater => "&>>",
            Bar => "|",
            BarAnd => "|&",
            BarBar => "||",
            Semicolon => ";",
            DblSemicolon => ";;",
            SemicolonAnd => ";&",
            DblSemicolonAnd => ";;&",
            OpenParen => "(",
            CloseParen => ")",
            Less => "<",
            LessAnd => "<&",
            DblLess => "<<",
            DblLessDash => "<<-",
            TripleLess => "<<<",
            LessGreater => "<>",
            Greater => ">",
            GreaterAnd => ">&",
            DblGreater => ">>",
            GreaterBar => ">|",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error value indicating that an operator does not convert to the
/// requested classification
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("not a valid operator for this context")]
pub struct TryFromOperatorError;

/// Error value indicating that a numeric operator code is unknown
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("unknown operator code {0}")]
pub struct UnknownOperatorCode(pub u32);

macro_rules! operator_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal => $str:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[repr(u32)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $code,
            )*
        }

        impl $name {
            /// Returns the canonical string form of the operator.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)*
                }
            }

            /// Returns the stable numeric code used by the typed JSON
            /// encoding.
            #[must_use]
            pub const fn code(self) -> u32 {
                self as u32
            }

            /// Looks up an operator by its numeric code.
            pub fn from_code(code: u32) -> Result<Self, UnknownOperatorCode> {
                match code {
                    $($code => Ok(Self::$variant),)*
                    _ => Err(UnknownOperatorCode(code)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

operator_enum! {
    /// Operator joining the two halves of a [`BinaryCmd`](crate::syntax::BinaryCmd)
    BinCmdOperator {
        /// `&&`
        AndStmt = 10 => "&&",
        /// `||`
        OrStmt = 11 => "||",
        /// `|`
        Pipe = 12 => "|",
        /// `|&` (pipe both stdout and stderr)
        PipeAll = 13 => "|&",
    }
}

impl BinCmdOperator {
    /// Returns true for the two pipe operators, which bind tighter than
    /// `&&` and `||`.
    #[must_use]
    pub fn is_pipe(self) -> bool {
        matches!(self, BinCmdOperator::Pipe | BinCmdOperator::PipeAll)
    }
}

impl TryFrom<Operator> for BinCmdOperator {
    type Error = TryFromOperatorError;

    fn try_from(op: Operator) -> Result<Self, TryFromOperatorError> {
        match op {
            Operator::AndAnd => Ok(BinCmdOperator::AndStmt),
            Operator::BarBar => Ok(BinCmdOperator::OrStmt),
            Operator::Bar => Ok(BinCmdOperator::Pipe),
            Operator::BarAnd => Ok(BinCmdOperator::PipeAll),
            _ => Err(TryFromOperatorError),
        }
    }
}

operator_enum! {
    /// Terminator of a [`CaseItem`](crate::syntax::CaseItem)
    CaseOperator {
        /// `;;` (terminate the case construct)
        Break = 20 => ";;",
        /// `;&` (unconditionally run the next pattern list's body)
        Fallthrough = 21 => ";&",
        /// `;;&` (try the next pattern lists in turn)
        Resume = 22 => ";;&",
    }
}

impl TryFrom<Operator> for CaseOperator {
    type Error = TryFromOperatorError;

    fn try_from(op: Operator) -> Result<Self, TryFromOperatorError> {
        match op {
            Operator::DblSemicolon => Ok(CaseOperator::Break),
            Operator::SemicolonAnd => Ok(CaseOperator::Fallthrough),
            Operator::DblSemicolonAnd => Ok(CaseOperator::Resume),
            _ => Err(TryFromOperatorError),
        }
    }
}

operator_enum! {
    /// Redirection operator
    RedirOperator {
        /// `>` (open a file for output)
        FileOut = 30 => ">",
        /// `>>` (open a file for appending)
        FileAppend = 31 => ">>",
        /// `<` (open a file for input)
        FileIn = 32 => "<",
        /// `<>` (open a file for input and output)
        FileInOut = 33 => "<>",
        /// `<&` (duplicate or close an input file descriptor)
        FdIn = 34 => "<&",
        /// `>&` (duplicate or close an output file descriptor)
        FdOut = 35 => ">&",
        /// `>|` (open a file for output, clobbering it)
        FileClobber = 36 => ">|",
        /// `<<` (here-document)
        HereDoc = 37 => "<<",
        /// `<<-` (here-document with leading tabs stripped)
        HereDocDash = 38 => "<<-",
        /// `<<<` (here-string)
        HereString = 39 => "<<<",
        /// `&>` (redirect both stdout and stderr)
        AllOut = 40 => "&>",
        /// `&>>` (append both stdout and stderr)
        AllAppend = 41 => "&>>",
    }
}

impl RedirOperator {
    /// Returns true for the two here-document operators.
    #[must_use]
    pub fn is_heredoc(self) -> bool {
        matches!(self, RedirOperator::HereDoc | RedirOperator::HereDocDash)
    }

    /// Returns true for the operators that are Bash extensions.
    #[must_use]
    pub(crate) fn is_extension(self) -> bool {
        matches!(
            self,
            RedirOperator::HereString | RedirOperator::AllOut | RedirOperator::AllAppend
        )
    }
}

impl TryFrom<Operator> for RedirOperator {
    type Error = TryFromOperatorError;

    fn try_from(op: Operator) -> Result<Self, TryFromOperatorError> {
        match op {
            Operator::Greater => Ok(RedirOperator::FileOut),
            Operator::DblGreater => Ok(RedirOperator::FileAppend),
            Operator::Less => Ok(RedirOperator::FileIn),
            Operator::LessGreater => Ok(RedirOperator::FileInOut),
            Operator::LessAnd => Ok(RedirOperator::FdIn),
            Operator::GreaterAnd => Ok(RedirOperator::FdOut),
            Operator::GreaterBar => Ok(RedirOperator::FileClobber),
            Operator::DblLess => Ok(RedirOperator::HereDoc),
            Operator::DblLessDash => Ok(RedirOperator::HereDocDash),
            Operator::TripleLess => Ok(RedirOperator::HereString),
            Operator::AndGreater => Ok(RedirOperator::AllOut),
            Operator::AndDblGreater => Ok(RedirOperator::AllAppend),
            _ => Err(TryFromOperatorError),
        }
    }
}

operator_enum! {
    /// Process substitution operator
    ProcOperator {
        /// `<(` (substitute a file read from the command)
        CmdIn = 50 => "<(",
        /// `>(` (substitute a file written to the command)
        CmdOut = 51 => ">(",
    }
}

operator_enum! {
    /// Extended globbing operator
    GlobOperator {
        /// `?(` (zero or one occurrence)
        ZeroOrOne = 60 => "?(",
        /// `*(` (zero or more occurrences)
        ZeroOrMore = 61 => "*(",
        /// `+(` (one or more occurrences)
        OneOrMore = 62 => "+(",
        /// `@(` (exactly one occurrence)
        One = 63 => "@(",
        /// `!(` (anything but)
        Not = 64 => "!(",
    }
}

operator_enum! {
    /// Parameter expansion operator (`${name op word}`)
    ParExpOperator {
        /// `+` (alternate value if set)
        AlternateUnset = 70 => "+",
        /// `:+` (alternate value if set and non-empty)
        AlternateUnsetOrNull = 71 => ":+",
        /// `-` (default value if unset)
        DefaultUnset = 72 => "-",
        /// `:-` (default value if unset or empty)
        DefaultUnsetOrNull = 73 => ":-",
        /// `?` (error if unset)
        ErrorUnset = 74 => "?",
        /// `:?` (error if unset or empty)
        ErrorUnsetOrNull = 75 => ":?",
        /// `=` (assign default if unset)
        AssignUnset = 76 => "=",
        /// `:=` (assign default if unset or empty)
        AssignUnsetOrNull = 77 => ":=",
        /// `%` (remove shortest suffix)
        RemSmallSuffix = 78 => "%",
        /// `%%` (remove longest suffix)
        RemLargeSuffix = 79 => "%%",
        /// `#` (remove shortest prefix)
        RemSmallPrefix = 80 => "#",
        /// `##` (remove longest prefix)
        RemLargePrefix = 81 => "##",
        /// `^` (uppercase the first match)
        UpperFirst = 82 => "^",
        /// `^^` (uppercase all matches)
        UpperAll = 83 => "^^",
        /// `,` (lowercase the first match)
        LowerFirst = 84 => ",",
        /// `,,` (lowercase all matches)
        LowerAll = 85 => ",,",
        /// `@` (transformation, e.g. `${var@Q}`)
        OtherParamOps = 86 => "@",
    }
}

operator_enum! {
    /// Operator that expands to the names matching a prefix
    /// (`${!prefix*}` and `${!prefix@}`)
    NamesOperator {
        /// `*` (expand to a single word)
        Prefix = 190 => "*",
        /// `@` (expand to one word per name)
        PrefixWords = 191 => "@",
    }
}

operator_enum! {
    /// Unary arithmetic operator
    UnAritOperator {
        /// `+`
        Plus = 90 => "+",
        /// `-`
        Minus = 91 => "-",
        /// `!`
        Not = 92 => "!",
        /// `~`
        BitNegation = 93 => "~",
        /// `++`
        Inc = 94 => "++",
        /// `--`
        Dec = 95 => "--",
    }
}

operator_enum! {
    /// Binary arithmetic operator
    BinAritOperator {
        /// `,`
        Comma = 100 => ",",
        /// `=`
        Assgn = 101 => "=",
        /// `+=`
        AddAssgn = 102 => "+=",
        /// `-=`
        SubAssgn = 103 => "-=",
        /// `*=`
        MulAssgn = 104 => "*=",
        /// `/=`
        QuoAssgn = 105 => "/=",
        /// `%=`
        RemAssgn = 106 => "%=",
        /// `&=`
        AndAssgn = 107 => "&=",
        /// `^=`
        XorAssgn = 108 => "^=",
        /// `|=`
        OrAssgn = 109 => "|=",
        /// `<<=`
        ShlAssgn = 110 => "<<=",
        /// `>>=`
        ShrAssgn = 111 => ">>=",
        /// `?` (first half of the ternary operator)
        TernQuest = 112 => "?",
        /// `:` (second half of the ternary operator)
        TernColon = 113 => ":",
        /// `||`
        OrArit = 114 => "||",
        /// `&&`
        AndArit = 115 => "&&",
        /// `|`
        Or = 116 => "|",
        /// `^`
        Xor = 117 => "^",
        /// `&`
        And = 118 => "&",
        /// `==`
        Eql = 119 => "==",
        /// `!=`
        Neq = 120 => "!=",
        /// `<`
        Lss = 121 => "<",
        /// `>`
        Gtr = 122 => ">",
        /// `<=`
        Leq = 123 => "<=",
        /// `>=`
        Geq = 124 => ">=",
        /// `<<`
        Shl = 125 => "<<",
        /// `>>`
        Shr = 126 => ">>",
        /// `+`
        Add = 127 => "+",
        /// `-`
        Sub = 128 => "-",
        /// `*`
        Mul = 129 => "*",
        /// `/`
        Quo = 130 => "/",
        /// `%`
        Rem = 131 => "%",
        /// `**`
        Pow = 132 => "**",
    }
}

impl BinAritOperator {
    /// Returns the binding power of the operator, higher binding tighter.
    ///
    /// The levels follow the C precedence table: comma, assignments,
    /// ternary, `||`, `&&`, `|`, `^`, `&`, equality, relational, shifts,
    /// additive, multiplicative, exponentiation.
    #[must_use]
    pub(crate) fn precedence(self) -> u8 {
        use BinAritOperator::*;
        match self {
            Comma => 1,
            Assgn | AddAssgn | SubAssgn | MulAssgn | QuoAssgn | RemAssgn | AndAssgn
            | XorAssgn | OrAssgn | ShlAssgn | ShrAssgn => 2,
            TernQuest | TernColon => 3,
            OrArit => 4,
            AndArit => 5,
            Or => 6,
            Xor => 7,
            And => 8,
            Eql | Neq => 9,
            Lss | Gtr | Leq | Geq => 10,
            Shl | Shr => 11,
            Add | Sub => 12,
            Mul | Quo | Rem => 13,
            Pow => 14,
        }
    }

    /// Returns true for right-associative operators.
    #[must_use]
    pub(crate) fn is_right_assoc(self) -> bool {
        use BinAritOperator::*;
        matches!(
            self,
            Assgn
                | AddAssgn
                | SubAssgn
                | MulAssgn
                | QuoAssgn
                | RemAssgn
                | AndAssgn
                | XorAssgn
                | OrAssgn
                | ShlAssgn
                | ShrAssgn
                | TernQuest
                | TernColon
                | Pow
        )
    }

    /// Returns true for the assignment operators.
    #[must_use]
    pub(crate) fn is_assignment(self) -> bool {
        use BinAritOperator::*;
        matches!(
            self,
            Assgn
                | AddAssgn
                | SubAssgn
                | MulAssgn
                | QuoAssgn
                | RemAssgn
                | AndAssgn
                | XorAssgn
                | OrAssgn
                | ShlAssgn
                | ShrAssgn
        )
    }
}

operator_enum! {
    /// Unary test operator (`[[ op word ]]`)
    UnTestOperator {
        /// `-e` (file exists)
        Exists = 140 => "-e",
        /// `-f` (regular file)
        RegFile = 141 => "-f",
        /// `-d` (directory)
        Direct = 142 => "-d",
        /// `-c` (character special file)
        CharSp = 143 => "-c",
        /// `-b` (block special file)
        BlckSp = 144 => "-b",
        /// `-p` (named pipe)
        NmPipe = 145 => "-p",
        /// `-S` (socket)
        Socket = 146 => "-S",
        /// `-L` (symbolic link)
        SmbLink = 147 => "-L",
        /// `-h` (symbolic link)
        SmbLinkH = 148 => "-h",
        /// `-k` (sticky bit set)
        Sticky = 149 => "-k",
        /// `-g` (set-group-id bit set)
        GidSet = 150 => "-g",
        /// `-u` (set-user-id bit set)
        UidSet = 151 => "-u",
        /// `-G` (owned by the effective group)
        GrpOwn = 152 => "-G",
        /// `-O` (owned by the effective user)
        UsrOwn = 153 => "-O",
        /// `-N` (modified since last read)
        Modif = 154 => "-N",
        /// `-r` (readable)
        Read = 155 => "-r",
        /// `-w` (writable)
        Write = 156 => "-w",
        /// `-x` (executable)
        Exec = 157 => "-x",
        /// `-s` (non-empty file)
        NoEmpty = 158 => "-s",
        /// `-t` (file descriptor is a terminal)
        FdTerm = 159 => "-t",
        /// `-z` (empty string)
        EmpStr = 160 => "-z",
        /// `-n` (non-empty string)
        NempStr = 161 => "-n",
        /// `-o` (shell option enabled)
        OptSet = 162 => "-o",
        /// `-v` (variable set)
        VarSet = 163 => "-v",
        /// `-R` (variable set and a name reference)
        RefVar = 164 => "-R",
        /// `-a` (file exists, deprecated synonym of `-e`)
        ExistsA = 165 => "-a",
        /// `!`
        Not = 166 => "!",
    }
}

operator_enum! {
    /// Binary test operator (`[[ word op word ]]`)
    BinTestOperator {
        /// `=~` (regular expression match)
        ReMatch = 170 => "=~",
        /// `-nt` (newer than)
        Newer = 171 => "-nt",
        /// `-ot` (older than)
        Older = 172 => "-ot",
        /// `-ef` (same device and inode)
        DevIno = 173 => "-ef",
        /// `-eq` (numerically equal)
        Eql = 174 => "-eq",
        /// `-ne` (numerically unequal)
        Neq = 175 => "-ne",
        /// `-le` (numerically less than or equal)
        Leq = 176 => "-le",
        /// `-ge` (numerically greater than or equal)
        Geq = 177 => "-ge",
        /// `-lt` (numerically less than)
        Lss = 178 => "-lt",
        /// `-gt` (numerically greater than)
        Gtr = 179 => "-gt",
        /// `&&`
        AndTest = 180 => "&&",
        /// `||`
        OrTest = 181 => "||",
        /// `==` (pattern match)
        Match = 182 => "==",
        /// `=` (pattern match, POSIX spelling)
        MatchShort = 183 => "=",
        /// `!=` (pattern mismatch)
        NoMatch = 184 => "!=",
        /// `<` (lexicographically before)
        Before = 185 => "<",
        /// `>` (lexicographically after)
        After = 186 => ">",
    }
}

impl FromStr for UnTestOperator {
    type Err = TryFromOperatorError;

    fn from_str(s: &str) -> Result<Self, TryFromOperatorError> {
        use UnTestOperator::*;
        match s {
            "-e" => Ok(Exists),
            "-f" => Ok(RegFile),
            "-d" => Ok(Direct),
            "-c" => Ok(CharSp),
            "-b" => Ok(BlckSp),
            "-p" => Ok(NmPipe),
            "-S" => Ok(Socket),
            "-L" => Ok(SmbLink),
            "-h" => Ok(SmbLinkH),
            "-k" => Ok(Sticky),
            "-g" => Ok(GidSet),
            "-u" => Ok(UidSet),
            "-G" => Ok(GrpOwn),
            "-O" => Ok(UsrOwn),
            "-N" => Ok(Modif),
            "-r" => Ok(Read),
            "-w" => Ok(Write),
            "-x" => Ok(Exec),
            "-s" => Ok(NoEmpty),
            "-t" => Ok(FdTerm),
            "-z" => Ok(EmpStr),
            "-n" => Ok(NempStr),
            "-o" => Ok(OptSet),
            "-v" => Ok(VarSet),
            "-R" => Ok(RefVar),
            "-a" => Ok(ExistsA),
            "!" => Ok(Not),
            _ => Err(TryFromOperatorError),
        }
    }
}

impl FromStr for BinTestOperator {
    type Err = TryFromOperatorError;

    fn from_str(s: &str) -> Result<Self, TryFromOperatorError> {
        use BinTestOperator::*;
        match s {
            "=~" => Ok(ReMatch),
            "-nt" => Ok(Newer),
            "-ot" => Ok(Older),
            "-ef" => Ok(DevIno),
            "-eq" => Ok(Eql),
            "-ne" => Ok(Neq),
            "-le" => Ok(Leq),
            "-ge" => Ok(Geq),
            "-lt" => Ok(Lss),
            "-gt" => Ok(Gtr),
            "&&" => Ok(AndTest),
            "||" => Ok(OrTest),
            "==" => Ok(Match),
            "=" => Ok(MatchShort),
            "!=" => Ok(NoMatch),
            "<" => Ok(Before),
            ">" => Ok(After),
            _ => Err(TryFromOperatorError),
        }
    }
}
