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

//! Definition of errors that happen in the parser
//!
//! Errors fall into three families:
//!
//! - [`LexError`]: the input bytes themselves are unusable: invalid UTF-8,
//!   or a token forbidden by the selected dialect.
//! - [`SyntaxError`]: the token stream does not form a valid program. A
//!   syntax error is either *incomplete* (the input ended while a construct
//!   was still open, so the input is a prefix of a valid program) or
//!   *malformed* (no amount of further input can make it valid). The
//!   distinction is what lets a REPL prompt for a continuation line.
//! - I/O errors from the underlying reader, passed through unchanged.
//!
//! Every [`Error`] carries the source name and the position of the
//! offending token.

use crate::source::Pos;
use crate::token::LangVariant;
use std::fmt;
use std::rc::Rc;
use thiserror::Error as ThisError;

/// Entire result of parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Types of syntax errors
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{}", self.message())]
#[non_exhaustive]
pub enum SyntaxError {
    /// A single quotation lacks a closing `'`.
    UnclosedSingleQuote,
    /// A double quotation lacks a closing `"`.
    UnclosedDoubleQuote,
    /// A command substitution started with `` ` `` lacks a closing `` ` ``.
    UnclosedBackquote,
    /// A parameter expansion lacks a closing `}`.
    UnclosedParamExp,
    /// A command substitution started with `$(` lacks a closing `)`.
    UnclosedCmdSubst,
    /// An arithmetic expansion lacks its closing token.
    UnclosedArithmExp,
    /// A process substitution lacks a closing `)`.
    UnclosedProcSubst,
    /// An extended globbing expression lacks a closing `)`.
    UnclosedExtGlob,
    /// An array assignment value lacks a closing `)`.
    UnclosedArrayValue,
    /// A subshell lacks a closing `)`.
    UnclosedSubshell,
    /// A brace group lacks a closing `}`.
    UnclosedBlock,
    /// An `if` command lacks its closing `fi`.
    UnclosedIf,
    /// A `do` clause lacks its closing `done`.
    UnclosedDoClause,
    /// A `case` command lacks its closing `esac`.
    UnclosedCase,
    /// A test clause lacks its closing `]]`.
    UnclosedTestClause,
    /// A here-document operator was never followed by its content.
    MissingHereDocContent,
    /// A here-document content lacks its closing delimiter line.
    UnclosedHereDoc {
        /// The delimiter that was never found
        delim: String,
    },

    /// A token other than the expected one was found.
    Expected {
        /// Human description of the expected token, e.g. "`)`"
        what: &'static str,
    },
    /// A token that cannot begin or continue a command was found.
    UnexpectedToken,
    /// A function is being declared with an invalid name.
    InvalidFuncName,
    /// A redirection operator is missing its operand.
    MissingRedirOperand,
    /// A here-document operator is missing its delimiter word.
    MissingHereDocDelimiter,
    /// A parameter expansion has a missing or invalid name.
    InvalidParamName,
    /// A parameter expansion contains a malformed modifier.
    InvalidModifier,
    /// A value is assigned to something that is not an identifier.
    AssignToNonIdentifier,
    /// A `let` command has no expressions.
    MissingLetExpr,
    /// A test clause contains no expression.
    EmptyTestClause,
}

impl SyntaxError {
    /// Returns an error message describing the error.
    #[must_use]
    pub fn message(&self) -> &'static str {
        use SyntaxError::*;
        match self {
            UnclosedSingleQuote => "the single quote is not closed",
            UnclosedDoubleQuote => "the double quote is not closed",
            UnclosedBackquote => "the backquote is not closed",
            UnclosedParamExp => "the parameter expansion is not closed",
            UnclosedCmdSubst => "the command substitution is not closed",
            UnclosedArithmExp => "the arithmetic expansion is not closed",
            UnclosedProcSubst => "the process substitution is not closed",
            UnclosedExtGlob => "the extended globbing expression is not closed",
            UnclosedArrayValue => "the array assignment value is not closed",
            UnclosedSubshell => "the subshell is not closed",
            UnclosedBlock => "the brace group is missing its closing `}`",
            UnclosedIf => "the `if` command is missing its closing `fi`",
            UnclosedDoClause => "the `do` clause is missing its closing `done`",
            UnclosedCase => "the `case` command is missing its closing `esac`",
            UnclosedTestClause => "the test clause is missing its closing `]]`",
            MissingHereDocContent => "content of the here-document is missing",
            UnclosedHereDoc { .. } => {
                "the delimiter to close the here-document content is missing"
            }
            Expected { .. } => "unexpected token",
            UnexpectedToken => "the command starts with an inappropriate token",
            InvalidFuncName => "the function name is invalid",
            MissingRedirOperand => "the redirection operator is missing its operand",
            MissingHereDocDelimiter => "the here-document operator is missing its delimiter",
            InvalidParamName => "the parameter name is missing or invalid",
            InvalidModifier => "the parameter expansion contains a malformed modifier",
            AssignToNonIdentifier => "the assignment name is not a valid identifier",
            MissingLetExpr => "`let` is missing an expression",
            EmptyTestClause => "the test clause is missing its expression",
        }
    }

    /// Returns a label for annotating the error location.
    #[must_use]
    pub fn label(&self) -> &'static str {
        use SyntaxError::*;
        match self {
            UnclosedSingleQuote => "expected `'`",
            UnclosedDoubleQuote => "expected `\"`",
            UnclosedBackquote => "expected '`'",
            UnclosedParamExp | UnclosedBlock => "expected `}`",
            UnclosedCmdSubst | UnclosedProcSubst | UnclosedExtGlob | UnclosedArrayValue
            | UnclosedSubshell => "expected `)`",
            UnclosedArithmExp => "expected `))`",
            UnclosedIf => "expected `fi`",
            UnclosedDoClause => "expected `done`",
            UnclosedCase => "expected `esac`",
            UnclosedTestClause => "expected `]]`",
            MissingHereDocContent => "content not found",
            UnclosedHereDoc { .. } => "missing delimiter",
            Expected { what } => what,
            UnexpectedToken => "does not begin a valid command",
            InvalidFuncName => "not a valid function name",
            MissingRedirOperand => "expected a redirection operand",
            MissingHereDocDelimiter => "expected a delimiter word",
            InvalidParamName => "expected a parameter name",
            InvalidModifier => "broken modifier",
            AssignToNonIdentifier => "not a valid variable name",
            MissingLetExpr => "expected an arithmetic expression",
            EmptyTestClause => "expected a test expression",
        }
    }

    /// Returns true if the error means the input ended while a construct
    /// was still open.
    ///
    /// An incomplete error indicates that the input so far is a prefix of a
    /// valid program, so an interactive reader can ask for more input
    /// rather than reporting a failure.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        use SyntaxError::*;
        matches!(
            self,
            UnclosedSingleQuote
                | UnclosedDoubleQuote
                | UnclosedBackquote
                | UnclosedParamExp
                | UnclosedCmdSubst
                | UnclosedArithmExp
                | UnclosedProcSubst
                | UnclosedExtGlob
                | UnclosedArrayValue
                | UnclosedSubshell
                | UnclosedBlock
                | UnclosedIf
                | UnclosedDoClause
                | UnclosedCase
                | UnclosedTestClause
                | MissingHereDocContent
                | UnclosedHereDoc { .. }
        )
    }
}

/// Types of lexical errors
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[non_exhaustive]
pub enum LexError {
    /// The input contains a byte sequence that is not valid UTF-8.
    #[error("invalid UTF-8 byte sequence")]
    InvalidUtf8,
    /// A token is not allowed in the selected dialect.
    #[error("`{feature}` is not supported in {lang} mode")]
    Forbidden {
        /// The offending token or construct, as written
        feature: &'static str,
        /// The dialect that forbids it
        lang: LangVariant,
    },
}

/// Cause of a parser [`Error`]
#[derive(Clone, Debug, ThisError)]
pub enum ErrorCause {
    /// The input bytes are unusable.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream does not form a valid program.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The underlying reader or writer failed.
    #[error("cannot read source: {0}")]
    Io(Rc<std::io::Error>),
}

impl From<std::io::Error> for ErrorCause {
    fn from(error: std::io::Error) -> Self {
        ErrorCause::Io(Rc::new(error))
    }
}

impl PartialEq for ErrorCause {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorCause::Lex(a), ErrorCause::Lex(b)) => a == b,
            (ErrorCause::Syntax(a), ErrorCause::Syntax(b)) => a == b,
            (ErrorCause::Io(a), ErrorCause::Io(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// An error that occurred during parsing
#[derive(Clone, Debug, PartialEq, ThisError)]
pub struct Error {
    /// What happened
    pub cause: ErrorCause,
    /// Name of the source the error occurred in
    pub name: String,
    /// Position of the offending token or character
    pub pos: Pos,
}

impl Error {
    /// Returns true if the cause is an incomplete syntax error.
    ///
    /// See [`SyntaxError::is_incomplete`].
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        match &self.cause {
            ErrorCause::Syntax(e) => e.is_incomplete(),
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.name,
            self.pos.line(),
            self.pos.col(),
            self.cause
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_classification() {
        assert!(SyntaxError::UnclosedSingleQuote.is_incomplete());
        assert!(SyntaxError::UnclosedIf.is_incomplete());
        assert!(
            SyntaxError::UnclosedHereDoc {
                delim: "EOF".to_string()
            }
            .is_incomplete()
        );
        assert!(!SyntaxError::UnexpectedToken.is_incomplete());
        assert!(!SyntaxError::Expected { what: "`)`" }.is_incomplete());
        assert!(!SyntaxError::InvalidFuncName.is_incomplete());
    }

    #[test]
    fn error_display_includes_position() {
        let error = Error {
            cause: SyntaxError::UnclosedIf.into(),
            name: "test.sh".to_string(),
            pos: Pos::new(10, 2, 3),
        };
        assert_eq!(
            error.to_string(),
            "test.sh:2:3: the `if` command is missing its closing `fi`"
        );
        assert!(error.is_incomplete());
    }

    #[test]
    fn lex_error_display() {
        let cause: ErrorCause = LexError::Forbidden {
            feature: "<<<",
            lang: LangVariant::Posix,
        }
        .into();
        assert_eq!(cause.to_string(), "`<<<` is not supported in posix mode");
    }
}
