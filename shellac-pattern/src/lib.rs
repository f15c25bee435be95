// This file is part of shellac, a shell script parser and formatter.
// Copyright (C) 2026 the shellac authors

//! This crate translates shell globbing patterns into regular expression
//! strings.
//!
//! The translation supports the following pattern syntax:
//!
//! - Any single character (`?`)
//! - Any character sequence (`*`)
//! - Backslash escapes (`\x` matches `x` literally)
//! - Bracket expressions (`[...]`)
//!     - Character literals
//!     - Character ranges (e.g. `a-z`)
//!     - Complement (`[!...]` or `[^...]`)
//!     - Collating symbols (e.g. `[.ch.]`)
//!     - Equivalence classes (e.g. `[=a=]`)
//!     - Character classes (`[:alpha:]`)
//!
//! The emitted string uses the syntax of the `regex` crate (and of most
//! POSIX ERE engines): `?` becomes `.`, `*` becomes `.*` (or the lazy `.*?`
//! when [greedy](Config::greedy) is off), bracket expressions are carried
//! over with `!` rewritten to `^`, and every other regex metacharacter is
//! backslash-escaped. Character classes are validated against the ASCII
//! class names known to `regex-syntax` and preserved verbatim.
//!
//! # Examples
//!
//! ```
//! # use shellac_pattern::{Config, to_regex};
//! assert_eq!(to_regex("foo*.sh", &Config::default()).unwrap(), "foo(?s:.)*\\.sh");
//! assert_eq!(to_regex("[!a-z]?", &Config::default()).unwrap(), "[^a-z](?s:.)");
//! ```

use std::fmt::Write as _;
use thiserror::Error;

mod ast;

pub use ast::{Ast, Atom, Bracket, BracketAtom, BracketItem};

/// Error in pattern translation
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// A `[` is not matched with a closing `]`.
    #[error("unclosed bracket expression")]
    UnclosedBracket,
    /// A `[:` ... `:]` names a character class that does not exist.
    #[error("undefined character class {0:?}")]
    UndefinedCharClass(String),
    /// A character class is used as a bound of a character range.
    #[error("character class {0:?} cannot be a range bound")]
    CharClassInRange(String),
    /// A collating symbol (`[.x.]`) or equivalence class (`[=x=]`) is empty.
    #[error("empty collating symbol")]
    EmptyCollatingSymbol,
    /// The pattern ends in the middle of a backslash escape.
    #[error("incomplete escape at end of pattern")]
    TrailingBackslash,
}

/// Options that modify the translation
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Config {
    /// Whether `*` should match as many characters as possible
    ///
    /// When off, `*` translates to the lazy `(?s:.)*?` so that the regex
    /// engine prefers the shortest match, as required for `${var#pat}` and
    /// `${var%pat}` expansion.
    pub greedy: bool,

    /// Whether the regex must match the entire subject string
    ///
    /// When on, the result is wrapped in `^` and `$` anchors.
    pub entire_string: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            greedy: true,
            entire_string: false,
        }
    }
}

/// Translates a globbing pattern to a regular expression string.
///
/// The result matches the same set of strings as the pattern. Malformed
/// patterns yield a typed [`Error`].
pub fn to_regex(pattern: &str, config: &Config) -> Result<String, Error> {
    let ast = Ast::new(pattern)?;
    let mut regex = String::with_capacity(pattern.len().saturating_add(8));
    if config.entire_string {
        regex.write_char('^').unwrap();
    }
    ast.fmt_regex(config, &mut regex)?;
    if config.entire_string {
        regex.write_char('$').unwrap();
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(pattern: &str) -> String {
        to_regex(pattern, &Config::default()).unwrap()
    }

    #[test]
    fn literal_pattern() {
        assert_eq!(translate("abc"), "abc");
        assert_eq!(translate("a.c"), r"a\.c");
        assert_eq!(translate("a+b(c)"), r"a\+b\(c\)");
    }

    #[test]
    fn any_char_and_any_string() {
        assert_eq!(translate("?"), "(?s:.)");
        assert_eq!(translate("*"), "(?s:.)*");
        assert_eq!(translate("a*b?c"), r"a(?s:.)*b(?s:.)c");
    }

    #[test]
    fn non_greedy_star() {
        let config = Config {
            greedy: false,
            ..Config::default()
        };
        assert_eq!(to_regex("a*b", &config).unwrap(), "a(?s:.)*?b");
    }

    #[test]
    fn entire_string_anchors() {
        let config = Config {
            entire_string: true,
            ..Config::default()
        };
        assert_eq!(to_regex("a*", &config).unwrap(), "^a(?s:.)*$");
    }

    #[test]
    fn backslash_escapes() {
        assert_eq!(translate(r"\*"), r"\*");
        assert_eq!(translate(r"\a"), "a");
        assert_eq!(translate(r"\["), r"\[");
        assert_eq!(to_regex("\\", &Config::default()), Err(Error::TrailingBackslash));
    }

    #[test]
    fn bracket_expressions() {
        assert_eq!(translate("[abc]"), "[abc]");
        assert_eq!(translate("[a-z]"), "[a-z]");
        assert_eq!(translate("[!a-z]"), "[^a-z]");
        assert_eq!(translate("[^a-z]"), "[^a-z]");
        assert_eq!(translate("[[:digit:]]"), "[[:digit:]]");
        assert_eq!(translate("[[:alpha:][:digit:]_]"), "[[:alpha:][:digit:]_]");
    }

    #[test]
    fn bracket_metacharacters() {
        // A leading `]` is a literal member, not a terminator.
        assert_eq!(translate("[]a]"), r"[\]a]");
        assert_eq!(translate("[!]a]"), r"[^\]a]");
        // `[` needs escaping inside a regex class.
        assert_eq!(translate("[a[b]"), r"[a\[b]");
        assert_eq!(translate("[a^b]"), r"[a\^b]");
    }

    #[test]
    fn unclosed_bracket_is_error() {
        assert_eq!(to_regex("[abc", &Config::default()), Err(Error::UnclosedBracket));
        assert_eq!(to_regex("x[", &Config::default()), Err(Error::UnclosedBracket));
    }

    #[test]
    fn undefined_char_class_is_error() {
        assert_eq!(
            to_regex("[[:bogus:]]", &Config::default()),
            Err(Error::UndefinedCharClass("bogus".to_string()))
        );
    }

    #[test]
    fn emitted_regex_compiles_and_matches() {
        let config = Config {
            entire_string: true,
            ..Config::default()
        };
        let regex = regex::Regex::new(&to_regex("f[ou]*.[ch]", &config).unwrap()).unwrap();
        assert!(regex.is_match("foo.c"));
        assert!(regex.is_match("fuu bar.h"));
        assert!(!regex.is_match("bar.c"));
        assert!(!regex.is_match("foo.cpp"));

        // `*` must match across newlines.
        let regex = regex::Regex::new(&to_regex("a*b", &config).unwrap()).unwrap();
        assert!(regex.is_match("a\nb"));
    }
}
