// This file is part of shellac, a shell script parser and formatter.
// Copyright (C) 2026 the shellac authors

//! This crate provides a function that quotes a string so that a shell will
//! expand it back to a single field having the same value as the original
//! string.
//!
//! The shell offers several quoting mechanisms, and the [`quote`] function
//! chooses the shortest correct one according to the following decision rules:
//!
//! - If the string is not empty and contains no characters that need quoting,
//!   the string is returned intact.
//! - Otherwise, if the string contains no single quote and no control
//!   character, the whole string is single-quoted.
//! - Otherwise, if the string contains no control character, the whole string
//!   is double-quoted, and all occurrences of `"`, `` ` ``, `$`, and `\` are
//!   backslash-escaped.
//! - Otherwise, the string is rendered as a dollar-single-quoted string
//!   (`$'...'`) with C-style escapes. This form is not available in POSIX
//!   mode, where such a string cannot be quoted at all.
//!
//! A string containing a NUL byte cannot be represented as a shell word in
//! any dialect and is always rejected.
//!
//! The following characters need quoting:
//!
//! - `;`, `&`, `|`, `(`, `)`, `<`, and `>`
//! - A space, tab, newline, or any other whitespace character
//! - `$`, `` ` ``, `\`, `"`, and `'`
//! - `=`, `*`, `?`, `[`, `#`, `%`, `^`, `,`, `{`, `}`, `!`, and `~`
//!
//! # Examples
//!
//! ```
//! # use std::borrow::Cow::{Borrowed, Owned};
//! # use shellac_quote::{Lang, quote};
//! assert_eq!(quote("foo", Lang::Bash).unwrap(), Borrowed("foo"));
//! assert_eq!(quote("", Lang::Bash).unwrap(), Owned::<str>("''".to_owned()));
//! assert_eq!(quote("$foo", Lang::Bash).unwrap(), Owned::<str>("'$foo'".to_owned()));
//! assert_eq!(quote("a\nb", Lang::Bash).unwrap(), Owned::<str>("$'a\\nb'".to_owned()));
//! ```

use std::borrow::Cow::{self, Borrowed, Owned};
use thiserror::Error;

/// Shell dialect the quoted string is meant for
///
/// The dialect only matters for strings that require the `$'...'` form,
/// which POSIX does not have.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Lang {
    /// GNU Bash
    #[default]
    Bash,
    /// Strict POSIX sh
    Posix,
    /// MirBSD Korn shell
    MirBsdKorn,
}

/// Error returned when a string cannot be quoted
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum QuoteError {
    /// The string contains a NUL byte, which no shell word can carry.
    #[error("cannot quote a string containing a NUL byte")]
    NullByte,
    /// The string contains a control character and the dialect has no
    /// `$'...'` syntax to express it.
    #[error("cannot quote a control character in POSIX mode")]
    ControlCharInPosix,
}

/// Quotes the argument for the given shell dialect.
///
/// If the argument needs no quoting, the return value is `Borrowed(s)`.
/// Otherwise, it is `Owned(new_quoted_string)`.
///
/// See the [module doc](self) for the decision rules.
pub fn quote(s: &str, lang: Lang) -> Result<Cow<'_, str>, QuoteError> {
    if s.contains('\0') {
        return Err(QuoteError::NullByte);
    }

    if !s.is_empty() && !str_needs_quoting(s) {
        return Ok(Borrowed(s));
    }

    let control = s.chars().any(is_control);
    if !control {
        if !s.contains('\'') {
            return Ok(Owned(format!("'{s}'")));
        }

        let mut result = String::with_capacity(s.len().saturating_add(8));
        result.push('"');
        for c in s.chars() {
            if matches!(c, '"' | '`' | '$' | '\\') {
                result.push('\\');
            }
            result.push(c);
        }
        result.push('"');
        return Ok(Owned(result));
    }

    if lang == Lang::Posix {
        return Err(QuoteError::ControlCharInPosix);
    }

    Ok(Owned(dollar_quote(s)))
}

/// Renders the string in the `$'...'` form.
fn dollar_quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len().saturating_add(8));
    result.push_str("$'");
    for c in s.chars() {
        match c {
            '\'' => result.push_str("\\'"),
            '\\' => result.push_str("\\\\"),
            '\x07' => result.push_str("\\a"),
            '\x08' => result.push_str("\\b"),
            '\x0C' => result.push_str("\\f"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x0B' => result.push_str("\\v"),
            '\x1B' => result.push_str("\\e"),
            c if is_control(c) => {
                use std::fmt::Write as _;
                write!(result, "\\x{:02x}", c as u32).unwrap();
            }
            c => result.push(c),
        }
    }
    result.push('\'');
    result
}

/// Returns true iff any character needs quoting.
fn str_needs_quoting(s: &str) -> bool {
    s.chars().any(char_needs_quoting)
}

fn char_needs_quoting(c: char) -> bool {
    match c {
        ';' | '&' | '|' | '(' | ')' | '<' | '>' | ' ' | '\t' | '\n' => true,
        '$' | '`' | '\\' | '"' | '\'' | '=' | '*' | '?' | '[' => true,
        '#' | '%' | '^' | ',' | '{' | '}' | '!' | '~' => true,
        _ => c.is_whitespace() || is_control(c),
    }
}

/// Returns true for characters only expressible with `$'...'` escapes.
fn is_control(c: char) -> bool {
    matches!(c, '\u{1}'..='\u{1F}' | '\u{7F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_quoting() {
        fn test(s: &str) {
            assert_eq!(quote(s, Lang::Bash).unwrap(), Borrowed(s));
        }
        test("a");
        test("z");
        test("_");
        test("+-./:@");
        test("foo_bar123");
    }

    #[test]
    fn single_quoted() {
        fn test(s: &str) {
            assert_eq!(
                quote(s, Lang::Bash).unwrap(),
                Owned::<str>(format!("'{s}'"))
            );
        }
        test("");
        for c in ";&|()<> \u{3000}$`\\\"=*?#~{},".chars() {
            test(&c.to_string());
        }
        test("{}");
        test("a b");
        test("$foo");
    }

    #[test]
    fn double_quoted() {
        fn test(input: &str, output: &str) {
            assert_eq!(
                quote(input, Lang::Bash).unwrap(),
                Owned::<str>(output.to_string())
            );
        }
        test("'", r#""'""#);
        test(r#"'"'"#, r#""'\"'""#);
        test("'$", r#""'\$""#);
        test("'foo'", r#""'foo'""#);
        test(r"'\'", r#""'\\'""#);
    }

    #[test]
    fn dollar_single_quoted() {
        fn test(input: &str, output: &str) {
            assert_eq!(
                quote(input, Lang::Bash).unwrap(),
                Owned::<str>(output.to_string())
            );
        }
        test("a\rb", "$'a\\rb'");
        test("\x07", "$'\\a'");
        test("\x1B[0m", "$'\\e[0m'");
        test("'\r'", "$'\\'\\r\\''");
        test("\x01", "$'\\x01'");
    }

    #[test]
    fn nul_byte_rejected() {
        assert_eq!(quote("a\0b", Lang::Bash), Err(QuoteError::NullByte));
        assert_eq!(quote("\0", Lang::Posix), Err(QuoteError::NullByte));
    }

    #[test]
    fn control_char_rejected_in_posix() {
        assert_eq!(
            quote("a\rb", Lang::Posix),
            Err(QuoteError::ControlCharInPosix)
        );
        assert_eq!(
            quote("a b", Lang::Posix).unwrap(),
            Owned::<str>("'a b'".to_owned())
        );
    }

    #[test]
    fn mksh_uses_dollar_quotes() {
        assert_eq!(
            quote("\x7F", Lang::MirBsdKorn).unwrap(),
            Owned::<str>("$'\\x7f'".to_owned())
        );
    }
}
