// This file is part of shellac, a shell script parser and formatter.
// Copyright (C) 2026 the shellac authors

//! Parsing of pattern strings into the AST

use super::*;

/// Character cursor over a pattern string.
struct Cursor {
    chars: Vec<char>,
    index: usize,
}

impl Cursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.index + ahead).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    fn accept(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.index += 1;
            true
        } else {
            false
        }
    }
}

pub(super) fn parse(pattern: &str) -> Result<Ast, Error> {
    let mut cursor = Cursor {
        chars: pattern.chars().collect(),
        index: 0,
    };
    let mut atoms = Vec::new();
    while let Some(c) = cursor.next() {
        let atom = match c {
            '?' => Atom::AnyChar,
            '*' => Atom::AnyString,
            '\\' => match cursor.next() {
                Some(c) => Atom::Char(c),
                None => return Err(Error::TrailingBackslash),
            },
            '[' => Atom::Bracket(bracket(&mut cursor)?),
            c => Atom::Char(c),
        };
        atoms.push(atom);
    }
    Ok(Ast { atoms })
}

/// Parses a bracket expression after the opening `[`.
///
/// A `]` as the first member (after the optional complement marker) is a
/// literal member, not a terminator. An unterminated bracket expression is
/// an [`Error::UnclosedBracket`].
fn bracket(cursor: &mut Cursor) -> Result<Bracket, Error> {
    let complement = cursor.accept('!') || cursor.accept('^');
    let mut items = Vec::new();
    loop {
        let Some(c) = cursor.next() else {
            return Err(Error::UnclosedBracket);
        };
        let atom = match c {
            ']' if !items.is_empty() => return Ok(Bracket { complement, items }),
            '[' if matches!(cursor.peek(), Some('.' | '=' | ':')) => {
                let kind = cursor.next().unwrap();
                let body = delimited_body(cursor, kind)?;
                match kind {
                    '.' => BracketAtom::CollatingSymbol(body),
                    '=' => BracketAtom::EquivalenceClass(body),
                    _ => {
                        // A character class cannot be a range bound, so it is
                        // a complete item on its own.
                        items.push(BracketItem::Atom(BracketAtom::CharClass(body)));
                        continue;
                    }
                }
            }
            c => BracketAtom::Char(c),
        };

        // `x-y` is a range unless the `-` is the last character before `]`.
        if cursor.peek() == Some('-') && !matches!(cursor.peek_at(1), Some(']') | None) {
            cursor.next();
            let Some(c) = cursor.next() else {
                return Err(Error::UnclosedBracket);
            };
            let end = match c {
                '[' if matches!(cursor.peek(), Some('.' | '=')) => {
                    let kind = cursor.next().unwrap();
                    let body = delimited_body(cursor, kind)?;
                    match kind {
                        '.' => BracketAtom::CollatingSymbol(body),
                        _ => BracketAtom::EquivalenceClass(body),
                    }
                }
                c => BracketAtom::Char(c),
            };
            items.push(BracketItem::Range(atom..=end));
        } else {
            items.push(BracketItem::Atom(atom));
        }
    }
}

/// Reads the body of a `[.x.]`, `[=x=]` or `[:x:]` construct after `[` and
/// the kind character have been consumed.
fn delimited_body(cursor: &mut Cursor, kind: char) -> Result<String, Error> {
    let mut body = String::new();
    loop {
        match cursor.next() {
            Some(c) if c == kind && cursor.accept(']') => return Ok(body),
            Some(c) => body.push(c),
            None => return Err(Error::UnclosedBracket),
        }
    }
}
