// This file is part of shellac, a shell script parser and formatter.
// Copyright (C) 2026 the shellac authors

//! Abstract syntax tree for globbing patterns

mod parse;
mod regex;

use crate::Error;
use regex_syntax::ast::ClassAsciiKind;
use std::ops::RangeInclusive;

/// Bracket expression component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketAtom {
    /// Literal character
    Char(char),
    /// Collating symbol (`[.x.]`)
    CollatingSymbol(String),
    /// Equivalence class (`[=x=]`)
    EquivalenceClass(String),
    /// Character class (`[:digit:]`)
    ///
    /// The string is the class name as written in the pattern. It is
    /// validated against [`ClassAsciiKind`] when the regex is emitted.
    CharClass(String),
}

impl From<char> for BracketAtom {
    fn from(c: char) -> Self {
        BracketAtom::Char(c)
    }
}

/// Bracket expression component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketItem {
    /// Atom
    Atom(BracketAtom),
    /// Character range
    Range(RangeInclusive<BracketAtom>),
}

impl<T: Into<BracketAtom>> From<T> for BracketItem {
    fn from(value: T) -> Self {
        BracketItem::Atom(value.into())
    }
}
impl From<RangeInclusive<BracketAtom>> for BracketItem {
    fn from(range: RangeInclusive<BracketAtom>) -> Self {
        BracketItem::Range(range)
    }
}

/// Bracket expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bracket {
    /// Whether there is an initial `!` (or `^`)
    ///
    /// When the bracket expression starts with a complement marker, the set
    /// of matching characters is inverted.
    pub complement: bool,

    /// Content of the bracket expression
    pub items: Vec<BracketItem>,
}

/// Pattern component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Atom {
    /// Literal character
    Char(char),
    /// Pattern that matches a single character (`?`)
    AnyChar,
    /// Pattern that matches any string (`*`)
    AnyString,
    /// Bracket expression
    Bracket(Bracket),
}

/// Abstract syntax tree for a whole pattern
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ast {
    /// Content of the pattern
    pub atoms: Vec<Atom>,
}

impl Ast {
    /// Parses a pattern string.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        parse::parse(pattern)
    }
}
