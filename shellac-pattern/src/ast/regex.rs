// This file is part of shellac, a shell script parser and formatter.
// Copyright (C) 2026 the shellac authors

//! Conversion of the pattern AST to a regular expression

use super::*;
use crate::Config;
use crate::Error;
use std::fmt::Write;

type Result = std::result::Result<(), Error>;

const SPECIAL_CHARS: &str = r"\.+*?()|[]{}^$";
const BRACKET_SPECIAL_CHARS: &str = "-&~";

impl BracketAtom {
    fn fmt_regex_char(c: char, regex: &mut dyn Write) -> Result {
        if BRACKET_SPECIAL_CHARS.contains(c) || SPECIAL_CHARS.contains(c) {
            regex.write_char('\\').unwrap();
        }
        regex.write_char(c).unwrap();
        Ok(())
    }

    fn matches_multi_character(&self) -> bool {
        match self {
            BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value) => {
                value.chars().count() > 1
            }
            _ => false,
        }
    }

    fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        match self {
            BracketAtom::Char(c) => return BracketAtom::fmt_regex_char(*c, regex),
            BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value) => {
                if !value.is_empty() {
                    regex.write_str(value)
                } else {
                    return Err(Error::EmptyCollatingSymbol);
                }
            }
            BracketAtom::CharClass(class) => {
                if ClassAsciiKind::from_name(class).is_some() {
                    regex.write_fmt(format_args!("[:{class}:]"))
                } else {
                    return Err(Error::UndefinedCharClass(class.clone()));
                }
            }
        }
        .unwrap();
        Ok(())
    }

    fn fmt_regex_single(&self, regex: &mut dyn Write) -> Result {
        match self {
            BracketAtom::Char(c) => BracketAtom::fmt_regex_char(*c, regex),
            BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value) => {
                let c = value.chars().next().ok_or(Error::EmptyCollatingSymbol)?;
                BracketAtom::fmt_regex_char(c, regex)
            }
            BracketAtom::CharClass(class) => Err(Error::CharClassInRange(class.clone())),
        }
    }
}

impl BracketItem {
    fn matches_multi_character(&self) -> bool {
        match self {
            BracketItem::Atom(a) => a.matches_multi_character(),
            BracketItem::Range(_) => false,
        }
    }

    fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        match self {
            BracketItem::Atom(a) => a.fmt_regex(regex),
            BracketItem::Range(range) => {
                range.start().fmt_regex_single(regex)?;
                regex.write_char('-').unwrap();
                range.end().fmt_regex_single(regex)
            }
        }
    }
}

impl Bracket {
    fn matches_multi_character(&self) -> bool {
        self.items.iter().any(BracketItem::matches_multi_character)
    }

    fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        if !self.matches_multi_character() {
            regex.write_char('[').unwrap();
            if self.complement {
                regex.write_char('^').unwrap();
            }
            for item in &self.items {
                item.fmt_regex(regex)?;
            }
            regex.write_char(']').unwrap();
        } else if !self.complement {
            // A multi-character collating symbol cannot live inside a regex
            // class, so the whole expression becomes an alternation.
            regex.write_str("(?:").unwrap();
            let mut first = true;
            for item in &self.items {
                if first {
                    first = false;
                } else {
                    regex.write_char('|').unwrap();
                }

                if !item.matches_multi_character() {
                    regex.write_char('[').unwrap();
                    item.fmt_regex(regex)?;
                    regex.write_char(']').unwrap();
                } else {
                    item.fmt_regex(regex)?;
                }
            }
            regex.write_char(')').unwrap();
        } else {
            // A complemented class can only exclude single characters.
            regex.write_str("[^").unwrap();
            for item in &self.items {
                if !item.matches_multi_character() {
                    item.fmt_regex(regex)?;
                }
            }
            regex.write_char(']').unwrap();
        }
        Ok(())
    }
}

impl Atom {
    fn fmt_regex(&self, config: &Config, regex: &mut dyn Write) -> Result {
        match self {
            Atom::Char(c) => {
                if SPECIAL_CHARS.contains(*c) {
                    regex.write_char('\\').unwrap();
                }
                regex.write_char(*c).unwrap();
            }
            Atom::AnyChar => regex.write_str("(?s:.)").unwrap(),
            Atom::AnyString => {
                regex.write_str("(?s:.)*").unwrap();
                if !config.greedy {
                    regex.write_char('?').unwrap();
                }
            }
            Atom::Bracket(bracket) => bracket.fmt_regex(regex)?,
        }
        Ok(())
    }
}

impl Ast {
    /// Writes the AST as a regular expression.
    pub fn fmt_regex(&self, config: &Config, regex: &mut dyn Write) -> Result {
        self.atoms
            .iter()
            .try_for_each(|atom| atom.fmt_regex(config, regex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_regex(ast: &Ast) -> std::result::Result<String, Error> {
        let mut regex = String::new();
        ast.fmt_regex(&Config::default(), &mut regex)?;
        Ok(regex)
    }

    #[test]
    fn characters_that_need_escaping() {
        let atoms = SPECIAL_CHARS.chars().map(Atom::Char).collect();
        let regex = to_regex(&Ast { atoms }).unwrap();
        assert_eq!(regex, r"\\\.\+\*\?\(\)\|\[\]\{\}\^\$");
    }

    #[test]
    fn multi_character_collating_symbol() {
        let bracket = Bracket {
            complement: false,
            items: vec![
                BracketItem::Atom(BracketAtom::CollatingSymbol("ch".to_string())),
                'a'.into(),
            ],
        };
        let ast = Ast {
            atoms: vec![Atom::Bracket(bracket)],
        };
        assert_eq!(to_regex(&ast).unwrap(), "(?:ch|[a])");
    }

    #[test]
    fn complemented_bracket_drops_multi_character_symbols() {
        let bracket = Bracket {
            complement: true,
            items: vec![
                BracketItem::Atom(BracketAtom::CollatingSymbol("ch".to_string())),
                'a'.into(),
            ],
        };
        let ast = Ast {
            atoms: vec![Atom::Bracket(bracket)],
        };
        assert_eq!(to_regex(&ast).unwrap(), "[^a]");
    }

    #[test]
    fn range_with_collating_symbol_bound() {
        let bracket = Bracket {
            complement: false,
            items: vec![BracketItem::Range(
                BracketAtom::CollatingSymbol("a".to_string())..=BracketAtom::Char('z'),
            )],
        };
        let ast = Ast {
            atoms: vec![Atom::Bracket(bracket)],
        };
        assert_eq!(to_regex(&ast).unwrap(), "[a-z]");
    }

    #[test]
    fn char_class_in_range_is_error() {
        let bracket = Bracket {
            complement: false,
            items: vec![BracketItem::Range(
                BracketAtom::CharClass("digit".to_string())..=BracketAtom::Char('z'),
            )],
        };
        let ast = Ast {
            atoms: vec![Atom::Bracket(bracket)],
        };
        assert_eq!(
            to_regex(&ast),
            Err(Error::CharClassInRange("digit".to_string()))
        );
    }
}
