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

//! Shell language syntax, parser, and printer.
//!
//! This crate parses shell source code (POSIX shell, Bash, mksh, and Bats)
//! into an abstract syntax tree, and prints trees back as shell source.
//!
//! The tree data types live in the [`syntax`] module; every node carries
//! its [source position](source::Pos). Parsing goes through a
//! [`parser::Parser`], whose options select the [dialect](token::LangVariant)
//! and behaviors such as comment retention:
//!
//! ```
//! # use shellac_syntax::parser::Parser;
//! # use shellac_syntax::printer::Printer;
//! let mut parser = Parser::new();
//! let file = parser.parse("echo      'foo'\n".as_bytes(), "src.sh").unwrap();
//!
//! let mut out = Vec::new();
//! Printer::new().print(&mut out, &file).unwrap();
//! assert_eq!(out, b"echo 'foo'\n");
//! ```
//!
//! The [`printer`] module formats trees with configurable style rules and
//! guarantees that its output parses back to an equivalent tree. The
//! [`walk`] module provides traversal, the [`simplify`] module provides
//! semantics-preserving rewrites, and the [`json`] module provides a typed
//! JSON encoding of the tree.

pub mod input;
pub mod json;
pub mod parser;
pub mod printer;
pub mod simplify;
pub mod source;
pub mod syntax;
pub mod token;
pub mod walk;

pub use parser::Parser;
pub use printer::Printer;
pub use source::{Pos, valid_name};
pub use token::LangVariant;
