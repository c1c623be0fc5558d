//! # fql-parser
//!
//! A fault-tolerant parser for FQL, the filter query language used to select
//! hosts and other records, e.g. `host.online:true+platform:'windows'`.
//!
//! [`parse`] never fails. It returns a lossless rowan [`SyntaxNode`] tree
//! that covers every byte of the input together with the [`ParseError`]s
//! found on the way, so partial input still produces a useful tree.
//!
//! - `lexer`: logos tokenizer
//! - `parser`/`grammar`: recursive descent with Pratt-style compound operators
//! - `syntax`: the rowan language and node kinds
//! - [`ast`]: typed views (clauses, properties, operands) over the tree

pub mod ast;
mod error;
mod grammar;
mod lexer;
mod parser;
mod syntax;
mod text;

pub use error::ParseError;
pub use lexer::TokenKind;
pub use parser::{parse, Parse};
pub use syntax::{Fql, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use text::{Spanned, TextRange, TextSize};
