//! Lexing and syntax validation for infix math expressions.
//!
//! The [`Tokenizer`] produces a raw token stream bounded by `START`/`END`
//! sentinels, and the [`SyntaxParser`] classifies it while collecting every
//! syntax error instead of stopping at the first one.

mod brackets;
mod error;
mod position;
mod syntax;
mod tokenizer;
mod unary;

pub use brackets::{BracketKind, BracketsContext};
pub use error::{ErrorCollector, ParserError};
pub use position::PositionValidator;
pub use syntax::{SyntaxParser, SyntaxToken, SyntaxTokenKind};
pub use tokenizer::{RawToken, TokenKind, Tokenizer};
pub use unary::UnaryMinusResolver;
