//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer producing a stream of spanned tokens, plus the
//! whitespace normalization every parser applies before lexing.

mod normalize;
mod span;
mod token;
mod tokenizer;

pub use normalize::normalize;
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{Lexer, column_path, is_placeholder};
