//! Tokenizer for Lumen source text (spec §3.1, §4.1).

mod cursor;
mod error;
mod lexer;
mod token;

pub use error::LexError;
pub use lexer::{tokenize, Lexer};
pub use token::{keyword_from_ident, Token};
