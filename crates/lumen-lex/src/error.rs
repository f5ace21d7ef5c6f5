//! Lexer error kinds (spec §4.1, §7). Each is fatal: the lexer stops at the
//! first one instead of trying to recover and keep scanning.

use lumen_util::Span;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum LexError {
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },

    #[error("unterminated string literal at {span}")]
    UnterminatedString { span: Span },

    #[error("illegal character {ch:?} at {span}")]
    BadChar { ch: char, span: Span },

    #[error("integer literal out of range at {span}")]
    IntOverflow { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedComment { span }
            | LexError::UnterminatedString { span }
            | LexError::BadChar { span, .. }
            | LexError::IntOverflow { span } => *span,
        }
    }
}
