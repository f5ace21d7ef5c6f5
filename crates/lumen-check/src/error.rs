//! Type error kinds (spec §4.4, §7). Checking is fail-fast: the first rule
//! that doesn't hold aborts the whole pass.

use lumen_ast::Ty;
use lumen_util::{Span, Symbol};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TypeError {
    #[error("unbound variable `{name}` at {span}")]
    UnboundVariable { name: Symbol, span: Span },

    #[error("type mismatch at {span}: expected {expected}, found {actual}")]
    TypeMismatch { expected: Ty, actual: Ty, span: Span },

    #[error("not a function at {span}")]
    NotAFunction { span: Span },

    /// Either an `Assign` target that was never promoted to a mutable `let`
    /// cell (rule 14), or a `SetF` on a field declared without `mutable`
    /// (rule 17) — `name` is the variable or field, respectively.
    #[error("`{name}` is not mutable at {span}")]
    NotMutable { name: Symbol, span: Span },

    /// A record literal shares some field names with a declared record but
    /// has a different number of fields.
    #[error("record `{record}` expects {expected} fields, found {actual}, at {span}")]
    ArityMismatch { record: Symbol, expected: usize, actual: usize, span: Span },

    #[error("record field mismatch at {span}: {reason}")]
    RecordFieldMismatch { reason: String, span: Span },

    /// No declared record matches a literal's field names at all.
    #[error("no declared record type matches this literal's fields, at {span}")]
    UnknownRecord { span: Span },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::UnboundVariable { span, .. }
            | TypeError::TypeMismatch { span, .. }
            | TypeError::NotAFunction { span }
            | TypeError::NotMutable { span, .. }
            | TypeError::ArityMismatch { span, .. }
            | TypeError::RecordFieldMismatch { span, .. }
            | TypeError::UnknownRecord { span } => *span,
        }
    }
}
