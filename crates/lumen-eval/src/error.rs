//! Runtime failure kinds (spec §4.6, §7). Evaluation is fail-fast: the first
//! runtime error aborts the whole run and propagates to the driver.

use lumen_util::Span;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("division by zero at {span}")]
    DivByZero { span: Span },

    #[error("array index {index} out of bounds (length {len}) at {span}")]
    IndexOutOfBounds { span: Span, index: i64, len: usize },

    /// Unreachable for a program that passed `lumen-check`; kept because a
    /// tree-walking evaluator still has to do *something* if it's handed an
    /// ill-typed tree directly (spec §4.6 closing paragraph).
    #[error("runtime type mismatch at {span}")]
    RuntimeTypeMismatch { span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::DivByZero { span }
            | RuntimeError::IndexOutOfBounds { span, .. }
            | RuntimeError::RuntimeTypeMismatch { span } => *span,
        }
    }
}
