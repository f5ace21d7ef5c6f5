//! The driver's own error type: one variant per pipeline stage, so a single
//! `match` at the very top of `main` can pick the exit code spec §6 mandates.

use lumen_check::TypeError;
use lumen_eval::RuntimeError;
use lumen_lex::LexError;
use lumen_par::ParseError;
use lumen_util::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Check(#[from] TypeError),

    #[error(transparent)]
    Eval(#[from] RuntimeError),
}

impl DriverError {
    /// Exit code per spec §6: 1 lex, 2 parse, 3 type, 4 runtime. `Io` isn't
    /// one of the spec's stages; it's reported with the same code as a
    /// generic invocation failure would be under any CLI (2, alongside
    /// parse-level usage errors).
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Io { .. } => 2,
            DriverError::Lex(_) => 1,
            DriverError::Parse(_) => 2,
            DriverError::Check(_) => 3,
            DriverError::Eval(_) => 4,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            DriverError::Io { .. } => Span::DUMMY,
            DriverError::Lex(e) => e.span(),
            DriverError::Parse(e) => e.span(),
            DriverError::Check(e) => e.span(),
            DriverError::Eval(e) => e.span(),
        }
    }
}
