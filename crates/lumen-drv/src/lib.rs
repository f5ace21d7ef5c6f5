//! lumen-drv — the CLI entry point (spec §6, ambient per SPEC_FULL.md §4.7,
//! §4.9, §4.10): wires lexer → parser → checker → evaluator, turns the
//! first stage's error into a rendered [`lumen_util::Diagnostic`], and picks
//! the process exit code the spec's external-interface contract demands.

mod config;
mod error;
mod render;

pub use config::{Cli, Config, FileConfig};
pub use error::DriverError;
pub use render::render;

use lumen_ast::Program;
use lumen_eval::{eval_program, Heap, Value};
use lumen_util::Diagnostic;

pub struct RunOutcome {
    pub value: Value,
    pub heap: Heap,
}

/// Runs the full pipeline over already-read source text. Split out from
/// [`run`] so tests can drive it without touching the filesystem or
/// `std::process::exit`.
pub fn run_source(source: &str) -> Result<RunOutcome, DriverError> {
    let tokens = lumen_lex::tokenize(source)?;
    tracing::debug!(count = tokens.len(), "lexed");

    if tracing::enabled!(tracing::Level::TRACE) {
        tracing::trace!(?tokens, "token stream");
    }

    let program: Program = lumen_par::parse_tokens(tokens)?;
    tracing::debug!("parsed");

    let _ty = lumen_check::check_program(&program)?;
    tracing::debug!(?_ty, "type-checked");

    let (value, heap) = eval_program(&program)?;
    tracing::debug!("evaluated");

    Ok(RunOutcome { value, heap })
}

/// Reads `path`, then runs [`run_source`].
pub fn run_file(path: &std::path::Path) -> Result<RunOutcome, DriverError> {
    let source = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.display().to_string(),
        source,
    })?;
    run_source(&source)
}

/// Turns a [`DriverError`] into a one-shot stderr report using the shared
/// [`Diagnostic`] renderer (spec §4.7); returns the process exit code.
pub fn report_error(err: &DriverError, source: &str) -> i32 {
    let diagnostic = Diagnostic::error(err.to_string(), err.span());
    eprintln!("{}", diagnostic.render(source));
    err.exit_code()
}
