//! Diagnostic rendering.
//!
//! The core crates never accumulate diagnostics — each stage short-circuits
//! on its first error and returns it as a typed `Result` (spec §7: "errors
//! are values... not signals from the language runtime"). [`Diagnostic`] is
//! only used at the driver boundary to turn one of those typed errors into a
//! human-readable report.

use crate::Span;
use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A single renderable diagnostic: a level, a message, and the span it
/// applies to.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Error, message: message.into(), span }
    }

    /// Render as a single line plus a source snippet with a caret under the
    /// span's start column, e.g.:
    /// ```text
    /// error: unbound variable `y` (3:9)
    ///   1/0
    ///   ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let mut out = format!("{}: {} ({})\n", self.level, self.message, self.span);
        if let Some(line_text) = source.lines().nth(self.span.line.saturating_sub(1) as usize) {
            out.push_str("  ");
            out.push_str(line_text);
            out.push('\n');
            out.push_str("  ");
            for _ in 1..self.span.column {
                out.push(' ');
            }
            out.push('^');
        }
        out
    }
}
