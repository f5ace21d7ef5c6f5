//! lumen-util — shared infrastructure for the Lumen compiler front end.
//!
//! Every other `lumen-*` crate depends on this one for interned identifiers
//! ([`Symbol`]), source locations ([`Span`]), and diagnostic rendering
//! ([`Diagnostic`]). It carries no language semantics of its own.

mod diagnostic;
mod env;
mod span;
mod symbol;

pub use diagnostic::{Diagnostic, Level};
pub use env::Env;
pub use span::Span;
pub use symbol::Symbol;
