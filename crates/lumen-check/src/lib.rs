//! lumen-check — syntax-directed static type checking (spec §4.4).
//!
//! Walks the same [`lumen_ast::Program`] the evaluator walks, against a
//! typing environment Γ and a record declaration table D, and either
//! returns the program's result type or the first [`TypeError`] found.

mod checker;
mod error;

pub use checker::{check_program, Binding, RecordTable};
pub use error::TypeError;
