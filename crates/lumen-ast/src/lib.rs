//! lumen-ast — the shared, immutable program representation (spec §3.2–§3.3).
//!
//! Both the type checker (`lumen-check`) and the evaluator (`lumen-eval`)
//! walk the same [`Expr`] tree produced by `lumen-par`; neither lowers it to
//! a separate IR, matching spec §2's "data flows strictly A→B→C→D→F".

mod ast;
mod types;

pub use ast::{BinOp, Expr, FieldDecl, FieldInit, Param, Program, UnOp};
pub use types::Ty;
