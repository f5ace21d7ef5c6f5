//! The abstract syntax tree (spec §3.3): an immutable, already-resolved
//! description of a program. Precedence and associativity are fully baked
//! in by the time a parser produces this tree — there is no ambiguity left
//! to carry forward.

use crate::Ty;
use lumen_util::{Span, Symbol};

/// Binary operators, spanning arithmetic, relational, and logical forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "mod",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod)
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// One parameter of a `Fun` node: a name with its declared type.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub ty: Ty,
}

/// One `field = value` assignment inside a record literal (`Strct`).
#[derive(Clone, Debug)]
pub struct FieldInit {
    pub name: Symbol,
    pub value: Expr,
}

/// One field in a `type ... = { ... }` declaration.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: Symbol,
    pub ty: Ty,
    pub mutable: bool,
}

/// A program expression (spec §3.3).
///
/// `TypeDecl` threads like `Let`: a declaration followed by the rest of the
/// program it scopes over, so a whole program is a single root `Expr` (a
/// chain of `TypeDecl`s, if any, wrapping the body).
#[derive(Clone, Debug)]
pub enum Expr {
    Int(i64, Span),
    Bool(bool, Span),
    String(Symbol, Span),
    Unit(Span),
    Var(Symbol, Span),
    Bop(BinOp, Box<Expr>, Box<Expr>, Span),
    Uop(UnOp, Box<Expr>, Span),
    If(Box<Expr>, Box<Expr>, Box<Expr>, Span),
    Let(Symbol, Box<Expr>, Box<Expr>, Span),
    /// `Fun([(xi, τi)], body, τret)`. Holds the *full* parameter list; the
    /// evaluator curries it into nested single-argument closures at
    /// evaluation time (spec §4.6).
    Fun(Vec<Param>, Box<Expr>, Ty, Span),
    /// `Fix(f, τ, Fun(...))` — the desugaring target of `let rec`. `inner`
    /// is always a `Fun` node by construction (enforced by the parser and
    /// checker, not by the type system, exactly as in spec §3.3/§4.4 rule 10).
    Fix(Symbol, Ty, Box<Expr>, Span),
    App(Box<Expr>, Box<Expr>, Span),
    Seq(Box<Expr>, Box<Expr>, Span),
    While(Box<Expr>, Box<Expr>, Span),
    Assign(Symbol, Box<Expr>, Span),
    Strct(Symbol, Vec<FieldInit>, Span),
    GetF(Box<Expr>, Symbol, Span),
    SetF(Box<Expr>, Symbol, Box<Expr>, Span),
    Array(Vec<Expr>, Span),
    GetA(Box<Expr>, Box<Expr>, Span),
    SetA(Box<Expr>, Box<Expr>, Box<Expr>, Span),
    TypeDecl(Symbol, Vec<FieldDecl>, Box<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, s)
            | Expr::Bool(_, s)
            | Expr::String(_, s)
            | Expr::Unit(s)
            | Expr::Var(_, s)
            | Expr::Bop(_, _, _, s)
            | Expr::Uop(_, _, s)
            | Expr::If(_, _, _, s)
            | Expr::Let(_, _, _, s)
            | Expr::Fun(_, _, _, s)
            | Expr::Fix(_, _, _, s)
            | Expr::App(_, _, s)
            | Expr::Seq(_, _, s)
            | Expr::While(_, _, s)
            | Expr::Assign(_, _, s)
            | Expr::Strct(_, _, s)
            | Expr::GetF(_, _, s)
            | Expr::SetF(_, _, _, s)
            | Expr::Array(_, s)
            | Expr::GetA(_, _, s)
            | Expr::SetA(_, _, _, s)
            | Expr::TypeDecl(_, _, _, s) => *s,
        }
    }

    /// Builds the curried desugaring of `let f (x1:t1) (x2:t2) ... = body
    /// in rest`, per spec §4.2: a single `Fun` node carrying the whole
    /// parameter list (currying itself happens in the evaluator, §4.6).
    pub fn fun(params: Vec<Param>, body: Expr, ret_ty: Ty, span: Span) -> Expr {
        Expr::Fun(params, Box::new(body), ret_ty, span)
    }

    /// Does this expression ever `Assign` to `name`, without descending into
    /// a nested binder that rebinds `name` to something else first?
    ///
    /// Both the checker (promoting a `Let` binding to a mutable Γ entry,
    /// rule 14) and the evaluator (promoting it to a heap cell, §5) need
    /// this exact same syntactic pre-scan, so it lives once on the shared
    /// tree instead of being duplicated in both crates.
    pub fn assigns_to(&self, name: Symbol) -> bool {
        match self {
            Expr::Assign(target, value, _) => *target == name || value.assigns_to(name),
            Expr::Int(..) | Expr::Bool(..) | Expr::String(..) | Expr::Unit(..) | Expr::Var(..) => false,
            Expr::Bop(_, l, r, _) => l.assigns_to(name) || r.assigns_to(name),
            Expr::Uop(_, e, _) => e.assigns_to(name),
            Expr::If(c, t, f, _) => c.assigns_to(name) || t.assigns_to(name) || f.assigns_to(name),
            Expr::Let(bound, value, body, _) => {
                value.assigns_to(name) || (*bound != name && body.assigns_to(name))
            }
            Expr::Fun(params, body, _, _) => {
                params.iter().all(|p| p.name != name) && body.assigns_to(name)
            }
            Expr::Fix(bound, _, inner, _) => *bound != name && inner.assigns_to(name),
            Expr::App(f, a, _) => f.assigns_to(name) || a.assigns_to(name),
            Expr::Seq(l, r, _) => l.assigns_to(name) || r.assigns_to(name),
            Expr::While(c, body, _) => c.assigns_to(name) || body.assigns_to(name),
            Expr::Strct(_, fields, _) => fields.iter().any(|f| f.value.assigns_to(name)),
            Expr::GetF(e, _, _) => e.assigns_to(name),
            Expr::SetF(e, _, v, _) => e.assigns_to(name) || v.assigns_to(name),
            Expr::Array(es, _) => es.iter().any(|e| e.assigns_to(name)),
            Expr::GetA(e, i, _) => e.assigns_to(name) || i.assigns_to(name),
            Expr::SetA(e, i, v, _) => e.assigns_to(name) || i.assigns_to(name) || v.assigns_to(name),
            Expr::TypeDecl(_, _, cont, _) => cont.assigns_to(name),
        }
    }
}

/// A whole compiled unit: just its root expression. Kept as a thin wrapper
/// so the parser's entry point has a named return type distinct from a bare
/// sub-expression.
#[derive(Clone, Debug)]
pub struct Program {
    pub root: Expr,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Var(Symbol::intern(name), Span::DUMMY)
    }

    fn assign(name: &str, value: Expr) -> Expr {
        Expr::Assign(Symbol::intern(name), Box::new(value), Span::DUMMY)
    }

    #[test]
    fn direct_assignment_is_detected() {
        let e = assign("x", Expr::Int(1, Span::DUMMY));
        assert!(e.assigns_to(Symbol::intern("x")));
        assert!(!e.assigns_to(Symbol::intern("y")));
    }

    #[test]
    fn assignment_nested_in_a_sequence_is_detected() {
        let e = Expr::Seq(Box::new(var("noop")), Box::new(assign("x", var("y"))), Span::DUMMY);
        assert!(e.assigns_to(Symbol::intern("x")));
    }

    #[test]
    fn a_shadowing_let_hides_assignments_to_the_same_name_in_its_body() {
        // let x = 1 in (x <- 2) -- the inner `x` is the shadowed binder's
        // own cell, not the outer name this query is asked about.
        let inner = assign("x", Expr::Int(2, Span::DUMMY));
        let shadow = Expr::Let(Symbol::intern("x"), Box::new(Expr::Int(1, Span::DUMMY)), Box::new(inner), Span::DUMMY);
        assert!(!shadow.assigns_to(Symbol::intern("x")));
    }

    #[test]
    fn a_shadowing_fun_parameter_hides_assignments_to_the_same_name() {
        let body = assign("x", Expr::Int(2, Span::DUMMY));
        let f = Expr::fun(
            vec![Param { name: Symbol::intern("x"), ty: Ty::Int }],
            body,
            Ty::Unit,
            Span::DUMMY,
        );
        assert!(!f.assigns_to(Symbol::intern("x")));
    }

    #[test]
    fn assignment_in_a_lets_bound_value_still_counts() {
        // let y = (x <- 1) in y -- the assignment is in the value slot, not
        // shadowed by `y`.
        let e = Expr::Let(
            Symbol::intern("y"),
            Box::new(assign("x", Expr::Int(1, Span::DUMMY))),
            Box::new(var("y")),
            Span::DUMMY,
        );
        assert!(e.assigns_to(Symbol::intern("x")));
    }
}
