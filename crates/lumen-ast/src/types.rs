//! The type grammar (spec §3.2): τ ::= int | bool | unit | string | τ → τ |
//! τ array | Record(name).
//!
//! Two types are equal only by structural identity of their constructors;
//! record types are equal iff their declared names match — `#[derive(Eq)]`
//! gives us exactly that, since `Symbol` equality is already name identity.

use lumen_util::Symbol;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ty {
    Int,
    Bool,
    Unit,
    String,
    /// Right-associative in concrete syntax; already resolved to an explicit
    /// binary constructor by the time it reaches the AST.
    Arrow(Box<Ty>, Box<Ty>),
    Array(Box<Ty>),
    Record(Symbol),
}

impl Ty {
    pub fn arrow(from: Ty, to: Ty) -> Ty {
        Ty::Arrow(Box::new(from), Box::new(to))
    }

    pub fn array(of: Ty) -> Ty {
        Ty::Array(Box::new(of))
    }

    /// Builds `τ1 -> τ2 -> ... -> τret` from a parameter type list, the
    /// shape `Fix` needs for the type annotation of a `let rec`.
    pub fn curried_arrow(params: &[Ty], ret: Ty) -> Ty {
        params.iter().rev().cloned().fold(ret, |acc, p| Ty::arrow(p, acc))
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Bool => write!(f, "bool"),
            Ty::Unit => write!(f, "unit"),
            Ty::String => write!(f, "string"),
            Ty::Arrow(from, to) => write!(f, "({from} -> {to})"),
            Ty::Array(of) => write!(f, "{of} array"),
            Ty::Record(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality_ignores_construction_order() {
        let a = Ty::arrow(Ty::Int, Ty::Bool);
        let b = Ty::arrow(Ty::Int, Ty::Bool);
        assert_eq!(a, b);
    }

    #[test]
    fn records_compare_by_declared_name_only() {
        let a = Ty::Record(Symbol::intern("point"));
        let b = Ty::Record(Symbol::intern("point"));
        let c = Ty::Record(Symbol::intern("rect"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn curried_arrow_is_right_associative() {
        let ty = Ty::curried_arrow(&[Ty::Int, Ty::Bool], Ty::String);
        assert_eq!(ty, Ty::arrow(Ty::Int, Ty::arrow(Ty::Bool, Ty::String)));
    }
}
