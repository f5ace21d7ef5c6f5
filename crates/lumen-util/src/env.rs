//! A small persistent, parent-chained environment shared by the type
//! checker's Γ and the evaluator's ρ (spec §3.5).
//!
//! Binding forms only ever need to extend an environment for one
//! sub-expression and then hand the *original* environment back to the
//! caller once that sub-expression is done — never mutate a shared scope in
//! place. An `Rc`-linked chain gives that for free: extending is O(1) and
//! never touches the parent frame, so a closure that captured an outer
//! `Env` keeps seeing exactly what it captured even after the call site
//! extends further.

use crate::Symbol;
use std::rc::Rc;

enum Frame<V> {
    Empty,
    Entry { name: Symbol, value: V, parent: Rc<Frame<V>> },
}

/// An immutable binding environment keyed on interned identifiers.
pub struct Env<V> {
    top: Rc<Frame<V>>,
}

impl<V> Clone for Env<V> {
    fn clone(&self) -> Self {
        Self { top: self.top.clone() }
    }
}

impl<V> Default for Env<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Env<V> {
    pub fn new() -> Self {
        Self { top: Rc::new(Frame::Empty) }
    }

    /// Returns a new environment with `name` bound to `value`; `self` is
    /// left untouched, so it's still valid to use after this call.
    pub fn extend(&self, name: Symbol, value: V) -> Self {
        Self { top: Rc::new(Frame::Entry { name, value, parent: self.top.clone() }) }
    }

    /// Looks up the nearest (innermost) binding for `name`.
    pub fn get(&self, name: Symbol) -> Option<&V> {
        let mut frame = &self.top;
        loop {
            match frame.as_ref() {
                Frame::Empty => return None,
                Frame::Entry { name: bound, value, parent } => {
                    if *bound == name {
                        return Some(value);
                    }
                    frame = parent;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_resolves_nothing() {
        let env: Env<i32> = Env::new();
        assert_eq!(env.get(Symbol::intern("x")), None);
    }

    #[test]
    fn extending_shadows_an_outer_binding_without_mutating_it() {
        let outer = Env::new().extend(Symbol::intern("x"), 1);
        let inner = outer.extend(Symbol::intern("x"), 2);
        assert_eq!(outer.get(Symbol::intern("x")), Some(&1));
        assert_eq!(inner.get(Symbol::intern("x")), Some(&2));
    }

    #[test]
    fn lookup_walks_past_unrelated_bindings_to_the_parent() {
        let env = Env::new().extend(Symbol::intern("x"), 1).extend(Symbol::intern("y"), 2);
        assert_eq!(env.get(Symbol::intern("x")), Some(&1));
    }
}
