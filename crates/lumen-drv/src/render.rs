//! Renders a [`Value`] the way spec §6 mandates: `n`, `true|false`, `()`,
//! `"..."`, `<fun>`, `{field=...; ...}`, `[|v; v; ...|]`. This needs the
//! heap to follow `Value::Ptr` into records and arrays, so it lives at the
//! driver boundary rather than on `Value` itself (`lumen-eval` has no
//! reason to know the concrete syntax of its own output).

use lumen_eval::{Heap, HeapObj, Value};
use std::fmt::Write as _;

pub fn render(value: &Value, heap: &Heap) -> String {
    let mut out = String::new();
    render_into(value, heap, &mut out);
    out
}

fn render_into(value: &Value, heap: &Heap, out: &mut String) {
    match value {
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Unit => out.push_str("()"),
        Value::String(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Closure(_) => out.push_str("<fun>"),
        Value::Ptr(id) => match heap.get(*id) {
            HeapObj::Record(fields) => {
                out.push('{');
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    let _ = write!(out, "{name}=");
                    render_into(v, heap, out);
                }
                out.push('}');
            }
            HeapObj::Array(items) => {
                out.push_str("[|");
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    render_into(v, heap, out);
                }
                out.push_str("|]");
            }
            // A `Fix` self-reference slot or a mutable-let cell, never
            // reachable as the *final* program value (those always unwrap
            // to the scalar or closure they hold before App/Var return).
            HeapObj::Closure(_) | HeapObj::Cell(_) => out.push_str("<fun>"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_eval::eval_program;
    use lumen_lex::tokenize;

    fn render_source(src: &str) -> String {
        let tokens = tokenize(src).unwrap();
        let program = lumen_par::parse_tokens(tokens).unwrap();
        let (value, heap) = eval_program(&program).unwrap();
        render(&value, &heap)
    }

    #[test]
    fn renders_int_bool_unit() {
        assert_eq!(render_source("1 + 2"), "3");
        assert_eq!(render_source("true && false"), "false");
        assert_eq!(render_source("()"), "()");
    }

    #[test]
    fn renders_a_record_with_fields_in_declaration_order() {
        let src = "type point = { mutable x:int; mutable y:int } in {x=10; y=20}";
        assert_eq!(render_source(src), "{x=10; y=20}");
    }

    #[test]
    fn renders_an_array() {
        assert_eq!(render_source("[1;2;3]"), "[|1; 2; 3|]");
    }

    #[test]
    fn renders_a_closure_as_fun() {
        let src = "let f (x:int):int = x in f";
        assert_eq!(render_source(src), "<fun>");
    }
}
