//! The evaluator, judgement ρ; H ⊢ e ⇓ v (spec §4.6). Strict, left-to-right,
//! with `H` mutated in place; every recursive call threads the same `&mut
//! Heap` so aliasing through `Value::Ptr` is visible across the whole run.

use indexmap::IndexMap;
use lumen_ast::{BinOp, Expr, Program, UnOp};
use lumen_util::{Env, Span, Symbol};
use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::heap::{Heap, HeapObj};
use crate::value::{Binding, Closure, Value};

pub type ValueEnv = Env<Binding>;

/// Evaluates a whole program against a fresh environment and heap.
pub fn eval_program(program: &Program) -> Result<(Value, Heap), RuntimeError> {
    let mut heap = Heap::new();
    let result = eval(&program.root, &ValueEnv::new(), &mut heap)?;
    tracing::debug!(heap_len = heap.len(), "evaluated program");
    Ok((result, heap))
}

fn eval(e: &Expr, rho: &ValueEnv, heap: &mut Heap) -> Result<Value, RuntimeError> {
    match e {
        Expr::Int(n, _) => Ok(Value::Int(*n)),
        Expr::Bool(b, _) => Ok(Value::Bool(*b)),
        Expr::String(s, _) => Ok(Value::String(Rc::from(s.as_str()))),
        Expr::Unit(_) => Ok(Value::Unit),

        Expr::Var(name, span) => match rho.get(*name) {
            Some(Binding::Direct(v)) => Ok(v.clone()),
            Some(Binding::Cell(id)) => heap.read_cell(*id, *span),
            None => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
        },

        Expr::Bop(op, l, r, span) => eval_bop(*op, l, r, *span, rho, heap),

        Expr::Uop(op, operand, span) => {
            let v = eval(operand, rho, heap)?;
            match (op, v) {
                (UnOp::Neg, Value::Int(n)) => Ok(Value::Int(-n)),
                (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                _ => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
            }
        }

        Expr::If(c, t, f, span) => match eval(c, rho, heap)? {
            Value::Bool(true) => eval(t, rho, heap),
            Value::Bool(false) => eval(f, rho, heap),
            _ => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
        },

        // Mutable-let promotion (spec §5): a binding whose body assigns to
        // it lives behind a heap cell; every other binding is pointer-free.
        Expr::Let(name, value, body, _) => {
            let v = eval(value, rho, heap)?;
            if body.assigns_to(*name) {
                let id = heap.alloc(HeapObj::Cell(v));
                let extended = rho.extend(*name, Binding::Cell(id));
                eval(body, &extended, heap)
            } else {
                let extended = rho.extend(*name, Binding::Direct(v));
                eval(body, &extended, heap)
            }
        }

        Expr::Fun(params, body, ret_ty, span) => {
            Ok(Value::Closure(Rc::new(curry(params, body, ret_ty, *span, rho.clone()))))
        }

        // Recursion via heap indirection (spec §9): pre-allocate the slot,
        // evaluate the closure under a binding that already points at it,
        // then fill the slot in.
        Expr::Fix(name, _ty, inner, span) => {
            let id = heap.alloc(HeapObj::Cell(Value::Unit));
            let extended = rho.extend(*name, Binding::Direct(Value::Ptr(id)));
            match eval(inner, &extended, heap)? {
                Value::Closure(closure) => {
                    heap.set(id, HeapObj::Closure(closure));
                    Ok(Value::Ptr(id))
                }
                _ => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
            }
        }

        Expr::App(f, a, span) => {
            let f_val = eval(f, rho, heap)?;
            let closure = deref_closure(&f_val, heap, *span)?;
            let a_val = eval(a, rho, heap)?;
            let extended = closure.env.extend(closure.param, Binding::Direct(a_val));
            eval(&closure.body, &extended, heap)
        }

        Expr::Seq(l, r, _) => {
            eval(l, rho, heap)?;
            eval(r, rho, heap)
        }

        Expr::While(c, body, span) => {
            loop {
                match eval(c, rho, heap)? {
                    Value::Bool(true) => {
                        eval(body, rho, heap)?;
                    }
                    Value::Bool(false) => break,
                    _ => return Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
                }
            }
            Ok(Value::Unit)
        }

        Expr::Assign(name, value, span) => {
            let id = match rho.get(*name) {
                Some(Binding::Cell(id)) => *id,
                _ => return Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
            };
            let v = eval(value, rho, heap)?;
            heap.write_cell(id, v, *span)?;
            Ok(Value::Unit)
        }

        // Field order is already verified against D by the checker; a
        // program that reaches the evaluator has its literal's fields in
        // declared order, so no record table is needed here at all.
        Expr::Strct(_, fields, _) => {
            let mut map: IndexMap<Symbol, Value> = IndexMap::with_capacity(fields.len());
            for field in fields {
                let v = eval(&field.value, rho, heap)?;
                map.insert(field.name, v);
            }
            let id = heap.alloc(HeapObj::Record(map));
            Ok(Value::Ptr(id))
        }

        Expr::GetF(obj, field, span) => {
            let id = as_ptr(eval(obj, rho, heap)?, *span)?;
            match heap.get(id) {
                HeapObj::Record(map) => {
                    map.get(field).cloned().ok_or(RuntimeError::RuntimeTypeMismatch { span: *span })
                }
                _ => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
            }
        }

        Expr::SetF(obj, field, value, span) => {
            let id = as_ptr(eval(obj, rho, heap)?, *span)?;
            let v = eval(value, rho, heap)?;
            match heap.get_mut(id) {
                HeapObj::Record(map) => {
                    map.insert(*field, v);
                    Ok(Value::Unit)
                }
                _ => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
            }
        }

        Expr::Array(elements, _) => {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(eval(element, rho, heap)?);
            }
            let id = heap.alloc(HeapObj::Array(items));
            Ok(Value::Ptr(id))
        }

        Expr::GetA(arr, index, span) => {
            let id = as_ptr(eval(arr, rho, heap)?, *span)?;
            let idx = as_int(eval(index, rho, heap)?, *span)?;
            match heap.get(id) {
                HeapObj::Array(items) => index_array(items, idx, *span).cloned(),
                _ => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
            }
        }

        Expr::SetA(arr, index, value, span) => {
            let id = as_ptr(eval(arr, rho, heap)?, *span)?;
            let idx = as_int(eval(index, rho, heap)?, *span)?;
            let v = eval(value, rho, heap)?;
            match heap.get_mut(id) {
                HeapObj::Array(items) => {
                    index_array_mut(items, idx, *span)?;
                    items[idx as usize] = v;
                    Ok(Value::Unit)
                }
                _ => Err(RuntimeError::RuntimeTypeMismatch { span: *span }),
            }
        }

        // Type declarations have no runtime effect; D only matters to the
        // checker (spec §4.3).
        Expr::TypeDecl(_, _, cont, _) => eval(cont, rho, heap),
    }
}

/// Builds `curry(p2..pn, body)`: a closure over the first parameter whose
/// body is either the original body (last parameter) or a synthesized `Fun`
/// wrapping the rest, so applying one argument at a time always lands on
/// the right remaining arity.
fn curry(params: &[lumen_ast::Param], body: &Expr, ret_ty: &lumen_ast::Ty, span: Span, env: ValueEnv) -> Closure {
    let (first, rest) = params.split_first().expect("Fun node always has at least one parameter");
    let inner_body = if rest.is_empty() {
        body.clone()
    } else {
        Expr::Fun(rest.to_vec(), Box::new(body.clone()), ret_ty.clone(), span)
    };
    Closure { param: first.name, body: inner_body, env }
}

fn deref_closure(v: &Value, heap: &Heap, span: Span) -> Result<Rc<Closure>, RuntimeError> {
    match v {
        Value::Closure(c) => Ok(c.clone()),
        Value::Ptr(id) => match heap.get(*id) {
            HeapObj::Closure(c) => Ok(c.clone()),
            _ => Err(RuntimeError::RuntimeTypeMismatch { span }),
        },
        _ => Err(RuntimeError::RuntimeTypeMismatch { span }),
    }
}

fn as_ptr(v: Value, span: Span) -> Result<crate::heap::HeapId, RuntimeError> {
    match v {
        Value::Ptr(id) => Ok(id),
        _ => Err(RuntimeError::RuntimeTypeMismatch { span }),
    }
}

fn as_int(v: Value, span: Span) -> Result<i64, RuntimeError> {
    match v {
        Value::Int(n) => Ok(n),
        _ => Err(RuntimeError::RuntimeTypeMismatch { span }),
    }
}

fn as_bool(v: Value, span: Span) -> Result<bool, RuntimeError> {
    match v {
        Value::Bool(b) => Ok(b),
        _ => Err(RuntimeError::RuntimeTypeMismatch { span }),
    }
}

fn index_array(items: &[Value], index: i64, span: Span) -> Result<&Value, RuntimeError> {
    if index < 0 || index as usize >= items.len() {
        return Err(RuntimeError::IndexOutOfBounds { span, index, len: items.len() });
    }
    Ok(&items[index as usize])
}

fn index_array_mut(items: &mut [Value], index: i64, span: Span) -> Result<(), RuntimeError> {
    if index < 0 || index as usize >= items.len() {
        return Err(RuntimeError::IndexOutOfBounds { span, index, len: items.len() });
    }
    Ok(())
}

fn eval_bop(op: BinOp, l: &Expr, r: &Expr, span: Span, rho: &ValueEnv, heap: &mut Heap) -> Result<Value, RuntimeError> {
    match op {
        // Short-circuit (spec §4.6, §8): the right operand is only
        // evaluated when it can change the result.
        BinOp::And => {
            if !as_bool(eval(l, rho, heap)?, span)? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(as_bool(eval(r, rho, heap)?, span)?))
        }
        BinOp::Or => {
            if as_bool(eval(l, rho, heap)?, span)? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(as_bool(eval(r, rho, heap)?, span)?))
        }
        _ if op.is_arithmetic() => {
            let lv = as_int(eval(l, rho, heap)?, span)?;
            let rv = as_int(eval(r, rho, heap)?, span)?;
            let result = match op {
                BinOp::Add => lv.wrapping_add(rv),
                BinOp::Sub => lv.wrapping_sub(rv),
                BinOp::Mul => lv.wrapping_mul(rv),
                BinOp::Div if rv == 0 => return Err(RuntimeError::DivByZero { span }),
                BinOp::Div => lv / rv,
                BinOp::Mod if rv == 0 => return Err(RuntimeError::DivByZero { span }),
                // Rust's `%` already truncates toward zero, matching the
                // dividend's sign per spec §4.6.
                BinOp::Mod => lv % rv,
                _ => unreachable!("non-arithmetic BinOp in arithmetic arm"),
            };
            Ok(Value::Int(result))
        }
        _ => {
            let lv = eval(l, rho, heap)?;
            let rv = eval(r, rho, heap)?;
            compare(op, &lv, &rv, span)
        }
    }
}

fn compare(op: BinOp, l: &Value, r: &Value, span: Span) -> Result<Value, RuntimeError> {
    let ordering = match (l, r) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.as_ref().cmp(b.as_ref()),
        _ => return Err(RuntimeError::RuntimeTypeMismatch { span }),
    };
    let result = match op {
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::Ne => ordering != Ordering::Equal,
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Ge => ordering != Ordering::Less,
        _ => unreachable!("non-comparison BinOp in compare"),
    };
    Ok(Value::Bool(result))
}
