//! Syntax-directed type checking, judgement Γ;D ⊢ e : τ (spec §4.4).
//!
//! Each `check_expr` arm is one of the 20 numbered rules. `D`, the record
//! declaration table, is built up as `TypeDecl` nodes are encountered —
//! concrete Lumen programs declare every record type before using it, so by
//! the time a `Strct`/`GetF`/`SetF` node is reached its declaration is
//! already in `D`.

use indexmap::IndexMap;
use lumen_ast::{BinOp, Expr, FieldDecl, Ty, UnOp};
use lumen_par::UNRESOLVED_RECORD_NAME;
use lumen_util::{Env, Span, Symbol};

use crate::error::TypeError;

/// A Γ binding: a type plus whether this identifier was promoted to a
/// mutable cell (spec §4.4 rule 14 / §5's mutable-let rule).
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub ty: Ty,
    pub mutable: bool,
}

/// The record declaration table D: name → its fields, in declared order.
pub type RecordTable = IndexMap<Symbol, Vec<FieldDecl>>;

/// Type-checks a whole program, returning the type of its final value.
///
/// The literal-vs-declaration field-order check (rule 15) means a program
/// that passes here has every `Strct` literal's fields already in the same
/// order as its record declaration — so a later stage rendering a record
/// value from the heap never needs D back; the heap's own field order
/// already matches it.
pub fn check_program(program: &lumen_ast::Program) -> Result<Ty, TypeError> {
    let mut records = RecordTable::new();
    let result = check_expr(&program.root, &Env::new(), &mut records);
    tracing::debug!(?result, "type-checked program");
    result
}

fn check_expr(e: &Expr, gamma: &Env<Binding>, records: &mut RecordTable) -> Result<Ty, TypeError> {
    match e {
        // 1. Literals.
        Expr::Int(_, _) => Ok(Ty::Int),
        Expr::Bool(_, _) => Ok(Ty::Bool),
        Expr::String(_, _) => Ok(Ty::String),
        Expr::Unit(_) => Ok(Ty::Unit),

        // 2. Var x.
        Expr::Var(name, span) => gamma
            .get(*name)
            .map(|b| b.ty.clone())
            .ok_or(TypeError::UnboundVariable { name: *name, span: *span }),

        // 3-5. Binary operators.
        Expr::Bop(op, l, r, span) => check_bop(*op, l, r, *span, gamma, records),

        // 6. Unary operators.
        Expr::Uop(op, operand, span) => {
            let operand_ty = check_expr(operand, gamma, records)?;
            let (expected, result) = match op {
                UnOp::Neg => (Ty::Int, Ty::Int),
                UnOp::Not => (Ty::Bool, Ty::Bool),
            };
            expect_ty(&expected, &operand_ty, *span)?;
            Ok(result)
        }

        // 7. If(c, t, f).
        Expr::If(c, t, f, span) => {
            let c_ty = check_expr(c, gamma, records)?;
            expect_ty(&Ty::Bool, &c_ty, c.span())?;
            let t_ty = check_expr(t, gamma, records)?;
            let f_ty = check_expr(f, gamma, records)?;
            expect_ty(&t_ty, &f_ty, *span)?;
            Ok(t_ty)
        }

        // 8. Let(x, e1, e2), with the mutable-let promotion from §5.
        Expr::Let(name, value, body, _) => {
            let value_ty = check_expr(value, gamma, records)?;
            let mutable = body.assigns_to(*name);
            let extended = gamma.extend(*name, Binding { ty: value_ty, mutable });
            check_expr(body, &extended, records)
        }

        // 9. Fun([(xi, ti)], body, tret).
        Expr::Fun(params, body, ret_ty, span) => {
            let mut inner = gamma.clone();
            for p in params {
                inner = inner.extend(p.name, Binding { ty: p.ty.clone(), mutable: false });
            }
            let body_ty = check_expr(body, &inner, records)?;
            expect_ty(ret_ty, &body_ty, *span)?;
            Ok(Ty::curried_arrow(&params.iter().map(|p| p.ty.clone()).collect::<Vec<_>>(), ret_ty.clone()))
        }

        // 10. Fix(f, t, Fun(...)).
        Expr::Fix(name, ty, inner, _) => {
            let extended = gamma.extend(*name, Binding { ty: ty.clone(), mutable: false });
            let inner_ty = check_expr(inner, &extended, records)?;
            expect_ty(ty, &inner_ty, inner.span())?;
            Ok(ty.clone())
        }

        // 11. App(e1, e2).
        Expr::App(f, a, span) => {
            let f_ty = check_expr(f, gamma, records)?;
            match f_ty {
                Ty::Arrow(from, to) => {
                    let a_ty = check_expr(a, gamma, records)?;
                    expect_ty(&from, &a_ty, a.span())?;
                    Ok(*to)
                }
                _ => Err(TypeError::NotAFunction { span: *span }),
            }
        }

        // 12. Seq(e1, e2).
        Expr::Seq(l, r, _) => {
            let l_ty = check_expr(l, gamma, records)?;
            expect_ty(&Ty::Unit, &l_ty, l.span())?;
            check_expr(r, gamma, records)
        }

        // 13. While(c, body).
        Expr::While(c, body, _) => {
            let c_ty = check_expr(c, gamma, records)?;
            expect_ty(&Ty::Bool, &c_ty, c.span())?;
            let body_ty = check_expr(body, gamma, records)?;
            expect_ty(&Ty::Unit, &body_ty, body.span())?;
            Ok(Ty::Unit)
        }

        // 14. Assign(x, e).
        Expr::Assign(name, value, span) => {
            let binding = gamma.get(*name).cloned().ok_or(TypeError::UnboundVariable { name: *name, span: *span })?;
            if !binding.mutable {
                return Err(TypeError::NotMutable { name: *name, span: *span });
            }
            let value_ty = check_expr(value, gamma, records)?;
            expect_ty(&binding.ty, &value_ty, *span)?;
            Ok(Ty::Unit)
        }

        // 15. Strct(name, assignments) -- name is unresolved at parse time
        // (spec §4.2's atom grammar never spells it out); resolve it here
        // by matching the literal's field names against D.
        Expr::Strct(sentinel, fields, span) => {
            debug_assert_eq!(sentinel.as_str(), UNRESOLVED_RECORD_NAME);
            let (record_name, decl) = resolve_record(fields, records, *span)?;
            for (field, decl_field) in fields.iter().zip(decl.iter()) {
                let field_ty = check_expr(&field.value, gamma, records)?;
                expect_ty(&decl_field.ty, &field_ty, field.value.span())?;
            }
            Ok(Ty::Record(record_name))
        }

        // 16. GetF(e, f).
        Expr::GetF(obj, field, span) => {
            let obj_ty = check_expr(obj, gamma, records)?;
            let record_name = expect_record(&obj_ty, *span)?;
            let decl = field_decl(records, record_name, *field, *span)?;
            Ok(decl.ty.clone())
        }

        // 17. SetF(e, f, e').
        Expr::SetF(obj, field, value, span) => {
            let obj_ty = check_expr(obj, gamma, records)?;
            let record_name = expect_record(&obj_ty, *span)?;
            let decl = field_decl(records, record_name, *field, *span)?.clone();
            if !decl.mutable {
                return Err(TypeError::NotMutable { name: *field, span: *span });
            }
            let value_ty = check_expr(value, gamma, records)?;
            expect_ty(&decl.ty, &value_ty, value.span())?;
            Ok(Ty::Unit)
        }

        // 18. Array(es).
        Expr::Array(elements, _) => {
            let mut element_ty = None;
            for element in elements {
                let ty = check_expr(element, gamma, records)?;
                match &element_ty {
                    None => element_ty = Some(ty),
                    Some(expected) => expect_ty(expected, &ty, element.span())?,
                }
            }
            Ok(Ty::array(element_ty.unwrap_or(Ty::Unit)))
        }

        // 19. GetA(e, i).
        Expr::GetA(arr, index, span) => {
            let arr_ty = check_expr(arr, gamma, records)?;
            let index_ty = check_expr(index, gamma, records)?;
            expect_ty(&Ty::Int, &index_ty, index.span())?;
            expect_array(&arr_ty, *span)
        }

        // 20. SetA(e, i, v).
        Expr::SetA(arr, index, value, span) => {
            let arr_ty = check_expr(arr, gamma, records)?;
            let index_ty = check_expr(index, gamma, records)?;
            expect_ty(&Ty::Int, &index_ty, index.span())?;
            let element_ty = expect_array(&arr_ty, *span)?;
            let value_ty = check_expr(value, gamma, records)?;
            expect_ty(&element_ty, &value_ty, value.span())?;
            Ok(Ty::Unit)
        }

        // Record declarations accumulate into D and scope over the rest of
        // the program (spec §4.3).
        Expr::TypeDecl(name, fields, cont, span) => {
            declare_record(records, *name, fields, *span)?;
            check_expr(cont, gamma, records)
        }
    }
}

fn check_bop(
    op: BinOp,
    l: &Expr,
    r: &Expr,
    span: Span,
    gamma: &Env<Binding>,
    records: &mut RecordTable,
) -> Result<Ty, TypeError> {
    let l_ty = check_expr(l, gamma, records)?;
    let r_ty = check_expr(r, gamma, records)?;
    if op.is_arithmetic() {
        expect_ty(&Ty::Int, &l_ty, l.span())?;
        expect_ty(&Ty::Int, &r_ty, r.span())?;
        Ok(Ty::Int)
    } else if op.is_comparison() {
        if !matches!(l_ty, Ty::Int | Ty::Bool | Ty::String) {
            return Err(TypeError::TypeMismatch { expected: Ty::Int, actual: l_ty, span: l.span() });
        }
        expect_ty(&l_ty, &r_ty, span)?;
        Ok(Ty::Bool)
    } else {
        debug_assert!(op.is_logical());
        expect_ty(&Ty::Bool, &l_ty, l.span())?;
        expect_ty(&Ty::Bool, &r_ty, r.span())?;
        Ok(Ty::Bool)
    }
}

fn expect_ty(expected: &Ty, actual: &Ty, span: Span) -> Result<(), TypeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TypeError::TypeMismatch { expected: expected.clone(), actual: actual.clone(), span })
    }
}

fn expect_record(ty: &Ty, span: Span) -> Result<Symbol, TypeError> {
    match ty {
        Ty::Record(name) => Ok(*name),
        _ => Err(TypeError::TypeMismatch { expected: Ty::Record(Symbol::intern("<record>")), actual: ty.clone(), span }),
    }
}

fn expect_array(ty: &Ty, span: Span) -> Result<Ty, TypeError> {
    match ty {
        Ty::Array(of) => Ok((**of).clone()),
        _ => Err(TypeError::TypeMismatch { expected: Ty::array(Ty::Unit), actual: ty.clone(), span }),
    }
}

fn field_decl<'a>(
    records: &'a RecordTable,
    record_name: Symbol,
    field: Symbol,
    span: Span,
) -> Result<&'a FieldDecl, TypeError> {
    records
        .get(&record_name)
        .and_then(|fields| fields.iter().find(|f| f.name == field))
        .ok_or(TypeError::RecordFieldMismatch {
            reason: format!("record `{record_name}` has no field `{field}`"),
            span,
        })
}

fn declare_record(
    records: &mut RecordTable,
    name: Symbol,
    fields: &[FieldDecl],
    span: Span,
) -> Result<(), TypeError> {
    if records.contains_key(&name) {
        return Err(TypeError::RecordFieldMismatch {
            reason: format!("record `{name}` is already declared"),
            span,
        });
    }
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        if !seen.insert(field.name) {
            return Err(TypeError::RecordFieldMismatch {
                reason: format!("record `{name}` declares field `{}` more than once", field.name),
                span,
            });
        }
    }
    records.insert(name, fields.to_vec());
    Ok(())
}

/// Resolves a nameless record literal's `D` entry (spec §4.2's `atom`
/// grammar never names the type) by matching field names:
/// - an exact, in-order match is the record;
/// - same field-name set, different order → `RecordFieldMismatch`;
/// - some field-name overlap, different count → `ArityMismatch`;
/// - no overlap with any declared record → `UnknownRecord`.
fn resolve_record<'a>(
    fields: &[lumen_ast::FieldInit],
    records: &'a RecordTable,
    span: Span,
) -> Result<(Symbol, &'a Vec<FieldDecl>), TypeError> {
    let lit_names: Vec<Symbol> = fields.iter().map(|f| f.name).collect();

    if let Some((name, decl)) =
        records.iter().find(|(_, decl)| decl.iter().map(|f| f.name).eq(lit_names.iter().copied()))
    {
        return Ok((*name, decl));
    }

    let lit_set: std::collections::HashSet<Symbol> = lit_names.iter().copied().collect();
    if let Some((name, _)) = records
        .iter()
        .find(|(_, decl)| decl.len() == lit_names.len() && decl.iter().map(|f| f.name).collect::<std::collections::HashSet<_>>() == lit_set)
    {
        return Err(TypeError::RecordFieldMismatch {
            reason: format!("fields of record `{name}` must appear in declaration order"),
            span,
        });
    }

    if let Some((name, decl)) = records.iter().find(|(_, decl)| decl.iter().any(|f| lit_set.contains(&f.name))) {
        return Err(TypeError::ArityMismatch { record: *name, expected: decl.len(), actual: fields.len(), span });
    }

    Err(TypeError::UnknownRecord { span })
}
