//! lumen-eval — the environment-threaded tree-walking evaluator (spec §4.6)
//! plus the value model and heap it runs against (spec §3.4, §4.5).
//!
//! Mirrors the judgement ρ; H ⊢ e ⇓ v over the same [`lumen_ast::Program`]
//! `lumen-check` type-checks; a caller is expected to check first and only
//! evaluate programs that passed (spec §2: data flows A→B→C→D→F).

mod error;
mod evaluator;
mod heap;
mod value;

pub use error::RuntimeError;
pub use evaluator::eval_program;
pub use heap::{Heap, HeapId, HeapObj};
pub use value::{Binding, Closure, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_lex::tokenize;

    fn run(src: &str) -> Result<Value, RuntimeError> {
        let tokens = tokenize(src).expect("test source must lex");
        let program = lumen_par::parse_tokens(tokens).expect("test source must parse");
        eval_program(&program).map(|(v, _)| v)
    }

    fn run_int(src: &str) -> i64 {
        match run(src).expect("test source must evaluate") {
            Value::Int(n) => n,
            other => panic!("expected int, got {other:?}"),
        }
    }

    #[test]
    fn factorial_of_five_is_120() {
        let src = "let rec factorial (n:int):int = if n <= 1 then 1 else n * factorial (n-1) in factorial 5";
        assert_eq!(run_int(src), 120);
    }

    #[test]
    fn fibonacci_of_ten_is_55() {
        let src = "let rec fib (n:int):int = if n <= 1 then n else fib (n-1) + fib (n-2) in fib 10";
        assert_eq!(run_int(src), 55);
    }

    #[test]
    fn mutable_record_fields_are_visible_through_any_alias() {
        let src = "type point = { mutable x:int; mutable y:int } in \
                   let p = {x=10; y=20} in let s = p.x + p.y in p.x <- 15; p.x + p.y";
        assert_eq!(run_int(src), 35);
    }

    #[test]
    fn array_slot_assignment_is_visible_on_later_reads() {
        let src = "let arr = [1;2;3;4;5] in let s = arr.(0)+arr.(1)+arr.(2) in arr.(0) <- 10; arr.(0) + s";
        assert_eq!(run_int(src), 16);
    }

    #[test]
    fn while_loop_accumulates_across_iterations() {
        let src = "let x = 0 in let s = 0 in while x < 10 do s <- s + x; x <- x + 1 done; s";
        assert_eq!(run_int(src), 45);
    }

    #[test]
    fn curried_application_applies_one_argument_at_a_time() {
        let src = "let apply (f:int->int) (x:int):int = f x in let double (n:int):int = n * 2 in apply double 5";
        assert_eq!(run_int(src), 10);
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        assert!(matches!(run("1 / 0").unwrap_err(), RuntimeError::DivByZero { .. }));
    }

    #[test]
    fn out_of_bounds_array_index_is_a_runtime_error() {
        assert!(matches!(run("[1;2;3].(5)").unwrap_err(), RuntimeError::IndexOutOfBounds { .. }));
    }

    #[test]
    fn negative_array_index_is_out_of_bounds() {
        assert!(matches!(run("[1;2;3].(-1)").unwrap_err(), RuntimeError::IndexOutOfBounds { .. }));
    }

    #[test]
    fn and_short_circuits_without_evaluating_the_right_operand() {
        // `1/0` would raise DivByZero if ever evaluated; short-circuiting on
        // `false &&` must never reach it.
        assert_eq!(run("false && (1/0 == 0)").unwrap(), Value::Bool(false));
    }

    #[test]
    fn or_short_circuits_without_evaluating_the_right_operand() {
        assert_eq!(run("true || (1/0 == 0)").unwrap(), Value::Bool(true));
    }

    #[test]
    fn if_never_evaluates_the_untaken_branch() {
        let src = "let x = 0 in let s = 0 in \
                   (if true then s <- 1 else s <- 1/0); s";
        assert_eq!(run_int(src), 1);
    }

    #[test]
    fn modulo_follows_the_sign_of_the_dividend() {
        assert_eq!(run_int("(-7) mod 2"), -1);
        assert_eq!(run_int("7 mod 2"), 1);
    }

    #[test]
    fn string_comparison_is_lexicographic() {
        assert_eq!(run(r#""abc" < "abd""#).unwrap(), Value::Bool(true));
    }
}
