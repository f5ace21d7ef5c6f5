//! Parser throughput benchmarks. Run with: `cargo bench --package lumen-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lumen_ast::Program;
use lumen_lex::tokenize;
use lumen_par::parse_tokens;

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source).expect("benchmark source must lex");
    parse_tokens(tokens).expect("benchmark source must parse")
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");
    let source = "let x = 1 + 2 * 3 in x";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("let_arith", |b| b.iter(|| parse_source(black_box(source))));
    group.finish();
}

fn bench_parser_recursive_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_recursive_function");
    let source = r#"
        let rec fact (n : int) : int =
          if n <= 1 then 1 else n * fact (n - 1)
        in
        fact 10
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("fact", |b| b.iter(|| parse_source(black_box(source))));
    group.finish();
}

fn bench_parser_records_and_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_records_and_arrays");
    let source = r#"
        type point = { mutable x : int; mutable y : int } in
        let p = { x = 1; y = 2 } in
        let a = [1; 2; 3; 4; 5] in
        p.x <- a.(0);
        p.x + a.(1)
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("records_arrays", |b| b.iter(|| parse_source(black_box(source))));
    group.finish();
}

fn bench_parser_curried_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_curried_application");
    let source = r#"
        let apply (f : int -> int) (x : int) : int = f x in
        let double (n : int) : int = n * 2 in
        apply double 5
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("curried_apply", |b| b.iter(|| parse_source(black_box(source))));
    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");
    let source = r#"
        let x = 0 in
        let s = 0 in
        while x < 10 do
          s <- s + x;
          x <- x + 1
        done;
        s
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("while_accumulate", |b| b.iter(|| parse_source(black_box(source))));
    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");
    let source = r#"
        type point = { mutable x : int; mutable y : int } in
        let rec sum_to (n : int) : int =
          if n <= 0 then 0 else n + sum_to (n - 1)
        in
        let mk_point (x : int) (y : int) : point = { x = x; y = y } in
        let p = mk_point 1 2 in
        let arr = [1; 2; 3; 4; 5] in
        let total = sum_to 10 in
        p.x <- arr.(0) + total;
        p.x + p.y
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("complex_source", |b| b.iter(|| parse_source(black_box(source))));
    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_recursive_function,
    bench_parser_records_and_arrays,
    bench_parser_curried_application,
    bench_parser_control_flow,
    bench_parser_complex
);
criterion_main!(benches);
