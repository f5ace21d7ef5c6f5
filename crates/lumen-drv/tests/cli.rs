//! A couple of tests through the actual built binary (spec §6's CLI
//! contract), complementing the library-level tests in `scenarios.rs`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_source(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".mml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn running_a_well_typed_program_prints_its_rendered_value_and_exits_zero() {
    let file = write_source("1 + 2 * 3");
    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));
}

#[test]
fn a_division_by_zero_exits_with_code_four() {
    let file = write_source("1 / 0");
    Command::cargo_bin("lumen").unwrap().arg(file.path()).assert().code(4);
}

#[test]
fn a_type_error_exits_with_code_three() {
    let file = write_source("1 + true");
    Command::cargo_bin("lumen").unwrap().arg(file.path()).assert().code(3);
}

#[test]
fn emit_tokens_prints_the_token_stream_and_exits_zero() {
    let file = write_source("1 + 2");
    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .arg("--emit-tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Int"));
}
