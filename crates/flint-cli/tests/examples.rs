use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap().parent().unwrap().to_path_buf()
}

fn write_temp_program(dir: &tempfile::TempDir, src: &str) -> PathBuf {
    let path = dir.path().join("program.fl");
    std::fs::write(&path, src).unwrap();
    path
}

#[test]
fn runs_fibonacci_demo() {
    let root = workspace_root();
    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg(root.join("demos/fibonacci.fl"));
    cmd.assert()
        .code(55)
        .stdout(predicate::str::contains("fib(10) = 55"));
}

#[test]
fn runs_shapes_demo() {
    let root = workspace_root();
    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg(root.join("demos/shapes.fl"));
    cmd.assert()
        .code(17)
        .stdout(predicate::str::contains("v = Vec2 { .x = 3 , .y = 4 }"))
        .stdout(predicate::str::contains("kind = 2"));
}

#[test]
fn missing_argument_prompts_for_source_file() {
    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Input source file."));
}

#[test]
fn unreadable_file_is_reported() {
    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg("no/such/file.fl");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Unable to read file."));
}

#[test]
fn unparseable_source_is_reported() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_temp_program(&tmp_dir, "fn main( {\n");

    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Unable to parse AST."));
}

#[test]
fn exit_code_is_mains_result() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_temp_program(&tmp_dir, "fn main() -> i64 { 40 + 2; }");

    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg(path);
    cmd.assert().code(42);
}

#[test]
fn type_errors_are_reported_but_not_fatal() {
    // the checked program still runs; the mismatch only aborts if the
    // offending initialization is reached at runtime
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_temp_program(
        &tmp_dir,
        "fn broken() -> i64 { let x: string = 1; 0; } fn main() -> i64 { 7; }",
    );

    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg(path);
    cmd.assert()
        .code(7)
        .stderr(predicate::str::contains("Type errors:"))
        .stderr(predicate::str::contains(
            "(Initialize) Type mismatch: 'string' != 'i64'.",
        ));
}

#[test]
fn runtime_errors_exit_nonzero() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_temp_program(&tmp_dir, "fn main() -> i64 { 1 / 0; }");

    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Runtime error:"))
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn print_writes_to_stdout() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_temp_program(
        &tmp_dir,
        "fn main() -> i64 { print(\"a\", 1); println(\"b\"); 0; }",
    );

    let mut cmd = Command::cargo_bin("flint-cli").unwrap();
    cmd.arg(path);
    cmd.assert().success().stdout(predicate::str::contains("a 1b\n"));
}
