//! End-to-end tests for the indentkit binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

fn indentkit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("indentkit").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn tokenize_simple_output() {
    let tmp = tempfile::tempdir().unwrap();
    indentkit(tmp.path())
        .arg("tokenize")
        .arg(fixture("scaffold/basic.tree"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "line:src/\n<indent>\n  line:file.txt\n  <indent>\n    line:hello\n    line:world\n  <undent>\n<undent>\nline:other.txt",
        ));
}

#[test]
fn tokenize_symbols_as_json() {
    let tmp = tempfile::tempdir().unwrap();
    indentkit(tmp.path())
        .args(["tokenize", "--classifier", "symbols", "--format", "json"])
        .arg(fixture("symbols/basic.symbols"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind": "symbol""#))
        .stdout(predicate::str::contains(r#""text": "isDir""#));
}

#[test]
fn scaffold_dry_run_prints_table() {
    let tmp = tempfile::tempdir().unwrap();
    indentkit(tmp.path())
        .args(["scaffold", "root", "--dry-run"])
        .arg(fixture("scaffold/basic.tree"))
        .assert()
        .success()
        .stdout(predicate::str::contains("mkdir  root/src"))
        .stdout(predicate::str::contains("write  root/other.txt"));
    assert!(!tmp.path().join("root").exists());
}

#[test]
fn scaffold_builds_tree() {
    let tmp = tempfile::tempdir().unwrap();
    indentkit(tmp.path())
        .args(["scaffold", "site"])
        .arg(fixture("scaffold/basic.tree"))
        .assert()
        .success();
    let contents = std::fs::read_to_string(tmp.path().join("site/src/file.txt")).unwrap();
    assert_eq!(contents, "hello\nworld");
}

#[test]
fn scaffold_rejects_bad_indentation() {
    let tmp = tempfile::tempdir().unwrap();
    indentkit(tmp.path())
        .args(["scaffold", "site"])
        .arg(fixture("scaffold/bad-unit.tree"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: indentation error on line 3"));
    assert!(!tmp.path().join("site").exists());
}

#[test]
fn project_config_enables_dry_run() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("indentkit.toml"), "[scaffold]\ndry_run = true\n").unwrap();
    indentkit(tmp.path())
        .args(["scaffold", "site", "--format", "json"])
        .arg(fixture("scaffold/basic.tree"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""op": "mkdir""#));
    assert!(!tmp.path().join("site").exists());
}

#[test]
fn unusable_default_unit_fails_before_running() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("indentkit.toml"), "[indent]\ndefault_unit = \"ab\"\n")
        .unwrap();
    indentkit(tmp.path())
        .arg("tokenize")
        .arg(fixture("scaffold/basic.tree"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("indent.default_unit"));
}

#[test]
fn symbols_lookup_and_imports() {
    let tmp = tempfile::tempdir().unwrap();
    indentkit(tmp.path())
        .arg("symbols")
        .arg(fixture("symbols/basic.symbols"))
        .args(["--lookup", "pad", "missing"])
        .args(["--imports", "isFile", "trim"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pad\tsrc/lib/str.ts"))
        .stdout(predicate::str::contains("missing\t(not found)"))
        .stdout(predicate::str::contains(
            "import {isFile} from './src/lib/fs.ts';\nimport {trim} from './src/lib/str.ts';",
        ));
}

#[test]
fn symbols_default_path_comes_from_settings() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join("src")).unwrap();
    std::fs::copy(fixture("symbols/basic.symbols"), tmp.path().join("src/.symbols")).unwrap();
    indentkit(tmp.path())
        .arg("symbols")
        .assert()
        .success()
        .stdout(predicate::str::contains("isDir\tsrc/lib/fs.ts"));
}

#[test]
fn symbols_check_files_fails_for_missing_library() {
    let tmp = tempfile::tempdir().unwrap();
    indentkit(tmp.path())
        .args(["symbols", "--check-files"])
        .arg(fixture("symbols/basic.symbols"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("precondition failed"));
}
