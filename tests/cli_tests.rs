use assert_cmd::Command;
use std::fs;

const TRACE: &str = r#"{"traceEvents": [
    {"ph": "X", "cat": "python_function", "name": "step", "tid": 3, "ts": 0, "dur": 10},
    {"ph": "X", "cat": "python_function", "name": "inner", "tid": 3, "ts": 1, "dur": 2}
]}"#;

fn trace_prune() -> Command {
    Command::cargo_bin("trace-prune").unwrap()
}

#[test]
fn test_cli_processes_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace.json");
    fs::write(&input, TRACE).unwrap();

    trace_prune()
        .arg(&input)
        .args(["--tids", "auto", "--max-depth", "1", "--summary"])
        .assert()
        .success();

    let output = fs::read_to_string(dir.path().join("trace_processed.json")).unwrap();
    assert!(output.contains("\"step\""));
    assert!(!output.contains("\"inner\""));
}

#[test]
fn test_cli_accepts_negative_depth() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace.json");
    fs::write(&input, TRACE).unwrap();

    trace_prune().arg(&input).args(["-m", "-1"]).assert().success();
}

#[test]
fn test_cli_rejects_bad_thread_list() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace.json");
    fs::write(&input, TRACE).unwrap();

    trace_prune().arg(&input).args(["-t", "3,main"]).assert().failure();
    assert!(!dir.path().join("trace_processed.json").exists());
}

#[test]
fn test_cli_fails_when_every_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.json"), "nope").unwrap();
    fs::write(dir.path().join("b.json"), r#"{"other": []}"#).unwrap();

    trace_prune().arg(dir.path()).assert().failure();
}

#[test]
fn test_cli_succeeds_when_some_files_fail() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.json"), "nope").unwrap();
    fs::write(dir.path().join("b.json"), TRACE).unwrap();

    trace_prune().arg(dir.path()).assert().success();
}

#[test]
fn test_cli_missing_path() {
    trace_prune().arg("/no/such/trace.json").assert().failure();
}
