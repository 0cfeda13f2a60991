//! Integration tests for the ls8 runner binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use clap as _;
use ls8 as _;
use ls8_core as _;
use thiserror as _;

const PRINT8: &str = "\
# print8: load 8 into R0 and print it
10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ls8"))
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn sample_program(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../programs")
        .join(name)
}

fn run_ls8(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("failed to run ls8")
}

#[test]
fn print8_prints_eight() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "print8.ls8", PRINT8);

    let output = run_ls8(&[program.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "8\n");
}

#[test]
fn mult_prints_seventy_two() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(
        temp_dir.path(),
        "mult.ls8",
        "10000010\n00000000\n00001000\n10000010\n00000001\n00001001\n\
         10100010\n00000000\n00000001\n01000111\n00000000\n00000001\n",
    );

    let output = run_ls8(&[program.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "72\n");
}

#[test]
fn bundled_samples_run_to_completion() {
    for (name, expected) in [("print8.ls8", "8\n"), ("mult.ls8", "72\n")] {
        let program = sample_program(name);
        let output = run_ls8(&[program.to_str().unwrap()]);

        assert!(output.status.success(), "{name} failed");
        assert_eq!(String::from_utf8_lossy(&output.stdout), expected, "{name}");
    }
}

#[test]
fn missing_file_exits_with_two() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("nope.ls8");

    let output = run_ls8(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_literal_reports_line_and_exits_with_one() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "bad.ls8", "10000010\n0000000x\n");

    let output = run_ls8(&[program.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.ls8:2: error: invalid binary literal `0000000x`"));
}

#[test]
fn illegal_opcode_exits_with_one_after_prior_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(
        temp_dir.path(),
        "illegal.ls8",
        "10000010\n00000000\n00000101\n01000111\n00000000\n11111111\n",
    );

    let output = run_ls8(&[program.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "5\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("illegal instruction"));
}

#[test]
fn max_steps_stops_a_program_without_hlt() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(
        temp_dir.path(),
        "loop.ls8",
        "10000010\n00000000\n00000001\n01000111\n00000000\n01000111\n00000000\n",
    );

    let output = run_ls8(&[program.to_str().unwrap(), "--max-steps", "2"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("warning: step limit of 2"));
}

#[test]
fn max_steps_reached_on_hlt_halts_without_warning() {
    let program = sample_program("print8.ls8");

    let output = run_ls8(&[program.to_str().unwrap(), "--max-steps", "2"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "8\n");
    assert!(!String::from_utf8_lossy(&output.stderr).contains("warning"));
}

#[test]
fn trace_writes_state_lines_to_stderr_only() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "print8.ls8", PRINT8);

    let output = run_ls8(&[program.to_str().unwrap(), "--trace"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "8\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 00"));
    assert!(stderr.contains("LDI R0, 8"));
    assert!(stderr.contains("PRN R0"));
}

#[test]
fn dump_state_emits_snapshot_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "print8.ls8", PRINT8);

    let output = run_ls8(&[program.to_str().unwrap(), "--dump-state"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let (printed, json) = stdout.split_once('\n').unwrap();
    assert_eq!(printed, "8");

    let state: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(state["pc"], 5);
    assert_eq!(state["run_state"], "Halted");
    assert_eq!(state["registers"][0], 8);
    assert_eq!(state["memory"].as_array().map(Vec::len), Some(256));
}

#[test]
fn dump_state_after_fault_reports_latched_fault() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(
        temp_dir.path(),
        "illegal.ls8",
        "10000010\n00000011\n00000111\n11111111\n",
    );

    let output = run_ls8(&[program.to_str().unwrap(), "--dump-state"]);

    assert_eq!(output.status.code(), Some(1));
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let fault = &state["run_state"]["Faulted"]["IllegalInstruction"];
    assert_eq!(fault["opcode"], 255);
    assert_eq!(fault["pc"], 3);
    assert_eq!(state["pc"], 3);
    assert_eq!(state["registers"][3], 7);
}
