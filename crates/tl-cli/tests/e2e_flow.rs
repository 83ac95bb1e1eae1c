//! End-to-end tests for the `tl` binary.
//!
//! Runs the built binary against timecard files in a temp directory with
//! `HOME` pointed there, so no user config leaks into the results.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn tl_binary() -> String {
    env!("CARGO_BIN_EXE_tl").to_string()
}

fn tl(home: &Path) -> Command {
    let mut command = Command::new(tl_binary());
    command
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("TL_") {
            command.env_remove(key);
        }
    }
    command
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "tl failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write(temp: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const DAILY_ROWS: &str = r#"[
  {"EmployeeCode": "e100", "WorkDate": "2024-01-01", "Project": "Bridge", "Hours": 8},
  {"employee_code": "E100", "work_date": "2024-01-02", "project": "Bridge", "hours": 8},
  {"emp_code": "E100", "date": "01/03/2024", "project": "Bridge", "hours": 8},
  {"employee_code": "E100", "work_date": "2024-01-02", "project": "Tunnel", "hours": 4},
  {"employee_code": "E200", "work_date": "2024-01-05", "project": "Bridge"},
  {"work_date": "2024-01-05", "project": "Bridge"}
]"#;

const ROSTER: &str = r#"{"code": "E100", "first_name": "Jane", "last_name": "Doe", "id": "1001"}
{"code": "E200", "name": "Sam Roe"}
"#;

#[test]
fn test_spans_json_merges_days_and_resolves_names() {
    let temp = TempDir::new().unwrap();
    let rows = write(&temp, "rows.json", DAILY_ROWS);
    let roster = write(&temp, "employees.jsonl", ROSTER);

    let output = tl(temp.path())
        .args(["spans", "--json", "--rows"])
        .arg(&rows)
        .arg("--employees")
        .arg(&roster)
        .output()
        .unwrap();
    assert_success(&output);

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["shape"]["shape"], "daily");
    assert_eq!(report["stats"]["rows"], 6);
    assert_eq!(report["stats"]["dropped_missing_code"], 1);

    let spans = report["spans"].as_array().unwrap();
    assert_eq!(spans.len(), 3);

    let bridge = spans
        .iter()
        .find(|s| s["employee_code"] == "E100" && s["project"] == "Bridge")
        .unwrap();
    assert_eq!(bridge["employee"], "Jane Doe");
    assert_eq!(bridge["employee_id"], "1001");
    assert_eq!(bridge["start"], "2024-01-01");
    assert_eq!(bridge["end"], "2024-01-04");
    assert_eq!(bridge["meta"]["total_hours"], 24.0);

    let sam = spans.iter().find(|s| s["employee_code"] == "E200").unwrap();
    assert_eq!(sam["employee"], "Sam Roe");
}

#[test]
fn test_spans_reads_stdin() {
    let temp = TempDir::new().unwrap();
    let mut child = tl(temp.path())
        .args(["spans", "--rows", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"{\"employee_code\": \"E1\", \"project\": \"P\", \"start\": \"2024-03-01\", \"end\": \"2024-03-04\"}\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_success(&output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("1 rows (spans), 0 dropped, 1 spans"));
    assert!(stdout.contains("E1  \u{2014}  P  [2024-03-01, 2024-03-04)  3d  -"));
}

#[test]
fn test_overlaps_reports_double_booking() {
    let temp = TempDir::new().unwrap();
    let rows = write(&temp, "rows.json", DAILY_ROWS);

    let output = tl(temp.path())
        .args(["overlaps", "--rows"])
        .arg(&rows)
        .output()
        .unwrap();
    assert_success(&output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("1 overlap(s)"), "unexpected output: {stdout}");
    assert!(stdout.contains("Bridge [2024-01-01, 2024-01-04) x Tunnel [2024-01-02, 2024-01-03), 1 shared days"));
}

#[test]
fn test_shape_reports_mixed_batch() {
    let temp = TempDir::new().unwrap();
    let rows = write(
        &temp,
        "rows.jsonl",
        "{\"employee_code\": \"E1\", \"start\": \"2024-01-01\"}\n{\"employee_code\": \"E1\", \"work_date\": \"2024-01-05\"}\n",
    );

    let output = tl(temp.path())
        .args(["shape", "--json", "--rows"])
        .arg(&rows)
        .output()
        .unwrap();
    assert_success(&output);

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["shape"], "mixed");
    assert_eq!(report["span_rows"], 1);
    assert_eq!(report["daily_rows"], 1);
}

#[test]
fn test_config_file_supplies_roster() {
    let temp = TempDir::new().unwrap();
    let rows = write(&temp, "rows.json", DAILY_ROWS);
    let roster = write(&temp, "employees.jsonl", ROSTER);
    let config = write(
        &temp,
        "tl.toml",
        &format!("employees_path = {:?}\n", roster.display().to_string()),
    );

    let output = tl(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["spans", "--rows"])
        .arg(&rows)
        .output()
        .unwrap();
    assert_success(&output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Sam Roe"), "unexpected output: {stdout}");
}

#[test]
fn test_zero_chunk_size_fails() {
    let temp = TempDir::new().unwrap();
    let rows = write(&temp, "rows.json", DAILY_ROWS);

    let output = tl(temp.path())
        .env("TL_CHUNK_SIZE", "0")
        .args(["spans", "--rows"])
        .arg(&rows)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid configuration"));
}

#[test]
fn test_missing_rows_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = tl(temp.path())
        .args(["spans", "--rows"])
        .arg(temp.path().join("nope.json"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}
