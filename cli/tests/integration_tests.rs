use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("valuegen_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn valuegen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_valuegen"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run valuegen")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

#[test]
fn test_normalize_prints_canonical_schema() {
    let dir = TempDir::new("normalize_canonical");
    let input = dir.write(
        "schema.json",
        r#"{ "type": "integer", "exclusiveMinimum": 3, "exclusiveMaximum": 21, "multipleOf": 3 }"#,
    );

    let output = valuegen(&["normalize", "--input", input.to_str().unwrap()]);
    assert!(output.status.success());

    let schema = stdout_json(&output);
    assert_eq!(schema["minimum"], 6);
    assert_eq!(schema["maximum"], 18);
    assert!(schema.get("exclusiveMinimum").is_none());
}

#[test]
fn test_normalize_reports_corrections_on_stderr() {
    let dir = TempDir::new("normalize_report");
    let input = dir.write("schema.json", r#"{ "type": "array", "minItems": 5, "maxItems": 2 }"#);

    let output = valuegen(&["normalize", "--input", input.to_str().unwrap()]);
    assert!(output.status.success(), "corrections are not fatal without --strict");
    assert_eq!(stdout_json(&output)["minItems"], 2);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("minItems=5 is greater than maxItems=2"), "stderr: {stderr}");
}

#[test]
fn test_normalize_strict_fails_on_corrections() {
    let dir = TempDir::new("normalize_strict");
    let input = dir.write("schema.json", r#"{ "type": "array", "minItems": 5, "maxItems": 2 }"#);

    let output = valuegen(&["normalize", "--input", input.to_str().unwrap(), "--strict"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: normalization corrected 1"));
}

#[test]
fn test_normalize_strict_accepts_clean_schema() {
    let dir = TempDir::new("normalize_strict_clean");
    let input = dir.write("schema.json", r#"{ "type": "string", "minLength": 1, "maxLength": 8 }"#);

    let output = valuegen(&["normalize", "--input", input.to_str().unwrap(), "--strict"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["maxLength"], 8);
}

#[test]
fn test_normalize_reads_yaml() {
    let dir = TempDir::new("normalize_yaml");
    let input = dir.write("schema.yaml", "type: string\nformat: uuid\nminLength: 50\n");

    let output = valuegen(&["normalize", "--input", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["minLength"], 36);
}

#[test]
fn test_normalize_missing_file_fails() {
    let output = valuegen(&["normalize", "--input", "/nonexistent/schema.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: failed to read"));
}

#[test]
fn test_normalize_rejects_unknown_type() {
    let dir = TempDir::new("normalize_bad_type");
    let input = dir.write("schema.json", r#"{ "type": "widget" }"#);

    let output = valuegen(&["normalize", "--input", input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse"));
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

#[test]
fn test_merge_overlays_input_on_defaults() {
    let dir = TempDir::new("merge_overlay");
    let defaults = dir.write("defaults.json", r#"{ "type": "integer", "minimum": 0, "maximum": 100 }"#);
    let input = dir.write("schema.json", r#"{ "type": "integer", "maximum": 10 }"#);

    let output = valuegen(&[
        "merge",
        "--defaults",
        defaults.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let schema = stdout_json(&output);
    assert_eq!(schema["minimum"], 0);
    assert_eq!(schema["maximum"], 10);
}

#[test]
fn test_merge_then_normalize() {
    let dir = TempDir::new("merge_normalize");
    let defaults = dir.write("defaults.json", r#"{ "type": "integer", "minimum": 50 }"#);
    let input = dir.write("schema.json", r#"{ "type": "integer", "maximum": 10 }"#);

    let output = valuegen(&[
        "merge",
        "--defaults",
        defaults.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
        "--normalize",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["minimum"], 10);
}

// ---------------------------------------------------------------------------
// sample
// ---------------------------------------------------------------------------

#[test]
fn test_sample_draws_members() {
    let dir = TempDir::new("sample_members");
    let input = dir.write(
        "schema.json",
        r#"{ "type": "integer", "exclusiveMinimum": 3, "exclusiveMaximum": 21, "multipleOf": 3 }"#,
    );

    let output = valuegen(&["sample", "--input", input.to_str().unwrap(), "--count", "25", "--seed", "7"]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 25);
    for line in lines {
        let value: i64 = line.parse().unwrap();
        assert!([6, 9, 12, 15, 18].contains(&value), "unexpected {value}");
    }
}

#[test]
fn test_sample_seed_is_reproducible() {
    let dir = TempDir::new("sample_seed");
    let input = dir.write("schema.json", r#"{ "type": "number", "minimum": -5, "maximum": 5 }"#);
    let args = ["sample", "--input", input.to_str().unwrap(), "--count", "10", "--seed", "42"];

    let first = valuegen(&args);
    let second = valuegen(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_sample_uses_config_defaults() {
    let dir = TempDir::new("sample_config");
    let input = dir.write("schema.yaml", "type: integer\nminimum: 1\nmaximum: 3\n");
    let config = dir.write("valuegen.yaml", "samples: 4\nseed: 9\n");

    let output = valuegen(&[
        "sample",
        "--input",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 4);
    for line in lines {
        let value: i64 = line.parse().unwrap();
        assert!((1..=3).contains(&value));
    }
}

#[test]
fn test_sample_rejects_string_schema() {
    let dir = TempDir::new("sample_string");
    let input = dir.write("schema.json", r#"{ "type": "string" }"#);

    let output = valuegen(&["sample", "--input", input.to_str().unwrap()]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// range
// ---------------------------------------------------------------------------

#[test]
fn test_range_other_skips_excluded() {
    let output = valuegen(&[
        "range", "--text", "Other", "--excluded", "1", "--excluded", "2", "--count", "50", "--seed", "3",
    ]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 50);
    assert!(lines.iter().all(|line| line != "1" && line != "2"));
}

#[test]
fn test_range_lower_bound_with_factor() {
    let output = valuegen(&[
        "range", "--text", "> 100", "--not-multiple-of", "2", "--count", "30", "--seed", "5",
    ]);
    assert!(output.status.success());

    for line in stdout_lines(&output) {
        let value: i64 = line.parse().unwrap();
        assert!(value > 100 && value % 2 != 0, "unexpected {value}");
    }
}

#[test]
fn test_range_decimal_upper_bound() {
    let output = valuegen(&["range", "--text", "< 1.5", "--decimal", "--count", "30", "--seed", "11"]);
    assert!(output.status.success());

    for line in stdout_lines(&output) {
        let value: f64 = line.parse().unwrap();
        assert!(value < 1.5, "unexpected {value}");
    }
}

#[test]
fn test_range_empty_domain_fails() {
    let output = valuegen(&["range", "--text", "21", "--multiple-of", "2", "--count", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: no value satisfies"));
}

#[test]
fn test_range_invalid_value_fails() {
    let output = valuegen(&["range", "--text", "> ten"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid integer value='ten'"));
}
