use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding the logs of one test
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

struct Outcome {
    code: i32,
    stdout: String,
}

fn compare(baseline: &Path, candidate: &Path, extra: &[&str]) -> Outcome {
    let output = Command::cargo_bin("compare-logs")
        .expect("binary builds")
        .arg("compare")
        .arg("--baseline")
        .arg(baseline)
        .arg("--candidate")
        .arg(candidate)
        .args(extra)
        .output()
        .expect("Failed to run compare-logs");

    Outcome {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    }
}

#[test]
fn swapped_rows_under_one_key_pass() {
    let fx = Fixture::new();
    let b = fx.write(
        "baseline.csv",
        "timestamp,event,ticket,op,lots\n1,trade,100,0,0.1\n1,trade,100,0,0.2\n",
    );
    let c = fx.write(
        "candidate.csv",
        "timestamp,event,ticket,op,lots\n1,trade,100,0,0.2\n1,trade,100,0,0.1\n",
    );

    let out = compare(&b, &c, &[]);

    assert_eq!(out.code, 0, "{}", out.stdout);
    assert!(out.stdout.contains("RESULT: PASS"));
}

#[test]
fn lots_difference_fails() {
    let fx = Fixture::new();
    let b = fx.write("b.csv", "timestamp,event,ticket,op,lots\n1,trade,42,0,0.1\n");
    let c = fx.write("c.csv", "timestamp,event,ticket,op,lots\n1,trade,42,0,0.2\n");

    let out = compare(&b, &c, &["--align-key", "timestamp,event,ticket,op"]);

    assert_eq!(out.code, 1);
    assert!(out.stdout.contains("RESULT: FAIL"));
}

#[test]
fn duplicate_key_mismatched_lots_reports_diff() {
    let fx = Fixture::new();
    let header = "timestamp,event,ticket,op,lots\n";
    let b = fx.write("b.csv", &format!("{}1,A,100,0,0.01\n1,A,100,0,0.02\n", header));
    let c = fx.write("c.csv", &format!("{}1,A,100,0,0.01\n1,A,100,0,0.03\n", header));

    let out = compare(&b, &c, &[]);

    assert_ne!(out.code, 0);
    assert!(out.stdout.contains("base=0.02 cand=0.03"), "{}", out.stdout);
    assert!(out.stdout.contains("Row pairs with diffs: 1"));
}

#[test]
fn schema_header_match_passes() {
    let fx = Fixture::new();
    let schema = fx.write("schema.txt", "# comment line\ncol1,col2\ncol3,col4\n");
    let b = fx.write("baseline.csv", "col1,col2,col3,col4\n1,2,3,4\n");
    let c = fx.write("candidate.csv", "col1,col2,col3,col4\n1,2,3,4\n");

    let schema_arg = schema.to_string_lossy().into_owned();
    let out = compare(&b, &c, &["--schema", &schema_arg, "--align-key", "col1"]);

    assert_eq!(out.code, 0, "{}", out.stdout);
}

#[test]
fn schema_header_mismatch_fails() {
    let fx = Fixture::new();
    let schema = fx.write("schema.txt", "# schema\ncol1,col2\ncol3\n");
    let b = fx.write("baseline.csv", "col1,col2,col3\n1,2,3\n");
    let c = fx.write("candidate.csv", "col1,col2,colX\n1,2,3\n");

    let schema_arg = schema.to_string_lossy().into_owned();
    let out = compare(&b, &c, &["--schema", &schema_arg, "--align-key", "col1"]);

    assert_ne!(out.code, 0);
    assert!(out.stdout.contains("Candidate header does not match schema"));
    assert!(!out.stdout.contains("Baseline header does not match schema"));
}

#[test]
fn schema_mismatch_alone_fails_identical_logs() {
    let fx = Fixture::new();
    let schema = fx.write("schema.txt", "col1,col2,col4\n");
    let b = fx.write("baseline.csv", "col1,col2,col3\n1,2,3\n");
    let c = fx.write("candidate.csv", "col1,col2,col3\n1,2,3\n");

    let schema_arg = schema.to_string_lossy().into_owned();
    let out = compare(&b, &c, &["--schema", &schema_arg, "--align-key", "col1"]);

    assert_eq!(out.code, 1, "{}", out.stdout);
    assert!(out.stdout.contains("Baseline header does not match schema"));
    assert!(out.stdout.contains("Candidate header does not match schema"));
    assert!(out.stdout.contains("Row pairs with diffs: 0"));
    assert!(out.stdout.contains("RESULT: FAIL"));
}

#[test]
fn extra_row_fails_only_in_strict_mode() {
    let fx = Fixture::new();
    let b = fx.write("b.csv", "timestamp;event;ticket;op\n1;open;7;0\n");
    let c = fx.write("c.csv", "timestamp;event;ticket;op\n1;open;7;0\n2;close;7;1\n");

    let lenient = compare(&b, &c, &[]);
    assert_eq!(lenient.code, 0, "{}", lenient.stdout);
    assert!(lenient.stdout.contains("Extra in candidate: 1"));

    let strict = compare(&b, &c, &["--strict-rows"]);
    assert_eq!(strict.code, 1);
    assert!(strict.stdout.contains("[MISS] Extra in candidate only key=(2, close, 7, 1)"));
}

#[test]
fn ignored_column_never_reported() {
    let fx = Fixture::new();
    let b = fx.write("b.csv", "timestamp,event,ticket,op,comment\n1,open,7,0,first\n");
    let c = fx.write("c.csv", "timestamp,event,ticket,op,comment\n1,open,7,0,second\n");

    let out = compare(&b, &c, &["--ignore-cols", "comment"]);

    assert_eq!(out.code, 0);
    assert!(!out.stdout.contains("comment:"));
}

#[test]
fn missing_key_column_is_an_error() {
    let fx = Fixture::new();
    let b = fx.write("b.csv", "timestamp,event\n1,open\n");
    let c = fx.write("c.csv", "timestamp,event\n1,open\n");

    let out = compare(&b, &c, &[]);

    assert_eq!(out.code, 2);
}

#[test]
fn json_output_and_report_file() {
    let fx = Fixture::new();
    let b = fx.write("b.csv", "timestamp,event,ticket,op,price\n1,tick,0,0,1.0001\n");
    let c = fx.write("c.csv", "timestamp,event,ticket,op,price\n1,tick,0,0,1.0000\n");
    let report_path = fx.path("report.json");
    let report_arg = report_path.to_string_lossy().into_owned();

    let out = compare(
        &b,
        &c,
        &["--float-tol-price", "0.0001", "--format", "json", "--report", &report_arg],
    );

    assert_eq!(out.code, 0, "{}", out.stdout);
    let printed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(printed["report"]["verdict"], "PASS");

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(saved["report"]["summary"]["aligned_pairs"], 1);
}

#[test]
fn init_config_then_compare_with_it() {
    let fx = Fixture::new();
    let config = fx.path("parity.json");

    Command::cargo_bin("compare-logs")
        .unwrap()
        .arg("init-config")
        .arg("--output")
        .arg(&config)
        .assert()
        .success();

    let b = fx.write("b.csv", "timestamp,event,ticket,op\n1,open,7,0\n");
    let c = fx.write("c.csv", "timestamp,event,ticket,op\n1,open,7,0\n");
    let config_arg = config.to_string_lossy().into_owned();

    let out = compare(&b, &c, &["--config", &config_arg]);
    assert_eq!(out.code, 0, "{}", out.stdout);
}

#[test]
fn check_schema_reports_each_log() {
    let fx = Fixture::new();
    let schema = fx.write("schema.txt", "a,b,c\n");
    let good = fx.write("good.csv", "a,b,c\n1,2,3\n");
    let bad = fx.write("bad.csv", "a,c\n1,3\n");

    let output = Command::cargo_bin("compare-logs")
        .unwrap()
        .arg("check-schema")
        .arg("--schema")
        .arg(&schema)
        .arg(&good)
        .arg(&bad)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("missing: b"));
}
