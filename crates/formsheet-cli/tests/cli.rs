use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "output": {
        "priority_columns": ["gpa"],
        "include_processed_date": false,
        "missing_marker": "Not Found"
    },
    "fields": [
        { "name": "email", "kind": "email", "rules": [ { "pattern": "Email:\\s*([^\\s]+@[^\\s]+)" } ] },
        { "name": "gpa", "kind": "numeric", "rules": [ { "pattern": "GPA:\\s*([^\\n]+)" } ] }
    ]
}"#;

fn formsheet(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("formsheet").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.json"), CONFIG).unwrap();
    let forms = dir.path().join("forms");
    fs::create_dir(&forms).unwrap();
    fs::write(forms.join("b.txt"), "Email: B@Example.com\nGPA: 3.75/4.0\n").unwrap();
    fs::write(forms.join("a.txt"), "Email: a@b.com\nPhone: 123\n").unwrap();
    fs::write(forms.join("c.pdf"), "this is not a pdf").unwrap();
    fs::write(forms.join("notes.md"), "ignored").unwrap();
    dir
}

#[test]
fn test_batch_skips_bad_document_and_succeeds() {
    let dir = workspace();
    let out = dir.path().join("out/data.csv");
    let summary = dir.path().join("out/summary.csv");

    formsheet(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("batch")
        .arg(dir.path().join("forms"))
        .arg("--output")
        .arg(&out)
        .arg("--summary")
        .arg(&summary)
        .arg("-j")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped files:"))
        .stdout(predicate::str::contains("c.pdf"))
        .stdout(predicate::str::contains("Most common email domain: b.com (1 users)"));

    let data = fs::read_to_string(&out).unwrap();
    assert_eq!(
        data,
        "source_file,gpa,email\n\
         a.txt,Not Found,a@b.com\n\
         b.txt,3.75,b@example.com\n"
    );

    let summary = fs::read_to_string(&summary).unwrap();
    assert!(summary.starts_with("field,extracted,total,rate,flagged,quality\n"));
    assert!(summary.contains("email,2,2,100.0%,0,excellent"));
    assert!(summary.contains("gpa,1,2,50.0%,0,poor"));
}

#[test]
fn test_batch_json_output() {
    let dir = workspace();
    let out = dir.path().join("data.json");

    formsheet(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("batch")
        .arg(dir.path().join("forms"))
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["dataset"]["records"].as_array().unwrap().len(), 2);
    assert_eq!(json["skipped"].as_array().unwrap().len(), 1);
    assert_eq!(json["skipped"][0]["source"], "c.pdf");
    assert_eq!(json["completeness"]["total_records"], 2);
    assert_eq!(json["insights"]["most_common_email_domain"]["value"], "b.com");
}

#[test]
fn test_batch_glob_input() {
    let dir = workspace();
    let out = dir.path().join("data.csv");
    let pattern = format!("{}/*.txt", dir.path().join("forms").display());

    formsheet(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("batch")
        .arg(&pattern)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));
}

#[test]
fn test_batch_without_inputs_fails() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty");
    fs::create_dir(&empty).unwrap();

    formsheet(dir.path())
        .arg("batch")
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_process_json() {
    let dir = workspace();

    formsheet(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("process")
        .arg(dir.path().join("forms/b.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""source": "b.txt""#))
        .stdout(predicate::str::contains("b@example.com"))
        .stdout(predicate::str::contains(r#""value": "3.75""#));
}

#[test]
fn test_process_csv_and_missing() {
    let dir = workspace();

    formsheet(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("process")
        .arg(dir.path().join("forms/a.txt"))
        .arg("--format")
        .arg("csv")
        .arg("--show-missing")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt,Not Found,a@b.com"))
        .stdout(predicate::str::contains("1 of 2 fields not found: gpa"));
}

#[test]
fn test_process_empty_document_fails() {
    let dir = workspace();
    let blank = dir.path().join("blank.txt");
    fs::write(&blank, "  \n").unwrap();

    formsheet(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("process")
        .arg(&blank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text extracted"));
}

#[test]
fn test_invalid_field_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{ "fields": [ { "name": "email", "kind": "email", "rules": [ { "pattern": "Email:\\s*\\S+" } ] } ] }"#,
    )
    .unwrap();

    formsheet(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("fields")
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no capture group"));
}

#[test]
fn test_fields_lists_builtin_registry() {
    let dir = tempfile::tempdir().unwrap();

    formsheet(dir.path())
        .arg("fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("date_of_birth"))
        .stdout(predicate::str::contains("Full-time | Part-time"));
}

#[test]
fn test_config_init_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg/config.json");

    formsheet(dir.path())
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    formsheet(dir.path())
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    formsheet(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""date_order": "month_first""#));
}
