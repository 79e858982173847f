//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn evalbee() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("evalbee").unwrap()
}

/// A scratch directory with its own data dir, isolated from any user config.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    fn cmd(&self) -> Command {
        let mut cmd = evalbee();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("EVALBEE_DATA_DIR", self.data_dir());
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Import a roster and store the example test.
    fn seed(&self) {
        self.write("roster.csv", "Name,Phone\nPriya Sharma,98\nRahul Verma,97\n");
        self.cmd()
            .args(["students", "import", "--file", "roster.csv"])
            .assert()
            .success();
        self.cmd().arg("init").assert().success();
        self.cmd()
            .args(["tests", "add", "--file", "sheets/example-key.toml"])
            .assert()
            .success();
    }

    fn student_ids(&self) -> Vec<(String, String)> {
        let content = std::fs::read_to_string(self.data_dir().join("students.json")).unwrap();
        let students: serde_json::Value = serde_json::from_str(&content).unwrap();
        students
            .as_array()
            .unwrap()
            .iter()
            .map(|s| {
                (
                    s["id"].as_str().unwrap().to_string(),
                    s["name"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }
}

const KEY: &str = r#"
[mcq]
physics = ["A", "B"]

[numeric]
physics = ["2.5"]
"#;

const ANSWERS: &str = r#"
[mcq]
physics = ["a", "C"]

[numeric]
physics = ["2.50"]
"#;

#[test]
fn help_output() {
    evalbee()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam answer-key grading"));
}

#[test]
fn version_output() {
    evalbee()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("evalbee"));
}

#[test]
fn init_creates_files() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created evalbee.toml"))
        .stdout(predicate::str::contains("Created sheets/example-key.toml"));

    assert!(ws.path().join("evalbee.toml").exists());
    assert!(ws.path().join("sheets/example-key.toml").exists());
}

#[test]
fn init_skips_existing() {
    let ws = Workspace::new();

    ws.cmd().arg("init").assert().success();

    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn example_key_is_valid() {
    let ws = Workspace::new();
    ws.cmd().arg("init").assert().success();

    ws.cmd()
        .args(["tests", "validate", "--file", "sheets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer key: Example Mock Test"))
        .stdout(predicate::str::contains("All answer keys valid"));
}

#[test]
fn validate_reports_key_problems() {
    let ws = Workspace::new();
    ws.write("key.toml", KEY);

    ws.cmd()
        .args(["tests", "validate", "--file", "key.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[physics Q3] WARNING: no answer recorded"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    evalbee()
        .args(["tests", "validate", "--file", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn grade_text() {
    let ws = Workspace::new();
    ws.write("key.toml", KEY);
    ws.write("answers.toml", ANSWERS);

    ws.cmd()
        .args(["grade", "--key", "key.toml", "--answers", "answers.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 7 / 300"))
        .stdout(predicate::str::contains("physics"));
}

#[test]
fn grade_json() {
    let ws = Workspace::new();
    ws.write("key.toml", KEY);
    ws.write("answers.toml", ANSWERS);

    let output = ws
        .cmd()
        .args(["grade", "--key", "key.toml", "--answers", "answers.toml"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total"], 7);
    assert_eq!(report["physics"]["wrong_questions"], serde_json::json!([2]));
    assert_eq!(report["chemistry"]["unattempted"], 25);
}

#[test]
fn grade_html_to_file() {
    let ws = Workspace::new();
    ws.write("key.toml", KEY);
    ws.write("answers.toml", ANSWERS);

    ws.cmd()
        .args(["grade", "--key", "key.toml", "--answers", "answers.toml"])
        .args(["--format", "html", "--output", "out/report.html"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Report written to"));

    let html = std::fs::read_to_string(ws.path().join("out/report.html")).unwrap();
    assert!(html.contains("Total: 7 / 300"));
}

#[test]
fn grade_unknown_format() {
    let ws = Workspace::new();
    ws.write("key.toml", KEY);
    ws.write("answers.toml", ANSWERS);

    ws.cmd()
        .args(["grade", "--key", "key.toml", "--answers", "answers.toml"])
        .args(["--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn import_and_search_students() {
    let ws = Workspace::new();
    ws.write(
        "roster.csv",
        "Student Name,Phone\nPriya Sharma,98\nRahul Verma,97\npriya sharma,96\n",
    );

    ws.cmd()
        .args(["students", "import", "--file", "roster.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 student(s) into batch JEE"));

    ws.cmd()
        .args(["students", "search", "PRIYA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Priya Sharma"))
        .stdout(predicate::str::contains("Rahul").not());

    ws.cmd()
        .args(["students", "search", "priya", "--batch", "NEET"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No students match"));
}

#[test]
fn import_empty_roster_fails() {
    let ws = Workspace::new();
    ws.write("roster.csv", "Name\n\n");

    ws.cmd()
        .args(["students", "import", "--file", "roster.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No names found"));
}

#[test]
fn add_test_without_name_fails() {
    let ws = Workspace::new();
    ws.write("key.toml", KEY);

    ws.cmd()
        .args(["tests", "add", "--file", "key.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("please enter a test name"));
}

#[test]
fn check_and_save_result() {
    let ws = Workspace::new();
    ws.seed();
    ws.write(
        "priya.toml",
        "[mcq]\nphysics = [\"A\", \"B\"]\n[numeric]\nphysics = [\"12.0\"]\n",
    );

    ws.cmd()
        .args(["tests", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Mock Test"));

    ws.cmd()
        .args(["check", "--student", "priya", "--test", "Example Mock Test"])
        .args(["--answers", "priya.toml", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Priya Sharma / Example Mock Test"))
        .stdout(predicate::str::contains("Total: 12 / 300"))
        .stdout(predicate::str::contains("Saved result"));

    ws.cmd()
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 result(s)"));
}

#[test]
fn check_unknown_student_fails() {
    let ws = Workspace::new();
    ws.seed();
    ws.write("answers.toml", ANSWERS);

    ws.cmd()
        .args(["check", "--student", "nobody", "--test", "Example Mock Test"])
        .args(["--answers", "answers.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no student matches"));
}

#[test]
fn batch_grades_directory() {
    let ws = Workspace::new();
    ws.seed();

    let students = ws.student_ids();
    assert_eq!(students.len(), 2);
    for (id, _) in &students {
        ws.write(
            &format!("sheets-in/{id}.toml"),
            "[mcq]\nchemistry = [\"B\"]\n",
        );
    }
    ws.write("sheets-in/unknown.toml", "[mcq]\nphysics = [\"A\"]\n");

    ws.cmd()
        .args(["batch", "--test", "Example Mock Test", "--dir", "sheets-in"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Priya Sharma"))
        .stdout(predicate::str::contains("Rahul Verma"))
        .stdout(predicate::str::contains("1 file(s) skipped."));

    let (first_id, _) = &students[0];
    ws.cmd()
        .args(["results", "--student", first_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 result(s)"));

    ws.cmd()
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 result(s)"));
}
