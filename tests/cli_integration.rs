//! Integration tests for the `td` CLI.
//!
//! Each test creates a temp data directory, runs `td -C <dir>` as a
//! subprocess, and verifies stdout and/or the stored slots.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Get the path to the built `td` binary.
fn td_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("td");
    path
}

/// A data directory with sample seeding turned off and two tasks in Work
fn create_test_store(root: &Path) {
    fs::write(root.join("config.toml"), "[seed]\nexamples = false\n").unwrap();
    fs::write(
        root.join("categories.json"),
        r#"["General","Work","Personal","Shopping","Health"]"#,
    )
    .unwrap();
    fs::write(
        root.join("tasks.json"),
        r#"[
  {"id":100,"title":"Write report","description":"Quarterly numbers","dueDate":"2030-05-20T09:00:00Z","priority":"high","category":"Work","completed":false},
  {"id":101,"title":"Book flights","description":"","dueDate":null,"priority":"low","category":"Work","completed":false},
  {"id":102,"title":"Buy milk","description":"","dueDate":null,"priority":"medium","category":"Shopping","completed":true}
]"#,
    )
    .unwrap();
}

/// Run `td` against `dir`, returning (stdout, stderr, success).
fn run_td(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(td_bin())
        .arg("-C")
        .arg(dir)
        .args(args)
        .env_remove("TASKDECK_HOME")
        .output()
        .expect("failed to run td");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `td` expecting success, return stdout.
fn run_td_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_td(dir, args);
    if !success {
        panic!(
            "td {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `td` expecting failure, return stderr.
fn run_td_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_td(dir, args);
    if success {
        panic!("td {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn stored_tasks(dir: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(dir.join("tasks.json")).unwrap()).unwrap()
}

fn stored_ids(dir: &Path) -> Vec<u64> {
    stored_tasks(dir)
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// First run
// ---------------------------------------------------------------------------

#[test]
fn test_first_run_seeds_sample_tasks() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_td_ok(tmp.path(), &["list"]);
    assert!(out.contains("== General"));
    assert!(out.contains("== Work"));
    let seeded = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
    assert_eq!(stored_ids(tmp.path()).len(), 6);

    // Seeded state is saved, so a second run sees the same tasks
    run_td_ok(tmp.path(), &["list"]);
    assert_eq!(
        fs::read_to_string(tmp.path().join("tasks.json")).unwrap(),
        seeded
    );
}

#[test]
fn test_first_run_without_examples_is_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[seed]\nexamples = false\n").unwrap();

    let out = run_td_ok(tmp.path(), &["progress"]);
    assert!(out.contains("0/0 (0%)"));
}

#[test]
fn test_empty_default_categories_fall_back() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[categories]\ndefaults = []\n[seed]\nexamples = false\n",
    )
    .unwrap();

    let out = run_td_ok(tmp.path(), &["category", "list"]);
    assert!(out.starts_with("General"));
    let stored = fs::read_to_string(tmp.path().join("categories.json")).unwrap();
    assert_ne!(stored, "[]");
}

#[test]
fn test_bad_config_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[seed\n").unwrap();

    let err = run_td_err(tmp.path(), &["list"]);
    assert!(err.contains("config.toml"));
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_bare_td_lists_everything() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    assert_eq!(run_td_ok(tmp.path(), &[]), run_td_ok(tmp.path(), &["list"]));
    let out = run_td_ok(tmp.path(), &[]);
    assert!(out.contains("Write report"));
    assert!(out.contains("Buy milk"));
}

#[test]
fn test_list_groups_and_sorts() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["list", "--category", "Work"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "== Work (2) ==");
    // Dated before undated
    assert!(lines[1].contains("Write report"));
    assert!(lines[2].contains("Book flights"));
    assert!(!out.contains("Buy milk"));
}

#[test]
fn test_list_status_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["list", "--status", "completed"]);
    assert!(out.contains("Buy milk"));
    assert!(!out.contains("Write report"));
    // Empty categories are hidden while filtering
    assert!(!out.contains("== General"));
}

#[test]
fn test_list_search_is_case_insensitive() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["list", "--search", "QUARTERLY"]);
    assert!(out.contains("Write report"));
    assert!(!out.contains("Book flights"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let sections = parsed.as_array().unwrap();
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[1]["category"], "Work");
    assert_eq!(sections[1]["tasks"][0]["id"], 100);
    assert_eq!(sections[1]["tasks"][0]["priority"], "high");
}

#[test]
fn test_list_unknown_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let err = run_td_err(tmp.path(), &["list", "--category", "Nope"]);
    assert!(err.contains("unknown category"));
}

#[test]
fn test_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["show", "100"]);
    assert!(out.contains("Write report"));
    assert!(out.contains("category: Work"));
    assert!(out.contains("priority: high"));
    assert!(out.contains("Quarterly numbers"));

    let err = run_td_err(tmp.path(), &["show", "999"]);
    assert!(err.contains("not found"));
}

#[test]
fn test_progress() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["progress", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["completed"], 1);
    assert_eq!(parsed["total"], 3);
    assert_eq!(parsed["percent"], 33);
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(
        tmp.path(),
        &[
            "add",
            "Call plumber",
            "--category",
            "Personal",
            "--priority",
            "med",
            "--due",
            "2030-01-02 10:00",
        ],
    );
    let id: u64 = out.trim().parse().unwrap();

    let tasks = stored_tasks(tmp.path());
    let added = tasks.as_array().unwrap().last().unwrap();
    assert_eq!(added["id"], id);
    assert_eq!(added["title"], "Call plumber");
    assert_eq!(added["priority"], "medium");
    assert_eq!(added["category"], "Personal");
    assert_eq!(added["completed"], false);
    assert!(added["dueDate"].is_string());
}

#[test]
fn test_add_defaults_to_first_category_alphabetically() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_td_ok(tmp.path(), &["add", "Anything"]);
    let tasks = stored_tasks(tmp.path());
    assert_eq!(tasks.as_array().unwrap().last().unwrap()["category"], "General");
}

#[test]
fn test_add_rejects_blank_title_and_unknown_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let err = run_td_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("error:"));
    let err = run_td_err(tmp.path(), &["add", "Task", "--category", "Garden"]);
    assert!(err.contains("unknown category"));
    assert_eq!(stored_ids(tmp.path()).len(), 3);
}

#[test]
fn test_rejected_add_does_not_register_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let err = run_td_err(
        tmp.path(),
        &["add", "   ", "--category", "Garden", "--new-category"],
    );
    assert!(err.contains("title cannot be empty"));
    let stored = fs::read_to_string(tmp.path().join("categories.json")).unwrap();
    assert!(!stored.contains("Garden"));
    assert_eq!(stored_ids(tmp.path()).len(), 3);
}

#[test]
fn test_add_with_new_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_td_ok(
        tmp.path(),
        &["add", "Plant tomatoes", "--category", "Garden", "--new-category"],
    );
    let out = run_td_ok(tmp.path(), &["category", "list"]);
    assert!(out.lines().last().unwrap().starts_with("Garden"));
}

#[test]
fn test_edit_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_td_ok(
        tmp.path(),
        &["edit", "100", "--title", "Write final report", "--clear-due"],
    );
    let tasks = stored_tasks(tmp.path());
    assert_eq!(tasks[0]["title"], "Write final report");
    assert!(tasks[0]["dueDate"].is_null());
    // Untouched fields keep their values
    assert_eq!(tasks[0]["description"], "Quarterly numbers");
    assert_eq!(tasks[0]["priority"], "high");
}

#[test]
fn test_edit_with_nothing_to_change() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let err = run_td_err(tmp.path(), &["edit", "100"]);
    assert!(err.contains("nothing to change"));
}

#[test]
fn test_toggle_prints_cheer_and_persists() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["toggle", "101"]);
    assert!(out.contains("completed 101 Book flights"));
    assert_eq!(stored_tasks(tmp.path())[1]["completed"], true);

    let out = run_td_ok(tmp.path(), &["toggle", "101"]);
    assert!(out.contains("reopened 101"));
    assert_eq!(stored_tasks(tmp.path())[1]["completed"], false);
}

#[test]
fn test_rm_with_yes() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_td_ok(tmp.path(), &["rm", "101", "--yes"]);
    assert_eq!(stored_ids(tmp.path()), vec![100, 102]);
}

#[test]
fn test_rm_declined_keeps_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let mut child = Command::new(td_bin())
        .arg("-C")
        .arg(tmp.path())
        .args(["rm", "101"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"n\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("cancelled"));
    assert_eq!(stored_ids(tmp.path()), vec![100, 101, 102]);
}

#[test]
fn test_mv_appends_to_target_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_td_ok(tmp.path(), &["mv", "100", "Personal"]);
    let tasks = stored_tasks(tmp.path());
    let moved = tasks.as_array().unwrap().last().unwrap();
    assert_eq!(moved["id"], 100);
    assert_eq!(moved["category"], "Personal");
}

#[test]
fn test_reorder() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_td_ok(tmp.path(), &["reorder", "Work", "101", "100"]);
    assert_eq!(stored_ids(tmp.path()), vec![101, 100, 102]);

    // A partial id list is rejected and nothing moves
    let err = run_td_err(tmp.path(), &["reorder", "Work", "100"]);
    assert!(err.contains("error:"));
    assert_eq!(stored_ids(tmp.path()), vec![101, 100, 102]);
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[test]
fn test_category_list_orders() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["category", "list"]);
    let names: Vec<&str> = out
        .lines()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(names, vec!["General", "Work", "Personal", "Shopping", "Health"]);

    let out = run_td_ok(tmp.path(), &["category", "list", "--sorted"]);
    let names: Vec<&str> = out
        .lines()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(names, vec!["General", "Health", "Personal", "Shopping", "Work"]);
}

#[test]
fn test_category_rename_moves_tasks() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["category", "rename", "Work", "Office"]);
    assert!(out.contains("2 tasks moved"));
    let tasks = stored_tasks(tmp.path());
    assert_eq!(tasks[0]["category"], "Office");
    assert_eq!(tasks[1]["category"], "Office");
    assert_eq!(tasks[2]["category"], "Shopping");
}

#[test]
fn test_category_add_duplicate_is_reported() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_td_ok(tmp.path(), &["category", "add", "Work"]);
    assert!(out.contains("already exists"));
}

#[test]
fn test_category_rm_refuses_non_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let err = run_td_err(tmp.path(), &["category", "rm", "Work", "--yes"]);
    assert!(err.contains("Work"));

    run_td_ok(tmp.path(), &["category", "rm", "General", "--yes"]);
    let out = run_td_ok(tmp.path(), &["category", "list"]);
    assert!(!out.contains("General"));
}

// ---------------------------------------------------------------------------
// Preferences and background
// ---------------------------------------------------------------------------

#[test]
fn test_theme_toggle_persists() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    assert_eq!(run_td_ok(tmp.path(), &["theme"]).trim(), "light");
    assert_eq!(run_td_ok(tmp.path(), &["theme", "toggle"]).trim(), "dark");
    assert_eq!(run_td_ok(tmp.path(), &["theme"]).trim(), "dark");
    assert_eq!(
        fs::read_to_string(tmp.path().join("darkMode.json")).unwrap(),
        "true"
    );
}

#[test]
fn test_watch_reports_nearing_tasks() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());
    let soon = (chrono::Utc::now() + chrono::Duration::minutes(30)).to_rfc3339();
    run_td_ok(tmp.path(), &["add", "Urgent thing", "--due", &soon]);

    let out = run_td_ok(
        tmp.path(),
        &["watch", "--count", "1", "--interval", "1", "--json"],
    );
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let tick: serde_json::Value = serde_json::from_str(line).unwrap();
        let nearing = tick["nearing"].as_array().unwrap();
        assert_eq!(nearing.len(), 1);
        assert_eq!(nearing[0]["title"], "Urgent thing");
    }
}
