//! Integration tests for the girder CLI.
//!
//! These tests run the binary end to end against a temporary repository.

use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;

mod common;
use common::run_girder_in_dir;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides an initialized repository with one project and three tasks
#[fixture]
fn board_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let steps: [&[&str]; 5] = [
        &["init", "--quiet"],
        &["project", "add", "Website"],
        &["task", "add", "--project", "1", "Design"],
        &["task", "add", "--project", "1", "Build"],
        &["task", "add", "--project", "1", "Ship"],
    ];
    for args in steps {
        let output = run_girder_in_dir(temp.path(), args);
        assert!(
            output.status.success(),
            "Setup step {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    temp
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn map_json(dir: &TempDir) -> Value {
    let output = run_girder_in_dir(dir.path(), &["map", "--json"]);
    assert!(output.status.success(), "map failed: {}", stderr(&output));
    serde_json::from_slice(&output.stdout).expect("map output is JSON")
}

// ============================================================================
// Init Tests
// ============================================================================

#[rstest]
fn init_creates_repository(temp_dir: TempDir) {
    let output = run_girder_in_dir(temp_dir.path(), &["init", "--chain-heads", "linear-runs"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let girder_dir = temp_dir.path().join(".girder");
    assert!(girder_dir.join("config.yaml").exists());
    assert!(girder_dir.join("tasks.jsonl").exists());
    assert!(girder_dir.join("dependencies.jsonl").exists());

    let config = std::fs::read_to_string(girder_dir.join("config.yaml")).unwrap();
    assert!(config.contains("linear-runs"));
    assert!(stdout(&output).contains("Initialized girder"));
}

#[rstest]
fn init_twice_fails(temp_dir: TempDir) {
    assert!(run_girder_in_dir(temp_dir.path(), &["init", "--quiet"]).status.success());

    let output = run_girder_in_dir(temp_dir.path(), &["init", "--quiet"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("already initialized"));
}

#[rstest]
fn commands_require_repository(temp_dir: TempDir) {
    let output = run_girder_in_dir(temp_dir.path(), &["map"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("girder init"));
}

// ============================================================================
// Dependency Tests
// ============================================================================

#[rstest]
fn dep_add_and_map(board_dir: TempDir) {
    let output = run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("#2 waits on #1"));

    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "#3", "#2"])
        .status
        .success());

    let map = map_json(&board_dir);
    assert_eq!(map["edges"].as_array().unwrap().len(), 2);
    assert_eq!(map["chains"][0]["tasks"][0]["title"], "Design");
    assert_eq!(map["chains"][0]["tasks"][2]["title"], "Ship");
    assert_eq!(map["chains"][0]["tasks"][1]["project_name"], "Website");
    assert!(map["convergences"].as_array().unwrap().is_empty());
}

#[rstest]
fn dep_add_rejects_cycle(board_dir: TempDir) {
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]).status.success());
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "3", "2"]).status.success());

    let output = run_girder_in_dir(board_dir.path(), &["dep", "add", "1", "3"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Dependency would create a cycle"));

    // Nothing was written
    assert_eq!(map_json(&board_dir)["edges"].as_array().unwrap().len(), 2);
}

#[rstest]
#[case::self_dependency(&["dep", "add", "1", "1"], "Task cannot depend on itself")]
#[case::missing_task(&["dep", "add", "9", "1"], "Task not found")]
#[case::missing_edge(&["dep", "remove", "42"], "Dependency not found")]
fn dep_errors_use_user_messages(
    board_dir: TempDir,
    #[case] args: &[&str],
    #[case] message: &str,
) {
    let output = run_girder_in_dir(board_dir.path(), args);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains(message),
        "expected {message:?} in {:?}",
        stderr(&output)
    );
}

#[rstest]
fn dep_duplicate_is_rejected(board_dir: TempDir) {
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]).status.success());

    let output = run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Dependency already exists"));
}

#[rstest]
fn dep_check_previews_cycle(board_dir: TempDir) {
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]).status.success());

    let output = run_girder_in_dir(board_dir.path(), &["dep", "check", "1", "2", "--json"]);
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["would_create_cycle"], true);

    let output = run_girder_in_dir(board_dir.path(), &["dep", "check", "3", "2"]);
    assert!(stdout(&output).contains("without a cycle"));
}

#[rstest]
fn dep_remove_then_list(board_dir: TempDir) {
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]).status.success());

    let output = run_girder_in_dir(board_dir.path(), &["dep", "remove", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = run_girder_in_dir(board_dir.path(), &["dep", "list"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No dependencies"));
}

#[rstest]
fn convergence_shows_in_text_map(board_dir: TempDir) {
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "3", "1"]).status.success());
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "3", "2"]).status.success());

    let output = run_girder_in_dir(board_dir.path(), &["map"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Convergences (1):"));
    assert!(text.contains("#3 Ship (Website) <- #1 Design (Website), #2 Build (Website)"));
}

// ============================================================================
// Task Deletion Tests
// ============================================================================

#[rstest]
fn task_delete_cascades_dependencies(board_dir: TempDir) {
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]).status.success());
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "3", "2"]).status.success());

    let output = run_girder_in_dir(board_dir.path(), &["task", "delete", "2"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("2 dependencies removed"));

    let map = map_json(&board_dir);
    assert!(map["edges"].as_array().unwrap().is_empty());
    assert!(map["tasks"].as_array().unwrap().is_empty());
}

#[rstest]
fn map_filters_by_project(board_dir: TempDir) {
    assert!(run_girder_in_dir(board_dir.path(), &["project", "add", "Ops"]).status.success());
    assert!(run_girder_in_dir(board_dir.path(), &["task", "add", "-p", "2", "Deploy"])
        .status
        .success());
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "4", "3"]).status.success());
    assert!(run_girder_in_dir(board_dir.path(), &["dep", "add", "2", "1"]).status.success());

    let output = run_girder_in_dir(board_dir.path(), &["map", "--project", "1", "--json"]);
    assert!(output.status.success());
    let map: Value = serde_json::from_slice(&output.stdout).unwrap();

    let edges = map["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["dependent"]["id"], 2);
}

#[rstest]
fn dep_check_reports_self_dependency(board_dir: TempDir) {
    let output = run_girder_in_dir(board_dir.path(), &["dep", "check", "3", "3"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Task cannot depend on itself"));
    assert!(!text.contains("cycle"));

    let output = run_girder_in_dir(board_dir.path(), &["dep", "check", "#3", "3", "--json"]);
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["self_dependency"], true);
}
