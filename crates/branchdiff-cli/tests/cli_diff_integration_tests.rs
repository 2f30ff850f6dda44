//! CLI integration tests
//!
//! Run the `branchdiff` binary against snapshot files written into a temp
//! directory and check stdout, stderr, and exit status.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const PROD: &str = r#"
schema_version: 0
deployment: prod
assets:
  - key: raw/orders
    code_version: v1
  - key: sales/orders
    code_version: v1
    deps: [raw/orders]
    tags: {section: produce}
  - key: legacy/report
"#;

const BRANCH: &str = r#"
schema_version: 0
deployment: pr-12
assets:
  - key: raw/orders
    code_version: v1
  - key: sales/orders
    code_version: v2
    deps: [raw/orders]
    tags: {section: produce, type: perishable}
  - key: marts/revenue
    deps: [sales/orders]
"#;

fn setup_snapshots(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let base = temp_dir.path().join("prod.yaml");
    let branch = temp_dir.path().join("pr-12.yaml");
    fs::write(&base, PROD).unwrap();
    fs::write(&branch, BRANCH).unwrap();
    (base, branch)
}

fn branchdiff(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_branchdiff"))
        .current_dir(dir)
        .env_remove("BRANCHDIFF_BASE_DEPLOYMENT")
        .env_remove("BRANCHDIFF_SNAPSHOTS_DIR")
        .env_remove("BRANCHDIFF_CONFIG")
        .env("BRANCHDIFF_LOG_PROFILE", "production")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_diff_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let (base, branch) = setup_snapshots(&temp_dir);

    let output = branchdiff(
        temp_dir.path(),
        &[
            "diff",
            "--base",
            base.to_str().unwrap(),
            "--branch",
            branch.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let changes = json["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 3, "every branch asset is classified");

    let sales = changes
        .iter()
        .find(|c| c["key"] == serde_json::json!(["sales", "orders"]))
        .unwrap();
    assert_eq!(
        sales["reasons"],
        serde_json::json!(["CODE_VERSION_CHANGED", "TAGS_CHANGED"])
    );
    assert_eq!(json["removed_keys"], serde_json::json!([["legacy", "report"]]));
}

#[test]
fn test_diff_labels_changed_only() {
    let temp_dir = TempDir::new().unwrap();
    let (base, branch) = setup_snapshots(&temp_dir);

    let output = branchdiff(
        temp_dir.path(),
        &[
            "diff",
            "--base",
            base.to_str().unwrap(),
            "--branch",
            branch.to_str().unwrap(),
            "--format",
            "labels",
            "--changed-only",
        ],
    );
    assert_success(&output);

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "legacy/report\tRemoved in branch\t",
            "marts/revenue\tNew in branch\tNEW",
            "sales/orders\tChanged in branch\tCODE_VERSION_CHANGED,TAGS_CHANGED",
        ]
    );
}

#[test]
fn test_diff_summary_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let (base, branch) = setup_snapshots(&temp_dir);
    let summary_path = temp_dir.path().join("summary.md");

    let output = branchdiff(
        temp_dir.path(),
        &[
            "diff",
            "--base",
            base.to_str().unwrap(),
            "--branch",
            branch.to_str().unwrap(),
            "--output",
            summary_path.to_str().unwrap(),
        ],
    );
    assert_success(&output);
    assert!(stdout(&output).contains("Wrote diff to"));

    let summary = fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains("### New in branch"));
    assert!(summary.contains("- `sales/orders`: code version, tags"));
    assert!(summary.contains("### Removed in branch"));
}

#[test]
fn test_compare_by_deployment_name() {
    let temp_dir = TempDir::new().unwrap();
    setup_snapshots(&temp_dir);

    let output = branchdiff(
        temp_dir.path(),
        &[
            "compare",
            "--branch-deployment",
            "pr-12",
            "--snapshots-dir",
            temp_dir.path().to_str().unwrap(),
            "--format",
            "labels",
            "--changed-only",
        ],
    );
    assert_success(&output);
    assert!(stdout(&output).contains("marts/revenue\tNew in branch"));
}

#[test]
fn test_compare_uses_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots = temp_dir.path().join("snapshots");
    fs::create_dir_all(&snapshots).unwrap();
    fs::write(
        snapshots.join("main.yaml"),
        PROD.replace("deployment: prod", "deployment: main"),
    )
    .unwrap();
    fs::write(snapshots.join("pr-12.yaml"), BRANCH).unwrap();
    fs::write(
        temp_dir.path().join("branchdiff.toml"),
        "base_deployment = \"main\"\nsnapshots_dir = \"snapshots\"\n",
    )
    .unwrap();

    let output = branchdiff(
        temp_dir.path(),
        &["compare", "--branch-deployment", "pr-12", "--format", "json"],
    );
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["identity"]["base_deployment"], "main");
    assert_eq!(json["identity"]["branch_deployment"], "pr-12");
}

#[test]
fn test_compare_missing_base_fails() {
    let temp_dir = TempDir::new().unwrap();
    setup_snapshots(&temp_dir);

    let output = branchdiff(
        temp_dir.path(),
        &[
            "compare",
            "--branch-deployment",
            "pr-12",
            "--base-deployment",
            "staging",
            "--snapshots-dir",
            temp_dir.path().to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: [ERR_SNAPSHOT_NOT_FOUND]"), "stderr: {}", stderr);
    assert!(stderr.contains("(request_id: "), "stderr: {}", stderr);
}

#[test]
fn test_compare_without_snapshots_dir_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = branchdiff(temp_dir.path(), &["compare", "--branch-deployment", "pr-12"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No snapshots directory configured"));
}

#[test]
fn test_explain_changed_asset() {
    let temp_dir = TempDir::new().unwrap();
    let (base, branch) = setup_snapshots(&temp_dir);

    let output = branchdiff(
        temp_dir.path(),
        &[
            "explain",
            "--base",
            base.to_str().unwrap(),
            "--branch",
            branch.to_str().unwrap(),
            "--asset",
            "sales/orders",
        ],
    );
    assert_success(&output);

    let out = stdout(&output);
    assert!(out.contains("Label: Changed in branch"));
    assert!(out.contains("Reasons: CODE_VERSION_CHANGED, TAGS_CHANGED"));
    assert!(out.contains("code version: v1 -> v2"));
    assert!(out.contains("tags: added type"));
}

#[test]
fn test_explain_removed_asset() {
    let temp_dir = TempDir::new().unwrap();
    let (base, branch) = setup_snapshots(&temp_dir);

    let output = branchdiff(
        temp_dir.path(),
        &[
            "explain",
            "--base",
            base.to_str().unwrap(),
            "--branch",
            branch.to_str().unwrap(),
            "--asset",
            "legacy/report",
        ],
    );
    assert_success(&output);
    assert!(stdout(&output).contains("Label: Removed in branch"));
}

#[test]
fn test_invalid_snapshot_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let (base, _) = setup_snapshots(&temp_dir);
    let bad = temp_dir.path().join("bad.yaml");
    fs::write(&bad, "schema_version: 2\ndeployment: pr-1\nassets: []\n").unwrap();

    let output = branchdiff(
        temp_dir.path(),
        &[
            "diff",
            "--base",
            base.to_str().unwrap(),
            "--branch",
            bad.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_UNSUPPORTED_SCHEMA_VERSION"));
}
