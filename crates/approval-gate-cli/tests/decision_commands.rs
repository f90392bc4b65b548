// approval-gate-cli/tests/decision_commands.rs
// ============================================================================
// Module: CLI Decision Command Tests
// Description: Integration tests for acl, workflow, and nav commands.
// Purpose: Ensure decisions print as JSON and denials exit with the deny code.
// Dependencies: approval-gate-cli binary, approval-gate-config, serde_json
// ============================================================================

//! ## Overview
//! Runs the CLI binary against the canonical example configuration and an
//! assignments file, checking the compiled table, capability checks, workflow
//! gate decisions, and navigation filtering end to end.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use approval_gate_config::config_toml_example;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const DENIED: i32 = 2;

fn approval_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_approval-gate"))
}

fn temp_root(label: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock drift").as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("approval-gate-cli-{label}-{nanos}"));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn cleanup(path: &PathBuf) {
    let _ = fs::remove_dir_all(path);
}

/// Fixture directory holding the example config and an assignments file.
struct Fixture {
    root: PathBuf,
    config: String,
    assignments: String,
}

impl Fixture {
    fn new(label: &str, assignments: &Value) -> Self {
        let root = temp_root(label);
        let config_path = root.join("approval-gate.toml");
        fs::write(&config_path, config_toml_example()).expect("write config");
        let assignments_path = root.join("assignments.json");
        fs::write(&assignments_path, serde_json::to_vec(assignments).expect("encode"))
            .expect("write assignments");
        Self {
            config: config_path.to_string_lossy().into_owned(),
            assignments: assignments_path.to_string_lossy().into_owned(),
            root,
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(approval_gate_bin())
            .args(args)
            .args(["--config", self.config.as_str()])
            .env_remove("APPROVAL_GATE_LOG")
            .output()
            .expect("run approval-gate")
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        cleanup(&self.root);
    }
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

fn maker_assignments() -> Value {
    json!({
        "user_groups": ["ops"],
        "assignments": [
            "ops:payments.disbursement:pg-maker",
            "ops:reports.daily:pg-viewer",
            "finance:payments.refund:pg-checker"
        ]
    })
}

// ============================================================================
// SECTION: Acl Tests
// ============================================================================

/// Verifies compile scopes assignments to the declared user groups.
#[test]
fn cli_acl_compile_prints_scoped_table() {
    let fixture = Fixture::new("acl-compile", &maker_assignments());
    let output = fixture.run(&["acl", "compile", "--assignments", fixture.assignments.as_str()]);

    assert!(output.status.success());
    let table = stdout_json(&output);
    assert_eq!(table["payments.disbursement"]["access_level"], "MAKER");
    assert_eq!(table["payments.disbursement"]["can_insert"], true);
    assert_eq!(table["reports.daily"]["access_level"], "VIEWER");
    assert!(table.get("payments.refund").is_none());
}

/// Verifies an assignment naming an unregistered component is rejected.
#[test]
fn cli_acl_compile_rejects_unknown_component() {
    let fixture = Fixture::new(
        "acl-compile-unknown",
        &json!({ "assignments": ["ops:payments.unknown:pg-maker"] }),
    );
    let output = fixture.run(&["acl", "compile", "--assignments", fixture.assignments.as_str()]);

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(DENIED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("payments.unknown"));
}

/// Verifies a malformed permission string is rejected.
#[test]
fn cli_acl_compile_rejects_malformed_assignment() {
    let fixture = Fixture::new(
        "acl-compile-malformed",
        &json!({ "assignments": ["ops:payments.disbursement"] }),
    );
    let output = fixture.run(&["acl", "compile", "--assignments", fixture.assignments.as_str()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid permission assignment"));
}

/// Verifies an allowed check prints `allowed: true` and exits zero.
#[test]
fn cli_acl_check_allows_granted_capability() {
    let fixture = Fixture::new("acl-check-allow", &maker_assignments());
    let output = fixture.run(&[
        "acl",
        "check",
        "--assignments",
        fixture.assignments.as_str(),
        "--component",
        "payments.disbursement",
        "--user",
        "alice",
        "--action",
        "can_insert",
        "--access-level",
        "MAKER",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!({ "allowed": true }));
}

/// Verifies a missing capability is denied with the deny exit code.
#[test]
fn cli_acl_check_denies_missing_capability() {
    let fixture = Fixture::new("acl-check-deny", &maker_assignments());
    let output = fixture.run(&[
        "acl",
        "check",
        "--assignments",
        fixture.assignments.as_str(),
        "--component",
        "payments.disbursement",
        "--user",
        "alice",
        "--actions",
        "can_authorize,can_reject",
    ]);

    assert_eq!(output.status.code(), Some(DENIED));
    assert_eq!(stdout_json(&output), json!({ "allowed": false }));
}

/// Verifies the previous actor is denied on a non-super-user tier.
#[test]
fn cli_acl_check_denies_self_approval() {
    let fixture = Fixture::new("acl-check-self", &maker_assignments());
    let output = fixture.run(&[
        "acl",
        "check",
        "--assignments",
        fixture.assignments.as_str(),
        "--component",
        "payments.disbursement",
        "--user",
        "alice",
        "--last-authorizer",
        "alice",
    ]);

    assert_eq!(output.status.code(), Some(DENIED));
    assert_eq!(stdout_json(&output), json!({ "allowed": false }));
}

/// Verifies an unknown capability name is rejected by argument parsing.
#[test]
fn cli_acl_check_rejects_unknown_capability() {
    let fixture = Fixture::new("acl-check-bad-cap", &maker_assignments());
    let output = fixture.run(&[
        "acl",
        "check",
        "--assignments",
        fixture.assignments.as_str(),
        "--component",
        "payments.disbursement",
        "--user",
        "alice",
        "--action",
        "can_fly",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert_ne!(output.status.code(), Some(DENIED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid command line"), "stderr: {stderr}");
}

/// Verifies a missing required flag exits with the generic failure code.
#[test]
fn cli_acl_check_missing_user_is_usage_error() {
    let fixture = Fixture::new("acl-check-no-user", &maker_assignments());
    let output = fixture.run(&[
        "acl",
        "check",
        "--assignments",
        fixture.assignments.as_str(),
        "--component",
        "payments.disbursement",
        "--action",
        "can_view",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--user"), "stderr: {stderr}");
}

/// Verifies subcommand help is printed and exits successfully.
#[test]
fn cli_acl_check_help_succeeds() {
    let fixture = Fixture::new("acl-check-help", &maker_assignments());
    let output = fixture.run(&["acl", "check", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--component"), "stdout: {stdout}");
}

// ============================================================================
// SECTION: Workflow Tests
// ============================================================================

/// Verifies a checker may take the step after the maker.
#[test]
fn cli_workflow_advance_allows_next_tier() {
    let fixture = Fixture::new("workflow-allow", &maker_assignments());
    let output = fixture.run(&[
        "workflow",
        "advance",
        "--feature",
        "payments.disbursement",
        "--tier",
        "CHECKER",
        "--user",
        "bob",
        "--state",
        "MAKER",
        "--last-authorizer",
        "alice",
    ]);

    assert!(output.status.success());
    let decision = stdout_json(&output);
    assert_eq!(decision["allowed"], true);
    assert_eq!(decision["next_tiers"], json!(["CHECKER"]));
}

/// Verifies a tier out of order is denied with a reason.
#[test]
fn cli_workflow_advance_denies_wrong_step() {
    let fixture = Fixture::new("workflow-wrong-step", &maker_assignments());
    let output = fixture.run(&[
        "workflow",
        "advance",
        "--feature",
        "payments.disbursement",
        "--tier",
        "AUTHORIZER_1",
        "--user",
        "carol",
        "--state",
        "MAKER",
        "--last-authorizer",
        "alice",
    ]);

    assert_eq!(output.status.code(), Some(DENIED));
    let decision = stdout_json(&output);
    assert_eq!(decision["allowed"], false);
    assert_eq!(decision["reason"], "wrong_step");
}

/// Verifies rejected items are terminal.
#[test]
fn cli_workflow_advance_denies_rejected_item() {
    let fixture = Fixture::new("workflow-rejected", &maker_assignments());
    let output = fixture.run(&[
        "workflow",
        "advance",
        "--feature",
        "payments.disbursement",
        "--tier",
        "SUPER_USER",
        "--user",
        "root",
        "--status",
        "rejected",
        "--state",
        "MAKER",
    ]);

    assert_eq!(output.status.code(), Some(DENIED));
    let decision = stdout_json(&output);
    assert_eq!(decision["reason"], "rejected");
    assert_eq!(decision["next_tiers"], json!([]));
}

/// Verifies an unregistered feature is a configuration error.
#[test]
fn cli_workflow_advance_rejects_unknown_feature() {
    let fixture = Fixture::new("workflow-unknown", &maker_assignments());
    let output = fixture.run(&[
        "workflow",
        "advance",
        "--feature",
        "reports.daily",
        "--tier",
        "MAKER",
        "--user",
        "alice",
    ]);

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(DENIED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Authorization flow lookup failed"));
}

/// Verifies next tiers for a fresh item and for an any-of step.
#[test]
fn cli_workflow_next_tiers_lists_acceptable_tiers() {
    let fixture = Fixture::new("workflow-next", &maker_assignments());
    let fresh = fixture.run(&["workflow", "next-tiers", "--feature", "payments.refund"]);
    assert!(fresh.status.success());
    assert_eq!(stdout_json(&fresh), json!(["MAKER"]));

    let after_maker = fixture.run(&[
        "workflow",
        "next-tiers",
        "--feature",
        "payments.refund",
        "--state",
        "MAKER",
    ]);
    assert!(after_maker.status.success());
    assert_eq!(stdout_json(&after_maker), json!(["CHECKER", "AUTHORIZER_1"]));

    let finished = fixture.run(&[
        "workflow",
        "next-tiers",
        "--feature",
        "payments.refund",
        "--state",
        "CHECKER",
    ]);
    assert!(finished.status.success());
    assert_eq!(stdout_json(&finished), json!([]));
}

// ============================================================================
// SECTION: Nav Tests
// ============================================================================

/// Verifies navigation keeps public entries and accessible children only.
#[test]
fn cli_nav_list_filters_by_access() {
    let fixture = Fixture::new("nav-list", &maker_assignments());
    let output = fixture.run(&["nav", "list", "--assignments", fixture.assignments.as_str()]);

    assert!(output.status.success());
    let items = stdout_json(&output);
    let ids: Vec<&str> =
        items.as_array().expect("array").iter().filter_map(|item| item["id"].as_str()).collect();
    assert_eq!(ids, vec!["home", "payments"]);
    let children: Vec<&str> = items[1]["children"]
        .as_array()
        .expect("children")
        .iter()
        .filter_map(|child| child["id"].as_str())
        .collect();
    assert_eq!(children, vec!["payments.disbursement"]);
}

/// Verifies membership in an entry's user group keeps it whole.
#[test]
fn cli_nav_list_keeps_group_owned_entries() {
    let fixture = Fixture::new(
        "nav-list-admins",
        &json!({ "user_groups": ["admins"], "assignments": [] }),
    );
    let output = fixture.run(&["nav", "list", "--assignments", fixture.assignments.as_str()]);

    assert!(output.status.success());
    let items = stdout_json(&output);
    let ids: Vec<&str> =
        items.as_array().expect("array").iter().filter_map(|item| item["id"].as_str()).collect();
    assert_eq!(ids, vec!["home", "admin"]);
    assert_eq!(items[1]["children"][0]["id"], "admin.users");
}
