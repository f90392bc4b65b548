// approval-gate-cli/tests/config_commands.rs
// ============================================================================
// Module: CLI Config Command Tests
// Description: Integration tests for CLI config validation workflows.
// Purpose: Ensure config validation reports success and fails closed on errors.
// Dependencies: approval-gate-cli binary, approval-gate-config
// ============================================================================

//! ## Overview
//! Runs the CLI binary for config validation and example output, and ensures
//! invalid configuration fails closed with explicit errors.

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
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use approval_gate_config::ApprovalGateConfig;
use approval_gate_config::config_toml_example;

// ============================================================================
// SECTION: Helpers
// ============================================================================

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

fn write_example_config(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, config_toml_example()).expect("write config");
    path
}

/// Example config with a flow keyed by an unregistered component.
const UNKNOWN_FLOW_CONFIG: &str = r#"
[[components]]
id = "payments.disbursement"

[[flows]]
feature = "payments.refund"
steps = ["MAKER", "CHECKER"]
"#;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies config validation succeeds for the canonical example.
#[test]
fn cli_config_validate_accepts_example_config() {
    let root = temp_root("config-validate-ok");
    let config_path = root.join("approval-gate.toml");
    fs::write(&config_path, config_toml_example()).expect("write config");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_path.to_string_lossy().as_ref()])
        .output()
        .expect("config validate");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config valid."));
    cleanup(&root);
}

/// Verifies a flow keyed by an unregistered component fails validation.
#[test]
fn cli_config_validate_rejects_unknown_flow_feature() {
    let root = temp_root("config-validate-unknown-flow");
    let config_path = root.join("approval-gate.toml");
    fs::write(&config_path, UNKNOWN_FLOW_CONFIG.trim()).expect("write config");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_path.to_string_lossy().as_ref()])
        .output()
        .expect("config validate");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
    assert!(stderr.contains("payments.refund"));
    cleanup(&root);
}

/// Verifies a flow step naming a non-advancing tier fails validation.
#[test]
fn cli_config_validate_rejects_viewer_step() {
    let root = temp_root("config-validate-viewer-step");
    let config_path = root.join("approval-gate.toml");
    let config = r#"
[[components]]
id = "payments.disbursement"

[[flows]]
feature = "payments.disbursement"
steps = ["MAKER", "VIEWER"]
"#;
    fs::write(&config_path, config.trim()).expect("write config");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_path.to_string_lossy().as_ref()])
        .output()
        .expect("config validate");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
    cleanup(&root);
}

/// Verifies a missing config file is reported rather than defaulted.
#[test]
fn cli_config_validate_rejects_missing_file() {
    let root = temp_root("config-validate-missing");
    let config_path = root.join("absent.toml");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_path.to_string_lossy().as_ref()])
        .output()
        .expect("config validate");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
    cleanup(&root);
}

/// Verifies `config example` prints a config that loads and validates.
#[test]
fn cli_config_example_round_trips() {
    let output =
        Command::new(approval_gate_bin()).args(["config", "example"]).output().expect("example");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 example");
    let config = ApprovalGateConfig::from_toml_str(&stdout).expect("example config loads");
    assert_eq!(config.flows.len(), 2);
}

/// Verifies `--version` prints the package version.
#[test]
fn cli_version_flag_prints_version() {
    let output = Command::new(approval_gate_bin()).arg("--version").output().expect("version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(stdout.starts_with("approval-gate "));
}

// ============================================================================
// SECTION: Environment Overrides
// ============================================================================

/// Verifies `APPROVAL_GATE_CONFIG` selects the config when no flag is given.
#[test]
fn cli_config_validate_uses_env_config_path() {
    let root = temp_root("config-env-path");
    let config_path = write_example_config(&root, "from-env.toml");
    let work_dir = temp_root("config-env-path-cwd");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate"])
        .current_dir(&work_dir)
        .env("APPROVAL_GATE_CONFIG", &config_path)
        .env_remove("APPROVAL_GATE_LOG")
        .output()
        .expect("config validate");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config valid."));
    cleanup(&root);
    cleanup(&work_dir);
}

/// Verifies a config rejected by validation is reported when named by env.
#[test]
fn cli_config_validate_env_config_path_fails_closed() {
    let root = temp_root("config-env-invalid");
    let config_path = root.join("invalid.toml");
    fs::write(&config_path, UNKNOWN_FLOW_CONFIG.trim()).expect("write config");
    let work_dir = temp_root("config-env-invalid-cwd");
    write_example_config(&work_dir, "approval-gate.toml");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate"])
        .current_dir(&work_dir)
        .env("APPROVAL_GATE_CONFIG", &config_path)
        .env_remove("APPROVAL_GATE_LOG")
        .output()
        .expect("config validate");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
    assert!(stderr.contains("payments.refund"));
    cleanup(&root);
    cleanup(&work_dir);
}

/// Verifies `--config` takes precedence over `APPROVAL_GATE_CONFIG`.
#[test]
fn cli_config_flag_beats_env_config_path() {
    let root = temp_root("config-flag-beats-env");
    let config_path = write_example_config(&root, "flag.toml");
    let env_path = root.join("absent.toml");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_path.to_string_lossy().as_ref()])
        .current_dir(&root)
        .env("APPROVAL_GATE_CONFIG", &env_path)
        .env_remove("APPROVAL_GATE_LOG")
        .output()
        .expect("config validate");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config valid."));
    cleanup(&root);
}

/// Verifies `approval-gate.toml` in the working directory is the fallback.
#[test]
fn cli_config_validate_uses_default_file_in_working_dir() {
    let root = temp_root("config-default-file");
    write_example_config(&root, "approval-gate.toml");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate"])
        .current_dir(&root)
        .env_remove("APPROVAL_GATE_CONFIG")
        .env_remove("APPROVAL_GATE_LOG")
        .output()
        .expect("config validate");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config valid."));
    cleanup(&root);
}

/// Verifies a missing default file fails rather than running unconfigured.
#[test]
fn cli_config_validate_without_any_config_fails() {
    let root = temp_root("config-default-missing");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate"])
        .current_dir(&root)
        .env_remove("APPROVAL_GATE_CONFIG")
        .env_remove("APPROVAL_GATE_LOG")
        .output()
        .expect("config validate");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
    cleanup(&root);
}

/// Verifies `APPROVAL_GATE_LOG` replaces the configured filter directive.
#[test]
fn cli_log_env_directive_overrides_config_filter() {
    let root = temp_root("config-log-env-wins");
    let config_path = write_example_config(&root, "approval-gate.toml");

    let output = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_path.to_string_lossy().as_ref()])
        .env("APPROVAL_GATE_LOG", "approval_gate_core=notalevel")
        .output()
        .expect("config validate");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to initialize logging"), "stderr: {stderr}");
    assert!(stderr.contains("notalevel"));
    cleanup(&root);
}

/// Verifies a valid env directive is used instead of a malformed config filter.
#[test]
fn cli_log_env_directive_replaces_malformed_config_filter() {
    let root = temp_root("config-log-env-rescues");
    let config_path = root.join("approval-gate.toml");
    let config = config_toml_example()
        .replacen("filter = \"info\"", "filter = \"approval_gate_core=notalevel\"", 1);
    assert!(config.contains("notalevel"));
    fs::write(&config_path, config).expect("write config");
    let config_arg = config_path.to_string_lossy().into_owned();

    let rescued = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_arg.as_str()])
        .env("APPROVAL_GATE_LOG", "warn")
        .output()
        .expect("config validate");
    assert!(rescued.status.success(), "stderr: {}", String::from_utf8_lossy(&rescued.stderr));

    let unrescued = Command::new(approval_gate_bin())
        .args(["config", "validate", "--config", config_arg.as_str()])
        .env_remove("APPROVAL_GATE_LOG")
        .output()
        .expect("config validate");
    assert!(!unrescued.status.success());
    let stderr = String::from_utf8_lossy(&unrescued.stderr);
    assert!(stderr.contains("Failed to initialize logging"), "stderr: {stderr}");
    cleanup(&root);
}
