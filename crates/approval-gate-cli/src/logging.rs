// approval-gate-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Installs the process-wide tracing subscriber.
// Purpose: Route core decision events to stderr in text or JSON form.
// Dependencies: approval-gate-config, thiserror, tracing-subscriber
// ============================================================================

//! ## Overview
//! The core crates only emit `tracing` events. The CLI installs a single `fmt`
//! subscriber writing to stderr so stdout stays reserved for command output.
//! The filter directive comes from [`LOG_ENV_VAR`] when set, otherwise from
//! the `[logging]` config section.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::sync::OnceLock;

use approval_gate_config::LogFormat;
use approval_gate_config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the configured filter directive.
pub const LOG_ENV_VAR: &str = "APPROVAL_GATE_LOG";

/// Set once a subscriber has been installed.
static INIT: OnceLock<()> = OnceLock::new();

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Logging initialization errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive did not parse.
    #[error("invalid log filter {directive:?}: {reason}")]
    Filter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber could not be installed.
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Picks the filter directive, preferring a non-blank environment value.
#[must_use]
pub fn resolve_filter(env_value: Option<&str>, configured: &str) -> String {
    env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(configured)
        .to_string()
}

/// Builds the filter for a directive.
///
/// # Errors
///
/// Returns [`LoggingError::Filter`] when the directive is malformed.
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|err| LoggingError::Filter {
        directive: directive.to_string(),
        reason: err.to_string(),
    })
}

/// Installs the stderr subscriber once per process.
///
/// Later calls are no-ops.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is malformed or another
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    if INIT.get().is_some() {
        return Ok(());
    }
    let env_value = env::var(LOG_ENV_VAR).ok();
    let directive = resolve_filter(env_value.as_deref(), &config.filter);
    let filter = build_filter(&directive)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))?;
    let _ = INIT.set(());
    Ok(())
}
