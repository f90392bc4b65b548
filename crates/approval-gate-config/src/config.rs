// approval-gate-config/src/config.rs
// ============================================================================
// Module: Approval Gate Configuration
// Description: Configuration loading and validation for Approval Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: approval-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown flow keys, unregistered components, duplicate ids, and malformed
//! flows are configuration bugs and are rejected at load time, never at
//! evaluation time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use approval_gate_core::AuthorizationFlow;
use approval_gate_core::CapabilityTable;
use approval_gate_core::ComponentMeta;
use approval_gate_core::ComponentRegistry;
use approval_gate_core::FeatureComponentId;
use approval_gate_core::FlowRegistry;
use approval_gate_core::FlowStep;
use approval_gate_core::MergePolicy;
use approval_gate_core::NavItem;
use approval_gate_core::PERMISSION_SEPARATOR;
use approval_gate_core::PermissionAssignment;
use approval_gate_core::PermissionCompiler;
use approval_gate_core::PermissionGroup;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "approval-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "APPROVAL_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of registered feature components.
pub(crate) const MAX_COMPONENTS: usize = 4096;
/// Maximum number of permission group definitions.
pub(crate) const MAX_PERMISSION_GROUPS: usize = 1024;
/// Maximum number of authorization flows.
pub(crate) const MAX_FLOWS: usize = 512;
/// Maximum number of steps in one authorization flow.
pub(crate) const MAX_FLOW_STEPS: usize = 16;
/// Maximum number of navigation entries, children included.
pub(crate) const MAX_NAV_ENTRIES: usize = 1024;
/// Maximum length of identifiers and titles.
pub(crate) const MAX_TEXT_LENGTH: usize = 256;
/// Default tracing filter directive.
const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Approval Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalGateConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Permission compiler configuration.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Closed registry of feature components.
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    /// Permission group definitions.
    #[serde(default)]
    pub permission_groups: Vec<PermissionGroup>,
    /// Authorization flows keyed by feature.
    #[serde(default)]
    pub flows: Vec<FlowConfig>,
    /// Navigation tree.
    #[serde(default)]
    pub navigation: Vec<NavItem>,
}

impl ApprovalGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// An explicit path wins over [`CONFIG_ENV_VAR`], which wins over
    /// `approval-gate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        let components = self.component_registry()?;
        validate_permission_groups(&self.permission_groups)?;
        self.flow_registry()?.validate_against(&components).map_err(|err| {
            ConfigError::Invalid(format!("flows: {err}"))
        })?;
        validate_navigation(&self.navigation)?;
        Ok(())
    }

    /// Builds the closed feature component registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when limits are exceeded, a title is
    /// invalid, or an id repeats.
    pub fn component_registry(&self) -> Result<ComponentRegistry, ConfigError> {
        if self.components.len() > MAX_COMPONENTS {
            return Err(ConfigError::Invalid(format!(
                "components exceeds max entries ({MAX_COMPONENTS})"
            )));
        }
        for component in &self.components {
            if let Some(title) = &component.title {
                validate_text(&format!("components.{}.title", component.id), title)?;
            }
        }
        ComponentRegistry::new(self.components.iter().map(ComponentConfig::to_meta))
            .map_err(|err| ConfigError::Invalid(format!("components: {err}")))
    }

    /// Builds the authorization flow registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when limits are exceeded, a flow is
    /// malformed, or a feature registers two flows.
    pub fn flow_registry(&self) -> Result<FlowRegistry, ConfigError> {
        if self.flows.len() > MAX_FLOWS {
            return Err(ConfigError::Invalid(format!("flows exceeds max entries ({MAX_FLOWS})")));
        }
        let flows = self
            .flows
            .iter()
            .map(|flow| Ok((flow.feature.to_string(), flow.to_flow()?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        FlowRegistry::new(flows).map_err(|err| ConfigError::Invalid(format!("flows: {err}")))
    }

    /// Returns a permission compiler using the configured merge policy.
    #[must_use]
    pub const fn compiler(&self) -> PermissionCompiler {
        PermissionCompiler::new(self.compiler.merge_policy)
    }

    /// Compiles assignments against the configured permission groups.
    ///
    /// When `reject_unknown_components` is set, assignments naming a component
    /// outside the registry are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the registry cannot be built or
    /// an assignment names an unregistered component.
    pub fn compile(
        &self,
        assignments: &[PermissionAssignment],
    ) -> Result<CapabilityTable, ConfigError> {
        let compiler = self.compiler();
        if !self.compiler.reject_unknown_components {
            return Ok(compiler.compile(assignments, &self.permission_groups));
        }
        let components = self.component_registry()?;
        compiler
            .compile_checked(&components, assignments, &self.permission_groups)
            .map_err(|err| ConfigError::Invalid(format!("assignments: {err}")))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter directive (`EnvFilter` syntax).
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_text("logging.filter", &self.filter)
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Permission compiler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Policy for components reached through several permission groups.
    #[serde(default)]
    pub merge_policy: MergePolicy,
    /// Reject assignments naming components outside the registry.
    #[serde(default = "default_reject_unknown_components")]
    pub reject_unknown_components: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            merge_policy: MergePolicy::default(),
            reject_unknown_components: default_reject_unknown_components(),
        }
    }
}

/// Registered feature component.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    /// Component identifier.
    pub id: FeatureComponentId,
    /// Optional display title.
    #[serde(default)]
    pub title: Option<String>,
}

impl ComponentConfig {
    /// Converts the entry into registry metadata.
    fn to_meta(&self) -> ComponentMeta {
        ComponentMeta {
            id: self.id.clone(),
            title: self.title.clone(),
        }
    }
}

/// Authorization flow entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// Feature the flow protects; must be a registered component.
    pub feature: FeatureComponentId,
    /// Steps in approval order; each a tier or an array of tiers.
    pub steps: Vec<FlowStep>,
}

impl FlowConfig {
    /// Builds the validated flow.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the flow has too many steps or
    /// fails flow validation.
    pub fn to_flow(&self) -> Result<AuthorizationFlow, ConfigError> {
        if self.steps.len() > MAX_FLOW_STEPS {
            return Err(ConfigError::Invalid(format!(
                "flows.{}.steps exceeds max entries ({MAX_FLOW_STEPS})",
                self.feature
            )));
        }
        AuthorizationFlow::new(self.steps.clone())
            .map_err(|err| ConfigError::Invalid(format!("flows.{}: {err}", self.feature)))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a free-text value: non-empty after trimming and bounded.
fn validate_text(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TEXT_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Validates permission group definitions.
fn validate_permission_groups(groups: &[PermissionGroup]) -> Result<(), ConfigError> {
    if groups.len() > MAX_PERMISSION_GROUPS {
        return Err(ConfigError::Invalid(format!(
            "permission_groups exceeds max entries ({MAX_PERMISSION_GROUPS})"
        )));
    }
    let mut seen = BTreeSet::new();
    for group in groups {
        let id = group.id.as_str();
        validate_text("permission_groups.id", id)?;
        if id.contains(PERMISSION_SEPARATOR) {
            return Err(ConfigError::Invalid(format!(
                "permission_groups.{id} must not contain '{PERMISSION_SEPARATOR}'"
            )));
        }
        if !seen.insert(id) {
            return Err(ConfigError::Invalid(format!("duplicate permission group: {id}")));
        }
    }
    Ok(())
}

/// Validates the navigation tree: one level of children, unique ids, limits.
fn validate_navigation(items: &[NavItem]) -> Result<(), ConfigError> {
    let total: usize = items.iter().map(|item| 1 + item.children.len()).sum();
    if total > MAX_NAV_ENTRIES {
        return Err(ConfigError::Invalid(format!(
            "navigation exceeds max entries ({MAX_NAV_ENTRIES})"
        )));
    }
    let mut seen = BTreeSet::new();
    for parent in items {
        validate_nav_item(parent, &mut seen)?;
        for child in &parent.children {
            if !child.children.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "navigation.{}.{} must not have children",
                    parent.id, child.id
                )));
            }
            validate_nav_item(child, &mut seen)?;
        }
    }
    Ok(())
}

/// Validates one navigation entry and records its id.
fn validate_nav_item<'a>(
    item: &'a NavItem,
    seen: &mut BTreeSet<&'a str>,
) -> Result<(), ConfigError> {
    validate_text("navigation.id", &item.id)?;
    validate_text(&format!("navigation.{}.title", item.id), &item.title)?;
    if !seen.insert(item.id.as_str()) {
        return Err(ConfigError::Invalid(format!("duplicate navigation id: {}", item.id)));
    }
    Ok(())
}

/// Default tracing filter directive.
fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default for rejecting unregistered components.
const fn default_reject_unknown_components() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
