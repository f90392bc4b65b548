// approval-gate-cli/src/main.rs
// ============================================================================
// Module: Approval Gate CLI Entry Point
// Description: Command dispatcher for Approval Gate configuration and checks.
// Purpose: Provide a safe, localized CLI for offline authorization queries.
// Dependencies: approval-gate-core, approval-gate-config, clap, serde, thiserror.
// ============================================================================

//! ## Overview
//! The Approval Gate CLI validates configuration, compiles capability tables
//! from permission assignments, and answers capability and workflow questions
//! against them. Decisions are printed as JSON on stdout; denied decisions
//! exit with [`DENIED_EXIT_CODE`], and usage or configuration errors exit
//! with the generic failure code. All user-facing strings are routed through
//! the i18n catalog. Inputs are untrusted: files are read with a hard size
//! limit and parsed strictly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use approval_gate_cli::logging::init_logging;
use approval_gate_cli::t;
use approval_gate_config::ApprovalGateConfig;
use approval_gate_config::config_toml_example;
use approval_gate_core::AccessTier;
use approval_gate_core::ApprovalHistory;
use approval_gate_core::Candidate;
use approval_gate_core::Capability;
use approval_gate_core::CapabilityEvaluator;
use approval_gate_core::CapabilityTable;
use approval_gate_core::PermissionAssignment;
use approval_gate_core::PermissionCheck;
use approval_gate_core::ResourceStatus;
use approval_gate_core::UserGroupId;
use approval_gate_core::UserId;
use approval_gate_core::WorkflowGate;
use approval_gate_core::filter_nav_items;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap::error::ErrorKind;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an assignments JSON input.
const MAX_ASSIGNMENTS_BYTES: usize = 1024 * 1024;
/// Exit code returned when a decision denies access.
const DENIED_EXIT_CODE: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Approval Gate command-line interface.
#[derive(Parser, Debug)]
#[command(name = "approval-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level command groups.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Capability table compilation and checks.
    Acl {
        /// Selected acl subcommand.
        #[command(subcommand)]
        command: AclCommand,
    },
    /// Workflow gate queries.
    Workflow {
        /// Selected workflow subcommand.
        #[command(subcommand)]
        command: WorkflowCommand,
    },
    /// Navigation utilities.
    Nav {
        /// Selected nav subcommand.
        #[command(subcommand)]
        command: NavCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Validate(ConfigValidateCommand),
    /// Print the canonical example config.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path (defaults to env or `approval-gate.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Acl subcommands.
#[derive(Subcommand, Debug)]
enum AclCommand {
    /// Compile assignments into a capability table.
    Compile(AclCompileCommand),
    /// Evaluate a permission check against compiled assignments.
    Check(AclCheckCommand),
}

/// Arguments for `acl compile`.
#[derive(Args, Debug)]
struct AclCompileCommand {
    /// Assignments JSON file.
    #[arg(long, value_name = "FILE")]
    assignments: PathBuf,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `acl check`.
#[derive(Args, Debug)]
struct AclCheckCommand {
    /// Assignments JSON file.
    #[arg(long, value_name = "FILE")]
    assignments: PathBuf,
    /// Feature component id to check.
    #[arg(long, value_name = "ID")]
    component: String,
    /// Acting user id.
    #[arg(long, value_name = "ID")]
    user: String,
    /// Required capability (for example `can_view`).
    #[arg(long, value_name = "CAP")]
    action: Option<Capability>,
    /// Capabilities of which at least one is required.
    #[arg(long, value_name = "CAP,...", value_delimiter = ',')]
    actions: Vec<Capability>,
    /// Required access tier.
    #[arg(long = "access-level", value_name = "TIER")]
    access_level: Option<AccessTier>,
    /// User that took the item's previous step.
    #[arg(long = "last-authorizer", value_name = "ID")]
    last_authorizer: Option<String>,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Workflow subcommands.
#[derive(Subcommand, Debug)]
enum WorkflowCommand {
    /// Decide whether a user may take the next step.
    Advance(WorkflowAdvanceCommand),
    /// List the tiers permitted to act next.
    NextTiers(WorkflowNextTiersCommand),
}

/// Resource status accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    /// Awaiting approval steps.
    Pending,
    /// Fully approved.
    Approved,
    /// Rejected.
    Rejected,
    /// Any other business status.
    Other,
}

/// Arguments for `workflow advance`.
#[derive(Args, Debug)]
struct WorkflowAdvanceCommand {
    /// Feature component id keying the flow.
    #[arg(long, value_name = "ID")]
    feature: String,
    /// Candidate's access tier.
    #[arg(long, value_name = "TIER")]
    tier: AccessTier,
    /// Candidate user id.
    #[arg(long, value_name = "ID")]
    user: String,
    /// Resource status.
    #[arg(long, value_enum, default_value_t = StatusArg::Pending)]
    status: StatusArg,
    /// Tier that acted last.
    #[arg(long, value_name = "TIER")]
    state: Option<AccessTier>,
    /// User that acted last.
    #[arg(long = "last-authorizer", value_name = "ID")]
    last_authorizer: Option<String>,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `workflow next-tiers`.
#[derive(Args, Debug)]
struct WorkflowNextTiersCommand {
    /// Feature component id keying the flow.
    #[arg(long, value_name = "ID")]
    feature: String,
    /// Tier that acted last.
    #[arg(long, value_name = "TIER")]
    state: Option<AccessTier>,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Nav subcommands.
#[derive(Subcommand, Debug)]
enum NavCommand {
    /// Print the navigation entries visible to the assignments' user groups.
    List(NavListCommand),
}

/// Arguments for `nav list`.
#[derive(Args, Debug)]
struct NavListCommand {
    /// Assignments JSON file.
    #[arg(long, value_name = "FILE")]
    assignments: PathBuf,
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Input Types
// ============================================================================

/// Assignments file payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssignmentsFile {
    /// User groups the user belongs to; when present, assignments are scoped
    /// to them.
    #[serde(default)]
    user_groups: Option<Vec<UserGroupId>>,
    /// Raw `"group:component:permGroup"` strings.
    assignments: Vec<String>,
}

impl AssignmentsFile {
    /// Decomposes and scopes the assignments.
    fn resolve(&self) -> CliResult<Vec<PermissionAssignment>> {
        let mut assignments = self
            .assignments
            .iter()
            .map(|raw| PermissionAssignment::decompose(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| CliError::new(t!("acl.assignment_invalid", error = err)))?;
        if let Some(groups) = &self.user_groups {
            assignments.retain(|assignment| groups.contains(&assignment.user_group_id));
        }
        Ok(assignments)
    }

    /// Returns the declared user groups, or none.
    fn groups(&self) -> &[UserGroupId] {
        self.user_groups.as_deref().unwrap_or_default()
    }
}

/// Output of `acl check`.
#[derive(Debug, Serialize)]
struct CheckOutput {
    /// Whether the check passed.
    allowed: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Localized message.
    message: String,
}

impl CliError {
    /// Creates a CLI error from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return parse_error_exit(&err),
    };

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Acl {
            command,
        } => command_acl(command),
        Commands::Workflow {
            command,
        } => command_workflow(command),
        Commands::Nav {
            command,
        } => command_nav(command),
    }
}

/// Maps an argument parsing failure to an exit code.
///
/// Help output succeeds. Usage errors become a [`CliError`] so they exit with
/// a failure code distinct from [`DENIED_EXIT_CODE`].
fn parse_error_exit(err: &clap::Error) -> CliResult<ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print().map_err(|error| CliError::new(output_error("stdout", &error)))?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            let rendered = err.render().to_string();
            Err(CliError::new(t!("main.usage_invalid", error = rendered.trim_end())))
        }
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the canonical example config.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Acl Commands
// ============================================================================

/// Dispatches acl subcommands.
fn command_acl(command: AclCommand) -> CliResult<ExitCode> {
    match command {
        AclCommand::Compile(command) => command_acl_compile(&command),
        AclCommand::Check(command) => command_acl_check(&command),
    }
}

/// Compiles assignments and prints the capability table.
fn command_acl_compile(command: &AclCompileCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let input = read_assignments(&command.assignments)?;
    let table = compile_table(&config, &input)?;
    write_json(&table, &t!("acl.kind.table"))?;
    Ok(ExitCode::SUCCESS)
}

/// Evaluates a permission check and prints the decision.
fn command_acl_check(command: &AclCheckCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let input = read_assignments(&command.assignments)?;
    let table = compile_table(&config, &input)?;
    let check = PermissionCheck {
        action: command.action,
        actions: command.actions.clone(),
        access_level: command.access_level,
        last_authorizer: command.last_authorizer.clone().map(UserId::new),
        current_user_id: Some(UserId::new(command.user.clone())),
    };
    let decision = CapabilityEvaluator::evaluate(&table, &command.component, &check);
    write_json(
        &CheckOutput {
            allowed: decision.allowed,
        },
        &t!("acl.kind.decision"),
    )?;
    Ok(decision_exit_code(decision.allowed))
}

// ============================================================================
// SECTION: Workflow Commands
// ============================================================================

/// Dispatches workflow subcommands.
fn command_workflow(command: WorkflowCommand) -> CliResult<ExitCode> {
    match command {
        WorkflowCommand::Advance(command) => command_workflow_advance(&command),
        WorkflowCommand::NextTiers(command) => command_workflow_next_tiers(&command),
    }
}

/// Runs the workflow gate for one candidate and prints the decision.
fn command_workflow_advance(command: &WorkflowAdvanceCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let flows = config
        .flow_registry()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let flow = flows
        .get_flow(&command.feature)
        .map_err(|err| CliError::new(t!("workflow.flow_lookup_failed", error = err)))?;
    let history = ApprovalHistory {
        status: resource_status_from_arg(command.status),
        current_authorization_state: command.state,
        last_authorizer: command.last_authorizer.clone().map(UserId::new),
    };
    let candidate = Candidate::new(command.tier, command.user.clone());
    let decision = WorkflowGate::decide(flow, &history, &candidate);
    write_json(&decision, &t!("workflow.kind.decision"))?;
    Ok(decision_exit_code(decision.allowed))
}

/// Prints the tiers permitted to act after the given state.
fn command_workflow_next_tiers(command: &WorkflowNextTiersCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let flows = config
        .flow_registry()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let tiers = flows
        .next_acceptable_tiers(&command.feature, command.state)
        .map_err(|err| CliError::new(t!("workflow.flow_lookup_failed", error = err)))?;
    write_json(&tiers, &t!("workflow.kind.tiers"))?;
    Ok(ExitCode::SUCCESS)
}

/// Maps the CLI status flag to the resource status.
const fn resource_status_from_arg(status: StatusArg) -> ResourceStatus {
    match status {
        StatusArg::Pending => ResourceStatus::Pending,
        StatusArg::Approved => ResourceStatus::Approved,
        StatusArg::Rejected => ResourceStatus::Rejected,
        StatusArg::Other => ResourceStatus::Other,
    }
}

// ============================================================================
// SECTION: Nav Commands
// ============================================================================

/// Dispatches nav subcommands.
fn command_nav(command: NavCommand) -> CliResult<ExitCode> {
    match command {
        NavCommand::List(command) => command_nav_list(&command),
    }
}

/// Prints the filtered navigation tree.
fn command_nav_list(command: &NavListCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let input = read_assignments(&command.assignments)?;
    let table = compile_table(&config, &input)?;
    let items =
        filter_nav_items(&config.navigation, &table.accessible_submodule_ids(), input.groups());
    write_json(&items, &t!("nav.kind.items"))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Loads configuration and installs the logging subscriber it describes.
fn load_config(path: Option<&Path>) -> CliResult<ApprovalGateConfig> {
    let config = ApprovalGateConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    init_logging(&config.logging)
        .map_err(|err| CliError::new(t!("logging.init_failed", error = err)))?;
    Ok(config)
}

/// Compiles the assignments file against configured permission groups.
fn compile_table(
    config: &ApprovalGateConfig,
    input: &AssignmentsFile,
) -> CliResult<CapabilityTable> {
    let assignments = input.resolve()?;
    config
        .compile(&assignments)
        .map_err(|err| CliError::new(t!("acl.compile_failed", error = err)))
}

/// Returns the exit code for an allow or deny decision.
fn decision_exit_code(allowed: bool) -> ExitCode {
    if allowed { ExitCode::SUCCESS } else { ExitCode::from(DENIED_EXIT_CODE) }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses an assignments JSON file.
fn read_assignments(path: &Path) -> CliResult<AssignmentsFile> {
    let kind = t!("input.kind.assignments");
    let bytes = read_bytes_with_limit(path, MAX_ASSIGNMENTS_BYTES).map_err(|err| match err {
        ReadLimitError::Io(error) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = error
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Serializes a value as a single JSON line on stdout.
fn write_json<T: Serialize>(value: &T, kind: &str) -> CliResult<()> {
    let mut bytes = serde_json::to_vec(value).map_err(|err| {
        CliError::new(t!("output.serialize_failed", kind = kind, error = err))
    })?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
