// crates/policy-gate-cli/src/main.rs
// ============================================================================
// Module: Policy Gate CLI Entry Point
// Description: Command dispatcher for policy evaluation and tool calls.
// Purpose: Provide a safe CLI over the Policy Gate tool router.
// Dependencies: clap, policy-gate-config, policy-gate-core, policy-gate-mcp, tokio.
// ============================================================================

//! ## Overview
//! The Policy Gate CLI evaluates policies against JSON input files, lists the
//! built-in policies, invokes tool calls through the same router an MCP host
//! would use, and validates configuration. Results are JSON lines on stdout;
//! errors go to stderr with a failure exit code. Security posture: inputs are
//! untrusted; files are read with hard size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use policy_gate_cli::t;
use policy_gate_config::PolicyGateConfig;
use policy_gate_config::config_toml_example;
use policy_gate_core::PolicyName;
use policy_gate_core::runtime::first_match;
use policy_gate_mcp::ToolRouter;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Path label used when reading from stdin.
const STDIN_LABEL: &str = "-";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "policy-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to `POLICY_GATE_CONFIG` or policy-gate.toml).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a policy against a JSON input document.
    Eval(EvalCommand),
    /// Built-in policy utilities.
    Policies {
        /// Selected policies subcommand.
        #[command(subcommand)]
        command: PoliciesCommand,
    },
    /// Tool-call utilities.
    Tool {
        /// Selected tool subcommand.
        #[command(subcommand)]
        command: ToolCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `eval`.
#[derive(Args, Debug)]
struct EvalCommand {
    /// Policy name (simple, advanced, attribute_based).
    #[arg(long, value_name = "NAME")]
    policy: String,
    /// Input document path, or `-` for stdin.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Include the rule that decided the outcome (local evaluator only).
    #[arg(long, action = ArgAction::SetTrue)]
    explain: bool,
}

/// Policies subcommands.
#[derive(Subcommand, Debug)]
enum PoliciesCommand {
    /// List the built-in policies.
    List,
}

/// Tool subcommands.
#[derive(Subcommand, Debug)]
enum ToolCommand {
    /// List the available tools.
    List,
    /// Call a tool with a JSON payload.
    Call(ToolCallCommand),
}

/// Arguments for `tool call`.
#[derive(Args, Debug)]
struct ToolCallCommand {
    /// Tool name.
    #[arg(long, value_name = "TOOL")]
    name: String,
    /// Payload path, or `-` for stdin. Defaults to an empty object.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Print a canonical example configuration.
    Example,
}

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
///
/// The remote evaluator owns a blocking HTTP client, so the router is built
/// before the async runtime starts and dropped after it stops.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        write_stdout_line(&t!("main.version", version = env!("CARGO_PKG_VERSION")))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };

    let config_path = cli.config.as_deref();
    match command {
        Commands::Eval(command) => command_eval(config_path, &command),
        Commands::Policies {
            command: PoliciesCommand::List,
        } => command_tool_call(config_path, "list_policies", None),
        Commands::Tool {
            command,
        } => match command {
            ToolCommand::List => command_tool_list(),
            ToolCommand::Call(command) => {
                command_tool_call(config_path, &command.name, command.input.as_deref())
            }
        },
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate => command_config_validate(config_path),
            ConfigCommand::Example => command_config_example(),
        },
    }
}

// ============================================================================
// SECTION: Evaluation Commands
// ============================================================================

/// Executes the `eval` command.
fn command_eval(config_path: Option<&Path>, command: &EvalCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let router = build_router(&config)?;
    if command.explain && router.evaluator_backend() != "local" {
        return Err(CliError::new(t!(
            "eval.explain_unsupported",
            backend = router.evaluator_backend()
        )));
    }
    let input = read_json_input(&command.input, config.limits.max_input_bytes)?;
    let explained_input = if command.explain { input.as_object().cloned() } else { None };
    let payload = json!({
        "policy_name": command.policy,
        "input_data": input,
    });
    let mut result = call_tool(&router, "evaluate_opa_policy", payload)?;
    if let Some(input) = explained_input
        && let Value::Object(fields) = &mut result
    {
        let rule = first_match(&PolicyName::parse(&command.policy), &input);
        fields.insert("matched_rule".to_string(), json!(rule.map(policy_gate_core::Rule::as_str)));
    }
    write_json_value(&result)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes a tool call and prints its JSON result.
fn command_tool_call(
    config_path: Option<&Path>,
    name: &str,
    input: Option<&Path>,
) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let router = build_router(&config)?;
    let payload = match input {
        Some(path) => read_json_input(path, config.limits.max_input_bytes)?,
        None => json!({}),
    };
    let result = call_tool(&router, name, payload)?;
    write_json_value(&result)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the tool definitions.
fn command_tool_list() -> CliResult<ExitCode> {
    let tools = serde_json::to_value(ToolRouter::list_tools())
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_json_value(&json!({ "tools": tools }))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes the config validation command.
fn command_config_validate(config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = PolicyGateConfig::load(config_path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!(
        "config.validate.ok",
        mode = config.evaluator.mode.as_str(),
        users = config.users.len(),
        audit = config.audit.sink.as_str()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the example configuration.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Router Helpers
// ============================================================================

/// Loads configuration, falling back to defaults when no file exists.
fn load_config(config_path: Option<&Path>) -> CliResult<PolicyGateConfig> {
    PolicyGateConfig::load_or_default(config_path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds the tool router outside of any async context.
fn build_router(config: &PolicyGateConfig) -> CliResult<ToolRouter> {
    ToolRouter::from_config(config)
        .map_err(|err| CliError::new(t!("router.build_failed", error = err)))
}

/// Runs one tool call on a dedicated runtime.
fn call_tool(router: &ToolRouter, name: &str, payload: Value) -> CliResult<Value> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(t!("runtime.start_failed", error = err)))?;
    runtime
        .block_on(router.handle_tool_call(name, payload))
        .map_err(|err| CliError::new(t!("tool.call_failed", tool = name, error = err)))
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors raised while reading bounded input.
#[derive(Debug)]
enum ReadLimitError {
    /// I/O failure.
    Io(std::io::Error),
    /// Input size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads and parses a JSON document from a file or stdin.
fn read_json_input(path: &Path, max_bytes: usize) -> CliResult<Value> {
    let label = path.display().to_string();
    let read = if path.as_os_str() == STDIN_LABEL {
        read_with_limit(std::io::stdin().lock(), None, max_bytes)
    } else {
        read_bytes_with_limit(path, max_bytes)
    };
    let bytes = read.map_err(|err| match err {
        ReadLimitError::Io(error) => {
            CliError::new(t!("input.read_failed", path = label, error = error))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!("input.too_large", path = label, size = size, limit = limit)),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(t!("input.parse_failed", path = label, error = err)))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    read_with_limit(file, Some(metadata.len()), max_bytes)
}

/// Reads from a source while enforcing a hard size limit.
fn read_with_limit<R: Read>(
    reader: R,
    declared_size: Option<u64>,
    max_bytes: usize,
) -> Result<Vec<u8>, ReadLimitError> {
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size: declared_size.unwrap_or(u64::MAX),
        limit: max_bytes,
    })?;
    if let Some(size) = declared_size
        && size > limit
    {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = reader.take(limit.saturating_add(1));
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

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes compact JSON to stdout followed by a newline.
fn write_json_value(value: &Value) -> CliResult<()> {
    let mut bytes = serde_json::to_vec(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    t!("output.write_failed", stream = stream, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
