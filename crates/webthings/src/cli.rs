//! Clap derive structures for the `webthings` CLI.
//!
//! Defines the command tree, global flags, and shared enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// webthings -- query a WebThings gateway
#[derive(Debug, Parser)]
#[command(
    name = "webthings",
    version,
    about = "Query a WebThings gateway from the command line",
    long_about = "Lists the things (smart-home devices) known to a WebThings gateway.\n\n\
        The gateway domain is probed first; if it does not answer, the local\n\
        fallback domain (gateway.local by default) is tried instead.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "WEBTHINGS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file path (overrides the platform default)
    #[arg(long, env = "WEBTHINGS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Gateway domain (overrides profile)
    #[arg(long, short = 'g', env = "WEBTHINGS_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// Gateway token
    #[arg(long, env = "WEBTHINGS_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Gateway port [default: 443, or 80 with --plain-http]
    #[arg(long, env = "WEBTHINGS_PORT", global = true)]
    pub port: Option<u16>,

    /// Fallback domain tried when the gateway domain is unreachable
    #[arg(long, env = "WEBTHINGS_FALLBACK", global = true)]
    pub fallback: Option<String>,

    /// Talk to the gateway over plain HTTP instead of HTTPS
    #[arg(long, env = "WEBTHINGS_PLAIN_HTTP", global = true)]
    pub plain_http: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "WEBTHINGS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "WEBTHINGS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Reachability probe timeout in milliseconds
    #[arg(long, env = "WEBTHINGS_PROBE_TIMEOUT_MS", global = true)]
    pub probe_timeout_ms: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WEBTHINGS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the gateway's things
    #[command(alias = "t")]
    Things(ThingsArgs),

    /// Show which gateway endpoint answers right now
    Resolve,

    /// Check whether a string is a valid gateway address
    Validate(ValidateArgs),

    /// Manage configuration profiles and tokens
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Things ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThingsArgs {
    #[command(subcommand)]
    pub command: ThingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThingsCommand {
    /// List all things
    #[command(alias = "ls")]
    List,
}

// ── Validate ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Address to check, e.g. https://gateway.example.com
    pub address: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the current configuration (tokens masked)
    Show,

    /// Save the global connection flags (--gateway, --port, ...) as a profile
    Add {
        /// Profile name
        name: String,

        /// Environment variable holding the token for this profile
        #[arg(long)]
        token_env: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        set_default: bool,
    },

    /// Store a gateway token in the system keyring
    SetToken,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
