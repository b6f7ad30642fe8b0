//! Clap derive structures for the `wolbot` binary.
//!
//! Defines the command tree, global flags, and shared types.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wolbot -- power on your machines from a chat
#[derive(Debug, Parser)]
#[command(
    name = "wolbot",
    version,
    about = "Wake-on-LAN chat bot: register a machine, power it on, check it is up",
    long_about = "Runs the messaging webhook that lets each chat user register one machine\n\
        (#MAC, then @IP) and send `poweron` or `status`.\n\n\
        The same commands can be run locally with `wolbot exec`.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Device registry file (overrides [storage].data_file)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,
}

// ── Output & Log Enums ───────────────────────────────────────────────

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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the webhook daemon
    Serve(ServeArgs),

    /// Run one chat command locally, as if sent by a user
    Exec(ExecArgs),

    /// Inspect registered devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Send a Wake-on-LAN magic packet
    Wake(WakeArgs),

    /// Check whether a host answers ping
    Probe(ProbeArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides [server].listen)
    #[arg(long, short = 'l')]
    pub listen: Option<SocketAddr>,
}

// ── Exec ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// User identity to act as
    #[arg(long, short = 'u')]
    pub user: String,

    /// Message text, e.g. "#aa:bb:cc:dd:ee:ff", "@10.0.0.5", "poweron"
    #[arg(allow_hyphen_values = true)]
    pub text: String,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all registered devices
    #[command(alias = "ls")]
    List,

    /// Show the device registered by one user
    Show {
        /// User identity
        user: String,
    },
}

// ── Wake / Probe ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WakeArgs {
    /// Target MAC address (aa:bb:cc:dd:ee:ff or aa-bb-cc-dd-ee-ff)
    pub mac: String,

    /// Broadcast address (overrides [wake].broadcast)
    #[arg(long, short = 'b')]
    pub broadcast: Option<String>,

    /// UDP port (overrides [wake].port)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// IPv4 address to ping
    pub host: String,

    /// Timeout in seconds (overrides [probe].timeout_secs)
    #[arg(long, short = 't')]
    pub timeout: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show the effective configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
