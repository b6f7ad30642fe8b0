//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing errors with actionable help text.

use std::net::SocketAddr;

use miette::Diagnostic;
use thiserror::Error;

use wolbot_config::ConfigError;
use wolbot_core::{AddressError, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CREDENTIALS: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const STORAGE: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Storage ──────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(
        code(wolbot::storage),
        help(
            "Check that the registry file is readable, writable and valid JSON.\n\
             Point at another file with --data-file or [storage].data_file."
        )
    )]
    Storage(#[source] CoreError),

    // ── Credentials ──────────────────────────────────────────────────
    #[error("No {credential} configured")]
    #[diagnostic(
        code(wolbot::no_credentials),
        help(
            "Set the {env} environment variable,\n\
             or add {credential} under [line] in the config file (wolbot config path)."
        )
    )]
    NoCredentials { credential: String, env: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("No device registered for user '{user}'")]
    #[diagnostic(
        code(wolbot::not_found),
        help("Run: wolbot devices list to see registered users")
    )]
    NotFound { user: String },

    // ── Network ──────────────────────────────────────────────────────
    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(wolbot::bind_failed),
        help("Is another process using the port? Pick another with --listen.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Wake-on-LAN packet for {mac} could not be sent to {target}")]
    #[diagnostic(
        code(wolbot::wake_failed),
        help("Run with -v for the socket error. Check --broadcast and --port.")
    )]
    WakeFailed { mac: String, target: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wolbot::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(wolbot::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(wolbot::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(wolbot::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Storage(_) => exit_code::STORAGE,
            Self::NoCredentials { .. } => exit_code::CREDENTIALS,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Bind { .. } | Self::WakeFailed { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error mapping ────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::Storage(err)
    }
}

impl From<AddressError> for CliError {
    fn from(err: AddressError) -> Self {
        let field = match err {
            AddressError::InvalidMac(_) => "MAC address",
            AddressError::InvalidIpv4(_) => "IPv4 address",
        };
        Self::Validation {
            field: field.into(),
            reason: err.to_string(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { credential, env } => {
                Self::NoCredentials { credential, env }
            }
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::AlreadyExists { path } => Self::ConfigExists {
                path: path.display().to_string(),
            },
            other => Self::Config(other),
        }
    }
}
