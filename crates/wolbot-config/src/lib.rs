//! Configuration for the wolbot daemon and CLI.
//!
//! One TOML file layered with `WOLBOT_` environment variables, credential
//! resolution (env + plaintext), and translation into the runtime types of
//! `wolbot_core` and `wolbot_line`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use wolbot_core::{ControlConfig, RouterConfig};
use wolbot_line::{ChannelConfig, DEFAULT_API_BASE};

/// Prefix of environment overrides, e.g. `WOLBOT_SERVER__LISTEN`.
pub const ENV_PREFIX: &str = "WOLBOT_";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {credential} configured (set ${env} or [line].{credential})")]
    NoCredentials { credential: String, env: String },

    #[error("config file already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub wake: WakeConfig,
    pub probe: ProbeConfig,
    pub line: LineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Webhook listen address.
    pub listen: SocketAddr,
    /// Bound on handling one message, in seconds. 0 disables it.
    pub deadline_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
            deadline_secs: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Device registry file. Relative paths resolve against the working
    /// directory.
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WakeConfig {
    pub broadcast: Ipv4Addr,
    pub port: u16,
}

impl Default for WakeConfig {
    fn default() -> Self {
        let control = ControlConfig::default();
        Self {
            broadcast: control.broadcast,
            port: control.port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
    /// Program used for ICMP echo.
    pub program: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: RouterConfig::default().probe_timeout.as_secs(),
            program: ControlConfig::default().ping_program,
        }
    }
}

/// Messaging channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LineConfig {
    pub api_base: String,

    /// Channel secret (plaintext; prefer the env var).
    pub channel_secret: Option<String>,

    /// Channel access token (plaintext; prefer the env var).
    pub channel_access_token: Option<String>,

    /// Environment variable holding the channel secret.
    pub channel_secret_env: String,

    /// Environment variable holding the channel access token.
    pub channel_access_token_env: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            channel_secret: None,
            channel_access_token: None,
            channel_secret_env: "LINE_CHANNEL_SECRET".into(),
            channel_access_token_env: "LINE_CHANNEL_ACCESS_TOKEN".into(),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wolbot", "wolbot").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wolbot");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` + environment. A missing file is not an
/// error: defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    config.validate()?;
    Ok(config)
}

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write a default config to `path` unless one exists and `force` is off.
pub fn init_config(path: &Path, force: bool) -> Result<Config, ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let cfg = Config::default();
    save_config_to(&cfg, path)?;
    Ok(cfg)
}

// ── Validation & translation ────────────────────────────────────────

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe.timeout_secs == 0 {
            return Err(validation("probe.timeout_secs", "must be at least 1"));
        }
        if self.probe.program.trim().is_empty() {
            return Err(validation("probe.program", "must not be empty"));
        }
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(validation("storage.data_file", "must not be empty"));
        }
        self.api_base()?;
        Ok(())
    }

    pub fn data_file(&self) -> &Path {
        &self.storage.data_file
    }

    pub fn control_config(&self) -> ControlConfig {
        ControlConfig {
            broadcast: self.wake.broadcast,
            port: self.wake.port,
            ping_program: self.probe.program.clone(),
        }
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            probe_timeout: Duration::from_secs(self.probe.timeout_secs),
            deadline: (self.server.deadline_secs > 0)
                .then(|| Duration::from_secs(self.server.deadline_secs)),
        }
    }

    /// Build the channel config, resolving both credentials.
    pub fn channel_config(&self) -> Result<ChannelConfig, ConfigError> {
        self.channel_config_with(|name| std::env::var(name).ok())
    }

    /// [`Config::channel_config`] with an explicit environment lookup.
    pub fn channel_config_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ChannelConfig, ConfigError> {
        let secret = resolve_secret(
            "channel_secret",
            &self.line.channel_secret_env,
            self.line.channel_secret.as_deref(),
            &env,
        )?;
        let token = resolve_secret(
            "channel_access_token",
            &self.line.channel_access_token_env,
            self.line.channel_access_token.as_deref(),
            &env,
        )?;
        Ok(ChannelConfig::new(self.api_base()?, secret, token))
    }

    /// Copy with plaintext credentials masked, for display.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        let mask = |value: &mut Option<String>| {
            if value.is_some() {
                *value = Some(REDACTED.into());
            }
        };
        mask(&mut cfg.line.channel_secret);
        mask(&mut cfg.line.channel_access_token);
        cfg
    }

    fn api_base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.line.api_base).map_err(|e| ConfigError::Validation {
            field: "line.api_base".into(),
            reason: format!("invalid URL '{}': {e}", self.line.api_base),
        })
    }
}

fn validation(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Env var first, then plaintext config.
fn resolve_secret(
    credential: &str,
    env_name: &str,
    plaintext: Option<&str>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    if let Some(val) = env(env_name).filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(val));
    }
    if let Some(val) = plaintext.filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(val.to_owned()));
    }
    Err(ConfigError::NoCredentials {
        credential: credential.into(),
        env: env_name.into(),
    })
}
