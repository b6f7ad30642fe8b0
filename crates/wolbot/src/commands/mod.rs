//! Command dispatch and helpers shared by the handlers.

pub mod config_cmd;
pub mod devices;
pub mod exec;
pub mod probe;
pub mod serve;
pub mod wake;

use std::path::PathBuf;

use wolbot_config::Config;
use wolbot_core::Registry;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Serve(args) => serve::handle(args, global).await,
        Command::Exec(args) => exec::handle(args, global).await,
        Command::Devices(args) => devices::handle(args, global).await,
        Command::Wake(args) => wake::handle(args, global).await,
        Command::Probe(args) => probe::handle(args, global).await,
        Command::Config(args) => config_cmd::handle(&args, global),
        // Handled before dispatch; nothing to do here.
        Command::Completions(_) => Ok(()),
    }
}

// ── Shared helpers ───────────────────────────────────────────────────

/// Config file selected by `--config`, or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(wolbot_config::config_path)
}

/// Load the effective config with CLI overrides applied.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = wolbot_config::load_config_from(&config_file(global))?;
    if let Some(ref data_file) = global.data_file {
        cfg.storage.data_file.clone_from(data_file);
    }
    Ok(cfg)
}

/// Open the device registry named by the config.
pub async fn open_registry(cfg: &Config) -> Result<Registry, CliError> {
    let registry = Registry::open(cfg.data_file()).await?;
    tracing::debug!(path = %registry.path().display(), records = registry.len(), "registry opened");
    Ok(registry)
}
