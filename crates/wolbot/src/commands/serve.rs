//! `serve`: run the webhook daemon until Ctrl-C.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use wolbot_core::{CommandRouter, NetworkControl};
use wolbot_line::ReplyClient;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;
use crate::server::{self, AppState};

pub async fn handle(args: ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = super::load_config(global)?;

    // Credentials are resolved before anything touches disk or the network.
    let channel = cfg.channel_config()?;
    let replies = ReplyClient::new(&channel).map_err(|e| CliError::Validation {
        field: "line.channel_access_token".into(),
        reason: e.to_string(),
    })?;

    let registry = Arc::new(super::open_registry(&cfg).await?);
    let router = CommandRouter::new(
        registry,
        NetworkControl::new(cfg.control_config()),
        cfg.router_config(),
    );
    let state = AppState::new(router, replies, channel.channel_secret);

    let addr = args.listen.unwrap_or(cfg.server.listen);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| CliError::Bind { addr, source })?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown requested"),
                Err(err) => warn!(error = %err, "cannot listen for Ctrl-C; shutting down"),
            }
            shutdown.cancel();
        }
    });

    server::serve(listener, state, shutdown).await?;
    Ok(())
}
