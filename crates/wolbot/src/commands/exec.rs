//! `exec`: run one chat message through the router locally.

use std::sync::Arc;

use serde::Serialize;

use wolbot_core::{CommandRouter, NetworkControl, Outcome};

use crate::cli::{ExecArgs, GlobalOpts};
use crate::error::CliError;
use crate::{output, reply};

#[derive(Serialize)]
struct ExecReport<'a> {
    #[serde(flatten)]
    outcome: &'a Outcome,
    reply: Option<String>,
}

pub async fn handle(args: ExecArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = super::load_config(global)?;
    let registry = Arc::new(super::open_registry(&cfg).await?);
    let router = CommandRouter::new(
        registry,
        NetworkControl::new(cfg.control_config()),
        cfg.router_config(),
    );

    let outcome = router.handle(&args.user, &args.text).await;
    if !outcome.produces_reply() {
        return Ok(());
    }

    let report = ExecReport {
        outcome: &outcome,
        reply: reply::render(&outcome),
    };
    let out = output::render_single(
        &global.output,
        &report,
        |r| r.reply.clone().unwrap_or_default(),
        |r| r.outcome.kind().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
