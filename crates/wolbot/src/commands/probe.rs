//! `probe`: ping a host the same way `status` does.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Serialize;

use wolbot_core::{DeviceControl, NetworkControl, ProbeResult, parse_ipv4};

use crate::cli::{GlobalOpts, ProbeArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ProbeReport {
    host: Ipv4Addr,
    #[serde(flatten)]
    result: ProbeResult,
}

pub async fn handle(args: ProbeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let host = parse_ipv4(&args.host)?;
    let cfg = super::load_config(global)?;

    let timeout = match args.timeout {
        Some(0) => {
            return Err(CliError::Validation {
                field: "--timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Some(secs) => Duration::from_secs(secs),
        None => cfg.router_config().probe_timeout,
    };

    let control = NetworkControl::new(cfg.control_config());
    let report = ProbeReport {
        host,
        result: control.probe(host, timeout).await,
    };

    let color = output::should_color();
    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            let state = if r.result.alive { "online" } else { "offline" };
            let latency = r
                .result
                .latency_millis
                .map(|ms| format!(" {}", output::dimmed(&format!("{ms}ms"), color)))
                .unwrap_or_default();
            format!(
                "{} {}{latency}",
                r.host,
                output::verdict(state, r.result.alive, color)
            )
        },
        |r| r.result.alive.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
