//! `wake`: send a magic packet without going through the registry.

use serde::Serialize;

use wolbot_core::control::wake;
use wolbot_core::{MacAddress, parse_ipv4};

use crate::cli::{GlobalOpts, WakeArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct WakeReport {
    mac: MacAddress,
    target: String,
    sent: bool,
}

pub async fn handle(args: WakeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mac = MacAddress::parse(&args.mac)?;

    let mut control = super::load_config(global)?.control_config();
    if let Some(ref broadcast) = args.broadcast {
        control.broadcast = parse_ipv4(broadcast)?;
    }
    if let Some(port) = args.port {
        control.port = port;
    }
    let target = control.wake_target();

    if !wake::send_magic_packet(&mac, target).await {
        return Err(CliError::WakeFailed {
            mac: mac.to_string(),
            target: target.to_string(),
        });
    }

    let report = WakeReport {
        mac,
        target: target.to_string(),
        sent: true,
    };
    let color = output::should_color();
    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            format!(
                "{} {} {}",
                output::verdict("sent", true, color),
                r.mac,
                output::dimmed(&format!("-> {}", r.target), color)
            )
        },
        |r| r.mac.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
