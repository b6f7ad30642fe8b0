//! Device registry command handlers.

use tabled::Tabled;
use wolbot_core::DeviceRecord;

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&DeviceRecord> for DeviceRow {
    fn from(d: &DeviceRecord) -> Self {
        Self {
            user: d.user_id.clone(),
            mac: d.mac.as_ref().map(ToString::to_string).unwrap_or_default(),
            ip: d.ip.map(|ip| ip.to_string()).unwrap_or_default(),
            state: d.state().to_string(),
            updated: d.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn detail(d: &DeviceRecord) -> String {
    [
        format!("User:     {}", d.user_id),
        format!(
            "MAC:      {}",
            d.mac.as_ref().map_or_else(|| "-".into(), ToString::to_string)
        ),
        format!(
            "IP:       {}",
            d.ip.map_or_else(|| "-".into(), |ip| ip.to_string())
        ),
        format!("State:    {}", d.state()),
        format!("Created:  {}", d.created_at.to_rfc3339()),
        format!("Updated:  {}", d.updated_at.to_rfc3339()),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = super::load_config(global)?;
    let registry = super::open_registry(&cfg).await?;

    let out = match args.command {
        DevicesCommand::List => output::render_list(
            &global.output,
            &registry.list(),
            |d| DeviceRow::from(d),
            |d| d.user_id.clone(),
        )?,
        DevicesCommand::Show { user } => {
            let record = registry
                .find(&user)
                .ok_or(CliError::NotFound { user })?;
            output::render_single(&global.output, &record, detail, |d| d.user_id.clone())?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
