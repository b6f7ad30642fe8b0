// ── Reply texts ──
//
// One fixed plain-text message per outcome. `Ignored` has none.

use std::fmt::Write as _;

use wolbot_core::Outcome;

pub const HELP: &str = "\
Wake-on-LAN bot

Registration
1. Register your MAC address:  #00:11:22:33:44:55
2. Register your IP address:   @192.168.1.100

Commands
- poweron: send the wake signal
- status: check whether the machine is online
- help or ?: show this message

Notes
- Register the MAC before the IP.
- The MAC is shown by `ipconfig /all` or `ip link`.
- The IP is the address of the machine to wake.";

/// The reply for `outcome`, or `None` when nothing should be sent.
pub fn render(outcome: &Outcome) -> Option<String> {
    let text = match outcome {
        Outcome::MacRegistered { mac } => format!(
            "MAC address registered: {mac}\n\nNext, register the IP address: @192.168.1.100"
        ),
        Outcome::IpRegistered { ip } => format!(
            "IP address registered: {ip}\n\nSend `poweron` to wake the machine or `status` to check it."
        ),
        Outcome::InvalidMac => "Invalid MAC address.\n\nExamples:\n#00:11:22:33:44:55\n#00-11-22-33-44-55".into(),
        Outcome::InvalidIp => "Invalid IP address.\n\nExamples:\n@192.168.1.100\n@10.0.0.1".into(),
        Outcome::NotRegistered => "You are not registered yet.\n\nRegister your MAC address first, e.g. #00:11:22:33:44:55".into(),
        Outcome::IpNotRegistered => "No IP address registered.\n\nRegister it first, e.g. @192.168.1.100".into(),
        Outcome::PowerOnResult { success: true } => {
            "Power on: wake signal sent.\n\nSend `status` in a minute to see whether it came up.".into()
        }
        Outcome::PowerOnResult { success: false } => "Power on: the wake signal could not be sent.".into(),
        Outcome::StatusResult {
            alive,
            latency_millis,
            mac,
            ip,
        } => {
            let mut text = String::from(if *alive { "Status: online" } else { "Status: offline" });
            let _ = write!(text, "\nIP: {ip}");
            if let Some(mac) = mac {
                let _ = write!(text, "\nMAC: {mac}");
            }
            match (alive, latency_millis) {
                (true, Some(ms)) => {
                    let _ = write!(text, "\nPing: {ms}ms");
                }
                (true, None) => {}
                (false, _) => text.push_str("\nThe machine did not answer."),
            }
            text
        }
        Outcome::HelpRequested => HELP.into(),
        Outcome::Failed => "Something went wrong. Please try again.".into(),
        Outcome::Ignored => return None,
    };
    Some(text)
}
