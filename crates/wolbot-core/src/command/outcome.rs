use std::net::Ipv4Addr;

use serde::Serialize;

use crate::model::MacAddress;

/// Terminal result of handling one message.
///
/// Every failure the router can meet is resolved into one of these. The
/// presentation layer renders all of them except [`Outcome::Ignored`],
/// which produces no reply.
#[derive(Debug, Clone, PartialEq, Serialize, strum::IntoStaticStr)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    // ── Registration ─────────────────────────────────────────────────
    MacRegistered {
        mac: MacAddress,
    },
    IpRegistered {
        ip: Ipv4Addr,
    },
    InvalidMac,
    InvalidIp,

    // ── Preconditions ────────────────────────────────────────────────
    NotRegistered,
    IpNotRegistered,

    // ── Device actions ───────────────────────────────────────────────
    /// `success` means the wake signal left this host.
    PowerOnResult {
        success: bool,
    },
    #[serde(rename_all = "camelCase")]
    StatusResult {
        alive: bool,
        latency_millis: Option<f64>,
        mac: Option<MacAddress>,
        ip: Ipv4Addr,
    },

    // ── Other ────────────────────────────────────────────────────────
    HelpRequested,
    Ignored,
    /// Generic failure, e.g. the registry could not be written.
    Failed,
}

impl Outcome {
    /// Stable snake_case tag, identical to the serialized `outcome` field.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn produces_reply(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
