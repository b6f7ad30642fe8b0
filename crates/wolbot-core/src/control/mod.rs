// ── Device control adapters ──
//
// Wake-on-LAN and ICMP liveness. Neither operation reports failure as an
// error: network trouble degrades to `false` / not alive, with the cause
// logged here.

pub mod probe;
pub mod wake;

use std::future::Future;
use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Serialize;

use crate::config::ControlConfig;
use crate::model::MacAddress;

/// Outcome of one liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub alive: bool,
    /// Round-trip time. Absent whenever `alive` is false.
    pub latency_millis: Option<f64>,
}

impl ProbeResult {
    pub fn unreachable() -> Self {
        Self {
            alive: false,
            latency_millis: None,
        }
    }

    pub fn reachable(latency_millis: Option<f64>) -> Self {
        Self {
            alive: true,
            latency_millis,
        }
    }
}

/// The network actions the router can trigger.
///
/// Both methods are idempotent and safe to retry. `wake` returning `true`
/// means the signal left this host, not that the target powered on.
pub trait DeviceControl: Send + Sync {
    fn wake(&self, mac: &MacAddress) -> impl Future<Output = bool> + Send;

    fn probe(&self, host: Ipv4Addr, timeout: Duration) -> impl Future<Output = ProbeResult> + Send;
}

/// [`DeviceControl`] backed by a UDP broadcast socket and the system `ping`.
#[derive(Debug, Clone, Default)]
pub struct NetworkControl {
    config: ControlConfig,
}

impl NetworkControl {
    pub fn new(config: ControlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }
}

impl DeviceControl for NetworkControl {
    async fn wake(&self, mac: &MacAddress) -> bool {
        wake::send_magic_packet(mac, self.config.wake_target()).await
    }

    async fn probe(&self, host: Ipv4Addr, timeout: Duration) -> ProbeResult {
        probe::ping(&self.config.ping_program, host, timeout).await
    }
}
