// ── Runtime configuration ──
//
// These types describe how the adapters and the router behave. They never
// touch disk: the config crate builds them and hands them in.

use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

/// Default UDP port for magic packets (discard service).
pub const DEFAULT_WAKE_PORT: u16 = 9;

/// Default bound on a single liveness probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// How wake packets and probes reach the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlConfig {
    /// Destination for magic packets. Usually the limited broadcast address
    /// or the directed broadcast of the target's subnet.
    pub broadcast: Ipv4Addr,
    /// Destination UDP port for magic packets.
    pub port: u16,
    /// Program used for ICMP echo probes.
    pub ping_program: String,
}

impl ControlConfig {
    pub fn wake_target(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.broadcast, self.port)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            broadcast: Ipv4Addr::BROADCAST,
            port: DEFAULT_WAKE_PORT,
            ping_program: "ping".into(),
        }
    }
}

/// Router tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Timeout handed to every `status` probe.
    pub probe_timeout: Duration,
    /// Overall bound on handling one message. `None` = unbounded.
    pub deadline: Option<Duration>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            deadline: None,
        }
    }
}
