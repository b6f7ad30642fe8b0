// wolbot-core: device registry, command router and Wake-on-LAN / ping adapters.

pub mod command;
pub mod config;
pub mod control;
pub mod error;
pub mod model;
pub mod router;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, Outcome};
pub use config::{ControlConfig, RouterConfig};
pub use control::{DeviceControl, NetworkControl, ProbeResult};
pub use error::CoreError;
pub use router::CommandRouter;
pub use store::Registry;

pub use model::{
    AddressError, DeviceRecord, MacAddress, RegistrationState, normalize_mac, parse_ipv4,
    short_user_id, validate_ipv4, validate_mac,
};
