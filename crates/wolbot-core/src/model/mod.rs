// ── Domain model ──
//
// Canonical address types and the persisted device record.

pub mod address;
pub mod device;

pub use address::{
    AddressError, MAC_OCTETS, MacAddress, normalize_mac, parse_ipv4, validate_ipv4, validate_mac,
};
pub use device::{DeviceRecord, RegistrationState, short_user_id};
