// ── Address validation and canonical address types ──
//
// MacAddress and the IPv4 helpers are the only way user-typed addresses
// enter the system. Everything downstream holds validated, canonical values.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of octets in an EUI-48 hardware address.
pub const MAC_OCTETS: usize = 6;

/// Rejected address input. Carries the offending text for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid MAC address: {0:?}")]
    InvalidMac(String),

    #[error("invalid IPv4 address: {0:?}")]
    InvalidIpv4(String),
}

// ── Validators ──────────────────────────────────────────────────────

/// Six 2-hex-digit groups, separated uniformly by `:` or `-`.
///
/// Hex digits are accepted in either case. Mixed separators, bare hex and
/// any other group count are rejected.
pub fn validate_mac(text: &str) -> bool {
    let separator = if text.contains(':') { ':' } else { '-' };

    let mut groups = 0;
    for group in text.split(separator) {
        if group.len() != 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }
        groups += 1;
    }
    groups == MAC_OCTETS
}

/// Four dot-separated decimal octets, each in `0..=255`.
///
/// Leading zeros are tolerated (`010.0.0.1` is valid); only the decimal
/// value range is checked.
pub fn validate_ipv4(text: &str) -> bool {
    parse_ipv4(text).is_ok()
}

/// Lower-case a MAC and rewrite `-` separators to `:`.
///
/// Only meaningful for input that already passed [`validate_mac`].
pub fn normalize_mac(text: &str) -> String {
    text.to_ascii_lowercase().replace('-', ":")
}

/// Parse dotted-quad text into an [`Ipv4Addr`], accepting leading zeros.
///
/// Each octet is one to three decimal digits. `std`'s parser rejects
/// `010.0.0.1`, so it is not used here.
pub fn parse_ipv4(text: &str) -> Result<Ipv4Addr, AddressError> {
    let invalid = || AddressError::InvalidIpv4(text.to_owned());

    let mut octets = [0u8; 4];
    let mut parts = text.split('.');
    for slot in &mut octets {
        let part = parts.next().ok_or_else(invalid)?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse::<u8>().map_err(|_| invalid())?;
    }

    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(Ipv4Addr::from(octets))
}

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address in canonical form (`aa:bb:cc:dd:ee:ff`).
///
/// Only constructible from validated input, so every instance is canonical.
/// Deserialization trusts the stored value: normalization happens once, at
/// write time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Validate and normalize a colon- or dash-separated MAC.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if validate_mac(raw) {
            Ok(Self(normalize_mac(raw)))
        } else {
            Err(AddressError::InvalidMac(raw.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six raw octets, for building link-layer frames.
    pub fn octets(&self) -> [u8; MAC_OCTETS] {
        let mut octets = [0u8; MAC_OCTETS];
        for (slot, group) in octets.iter_mut().zip(self.0.split(':')) {
            *slot = u8::from_str_radix(group, 16).unwrap_or_default();
        }
        octets
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_colon_and_dash_separators() {
        assert!(validate_mac("00:11:22:33:44:55"));
        assert!(validate_mac("00-11-22-33-44-55"));
        assert!(validate_mac("aA:bB:cC:dD:eE:fF"));
    }

    #[test]
    fn rejects_malformed_macs() {
        for bad in [
            "",
            "00:11:22:33:44",
            "00:11:22:33:44:55:66",
            "00:11-22:33:44:55",
            "001122334455",
            "0:11:22:33:44:55",
            "000:11:22:33:44:55",
            "gg:11:22:33:44:55",
            "00:11:22:33:44:55 ",
            "not-a-mac",
        ] {
            assert!(!validate_mac(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn normalized_dash_mac_is_canonical_and_still_valid() {
        for raw in ["AA-BB-CC-DD-EE-FF", "0a-1B-2c-3D-4e-5F", "00-00-00-00-00-00"] {
            let normalized = normalize_mac(raw);
            assert!(!normalized.contains('-'));
            assert_eq!(normalized, normalized.to_lowercase());
            assert_eq!(normalized.replace(':', ""), raw.replace('-', "").to_lowercase());
            assert!(validate_mac(&normalized));
        }
    }

    #[test]
    fn mac_address_parse_normalizes() {
        let mac = MacAddress::parse("AA-BB-CC-DD-EE-FF").unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(mac.octets(), [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    }

    #[test]
    fn mac_address_from_str_rejects_garbage() {
        let err = "not-a-mac".parse::<MacAddress>().unwrap_err();
        assert_eq!(err, AddressError::InvalidMac("not-a-mac".into()));
    }

    #[test]
    fn ipv4_components_stay_in_range() {
        for good in ["0.0.0.0", "10.0.0.5", "192.168.1.100", "255.255.255.255"] {
            let ip = parse_ipv4(good).unwrap();
            assert_eq!(ip.to_string(), good);
        }
    }

    #[test]
    fn ipv4_tolerates_leading_zeros() {
        assert_eq!(parse_ipv4("010.000.00.1").unwrap(), Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    fn ipv4_rejects_bad_arity_and_range() {
        for bad in [
            "",
            "10.0.0",
            "10.0.0.5.6",
            "256.0.0.1",
            "10.0.0.999",
            "10..0.1",
            "10.0.0.-1",
            "10.0.0.1 ",
            "0010.0.0.1",
            "a.b.c.d",
        ] {
            assert!(!validate_ipv4(bad), "{bad:?} should be rejected");
        }
    }
}
