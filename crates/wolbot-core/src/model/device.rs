// ── Device record ──
//
// One record per chat identity. The registration state is derived from
// which addresses are present, never stored separately.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::MacAddress;

/// Persisted association between a user identity and the machine it controls.
///
/// Serialized with camelCase keys (`userId`, `createdAt`, ...). The upper-case
/// `MAC` / `IP` keys of older data files are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub user_id: String,
    #[serde(default, alias = "MAC")]
    pub mac: Option<MacAddress>,
    #[serde(default, alias = "IP", with = "dotted_quad")]
    pub ip: Option<Ipv4Addr>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeviceRecord {
    /// A fresh record for a first MAC registration. No IP yet.
    pub fn new(user_id: impl Into<String>, mac: MacAddress, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            mac: Some(mac),
            ip: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }

    pub fn state(&self) -> RegistrationState {
        match (&self.mac, &self.ip) {
            (None, _) => RegistrationState::Unregistered,
            (Some(_), None) => RegistrationState::MacOnly,
            (Some(_), Some(_)) => RegistrationState::Provisioned,
        }
    }
}

/// Registration progress of a user, derived from their record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RegistrationState {
    Unregistered,
    MacOnly,
    Provisioned,
}

impl From<Option<&DeviceRecord>> for RegistrationState {
    fn from(record: Option<&DeviceRecord>) -> Self {
        record.map_or(Self::Unregistered, DeviceRecord::state)
    }
}

/// First ten characters of a user id, for log lines.
pub fn short_user_id(user_id: &str) -> &str {
    user_id
        .char_indices()
        .nth(10)
        .map_or(user_id, |(idx, _)| &user_id[..idx])
}

/// Dotted-quad (de)serialization that tolerates leading zeros on read.
mod dotted_quad {
    use std::net::Ipv4Addr;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::model::address::parse_ipv4;

    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S: Serializer>(
        ip: &Option<Ipv4Addr>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ip {
            Some(ip) => serializer.collect_str(ip),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Ipv4Addr>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse_ipv4(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
