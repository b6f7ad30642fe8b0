// ── Registry ──
//
// Single owner of all device records. Writers are serialized by one async
// mutex around the copy -> mutate -> persist -> publish cycle; readers load
// the last published snapshot without locking.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::persist;
use crate::error::CoreError;
use crate::model::{DeviceRecord, MacAddress};

/// Result of a mutation closure: whether the collection must be flushed.
enum Change<T> {
    Applied(T),
    Unchanged(T),
}

/// Durable map from user identity to [`DeviceRecord`].
///
/// Callers always receive owned copies. A write becomes visible to readers
/// only after it has reached disk, so a failed flush leaves memory and
/// file at the previous state.
pub struct Registry {
    path: PathBuf,
    snapshot: ArcSwap<Vec<DeviceRecord>>,
    write_lock: Mutex<()>,
}

impl Registry {
    /// Load the collection at `path`.
    ///
    /// A missing file is initialized to an empty collection and persisted
    /// immediately. An unreadable or unparsable file is an error: it is
    /// never silently replaced.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();

        let records = if let Some(records) = persist::load(&path).await? {
            records
        } else {
            persist::store(&path, &[]).await?;
            info!(path = %path.display(), "initialized empty device registry");
            Vec::new()
        };

        debug!(path = %path.display(), records = records.len(), "device registry loaded");

        Ok(Self {
            path,
            snapshot: ArcSwap::from_pointee(records),
            write_lock: Mutex::new(()),
        })
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The record for `user_id`, if one exists.
    pub fn find(&self, user_id: &str) -> Option<DeviceRecord> {
        self.snapshot
            .load()
            .iter()
            .find(|record| record.user_id == user_id)
            .cloned()
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<DeviceRecord> {
        Vec::clone(&self.snapshot.load())
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Register `mac` for `user_id`, creating the record on first use.
    ///
    /// An existing IP is preserved. `updated_at` is always refreshed.
    pub async fn upsert_mac(
        &self,
        user_id: &str,
        mac: MacAddress,
    ) -> Result<DeviceRecord, CoreError> {
        self.mutate(|records| {
            let now = Utc::now();
            let record = if let Some(existing) = records.iter_mut().find(|r| r.user_id == user_id) {
                existing.mac = Some(mac);
                existing.touch(now);
                existing.clone()
            } else {
                let created = DeviceRecord::new(user_id, mac, now);
                records.push(created.clone());
                created
            };
            Change::Applied(record)
        })
        .await
    }

    /// Set the IP of an existing record.
    ///
    /// Returns `false` without touching anything when `user_id` has no
    /// record: an IP can only follow a MAC registration.
    pub async fn set_ip(&self, user_id: &str, ip: Ipv4Addr) -> Result<bool, CoreError> {
        self.mutate(|records| {
            match records.iter_mut().find(|r| r.user_id == user_id) {
                Some(existing) => {
                    existing.ip = Some(ip);
                    existing.touch(Utc::now());
                    Change::Applied(true)
                }
                None => Change::Unchanged(false),
            }
        })
        .await
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn mutate<T, F>(&self, operation: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Vec<DeviceRecord>) -> Change<T>,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = Vec::clone(&self.snapshot.load());

        match operation(&mut records) {
            Change::Unchanged(value) => Ok(value),
            Change::Applied(value) => {
                persist::store(&self.path, &records).await?;
                self.snapshot.store(Arc::new(records));
                Ok(value)
            }
        }
    }
}
