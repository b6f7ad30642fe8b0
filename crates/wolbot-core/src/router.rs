// ── Command router ──
//
// Registration state is derived from the stored record:
//   no record        -> Unregistered
//   record, no ip    -> MacOnly
//   record with ip   -> Provisioned
//
// Every path ends in an `Outcome`. Storage failures are logged and become
// `Outcome::Failed`; adapter failures already degrade inside the adapter.

use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::command::{Command, Outcome};
use crate::config::RouterConfig;
use crate::control::{DeviceControl, ProbeResult};
use crate::error::CoreError;
use crate::model::{DeviceRecord, MacAddress, RegistrationState, parse_ipv4, short_user_id};
use crate::store::Registry;

/// Turns inbound chat text into registry updates and device actions.
///
/// Generic over [`DeviceControl`] so the network side can be replaced.
pub struct CommandRouter<C> {
    registry: Arc<Registry>,
    control: C,
    config: RouterConfig,
}

impl<C: DeviceControl> CommandRouter<C> {
    pub fn new(registry: Arc<Registry>, control: C, config: RouterConfig) -> Self {
        Self {
            registry,
            control,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Handle one message from `user_id`, bounded by the configured
    /// deadline if there is one.
    pub async fn handle(&self, user_id: &str, text: &str) -> Outcome {
        self.dispatch(user_id, Command::classify(text)).await
    }

    /// Handle one message with an explicit deadline on the device action.
    ///
    /// On expiry `poweron` reports `success = false` and `status` reports
    /// the host as not alive. Registry writes are never cut short: only
    /// the wake and probe calls are bounded.
    pub async fn handle_with_deadline(
        &self,
        user_id: &str,
        text: &str,
        deadline: Duration,
    ) -> Outcome {
        self.run(user_id, Command::classify(text), Some(deadline))
            .await
    }

    /// Map an already classified command to its handler.
    pub async fn dispatch(&self, user_id: &str, command: Command) -> Outcome {
        self.run(user_id, command, self.config.deadline).await
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn run(&self, user_id: &str, command: Command, deadline: Option<Duration>) -> Outcome {
        let user = short_user_id(user_id);
        let name = command.name();

        let outcome = match command {
            Command::RegisterMac(token) => self.register_mac(user_id, &token).await,
            Command::RegisterIp(token) => self.register_ip(user_id, &token).await,
            Command::PowerOn => self.power_on(user_id, deadline).await,
            Command::Status => self.status(user_id, deadline).await,
            Command::Help => Outcome::HelpRequested,
            Command::Ignored => Outcome::Ignored,
        };

        if outcome.produces_reply() {
            info!(user, command = name, outcome = outcome.kind(), "handled message");
        } else {
            debug!(user, "ignored unrecognized message");
        }
        outcome
    }

    async fn register_mac(&self, user_id: &str, token: &str) -> Outcome {
        let Ok(mac) = MacAddress::parse(token) else {
            debug!(user = short_user_id(user_id), token, "rejected MAC address");
            return Outcome::InvalidMac;
        };

        match self.registry.upsert_mac(user_id, mac).await {
            Ok(record) => {
                let Some(mac) = record.mac else {
                    return Outcome::Failed;
                };
                info!(user = short_user_id(user_id), %mac, "registered MAC");
                Outcome::MacRegistered { mac }
            }
            Err(err) => storage_failure(user_id, &err),
        }
    }

    async fn register_ip(&self, user_id: &str, token: &str) -> Outcome {
        let Ok(ip) = parse_ipv4(token) else {
            debug!(user = short_user_id(user_id), token, "rejected IPv4 address");
            return Outcome::InvalidIp;
        };

        match self.registry.set_ip(user_id, ip).await {
            Ok(true) => {
                info!(user = short_user_id(user_id), %ip, "registered IP");
                Outcome::IpRegistered { ip }
            }
            Ok(false) => Outcome::NotRegistered,
            Err(err) => storage_failure(user_id, &err),
        }
    }

    async fn power_on(&self, user_id: &str, deadline: Option<Duration>) -> Outcome {
        let Some(mac) = self.lookup(user_id).and_then(|record| record.mac) else {
            return Outcome::NotRegistered;
        };

        info!(user = short_user_id(user_id), %mac, "sending wake signal");
        let success = bounded(deadline, self.control.wake(&mac))
            .await
            .unwrap_or_else(|| {
                warn!(%mac, "wake signal exceeded deadline");
                false
            });
        Outcome::PowerOnResult { success }
    }

    async fn status(&self, user_id: &str, deadline: Option<Duration>) -> Outcome {
        let Some(record) = self.lookup(user_id).filter(|record| record.mac.is_some()) else {
            return Outcome::NotRegistered;
        };
        let Some(ip) = record.ip else {
            return Outcome::IpNotRegistered;
        };

        let result = self.probe(ip, deadline).await;
        Outcome::StatusResult {
            alive: result.alive,
            latency_millis: result.latency_millis,
            mac: record.mac,
            ip,
        }
    }

    async fn probe(&self, ip: Ipv4Addr, deadline: Option<Duration>) -> ProbeResult {
        debug!(%ip, timeout = ?self.config.probe_timeout, "probing host");
        bounded(deadline, self.control.probe(ip, self.config.probe_timeout))
            .await
            .unwrap_or_else(|| {
                warn!(%ip, "probe exceeded deadline");
                ProbeResult::unreachable()
            })
    }

    fn lookup(&self, user_id: &str) -> Option<DeviceRecord> {
        let record = self.registry.find(user_id);
        debug!(
            user = short_user_id(user_id),
            state = %RegistrationState::from(record.as_ref()),
            "looked up registration"
        );
        record
    }
}

/// Await `future`, giving up after `deadline`. `None` means it expired.
async fn bounded<F: Future>(deadline: Option<Duration>, future: F) -> Option<F::Output> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}

fn storage_failure(user_id: &str, err: &CoreError) -> Outcome {
    error!(user = short_user_id(user_id), error = %err, "device registry update failed");
    Outcome::Failed
}
