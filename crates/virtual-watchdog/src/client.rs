//! Per-client watchdog handle.

use crate::error::{VirtualWatchdogError, VirtualWatchdogResult};
use crate::registry::ClientId;
use crate::supervisor::SupervisorShared;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// One logical watchdog client.
///
/// A handle is created unstarted via
/// [`WatchdogSupervisor::client`](crate::WatchdogSupervisor::client).
/// Once started it must [`kick`](Self::kick) within its timeout on
/// every supervision cycle, or the shared hardware feed is withheld and
/// the device resets. Stopping (or dropping) the handle removes it from
/// supervision; the last client to stop releases the hardware watchdog.
pub struct VirtualWatchdog {
    shared: Arc<SupervisorShared>,
    name: String,
    timeout: Duration,
    budget_ticks: u32,
    id: Option<ClientId>,
}

impl VirtualWatchdog {
    pub(crate) fn new(
        shared: Arc<SupervisorShared>,
        name: String,
        timeout: Duration,
        budget_ticks: u32,
    ) -> Self {
        Self {
            shared,
            name,
            timeout,
            budget_ticks,
            id: None,
        }
    }

    /// Begin supervision with a full countdown budget.
    ///
    /// The first client to start arms the physical watchdog.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualWatchdogError::AlreadyStarted`] if called
    /// twice, or a hardware error if arming fails.
    pub fn start(&mut self) -> VirtualWatchdogResult<()> {
        if self.id.is_some() {
            return Err(VirtualWatchdogError::already_started(&self.name));
        }
        self.id = Some(self.shared.register(&self.name, self.budget_ticks)?);
        Ok(())
    }

    /// End supervision for this client.
    ///
    /// The last client to stop releases the physical watchdog.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualWatchdogError::NotStarted`] if the client is
    /// not currently started.
    pub fn stop(&mut self) -> VirtualWatchdogResult<()> {
        let id = self
            .id
            .take()
            .ok_or_else(|| VirtualWatchdogError::not_started(&self.name))?;
        self.shared.deregister(id)
    }

    /// Prove liveness: reset this client's countdown to its full
    /// budget. No-op while unstarted.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualWatchdogError::StaleClient`] if the registry no
    /// longer knows this client.
    pub fn kick(&mut self) -> VirtualWatchdogResult<()> {
        match self.id {
            Some(id) => self.shared.kick_client(id),
            None => Ok(()),
        }
    }

    /// Client name, used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nominal liveness timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Timeout expressed in whole supervision ticks.
    #[must_use]
    pub fn budget_ticks(&self) -> u32 {
        self.budget_ticks
    }

    /// Whether the client is currently under supervision.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for VirtualWatchdog {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            if let Err(error) = self.shared.deregister(id) {
                warn!(name = %self.name, %error, "failed to deregister client on drop");
            }
        }
    }
}

impl fmt::Debug for VirtualWatchdog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualWatchdog")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .field("budget_ticks", &self.budget_ticks)
            .field("started", &self.id.is_some())
            .finish()
    }
}
