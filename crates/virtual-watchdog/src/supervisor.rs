//! Watchdog supervisor: multiplexes many virtual clients onto one
//! hardware watchdog.
//!
//! The supervisor owns the hardware driver, the tick source, and the
//! client registry. On every tick it ages all client countdowns and
//! feeds the hardware only when every client has proven liveness within
//! its own timeout. A single stalled client therefore starves the
//! hardware countdown until the device resets, which is the entire
//! point of running a watchdog.
//!
//! The physical watchdog is armed when the first client starts and
//! released when the last client stops. Per-client timeouts never
//! reconfigure the hardware; they only size each client's tick budget.

use crate::client::VirtualWatchdog;
use crate::config::SupervisorConfig;
use crate::error::{VirtualWatchdogError, VirtualWatchdogResult};
use crate::registry::{ClientId, Registry};
use crate::ticker::TickSource;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};
use virtual_watchdog_hardware::{HardwareWatchdog, HardwareWatchdogError};

/// Snapshot of supervisor counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorStats {
    /// Supervision ticks processed while at least one client was
    /// registered.
    pub ticks: u64,
    /// Ticks on which the hardware watchdog was fed.
    pub feeds: u64,
    /// Ticks on which at least one client was starved, so the feed was
    /// withheld.
    pub starved_ticks: u64,
    /// Currently registered clients.
    pub active_clients: usize,
    /// Whether the hardware watchdog is currently armed.
    pub armed: bool,
    /// Whether the most recent tick withheld the feed.
    pub starving: bool,
}

pub(crate) struct SupervisorShared {
    config: SupervisorConfig,
    hardware: Mutex<Box<dyn HardwareWatchdog>>,
    ticker: Mutex<Box<dyn TickSource>>,
    registry: Mutex<Registry>,
    /// Serializes arm/disarm decisions. Holds `true` while the hardware
    /// is armed and the ticker attached. Never acquired by the tick
    /// path, so detaching (which joins the tick thread) cannot deadlock.
    lifecycle: Mutex<bool>,
    starving: AtomicBool,
    ticks: AtomicU64,
    feeds: AtomicU64,
    starved_ticks: AtomicU64,
}

impl SupervisorShared {
    /// One supervision tick: age every countdown, then feed the
    /// hardware only if nobody starved.
    ///
    /// The hardware is kicked outside the registry lock so a slow
    /// driver never blocks client registration or kicks.
    fn tick(&self) {
        let report = {
            let mut registry = self.registry.lock();
            if registry.is_empty() {
                return;
            }
            registry.age_all()
        };

        self.ticks.fetch_add(1, Ordering::Relaxed);

        if report.all_alive() {
            let kicked = {
                let mut hardware = self.hardware.lock();
                hardware.kick()
            };
            match kicked {
                Ok(()) => {
                    self.feeds.fetch_add(1, Ordering::Relaxed);
                    if self.starving.swap(false, Ordering::Relaxed) {
                        info!(active = report.active, "all clients alive again, feeding resumed");
                    }
                }
                Err(error) => {
                    warn!(%error, "hardware kick failed");
                }
            }
        } else {
            self.starved_ticks.fetch_add(1, Ordering::Relaxed);
            if !self.starving.swap(true, Ordering::Relaxed) {
                warn!(
                    active = report.active,
                    starved = report.starved,
                    "client starved, withholding hardware feed"
                );
            }
        }
    }

    pub(crate) fn kick_client(&self, id: ClientId) -> VirtualWatchdogResult<()> {
        self.registry.lock().kick(id)
    }

    /// Register a client and arm the hardware if it is the first one.
    pub(crate) fn register(
        self: &Arc<Self>,
        name: &str,
        budget_ticks: u32,
    ) -> VirtualWatchdogResult<ClientId> {
        let mut armed = self.lifecycle.lock();
        let id = self.registry.lock().insert(name, budget_ticks);

        if !*armed {
            if let Err(error) = self.arm() {
                // Roll back so a failed first start leaves no ghost
                // client holding the feed hostage.
                let _ = self.registry.lock().remove(id);
                return Err(error);
            }
            *armed = true;
        }

        debug!(name, budget_ticks, "client registered");
        Ok(id)
    }

    /// Deregister a client and release the hardware if it was the last
    /// one.
    pub(crate) fn deregister(self: &Arc<Self>, id: ClientId) -> VirtualWatchdogResult<()> {
        let mut armed = self.lifecycle.lock();
        let now_empty = {
            let mut registry = self.registry.lock();
            registry.remove(id)?;
            registry.is_empty()
        };

        if now_empty && *armed {
            // Clear the armed flag before touching the hardware so a
            // failed teardown cannot wedge the supervisor into a state
            // where the next first start() skips arming.
            *armed = false;
            self.starving.store(false, Ordering::Relaxed);
            self.disarm()?;
        }

        debug!("client deregistered");
        Ok(())
    }

    /// Start the hardware countdown and attach the tick source.
    ///
    /// Caller holds the lifecycle lock.
    fn arm(self: &Arc<Self>) -> VirtualWatchdogResult<()> {
        self.hardware.lock().start(self.config.hardware_timeout_ms)?;

        let weak: Weak<Self> = Arc::downgrade(self);
        let attach = self.ticker.lock().attach(
            self.config.tick_period,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.tick();
                }
            }),
        );
        if let Err(error) = attach {
            let _ = self.hardware.lock().stop();
            return Err(error);
        }

        info!(
            hardware_timeout_ms = self.config.hardware_timeout_ms,
            tick_period_ms = self.config.tick_period_ms(),
            "hardware watchdog armed"
        );
        Ok(())
    }

    /// Detach the tick source, then stop the hardware countdown.
    ///
    /// Caller holds the lifecycle lock but must not hold the registry
    /// lock, since detaching joins the tick thread which takes it.
    fn disarm(&self) -> VirtualWatchdogResult<()> {
        self.ticker.lock().detach()?;
        // A countdown that already lapsed or stopped on its own still
        // counts as released.
        match self.hardware.lock().stop() {
            Ok(())
            | Err(HardwareWatchdogError::NotRunning | HardwareWatchdogError::Expired) => {}
            Err(error) => return Err(error.into()),
        }
        info!("hardware watchdog released");
        Ok(())
    }
}

/// Shared supervisor handle.
///
/// Cheap to clone; all clones drive the same hardware watchdog,
/// registry, and tick source.
#[derive(Clone)]
pub struct WatchdogSupervisor {
    shared: Arc<SupervisorShared>,
}

impl WatchdogSupervisor {
    /// Create a supervisor over the given hardware driver and tick
    /// source. Nothing is armed until the first client starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the hardware
    /// cannot honor the configured arming timeout.
    pub fn new(
        config: SupervisorConfig,
        hardware: Box<dyn HardwareWatchdog>,
        ticker: Box<dyn TickSource>,
    ) -> VirtualWatchdogResult<Self> {
        config.validate()?;
        if !hardware.supports_timeout(config.hardware_timeout_ms) {
            return Err(VirtualWatchdogError::timeout_out_of_range(
                config.hardware_timeout_ms,
                hardware.min_timeout_ms(),
                hardware.max_timeout_ms(),
            ));
        }

        Ok(Self {
            shared: Arc::new(SupervisorShared {
                config,
                hardware: Mutex::new(hardware),
                ticker: Mutex::new(ticker),
                registry: Mutex::new(Registry::new()),
                lifecycle: Mutex::new(false),
                starving: AtomicBool::new(false),
                ticks: AtomicU64::new(0),
                feeds: AtomicU64::new(0),
                starved_ticks: AtomicU64::new(0),
            }),
        })
    }

    /// Create an unstarted client handle with the given liveness
    /// timeout.
    ///
    /// The timeout is rounded up to a whole number of supervision
    /// ticks, so the client may observe up to one extra tick period of
    /// grace before it starves the feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout falls outside the hardware range
    /// or below one tick period.
    pub fn client(
        &self,
        timeout: Duration,
        name: impl Into<String>,
    ) -> VirtualWatchdogResult<VirtualWatchdog> {
        let name = name.into();
        let (min_ms, max_ms) = {
            let hardware = self.shared.hardware.lock();
            (hardware.min_timeout_ms(), hardware.max_timeout_ms())
        };
        // Durations beyond u32 milliseconds are out of range for every
        // hardware watchdog, not clamped into one.
        let timeout_ms = match u32::try_from(timeout.as_millis()) {
            Ok(ms) if (min_ms..=max_ms).contains(&ms) => ms,
            Ok(ms) => {
                return Err(VirtualWatchdogError::timeout_out_of_range(ms, min_ms, max_ms));
            }
            Err(_) => {
                return Err(VirtualWatchdogError::timeout_out_of_range(
                    u32::MAX,
                    min_ms,
                    max_ms,
                ));
            }
        };
        let tick_period_ms = self.shared.config.tick_period_ms();
        if u64::from(timeout_ms) < tick_period_ms {
            return Err(VirtualWatchdogError::TimeoutBelowTickPeriod {
                requested_ms: timeout_ms,
                tick_period_ms,
            });
        }

        let budget_ticks = self.shared.config.ticks_for_timeout(timeout_ms);
        Ok(VirtualWatchdog::new(
            Arc::clone(&self.shared),
            name,
            timeout,
            budget_ticks,
        ))
    }

    /// Supervisor configuration.
    #[must_use]
    pub fn config(&self) -> &SupervisorConfig {
        &self.shared.config
    }

    /// Whether the hardware watchdog is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        *self.shared.lifecycle.lock()
    }

    /// Number of currently registered clients.
    #[must_use]
    pub fn active_clients(&self) -> usize {
        self.shared.registry.lock().len()
    }

    /// Snapshot of the supervision counters.
    #[must_use]
    pub fn stats(&self) -> SupervisorStats {
        SupervisorStats {
            ticks: self.shared.ticks.load(Ordering::Relaxed),
            feeds: self.shared.feeds.load(Ordering::Relaxed),
            starved_ticks: self.shared.starved_ticks.load(Ordering::Relaxed),
            active_clients: self.active_clients(),
            armed: self.is_armed(),
            starving: self.shared.starving.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for WatchdogSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchdogSupervisor")
            .field("config", &self.shared.config)
            .field("armed", &self.is_armed())
            .field("active_clients", &self.active_clients())
            .finish_non_exhaustive()
    }
}
