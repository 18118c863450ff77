//! Software watchdog implementation.
//!
//! `SoftwareWatchdog` implements [`HardwareWatchdog`] against wall-clock
//! time, for testing and hardware-free environments. It expires lazily:
//! the run state flips to `Expired` the next time anyone observes it
//! after the armed timeout has elapsed without a kick.
//!
//! The paired [`WatchdogProbe`] shares the same counters, so a test can
//! keep observing starts, kicks, and expiries after the watchdog itself
//! has been boxed behind the trait and handed to a supervisor.

use crate::config::SoftwareWatchdogConfig;
use crate::error::{HardwareWatchdogError, HardwareWatchdogResult};
use crate::state::{HardwareStatus, RunState};
use crate::watchdog::HardwareWatchdog;
use portable_atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
struct Shared {
    state: RunState,
    origin: Instant,
    armed_timeout_ms: AtomicU32,
    last_kick_us: AtomicU64,
    stop_count: AtomicU32,
}

impl Shared {
    fn elapsed_us(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// Flip to `Expired` if the countdown has lapsed. Called lazily from
    /// every observation point.
    fn poll(&self) {
        if self.state.status() != HardwareStatus::Running {
            return;
        }
        let last_kick = self.last_kick_us.load(Ordering::Acquire);
        let timeout_us = u64::from(self.armed_timeout_ms.load(Ordering::Acquire)) * 1000;
        if self.elapsed_us().saturating_sub(last_kick) > timeout_us {
            // Racing observers may both see the lapse; only one CAS wins.
            let _ = self.state.expire();
        }
    }
}

/// Software-based watchdog for testing and hardware-free environments.
///
/// # Example
///
/// ```rust
/// use virtual_watchdog_hardware::{HardwareWatchdog, SoftwareWatchdog};
///
/// let mut watchdog = SoftwareWatchdog::with_default_range();
/// let probe = watchdog.probe();
///
/// watchdog.start(1000).expect("start failed");
/// watchdog.kick().expect("kick failed");
/// assert!(watchdog.is_running());
/// assert_eq!(probe.kick_count(), 1);
/// ```
#[derive(Debug)]
pub struct SoftwareWatchdog {
    config: SoftwareWatchdogConfig,
    shared: Arc<Shared>,
}

impl SoftwareWatchdog {
    /// Create a software watchdog advertising the configured range.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SoftwareWatchdogConfig) -> HardwareWatchdogResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            shared: Arc::new(Shared {
                state: RunState::new(),
                origin: Instant::now(),
                armed_timeout_ms: AtomicU32::new(0),
                last_kick_us: AtomicU64::new(0),
                stop_count: AtomicU32::new(0),
            }),
        })
    }

    /// Create a software watchdog with an explicit supported range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty or starts at zero.
    pub fn with_range(min_timeout_ms: u32, max_timeout_ms: u32) -> HardwareWatchdogResult<Self> {
        Self::new(SoftwareWatchdogConfig::new(min_timeout_ms, max_timeout_ms)?)
    }

    /// Create a software watchdog with the default supported range.
    #[must_use]
    pub fn with_default_range() -> Self {
        Self {
            config: SoftwareWatchdogConfig::default(),
            shared: Arc::new(Shared {
                state: RunState::new(),
                origin: Instant::now(),
                armed_timeout_ms: AtomicU32::new(0),
                last_kick_us: AtomicU64::new(0),
                stop_count: AtomicU32::new(0),
            }),
        }
    }

    /// Get a probe sharing this watchdog's state and counters.
    #[must_use]
    pub fn probe(&self) -> WatchdogProbe {
        WatchdogProbe {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Time since the last kick, or `None` if never armed.
    #[must_use]
    pub fn time_since_last_kick_us(&self) -> Option<u64> {
        if self.shared.armed_timeout_ms.load(Ordering::Acquire) == 0 {
            return None;
        }
        let last_kick = self.shared.last_kick_us.load(Ordering::Acquire);
        Some(self.shared.elapsed_us().saturating_sub(last_kick))
    }

    /// Force an immediate expiry, for exercising lapse handling.
    ///
    /// # Errors
    ///
    /// Returns an error if the watchdog is not running.
    pub fn expire_now(&self) -> HardwareWatchdogResult<()> {
        self.shared.state.expire()
    }

    /// Reset a stopped or expired watchdog so it can be started again.
    pub fn reset(&mut self) {
        self.shared.state.reset();
        self.shared.last_kick_us.store(0, Ordering::Release);
        self.shared.armed_timeout_ms.store(0, Ordering::Release);
    }
}

impl HardwareWatchdog for SoftwareWatchdog {
    fn start(&mut self, timeout_ms: u32) -> HardwareWatchdogResult<()> {
        if !self.supports_timeout(timeout_ms) {
            return Err(HardwareWatchdogError::timeout_out_of_range(
                timeout_ms,
                self.config.min_timeout_ms,
                self.config.max_timeout_ms,
            ));
        }
        self.shared.state.start()?;
        self.shared
            .armed_timeout_ms
            .store(timeout_ms, Ordering::Release);
        self.shared
            .last_kick_us
            .store(self.shared.elapsed_us(), Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> HardwareWatchdogResult<()> {
        self.shared.state.stop()?;
        self.shared.stop_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn kick(&mut self) -> HardwareWatchdogResult<()> {
        self.shared.poll();
        self.shared.state.kick()?;
        self.shared
            .last_kick_us
            .store(self.shared.elapsed_us(), Ordering::Release);
        Ok(())
    }

    fn min_timeout_ms(&self) -> u32 {
        self.config.min_timeout_ms
    }

    fn max_timeout_ms(&self) -> u32 {
        self.config.max_timeout_ms
    }

    fn status(&self) -> HardwareStatus {
        self.shared.poll();
        self.shared.state.status()
    }
}

impl Default for SoftwareWatchdog {
    fn default() -> Self {
        Self::with_default_range()
    }
}

/// Read-only observer over a [`SoftwareWatchdog`]'s shared state.
///
/// Cheap to clone; remains valid after the watchdog is boxed behind
/// [`HardwareWatchdog`] and moved elsewhere.
#[derive(Debug, Clone)]
pub struct WatchdogProbe {
    shared: Arc<Shared>,
}

impl WatchdogProbe {
    /// Current run status (polls for expiry first).
    #[must_use]
    pub fn status(&self) -> HardwareStatus {
        self.shared.poll();
        self.shared.state.status()
    }

    /// Number of successful starts.
    #[must_use]
    pub fn start_count(&self) -> u32 {
        self.shared.state.start_count()
    }

    /// Number of successful kicks.
    #[must_use]
    pub fn kick_count(&self) -> u32 {
        self.shared.state.kick_count()
    }

    /// Number of expiries.
    #[must_use]
    pub fn expire_count(&self) -> u32 {
        self.shared.poll();
        self.shared.state.expire_count()
    }

    /// Number of successful stops.
    #[must_use]
    pub fn stop_count(&self) -> u32 {
        self.shared.stop_count.load(Ordering::Acquire)
    }

    /// Timeout the watchdog was last armed with, or `None` if never armed.
    #[must_use]
    pub fn armed_timeout_ms(&self) -> Option<u32> {
        match self.shared.armed_timeout_ms.load(Ordering::Acquire) {
            0 => None,
            ms => Some(ms),
        }
    }
}
