//! Atomic run-state machine shared by hardware watchdog implementations.
//!
//! All transitions are lock-free compare-and-swap operations, so the state
//! can be read from any context without blocking.

use crate::error::{HardwareWatchdogError, HardwareWatchdogResult};
use portable_atomic::{AtomicU32, Ordering};

/// Operational status of a hardware watchdog.
///
/// ```text
/// Stopped ──start()──► Running ──(no kick in time)──► Expired
///     ▲                   │                              │
///     └──────stop()───────┴────────────stop()───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum HardwareStatus {
    /// Watchdog is not running (device will not reset).
    #[default]
    Stopped = 0,
    /// Watchdog is running and must be kicked before its timeout.
    Running = 1,
    /// Watchdog went unfed past its timeout; reset is imminent.
    Expired = 2,
}

impl HardwareStatus {
    /// Convert from a raw `u32` value.
    #[must_use]
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Stopped),
            1 => Some(Self::Running),
            2 => Some(Self::Expired),
            _ => None,
        }
    }

    /// Convert to a raw `u32` value.
    #[must_use]
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Check whether the watchdog is actively counting down.
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Get the status as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Running => "Running",
            Self::Expired => "Expired",
        }
    }
}

impl core::fmt::Display for HardwareStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Atomic state machine tracking a watchdog's run status plus lifetime counters.
///
/// Implementations of [`crate::HardwareWatchdog`] embed this to get
/// consistent transition rules: a watchdog can only be started once,
/// only kicked while running, and only stopped while running.
#[derive(Debug)]
pub struct RunState {
    status: AtomicU32,
    start_count: AtomicU32,
    kick_count: AtomicU32,
    expire_count: AtomicU32,
}

impl RunState {
    /// Create a new state machine in the `Stopped` status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: AtomicU32::new(HardwareStatus::Stopped.to_raw()),
            start_count: AtomicU32::new(0),
            kick_count: AtomicU32::new(0),
            expire_count: AtomicU32::new(0),
        }
    }

    /// Get the current status.
    #[must_use]
    pub fn status(&self) -> HardwareStatus {
        let raw = self.status.load(Ordering::Acquire);
        HardwareStatus::from_raw(raw).unwrap_or(HardwareStatus::Stopped)
    }

    /// Transition from `Stopped` to `Running`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareWatchdogError::AlreadyRunning`] if already running,
    /// or an invalid-transition error from any other state.
    pub fn start(&self) -> HardwareWatchdogResult<()> {
        let previous = self.status.compare_exchange(
            HardwareStatus::Stopped.to_raw(),
            HardwareStatus::Running.to_raw(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );

        match previous {
            Ok(_) => {
                self.start_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(current) if current == HardwareStatus::Running.to_raw() => {
                Err(HardwareWatchdogError::AlreadyRunning)
            }
            Err(current) => {
                let current_status =
                    HardwareStatus::from_raw(current).unwrap_or(HardwareStatus::Stopped);
                Err(HardwareWatchdogError::invalid_transition(
                    current_status.as_str(),
                    "Running",
                ))
            }
        }
    }

    /// Transition from `Running` or `Expired` to `Stopped`.
    ///
    /// Stopping a lapsed watchdog clears the expired latch; teardown
    /// must be able to release the countdown even after it has gone
    /// unfed.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareWatchdogError::NotRunning`] if already stopped.
    pub fn stop(&self) -> HardwareWatchdogResult<()> {
        let from_running = self.status.compare_exchange(
            HardwareStatus::Running.to_raw(),
            HardwareStatus::Stopped.to_raw(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if from_running.is_ok() {
            return Ok(());
        }

        let from_expired = self.status.compare_exchange(
            HardwareStatus::Expired.to_raw(),
            HardwareStatus::Stopped.to_raw(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        match from_expired {
            Ok(_) => Ok(()),
            Err(_) => Err(HardwareWatchdogError::NotRunning),
        }
    }

    /// Record a kick (`Running` state only).
    ///
    /// # Errors
    ///
    /// Returns [`HardwareWatchdogError::NotRunning`] when stopped and
    /// [`HardwareWatchdogError::Expired`] after expiry.
    pub fn kick(&self) -> HardwareWatchdogResult<()> {
        match self.status() {
            HardwareStatus::Running => {
                self.kick_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            HardwareStatus::Expired => Err(HardwareWatchdogError::Expired),
            HardwareStatus::Stopped => Err(HardwareWatchdogError::NotRunning),
        }
    }

    /// Transition from `Running` to `Expired`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-transition error unless currently running.
    pub fn expire(&self) -> HardwareWatchdogResult<()> {
        let previous = self.status.compare_exchange(
            HardwareStatus::Running.to_raw(),
            HardwareStatus::Expired.to_raw(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );

        match previous {
            Ok(_) => {
                self.expire_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(current) => {
                let current_status =
                    HardwareStatus::from_raw(current).unwrap_or(HardwareStatus::Stopped);
                Err(HardwareWatchdogError::invalid_transition(
                    current_status.as_str(),
                    "Expired",
                ))
            }
        }
    }

    /// Reset to `Stopped`, clearing expiry. Counters are preserved.
    pub fn reset(&self) {
        self.status
            .store(HardwareStatus::Stopped.to_raw(), Ordering::Release);
    }

    /// Number of successful starts.
    #[must_use]
    pub fn start_count(&self) -> u32 {
        self.start_count.load(Ordering::Acquire)
    }

    /// Number of successful kicks.
    #[must_use]
    pub fn kick_count(&self) -> u32 {
        self.kick_count.load(Ordering::Acquire)
    }

    /// Number of expiries.
    #[must_use]
    pub fn expire_count(&self) -> u32 {
        self.expire_count.load(Ordering::Acquire)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_stopped() {
        let state = RunState::new();
        assert_eq!(state.status(), HardwareStatus::Stopped);
        assert!(!state.status().is_running());
    }

    #[test]
    fn test_start_stop_cycle() {
        let state = RunState::new();
        state.start().expect("start should succeed");
        assert_eq!(state.status(), HardwareStatus::Running);

        state.stop().expect("stop should succeed");
        assert_eq!(state.status(), HardwareStatus::Stopped);
        assert_eq!(state.start_count(), 1);
    }

    #[test]
    fn test_start_twice_fails() {
        let state = RunState::new();
        state.start().expect("start should succeed");

        let result = state.start();
        assert!(matches!(result, Err(HardwareWatchdogError::AlreadyRunning)));
    }

    #[test]
    fn test_stop_when_stopped_fails() {
        let state = RunState::new();
        let result = state.stop();
        assert!(matches!(result, Err(HardwareWatchdogError::NotRunning)));
    }

    #[test]
    fn test_kick_only_while_running() {
        let state = RunState::new();
        assert!(matches!(
            state.kick(),
            Err(HardwareWatchdogError::NotRunning)
        ));

        state.start().expect("start should succeed");
        state.kick().expect("kick should succeed");
        state.kick().expect("kick should succeed");
        assert_eq!(state.kick_count(), 2);
    }

    #[test]
    fn test_expire_from_running() {
        let state = RunState::new();
        state.start().expect("start should succeed");

        state.expire().expect("expire should succeed");
        assert_eq!(state.status(), HardwareStatus::Expired);
        assert_eq!(state.expire_count(), 1);

        assert!(matches!(state.kick(), Err(HardwareWatchdogError::Expired)));
        assert!(matches!(
            state.start(),
            Err(HardwareWatchdogError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_stop_clears_expiry() {
        let state = RunState::new();
        state.start().expect("start should succeed");
        state.expire().expect("expire should succeed");

        state.stop().expect("stop after expiry should succeed");
        assert_eq!(state.status(), HardwareStatus::Stopped);
        state.start().expect("start after stop should succeed");
        assert_eq!(state.start_count(), 2);
    }

    #[test]
    fn test_reset_clears_expiry() {
        let state = RunState::new();
        state.start().expect("start should succeed");
        state.expire().expect("expire should succeed");

        state.reset();
        assert_eq!(state.status(), HardwareStatus::Stopped);
        state.start().expect("start after reset should succeed");
    }
}
