//! Hardware watchdog trait definition.
//!
//! This is the seam between the virtual watchdog multiplexer and the
//! physical watchdog driver. Platform drivers implement this trait; the
//! multiplexer consumes it and is the only component allowed to kick it.

use crate::error::HardwareWatchdogResult;
use crate::state::HardwareStatus;

/// Driver interface for a physical watchdog timer.
///
/// Implementations must guarantee that once started, the device resets
/// unless `kick()` is called within the armed timeout.
///
/// # Real-Time Safety
///
/// `kick()` is called from the supervision tick and must be bounded and
/// non-blocking: no heap allocations, no waits on other locks.
///
/// # Implementation Requirements
///
/// 1. `start()` MUST reject timeouts outside
///    `[min_timeout_ms(), max_timeout_ms()]`.
/// 2. `start()` on a running watchdog MUST fail rather than silently
///    re-arm with a new timeout.
/// 3. `kick()` MUST fail once the watchdog has expired; feeding a lapsed
///    watchdog would mask the pending reset.
pub trait HardwareWatchdog: Send + Sync {
    /// Arm the watchdog with the given timeout.
    ///
    /// # Errors
    ///
    /// Fails if the timeout is out of range or the watchdog is already
    /// running.
    fn start(&mut self, timeout_ms: u32) -> HardwareWatchdogResult<()>;

    /// Disarm the watchdog. Also clears a lapsed countdown so teardown
    /// can always release the device.
    ///
    /// # Errors
    ///
    /// Fails if the watchdog is already stopped.
    fn stop(&mut self) -> HardwareWatchdogResult<()>;

    /// Feed the watchdog, restarting its countdown.
    ///
    /// # Errors
    ///
    /// Fails if the watchdog is not running or has already expired.
    fn kick(&mut self) -> HardwareWatchdogResult<()>;

    /// Minimum supported timeout in milliseconds.
    fn min_timeout_ms(&self) -> u32;

    /// Maximum supported timeout in milliseconds.
    fn max_timeout_ms(&self) -> u32;

    /// Current run status.
    fn status(&self) -> HardwareStatus;

    /// Check whether the watchdog is currently running.
    fn is_running(&self) -> bool {
        self.status().is_running()
    }

    /// Check whether a timeout is within the supported range.
    fn supports_timeout(&self, timeout_ms: u32) -> bool {
        (self.min_timeout_ms()..=self.max_timeout_ms()).contains(&timeout_ms)
    }
}
