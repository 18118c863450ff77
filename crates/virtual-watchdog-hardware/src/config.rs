//! Configuration types for the software watchdog implementation.

use crate::error::{HardwareWatchdogError, HardwareWatchdogResult};

/// Supported timeout range advertised by a [`crate::SoftwareWatchdog`].
///
/// Real drivers report the range their hardware supports; the software
/// implementation makes it configurable so tests can exercise range
/// validation. The default range matches a common independent watchdog
/// peripheral (1ms to 32760ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareWatchdogConfig {
    /// Minimum supported timeout in milliseconds.
    pub min_timeout_ms: u32,
    /// Maximum supported timeout in milliseconds.
    pub max_timeout_ms: u32,
}

impl SoftwareWatchdogConfig {
    /// Create a configuration with the given supported range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty or starts at zero.
    pub fn new(min_timeout_ms: u32, max_timeout_ms: u32) -> HardwareWatchdogResult<Self> {
        let config = Self {
            min_timeout_ms,
            max_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> HardwareWatchdogResult<()> {
        if self.min_timeout_ms == 0 {
            return Err(HardwareWatchdogError::invalid_configuration(
                "min_timeout_ms must be greater than 0",
            ));
        }
        if self.min_timeout_ms > self.max_timeout_ms {
            return Err(HardwareWatchdogError::invalid_configuration(
                "min_timeout_ms must not exceed max_timeout_ms",
            ));
        }
        Ok(())
    }
}

impl Default for SoftwareWatchdogConfig {
    fn default() -> Self {
        Self {
            min_timeout_ms: 1,
            max_timeout_ms: 32_760,
        }
    }
}
