//! Configuration for the watchdog supervisor.

use crate::error::{VirtualWatchdogError, VirtualWatchdogResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Supervisor configuration.
///
/// The tick period is fixed and independent of any client's timeout:
/// every client counts its own remaining ticks against this one shared
/// period. A client's effective deadline is therefore rounded up to the
/// next whole tick, so the observed starvation point can lag the nominal
/// timeout by at most one tick period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Timeout used to arm the physical watchdog on the first client
    /// start. Per-client timeouts never reconfigure the hardware
    /// countdown; this value only needs to comfortably exceed the tick
    /// period so a healthy system is always fed in time.
    pub hardware_timeout_ms: u32,

    /// Period of the shared supervision tick.
    pub tick_period: Duration,
}

impl SupervisorConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> SupervisorConfigBuilder {
        SupervisorConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> VirtualWatchdogResult<()> {
        if self.hardware_timeout_ms == 0 {
            return Err(VirtualWatchdogError::invalid_configuration(
                "hardware_timeout_ms must be greater than 0",
            ));
        }
        if self.tick_period < Duration::from_millis(1) {
            return Err(VirtualWatchdogError::invalid_configuration(
                "tick_period must be at least 1ms",
            ));
        }
        if u64::from(self.hardware_timeout_ms) <= self.tick_period_ms() {
            return Err(VirtualWatchdogError::invalid_configuration(
                "hardware_timeout_ms must exceed the tick period",
            ));
        }
        Ok(())
    }

    /// Tick period in whole milliseconds.
    #[must_use]
    pub fn tick_period_ms(&self) -> u64 {
        u64::try_from(self.tick_period.as_millis()).unwrap_or(u64::MAX)
    }

    /// Number of ticks a client with the given timeout may stay silent
    /// before it starves the hardware watchdog (rounded up to whole
    /// ticks, minimum one).
    #[must_use]
    pub fn ticks_for_timeout(&self, timeout_ms: u32) -> u32 {
        let ticks = u64::from(timeout_ms).div_ceil(self.tick_period_ms().max(1));
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            hardware_timeout_ms: 1000,
            tick_period: Duration::from_millis(100),
        }
    }
}

/// Builder for [`SupervisorConfig`].
#[derive(Debug, Default)]
pub struct SupervisorConfigBuilder {
    config: SupervisorConfig,
}

impl SupervisorConfigBuilder {
    /// Set the hardware watchdog timeout in milliseconds.
    #[must_use]
    pub fn hardware_timeout_ms(mut self, ms: u32) -> Self {
        self.config.hardware_timeout_ms = ms;
        self
    }

    /// Set the supervision tick period.
    #[must_use]
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.config.tick_period = period;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> VirtualWatchdogResult<SupervisorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SupervisorConfig::default();
        assert_eq!(config.hardware_timeout_ms, 1000);
        assert_eq!(config.tick_period, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = SupervisorConfig {
            hardware_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SupervisorConfig {
            tick_period: Duration::from_micros(100),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Hardware timeout must outlast a tick or a healthy system resets.
        let config = SupervisorConfig {
            hardware_timeout_ms: 50,
            tick_period: Duration::from_millis(100),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = SupervisorConfig::builder()
            .hardware_timeout_ms(5000)
            .tick_period(Duration::from_millis(50))
            .build()
            .expect("valid config");
        assert_eq!(config.hardware_timeout_ms, 5000);
        assert_eq!(config.tick_period_ms(), 50);
    }

    #[test]
    fn test_ticks_for_timeout_rounds_up() {
        let config = SupervisorConfig {
            hardware_timeout_ms: 1000,
            tick_period: Duration::from_millis(100),
        };
        assert_eq!(config.ticks_for_timeout(100), 1);
        assert_eq!(config.ticks_for_timeout(250), 3);
        assert_eq!(config.ticks_for_timeout(300), 3);
        assert_eq!(config.ticks_for_timeout(301), 4);
    }
}
