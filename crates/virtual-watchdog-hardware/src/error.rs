//! Error types for hardware watchdog operations.

use alloc::string::String;

/// Errors that can occur when driving a hardware watchdog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardwareWatchdogError {
    /// Watchdog is not running.
    NotRunning,
    /// Watchdog is already running.
    AlreadyRunning,
    /// Watchdog has expired; the device is about to reset.
    Expired,
    /// Requested timeout is outside the supported range.
    TimeoutOutOfRange {
        /// Requested timeout in milliseconds.
        requested_ms: u32,
        /// Minimum supported timeout in milliseconds.
        min_ms: u32,
        /// Maximum supported timeout in milliseconds.
        max_ms: u32,
    },
    /// Invalid configuration.
    InvalidConfiguration(String),
    /// State transition not allowed.
    InvalidTransition {
        /// Current state.
        from: &'static str,
        /// Attempted target state.
        to: &'static str,
    },
    /// Underlying hardware fault.
    Fault(String),
}

impl HardwareWatchdogError {
    /// Create a timeout-out-of-range error.
    #[must_use]
    pub fn timeout_out_of_range(requested_ms: u32, min_ms: u32, max_ms: u32) -> Self {
        Self::TimeoutOutOfRange {
            requested_ms,
            min_ms,
            max_ms,
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an invalid transition error.
    #[must_use]
    pub fn invalid_transition(from: &'static str, to: &'static str) -> Self {
        Self::InvalidTransition { from, to }
    }

    /// Create a hardware fault error.
    #[must_use]
    pub fn fault(msg: impl Into<String>) -> Self {
        Self::Fault(msg.into())
    }
}

impl core::fmt::Display for HardwareWatchdogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotRunning => write!(f, "Watchdog is not running"),
            Self::AlreadyRunning => write!(f, "Watchdog is already running"),
            Self::Expired => write!(f, "Watchdog has expired"),
            Self::TimeoutOutOfRange {
                requested_ms,
                min_ms,
                max_ms,
            } => write!(
                f,
                "Timeout {requested_ms}ms outside supported range {min_ms}..={max_ms}ms"
            ),
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid state transition: {from} -> {to}")
            }
            Self::Fault(msg) => write!(f, "Hardware fault: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HardwareWatchdogError {}

/// A specialized `Result` type for hardware watchdog operations.
pub type HardwareWatchdogResult<T> = core::result::Result<T, HardwareWatchdogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        assert_eq!(
            HardwareWatchdogError::NotRunning.to_string(),
            "Watchdog is not running"
        );
        assert_eq!(
            HardwareWatchdogError::timeout_out_of_range(50_000, 1, 32_760).to_string(),
            "Timeout 50000ms outside supported range 1..=32760ms"
        );
    }

    #[test]
    fn test_error_constructors() {
        let err = HardwareWatchdogError::fault("SPI bus stuck");
        assert!(matches!(err, HardwareWatchdogError::Fault(_)));

        let err = HardwareWatchdogError::invalid_configuration("min above max");
        assert!(matches!(
            err,
            HardwareWatchdogError::InvalidConfiguration(_)
        ));

        let err = HardwareWatchdogError::invalid_transition("Expired", "Running");
        assert!(matches!(
            err,
            HardwareWatchdogError::InvalidTransition { .. }
        ));
    }
}
