//! Error types for the virtual watchdog multiplexer.

use thiserror::Error;
use virtual_watchdog_hardware::HardwareWatchdogError;

/// Errors that can occur during virtual watchdog operations.
#[derive(Debug, Clone, Error)]
pub enum VirtualWatchdogError {
    /// Requested client timeout is outside the hardware watchdog's
    /// supported range.
    #[error("Timeout {requested_ms}ms outside hardware range {min_ms}..={max_ms}ms")]
    TimeoutOutOfRange {
        /// Requested timeout in milliseconds.
        requested_ms: u32,
        /// Minimum supported timeout in milliseconds.
        min_ms: u32,
        /// Maximum supported timeout in milliseconds.
        max_ms: u32,
    },

    /// Requested client timeout is shorter than one supervision tick.
    #[error("Timeout {requested_ms}ms below tick period {tick_period_ms}ms")]
    TimeoutBelowTickPeriod {
        /// Requested timeout in milliseconds.
        requested_ms: u32,
        /// Supervision tick period in milliseconds.
        tick_period_ms: u64,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `start()` called on a client that is already started.
    #[error("Client '{0}' is already started")]
    AlreadyStarted(String),

    /// `stop()` called on a client that was never started.
    #[error("Client '{0}' is not started")]
    NotStarted(String),

    /// Client id no longer identifies a live registry entry.
    #[error("Client id is stale")]
    StaleClient,

    /// Error from the underlying hardware watchdog driver.
    #[error("Hardware watchdog error: {0}")]
    Hardware(#[from] HardwareWatchdogError),

    /// Tick source could not be attached or detached.
    #[error("Tick source error: {0}")]
    TickSource(String),
}

impl VirtualWatchdogError {
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
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create an already-started error.
    #[must_use]
    pub fn already_started(name: impl Into<String>) -> Self {
        Self::AlreadyStarted(name.into())
    }

    /// Create a not-started error.
    #[must_use]
    pub fn not_started(name: impl Into<String>) -> Self {
        Self::NotStarted(name.into())
    }

    /// Create a tick source error.
    #[must_use]
    pub fn tick_source(reason: impl Into<String>) -> Self {
        Self::TickSource(reason.into())
    }
}

/// A specialized `Result` type for virtual watchdog operations.
pub type VirtualWatchdogResult<T> = std::result::Result<T, VirtualWatchdogError>;
