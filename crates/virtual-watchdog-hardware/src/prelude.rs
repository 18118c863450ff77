//! Prelude for virtual-watchdog-hardware.
//!
//! Re-exports the most commonly used types for convenient importing.

pub use crate::config::SoftwareWatchdogConfig;
pub use crate::error::{HardwareWatchdogError, HardwareWatchdogResult};
#[cfg(feature = "std")]
pub use crate::software_impl::{SoftwareWatchdog, WatchdogProbe};
pub use crate::state::{HardwareStatus, RunState};
pub use crate::watchdog::HardwareWatchdog;
