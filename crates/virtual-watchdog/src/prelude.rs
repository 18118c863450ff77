//! Prelude for virtual-watchdog.
//!
//! Re-exports the most commonly used types for convenient importing.

pub use crate::client::VirtualWatchdog;
pub use crate::config::{SupervisorConfig, SupervisorConfigBuilder};
pub use crate::error::{VirtualWatchdogError, VirtualWatchdogResult};
pub use crate::registry::{ClientId, Registry, TickReport};
pub use crate::supervisor::{SupervisorStats, WatchdogSupervisor};
pub use crate::ticker::{ManualTicker, ThreadTicker, TickCallback, TickSource};
pub use virtual_watchdog_hardware::prelude::*;
