//! # virtual-watchdog
//!
//! Multiplexes many independent watchdog clients onto one physical
//! hardware watchdog timer.
//!
//! A [`WatchdogSupervisor`] owns the hardware driver, a client
//! registry, and a shared periodic tick source. Each
//! [`VirtualWatchdog`] client carries its own liveness timeout,
//! expressed as a budget of supervision ticks. On every tick the
//! supervisor ages all countdowns in one pass and feeds the hardware
//! only when every client has kicked in time; one stalled client
//! starves the feed until the device resets.
//!
//! The physical watchdog is armed when the first client starts and
//! released when the last client stops.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use virtual_watchdog::prelude::*;
//!
//! # fn main() -> VirtualWatchdogResult<()> {
//! let supervisor = WatchdogSupervisor::new(
//!     SupervisorConfig::default(),
//!     Box::new(SoftwareWatchdog::with_default_range()),
//!     Box::new(ThreadTicker::new()),
//! )?;
//!
//! let mut client = supervisor.client(Duration::from_millis(500), "telemetry")?;
//! client.start()?; // first start arms the hardware watchdog
//! client.kick()?; // prove liveness within 500ms, every cycle
//! client.stop()?; // last stop releases the hardware watchdog
//! # Ok(())
//! # }
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod supervisor;
pub mod ticker;

pub use client::VirtualWatchdog;
pub use config::{SupervisorConfig, SupervisorConfigBuilder};
pub use error::{VirtualWatchdogError, VirtualWatchdogResult};
pub use registry::{ClientId, Registry, TickReport};
pub use supervisor::{SupervisorStats, WatchdogSupervisor};
pub use ticker::{ManualTicker, ThreadTicker, TickCallback, TickSource};

pub use virtual_watchdog_hardware as hardware;
