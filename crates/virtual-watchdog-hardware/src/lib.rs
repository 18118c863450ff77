//! # virtual-watchdog-hardware
//!
//! Hardware watchdog adapter seam for the virtual watchdog multiplexer.
//!
//! This crate provides a `#![no_std]`-compatible definition of the
//! physical watchdog driver interface:
//! - [`HardwareWatchdog`] trait implemented by platform drivers
//! - [`RunState`] atomic state machine shared by implementations
//! - [`SoftwareWatchdog`] for testing and hardware-free environments
//!   (`std` feature), with a [`WatchdogProbe`] observer
//!
//! ## State Machine
//!
//! ```text
//! Stopped ──start()──► Running ──(unfed past timeout)──► Expired
//!     ▲                   │                                 │
//!     └──────stop()───────┴─────────────stop()─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use virtual_watchdog_hardware::prelude::*;
//!
//! let mut watchdog = SoftwareWatchdog::with_default_range();
//! watchdog.start(1000).expect("failed to start");
//! watchdog.kick().expect("failed to kick");
//! assert!(watchdog.is_running());
//! ```

#![no_std]
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

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod config;
pub mod error;
pub mod prelude;
#[cfg(feature = "std")]
pub mod software_impl;
pub mod state;
pub mod watchdog;

pub use config::SoftwareWatchdogConfig;
pub use error::{HardwareWatchdogError, HardwareWatchdogResult};
#[cfg(feature = "std")]
pub use software_impl::{SoftwareWatchdog, WatchdogProbe};
pub use state::{HardwareStatus, RunState};
pub use watchdog::HardwareWatchdog;
