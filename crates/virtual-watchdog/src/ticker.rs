//! Tick sources driving the shared supervision cadence.
//!
//! The supervisor is agnostic about where ticks come from: a background
//! thread in production, a hand-cranked source in tests. Either way a
//! single periodic callback ages every client, so the cost of
//! supervision stays constant no matter how many clients register.

use crate::error::{VirtualWatchdogError, VirtualWatchdogResult};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Callback invoked once per supervision tick.
pub type TickCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Source of the shared periodic supervision tick.
pub trait TickSource: Send {
    /// Begin delivering ticks at the given period.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is already attached or cannot be
    /// started.
    fn attach(&mut self, period: Duration, callback: TickCallback) -> VirtualWatchdogResult<()>;

    /// Stop delivering ticks. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be torn down cleanly.
    fn detach(&mut self) -> VirtualWatchdogResult<()>;

    /// Whether the source is currently delivering ticks.
    fn is_attached(&self) -> bool;
}

struct TickWorker {
    stop: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

/// Tick source backed by a dedicated timer thread.
///
/// The worker schedules against absolute deadlines, so callback
/// execution time does not accumulate as drift. If the thread falls
/// more than one period behind it re-anchors instead of firing a burst
/// of catch-up ticks.
#[derive(Default)]
pub struct ThreadTicker {
    worker: Option<TickWorker>,
}

impl ThreadTicker {
    /// Create a detached ticker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickSource for ThreadTicker {
    fn attach(&mut self, period: Duration, callback: TickCallback) -> VirtualWatchdogResult<()> {
        if self.worker.is_some() {
            return Err(VirtualWatchdogError::tick_source(
                "ticker is already attached",
            ));
        }
        if period.is_zero() {
            return Err(VirtualWatchdogError::tick_source(
                "tick period must be non-zero",
            ));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("watchdog-tick".into())
            .spawn(move || {
                let mut next = Instant::now() + period;
                loop {
                    if worker_stop.load(Ordering::Acquire) {
                        break;
                    }
                    let now = Instant::now();
                    if now < next {
                        thread::sleep(next - now);
                        continue;
                    }
                    callback();
                    next += period;
                    // Re-anchor after a long stall rather than firing a
                    // burst of make-up ticks.
                    let now = Instant::now();
                    if next < now {
                        next = now + period;
                    }
                }
            })
            .map_err(|error| {
                VirtualWatchdogError::tick_source(format!("failed to spawn tick thread: {error}"))
            })?;

        self.worker = Some(TickWorker { stop, handle });
        Ok(())
    }

    fn detach(&mut self) -> VirtualWatchdogResult<()> {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Release);
            worker.handle.join().map_err(|_| {
                VirtualWatchdogError::tick_source("tick thread panicked before join")
            })?;
        }
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        let _ = self.detach();
    }
}

impl fmt::Debug for ThreadTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadTicker")
            .field("attached", &self.worker.is_some())
            .finish()
    }
}

#[derive(Default)]
struct ManualShared {
    callback: Mutex<Option<TickCallback>>,
}

/// Hand-cranked tick source for deterministic tests.
///
/// Clones share the attached callback, so a test can hand one clone to
/// the supervisor and keep another to fire ticks on demand.
#[derive(Clone, Default)]
pub struct ManualTicker {
    shared: Arc<ManualShared>,
}

impl ManualTicker {
    /// Create a detached manual ticker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a single tick. No-op while detached.
    pub fn fire(&self) {
        let guard = self.shared.callback.lock();
        if let Some(callback) = guard.as_ref() {
            callback();
        }
    }

    /// Deliver `count` consecutive ticks.
    pub fn fire_many(&self, count: u32) {
        for _ in 0..count {
            self.fire();
        }
    }
}

impl TickSource for ManualTicker {
    fn attach(&mut self, _period: Duration, callback: TickCallback) -> VirtualWatchdogResult<()> {
        let mut guard = self.shared.callback.lock();
        if guard.is_some() {
            return Err(VirtualWatchdogError::tick_source(
                "ticker is already attached",
            ));
        }
        *guard = Some(callback);
        Ok(())
    }

    fn detach(&mut self) -> VirtualWatchdogResult<()> {
        self.shared.callback.lock().take();
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.shared.callback.lock().is_some()
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("attached", &self.is_attached())
            .finish()
    }
}
