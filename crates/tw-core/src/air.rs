//! Cooperative "come up for air" signalling.
//!
//! The execution thread never gets preempted.  Instead its long loops poll
//! an [`AirFlag`] at agent granularity.  A background [`AirMonitor`] raises
//! the flag on a fixed period so the executor periodically yields (to let a
//! repaint or a halt request through); a halt is a separate sticky bit on
//! the same flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Default)]
struct AirState {
    come_up: AtomicBool,
    halt:    AtomicBool,
}

/// Shared cancellation / yield token.  Cloning shares the same flag.
#[derive(Clone, Debug, Default)]
pub struct AirFlag(Arc<AirState>);

impl AirFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the executor to yield at its next poll.
    #[inline]
    pub fn request_air(&self) {
        self.0.come_up.store(true, Ordering::Release);
    }

    /// Consume a pending yield request.  Returns `true` if there was one.
    #[inline]
    pub fn take_air(&self) -> bool {
        self.0.come_up.swap(false, Ordering::AcqRel)
    }

    /// Ask the executor to stop.  Sticky until [`AirFlag::clear_halt`].
    pub fn request_halt(&self) {
        self.0.halt.store(true, Ordering::Release);
        self.request_air();
    }

    #[inline]
    pub fn halt_requested(&self) -> bool {
        self.0.halt.load(Ordering::Acquire)
    }

    pub fn clear_halt(&self) {
        self.0.halt.store(false, Ordering::Release);
    }
}

/// Background thread that raises an [`AirFlag`] every `period`.
///
/// The thread stops when the monitor is dropped.
#[derive(Debug)]
pub struct AirMonitor {
    stop:   Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AirMonitor {
    pub fn spawn(flag: AirFlag, period: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("tw-air-monitor".into())
            .spawn(move || {
                while !thread_stop.load(Ordering::Acquire) {
                    thread::park_timeout(period);
                    if thread_stop.load(Ordering::Acquire) {
                        break;
                    }
                    flag.request_air();
                }
            })?;
        Ok(AirMonitor { stop, handle: Some(handle) })
    }
}

impl Drop for AirMonitor {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}
