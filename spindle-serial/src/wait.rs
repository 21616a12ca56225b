//! How the foreground waits for the transmit interrupt
//!
//! A full transmit buffer blocks the writer until the interrupt frees a
//! slot. The strategy decides what "blocks" means on the target:
//!
//! - [`SpinWait`] - busy wait, the only option inside a bare-metal main loop
//! - [`BlockingWait`] - condition variable, for hosted builds (`std`)
//! - [`SignalWait`] - embassy signal, for async foreground tasks
//!
//! The interrupt side calls [`TxWait::notify`] after every byte it takes
//! out of the buffer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Wait strategy shared between the writer and the transmit interrupt
pub trait TxWait {
    /// Return once `ready` holds
    ///
    /// `ready` is re-evaluated after every wake-up.
    fn wait_until<F: FnMut() -> bool>(&self, ready: F);

    /// Wake any waiter so it re-checks its condition
    ///
    /// Called from interrupt context; must not block.
    fn notify(&self);
}

/// Busy wait
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinWait;

impl TxWait for SpinWait {
    fn wait_until<F: FnMut() -> bool>(&self, mut ready: F) {
        while !ready() {
            core::hint::spin_loop();
        }
    }

    fn notify(&self) {}
}

/// Async-capable wait backed by an embassy [`Signal`]
///
/// The blocking path spins like [`SpinWait`]; async callers use
/// [`SignalWait::until`] and are woken by the interrupt instead.
pub struct SignalWait {
    space: Signal<CriticalSectionRawMutex, ()>,
}

impl SignalWait {
    /// Create an unsignalled wait
    pub const fn new() -> Self {
        Self {
            space: Signal::new(),
        }
    }

    /// Suspend the calling task until `ready` holds
    ///
    /// A notification that lands between the check and the await stays
    /// latched in the signal, so it is never lost.
    pub async fn until<F: FnMut() -> bool>(&self, mut ready: F) {
        while !ready() {
            self.space.wait().await;
        }
    }
}

impl Default for SignalWait {
    fn default() -> Self {
        Self::new()
    }
}

impl TxWait for SignalWait {
    fn wait_until<F: FnMut() -> bool>(&self, mut ready: F) {
        while !ready() {
            core::hint::spin_loop();
        }
    }

    fn notify(&self) {
        self.space.signal(());
    }
}

#[cfg(any(test, feature = "std"))]
pub use self::blocking::BlockingWait;

#[cfg(any(test, feature = "std"))]
mod blocking {
    use std::sync::{Condvar, Mutex, PoisonError};

    use super::TxWait;

    /// Condition-variable wait for hosted builds
    ///
    /// The condition is checked with the lock held and `notify` takes the
    /// lock before waking, so a drain between check and sleep cannot be
    /// missed.
    pub struct BlockingWait {
        lock: Mutex<()>,
        drained: Condvar,
    }

    impl BlockingWait {
        /// Create a new wait
        pub const fn new() -> Self {
            Self {
                lock: Mutex::new(()),
                drained: Condvar::new(),
            }
        }
    }

    impl Default for BlockingWait {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TxWait for BlockingWait {
        fn wait_until<F: FnMut() -> bool>(&self, mut ready: F) {
            let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            while !ready() {
                guard = self
                    .drained
                    .wait(guard)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }

        fn notify(&self) {
            drop(self.lock.lock().unwrap_or_else(PoisonError::into_inner));
            self.drained.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn test_spin_returns_when_ready() {
        let mut polls = 0;
        SpinWait.wait_until(|| {
            polls += 1;
            polls == 3
        });
        assert_eq!(polls, 3);
    }

    #[test]
    fn test_blocking_wakes_on_notify() {
        let wait = BlockingWait::new();
        let flag = AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                std::thread::sleep(Duration::from_millis(20));
                flag.store(true, Ordering::SeqCst);
                wait.notify();
            });
            wait.wait_until(|| flag.load(Ordering::SeqCst));
        });

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_signal_notify_before_wait_is_latched() {
        let wait = SignalWait::new();
        let flag = AtomicBool::new(false);

        flag.store(true, Ordering::SeqCst);
        wait.notify();
        embassy_futures::block_on(wait.until(|| flag.load(Ordering::SeqCst)));
    }

    #[test]
    fn test_signal_wakes_async_waiter() {
        let wait = SignalWait::new();
        let flag = AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                std::thread::sleep(Duration::from_millis(20));
                flag.store(true, Ordering::SeqCst);
                wait.notify();
            });
            embassy_futures::block_on(wait.until(|| flag.load(Ordering::SeqCst)));
        });
    }
}
