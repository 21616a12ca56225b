//! Transmit buffer
//!
//! Filled by the foreground, drained by the transmit-ready interrupt.
//!
//! ```text
//!            write (interrupt enabled)
//!   ┌──────┐ ─────────────────────────► ┌────────┐
//!   │ IDLE │                            │ ACTIVE │ ◄─┐ tx-ready: send one byte
//!   └──────┘ ◄───────────────────────── └────────┘ ──┘
//!            tx-ready with empty buffer
//!            (interrupt disabled)
//! ```
//!
//! The `active` flag mirrors the transmit-ready interrupt enable. Only the
//! writer moves IDLE → ACTIVE and only the interrupt moves ACTIVE → IDLE,
//! so the enable is issued once per burst instead of on every byte.
//! A full buffer never drops data: the writer waits on the [`TxWait`]
//! strategy until the interrupt frees a slot.

use portable_atomic::{fence, AtomicBool, Ordering};
use spindle_hal::SerialHardware;

use crate::error::WouldBlock;
use crate::ring::{Consumer, Producer, RingBuffer};
use crate::wait::TxWait;

/// Transmit ring, its wait strategy and the interrupt state
pub struct TxBuffer<const N: usize, W> {
    ring: RingBuffer<N>,
    wait: W,
    active: AtomicBool,
}

impl<const N: usize, W: TxWait> TxBuffer<N, W> {
    /// Create an empty, idle transmit buffer
    pub const fn new(wait: W) -> Self {
        Self {
            ring: RingBuffer::new(),
            wait,
            active: AtomicBool::new(false),
        }
    }

    /// Hand out the foreground and interrupt halves
    ///
    /// Succeeds exactly once.
    pub fn split(&self) -> Option<(TxProducer<'_, N, W>, TxConsumer<'_, N, W>)> {
        let (producer, consumer) = self.ring.split()?;
        Some((
            TxProducer {
                ring: producer,
                wait: &self.wait,
                active: &self.active,
            },
            TxConsumer {
                ring: consumer,
                wait: &self.wait,
                active: &self.active,
            },
        ))
    }
}

impl<const N: usize, W: TxWait + Default> Default for TxBuffer<N, W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

/// Foreground half of the transmit buffer
pub struct TxProducer<'a, const N: usize, W> {
    ring: Producer<'a, N>,
    wait: &'a W,
    active: &'a AtomicBool,
}

impl<'a, const N: usize, W: TxWait> TxProducer<'a, N, W> {
    /// Queue a byte, waiting for space if the buffer is full
    pub fn write<H: SerialHardware>(&mut self, byte: u8, hw: &H) {
        let mut byte = byte;
        while let Err(WouldBlock(rejected)) = self.try_write(byte, hw) {
            byte = rejected;
            let ring = &self.ring;
            self.wait.wait_until(|| !ring.is_full());
        }
    }

    /// Queue a byte only if there is room right now
    pub fn try_write<H: SerialHardware>(&mut self, byte: u8, hw: &H) -> Result<(), WouldBlock> {
        self.ring.push(byte).map_err(WouldBlock)?;

        // Pairs with the fence in `TxConsumer::on_tx_ready`: either we see
        // the interrupt went idle, or it sees our byte.
        fence(Ordering::SeqCst);
        if !self.active.swap(true, Ordering::SeqCst) {
            hw.set_tx_ready_interrupt(true);
        }
        Ok(())
    }

    /// Wait until the interrupt has taken every queued byte
    pub fn drain(&self) {
        let ring = &self.ring;
        self.wait.wait_until(|| ring.is_empty());
    }

    /// Number of bytes waiting to be sent
    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    /// Whether the next write would have to wait
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Whether the transmit-ready interrupt is currently armed
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn wait_strategy(&self) -> &'a W {
        self.wait
    }
}

/// Interrupt half of the transmit buffer
pub struct TxConsumer<'a, const N: usize, W> {
    ring: Consumer<'a, N>,
    wait: &'a W,
    active: &'a AtomicBool,
}

impl<'a, const N: usize, W: TxWait> TxConsumer<'a, N, W> {
    /// Transmit-ready interrupt body
    ///
    /// Sends the oldest queued byte, or disables the interrupt source when
    /// there is nothing left so it stops re-firing.
    pub fn on_tx_ready<H: SerialHardware>(&mut self, hw: &H) {
        if let Some(byte) = self.ring.pop() {
            hw.write_data(byte);
            self.wait.notify();
            return;
        }

        hw.set_tx_ready_interrupt(false);
        self.active.store(false, Ordering::SeqCst);

        // A writer may have queued a byte after the pop above but before it
        // could observe the idle state.
        fence(Ordering::SeqCst);
        if !self.ring.is_empty() && !self.active.swap(true, Ordering::SeqCst) {
            hw.set_tx_ready_interrupt(true);
        }
        self.wait.notify();
    }

    /// Number of bytes waiting to be sent
    pub fn pending(&self) -> usize {
        self.ring.len()
    }
}
