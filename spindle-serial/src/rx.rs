//! Receive buffer
//!
//! Filled by the receive-complete interrupt, drained by the foreground.
//! When the ring is full the newest byte is dropped; the loss is only
//! visible through the overrun counter.

use portable_atomic::{AtomicU32, Ordering};

use crate::ring::{Consumer, Producer, RingBuffer};

/// Receive ring plus its overrun counter
pub struct RxBuffer<const N: usize> {
    ring: RingBuffer<N>,
    overruns: AtomicU32,
}

impl<const N: usize> RxBuffer<N> {
    /// Create an empty receive buffer
    pub const fn new() -> Self {
        Self {
            ring: RingBuffer::new(),
            overruns: AtomicU32::new(0),
        }
    }

    /// Hand out the interrupt and foreground halves
    ///
    /// Succeeds exactly once.
    pub fn split(&self) -> Option<(RxProducer<'_, N>, RxConsumer<'_, N>)> {
        let (producer, consumer) = self.ring.split()?;
        Some((
            RxProducer {
                ring: producer,
                overruns: &self.overruns,
            },
            RxConsumer {
                ring: consumer,
                overruns: &self.overruns,
            },
        ))
    }
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt half of the receive buffer
pub struct RxProducer<'a, const N: usize> {
    ring: Producer<'a, N>,
    overruns: &'a AtomicU32,
}

impl<'a, const N: usize> RxProducer<'a, N> {
    /// Store a received byte
    ///
    /// Returns `false` when the buffer was full and the byte was dropped.
    /// Bounded time, never blocks.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.ring.push(byte).is_ok() {
            return true;
        }

        // Sole writer of the counter, no read-modify-write needed
        let dropped = self.overruns.load(Ordering::Relaxed);
        self.overruns
            .store(dropped.saturating_add(1), Ordering::Relaxed);
        false
    }
}

/// Foreground half of the receive buffer
pub struct RxConsumer<'a, const N: usize> {
    ring: Consumer<'a, N>,
    overruns: &'a AtomicU32,
}

impl<'a, const N: usize> RxConsumer<'a, N> {
    /// Number of unread bytes
    pub fn available(&self) -> usize {
        self.ring.len()
    }

    /// Take the oldest unread byte, or `None` when nothing has arrived
    pub fn read(&mut self) -> Option<u8> {
        self.ring.pop()
    }

    /// Like [`read`](Self::read) but with `-1` as the empty sentinel
    pub fn read_raw(&mut self) -> i16 {
        self.read().map_or(-1, i16::from)
    }

    /// Look at the oldest unread byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.ring.peek()
    }

    /// Discard all unread bytes
    pub fn flush(&mut self) {
        self.ring.clear();
    }

    /// Bytes dropped because the buffer was full
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_empty() {
        let rx = RxBuffer::<8>::new();
        let (_, mut consumer) = rx.split().unwrap();
        assert_eq!(consumer.available(), 0);
        assert_eq!(consumer.read(), None);
        assert_eq!(consumer.read_raw(), -1);
    }

    #[test]
    fn test_fifo_order() {
        let rx = RxBuffer::<8>::new();
        let (mut producer, mut consumer) = rx.split().unwrap();

        for &byte in b"G1 X" {
            assert!(producer.push(byte));
        }
        assert_eq!(consumer.available(), 4);
        assert_eq!(consumer.peek(), Some(b'G'));
        assert_eq!(consumer.read(), Some(b'G'));
        assert_eq!(consumer.read_raw(), i16::from(b'1'));
        assert_eq!(consumer.read(), Some(b' '));
        assert_eq!(consumer.read(), Some(b'X'));
        assert_eq!(consumer.read(), None);
    }

    #[test]
    fn test_overflow_drops_newest_and_counts() {
        let rx = RxBuffer::<150>::new();
        let (mut producer, mut consumer) = rx.split().unwrap();

        for i in 0..149u32 {
            assert!(producer.push(i as u8));
        }
        assert!(!producer.push(0xFF));
        assert!(!producer.push(0xFE));

        assert_eq!(consumer.available(), 149);
        assert_eq!(consumer.overruns(), 2);
        for i in 0..149u32 {
            assert_eq!(consumer.read(), Some(i as u8));
        }
        assert_eq!(consumer.read(), None);
    }

    #[test]
    fn test_flush_discards_unread() {
        let rx = RxBuffer::<16>::new();
        let (mut producer, mut consumer) = rx.split().unwrap();

        for &byte in b"garbage" {
            producer.push(byte);
        }
        consumer.flush();
        assert_eq!(consumer.available(), 0);

        producer.push(b'$');
        assert_eq!(consumer.read(), Some(b'$'));
        assert_eq!(consumer.read(), None);
    }

    #[test]
    fn test_byte_0xff_is_not_the_sentinel() {
        let rx = RxBuffer::<4>::new();
        let (mut producer, mut consumer) = rx.split().unwrap();
        producer.push(0xFF);
        assert_eq!(consumer.read_raw(), 255);
        assert_eq!(consumer.read_raw(), -1);
    }
}
