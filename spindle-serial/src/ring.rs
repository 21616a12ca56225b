//! Lock-free single-producer/single-consumer byte ring
//!
//! `head` is the next slot to write and is only ever stored by the
//! [`Producer`]; `tail` is the next slot to read and is only ever stored by
//! the [`Consumer`]. The ring is empty when `head == tail` and full when
//! advancing `head` would make it equal `tail`, so one slot always stays
//! unused and the usable capacity is `N - 1`.
//!
//! Slots are atomic bytes. The producer stores the slot before publishing
//! `head` with release ordering; the consumer acquires `head` before loading
//! the slot. The same pairing applies to `tail` in the other direction.

use portable_atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

/// Fixed-capacity circular byte queue
pub struct RingBuffer<const N: usize> {
    slots: [AtomicU8; N],
    head: AtomicUsize,
    tail: AtomicUsize,
    split: AtomicBool,
}

impl<const N: usize> RingBuffer<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY_SLOT: AtomicU8 = AtomicU8::new(0);

    /// Create an empty ring
    ///
    /// Usable in `static` initialisers.
    pub const fn new() -> Self {
        assert!(N >= 2, "ring needs at least two slots");
        Self {
            slots: [Self::EMPTY_SLOT; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            split: AtomicBool::new(false),
        }
    }

    /// Hand out the producer and consumer roles
    ///
    /// Succeeds exactly once for the lifetime of the ring.
    pub fn split(&self) -> Option<(Producer<'_, N>, Consumer<'_, N>)> {
        if self.split.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some((Producer { ring: self }, Consumer { ring: self }))
    }

    /// Number of usable slots (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Number of queued bytes
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        Self::count(head, tail)
    }

    /// Whether no bytes are queued
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Whether the next push would be rejected
    pub fn is_full(&self) -> bool {
        Self::advance(self.head.load(Ordering::Acquire)) == self.tail.load(Ordering::Acquire)
    }

    const fn advance(index: usize) -> usize {
        (index + 1) % N
    }

    const fn count(head: usize, tail: usize) -> usize {
        (N + head - tail) % N
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write side of a [`RingBuffer`]
pub struct Producer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<'a, const N: usize> Producer<'a, N> {
    /// Append a byte
    ///
    /// Never overwrites: when the ring is full the byte is handed back and
    /// `head` is left untouched.
    pub fn push(&mut self, byte: u8) -> Result<(), u8> {
        let head = self.ring.head.load(Ordering::Relaxed);
        let next = RingBuffer::<N>::advance(head);
        if next == self.ring.tail.load(Ordering::Acquire) {
            return Err(byte);
        }

        self.ring.slots[head].store(byte, Ordering::Relaxed);
        self.ring.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Number of queued bytes
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Whether no bytes are queued
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Whether the next push would be rejected
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

/// Read side of a [`RingBuffer`]
pub struct Consumer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<'a, const N: usize> Consumer<'a, N> {
    /// Take the oldest byte, or `None` when empty
    pub fn pop(&mut self) -> Option<u8> {
        let tail = self.ring.tail.load(Ordering::Relaxed);
        if tail == self.ring.head.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.ring.slots[tail].load(Ordering::Relaxed);
        self.ring
            .tail
            .store(RingBuffer::<N>::advance(tail), Ordering::Release);
        Some(byte)
    }

    /// Look at the oldest byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        let tail = self.ring.tail.load(Ordering::Relaxed);
        if tail == self.ring.head.load(Ordering::Acquire) {
            return None;
        }
        Some(self.ring.slots[tail].load(Ordering::Relaxed))
    }

    /// Discard everything queued so far
    ///
    /// Copies `head` into `tail`. Only `tail` is written, so a producer
    /// pushing concurrently either lands before the snapshot (and is
    /// discarded) or after it (and stays queued). The ring can never
    /// appear full as a result.
    pub fn clear(&mut self) {
        let head = self.ring.head.load(Ordering::Acquire);
        self.ring.tail.store(head, Ordering::Release);
    }

    /// Number of queued bytes
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Whether no bytes are queued
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
