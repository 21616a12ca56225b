//! Interrupt-driven serial transport for motion-controller firmware
//!
//! Moves bytes between the host and the controller through two fixed-size
//! rings, each shared by exactly one interrupt handler and the foreground:
//!
//! ```text
//! host ──► RX vector ──► RxBuffer (150) ──► Serial::read ──► command parser
//!
//! planner / reports ──► Print ──► Serial::write ──► TxBuffer (50) ──► TX vector ──► host
//! ```
//!
//! - Receive overflow drops the newest byte and bumps an overrun counter.
//! - Transmit overflow never drops; the writer waits per its [`TxWait`].
//! - No locks: each index has a single writer, published with atomics.
//!
//! # Wiring
//!
//! ```ignore
//! static RX: RxBuffer<RX_BUFFER_SIZE> = RxBuffer::new();
//! static TX: TxBuffer<TX_BUFFER_SIZE, SpinWait> = TxBuffer::new(SpinWait);
//!
//! let (mut serial, isr) = Serial::new(&UART0, &RX, &TX)?;
//! serial.begin(&SerialConfig::default())?;
//! // hand `isr` to the vectors: on_rx_complete() / on_tx_ready()
//! serial.print_str("Grbl ready\r\n");
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod format;
pub mod ring;
pub mod rx;
pub mod tx;
pub mod wait;

#[cfg(test)]
mod mock;

// Host tests need a critical-section implementation for embassy-sync
#[cfg(test)]
use critical_section as _;

pub use config::{SerialConfig, DEFAULT_BAUD, DEFAULT_CLOCK_HZ, RX_BUFFER_SIZE, TX_BUFFER_SIZE};
pub use driver::{baud_divisor, Serial, SerialIsr};
pub use error::{SerialError, WouldBlock};
pub use format::{ByteSink, Print};
pub use ring::RingBuffer;
pub use rx::RxBuffer;
pub use tx::TxBuffer;
#[cfg(any(test, feature = "std"))]
pub use wait::BlockingWait;
pub use wait::{SignalWait, SpinWait, TxWait};
