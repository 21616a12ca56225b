//! Serial transport errors
//!
//! Receive overruns and a full transmit buffer are not errors here: the
//! first is counted, the second waits. What remains is misconfiguration.

use core::fmt;

/// Errors from bringing up the serial port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Requested baud rate is zero
    ZeroBaud,
    /// Divisor for the requested baud does not fit the divisor register
    BaudOutOfRange,
    /// Buffers were already split into their halves
    AlreadySplit,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::ZeroBaud => f.write_str("baud rate must be non-zero"),
            SerialError::BaudOutOfRange => f.write_str("baud rate out of range for clock"),
            SerialError::AlreadySplit => f.write_str("serial buffers already in use"),
        }
    }
}

/// Transmit buffer is full; carries the byte that was not queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WouldBlock(pub u8);
