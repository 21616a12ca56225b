//! Serial port configuration
//!
//! Buffer sizes are compile-time constants; line settings are applied by
//! [`Serial::begin`](crate::Serial::begin).

use spindle_hal::UartConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receive ring slots (149 usable)
pub const RX_BUFFER_SIZE: usize = 150;

/// Transmit ring slots (49 usable)
pub const TX_BUFFER_SIZE: usize = 50;

/// Default line speed
pub const DEFAULT_BAUD: u32 = 115_200;

/// Default peripheral clock (16 MHz)
pub const DEFAULT_CLOCK_HZ: u32 = 16_000_000;

/// Line settings for [`Serial::begin`](crate::Serial::begin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baud: u32,
    /// Clock feeding the baud-rate generator, in Hz
    pub clock_hz: u32,
    /// Frame format
    pub uart: UartConfig,
}

impl SerialConfig {
    /// Default clock and 8N1 at the given baud rate
    pub const fn with_baud(baud: u32) -> Self {
        Self {
            baud,
            clock_hz: DEFAULT_CLOCK_HZ,
            uart: UartConfig::eight_n_one(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::with_baud(DEFAULT_BAUD)
    }
}
