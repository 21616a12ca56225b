//! UART peripheral abstraction
//!
//! All methods take `&self`: the same peripheral is touched from the
//! foreground (configuration, enabling the transmit-ready interrupt) and
//! from both interrupt handlers. Implementations map each call onto a
//! single register access, so no locking is involved.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Register-level access to one UART peripheral
pub trait SerialHardware {
    /// Program the baud-rate divisor and the frame format
    fn configure(&self, divisor: u16, config: &UartConfig);

    /// Enable or disable the receiver and transmitter
    fn set_enabled(&self, rx: bool, tx: bool);

    /// Enable or disable the receive-complete interrupt
    fn set_rx_interrupt(&self, enabled: bool);

    /// Enable or disable the transmit-ready (data register empty) interrupt
    ///
    /// While enabled with nothing to send, the source re-fires continuously.
    fn set_tx_ready_interrupt(&self, enabled: bool);

    /// Read the received byte from the data register
    fn read_data(&self) -> u8;

    /// Hand a byte to the transmit data register
    fn write_data(&self, byte: u8);
}

/// UART frame format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartConfig {
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// 8 data bits, no parity, 1 stop bit
    pub const fn eight_n_one() -> Self {
        Self {
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::eight_n_one()
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
