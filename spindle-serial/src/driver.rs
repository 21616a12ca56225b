//! UART driver
//!
//! Splits one peripheral and its two buffers into a foreground half
//! ([`Serial`]) and an interrupt half ([`SerialIsr`]).
//!
//! | Buffer | Producer                  | Consumer                |
//! |--------|---------------------------|-------------------------|
//! | RX     | receive-complete vector   | foreground `read`       |
//! | TX     | foreground `write`        | transmit-ready vector   |

use core::convert::Infallible;
use core::fmt;

use spindle_hal::SerialHardware;

use crate::config::SerialConfig;
use crate::error::{SerialError, WouldBlock};
use crate::format::ByteSink;
use crate::rx::{RxBuffer, RxConsumer, RxProducer};
use crate::tx::{TxBuffer, TxConsumer, TxProducer};
use crate::wait::{SignalWait, TxWait};

/// Baud-rate divisor for a 16x oversampling UART
///
/// `round(clock / (16 * baud)) - 1`, computed as
/// `(clock / 16 + baud / 2) / baud - 1` so the rounding stays in integers.
pub fn baud_divisor(clock_hz: u32, baud: u32) -> Result<u16, SerialError> {
    if baud == 0 {
        return Err(SerialError::ZeroBaud);
    }

    let rounded = (clock_hz / 16 + baud / 2) / baud;
    let divisor = rounded.checked_sub(1).ok_or(SerialError::BaudOutOfRange)?;
    u16::try_from(divisor).map_err(|_| SerialError::BaudOutOfRange)
}

/// Foreground half of the serial port
pub struct Serial<'a, H, W, const RX: usize, const TX: usize> {
    hw: &'a H,
    rx: RxConsumer<'a, RX>,
    tx: TxProducer<'a, TX, W>,
}

/// Interrupt half of the serial port
///
/// Move this into whatever owns the UART vectors.
pub struct SerialIsr<'a, H, W, const RX: usize, const TX: usize> {
    hw: &'a H,
    rx: RxProducer<'a, RX>,
    tx: TxConsumer<'a, TX, W>,
}

impl<'a, H, W, const RX: usize, const TX: usize> Serial<'a, H, W, RX, TX>
where
    H: SerialHardware,
    W: TxWait,
{
    /// Claim the buffers and build both halves
    ///
    /// Fails if either buffer was split before.
    pub fn new(
        hw: &'a H,
        rx: &'a RxBuffer<RX>,
        tx: &'a TxBuffer<TX, W>,
    ) -> Result<(Self, SerialIsr<'a, H, W, RX, TX>), SerialError> {
        let (rx_producer, rx_consumer) = rx.split().ok_or(SerialError::AlreadySplit)?;
        let (tx_producer, tx_consumer) = tx.split().ok_or(SerialError::AlreadySplit)?;

        Ok((
            Self {
                hw,
                rx: rx_consumer,
                tx: tx_producer,
            },
            SerialIsr {
                hw,
                rx: rx_producer,
                tx: tx_consumer,
            },
        ))
    }

    /// Program line settings and start the port
    ///
    /// Enables the receiver, the transmitter and the receive-complete
    /// interrupt. The transmit-ready interrupt stays off until the first
    /// write, unless bytes were queued before this call (or before a
    /// baud change), in which case it is re-armed so they go out. Returns
    /// the programmed divisor.
    pub fn begin(&mut self, config: &SerialConfig) -> Result<u16, SerialError> {
        let divisor = baud_divisor(config.clock_hz, config.baud)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "serial: {} baud from {} Hz, divisor {}",
            config.baud,
            config.clock_hz,
            divisor
        );

        self.hw.configure(divisor, &config.uart);
        self.hw.set_enabled(true, true);
        self.hw.set_rx_interrupt(true);

        // Interrupt enable must track the active flag or queued bytes strand
        let active = self.tx.is_active();
        #[cfg(feature = "defmt")]
        if active {
            defmt::debug!("serial: re-arming transmit, {} bytes queued", self.tx.pending());
        }
        self.hw.set_tx_ready_interrupt(active);
        Ok(divisor)
    }

    /// Number of received bytes not yet read
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Take the oldest received byte, `None` when nothing is waiting
    pub fn read(&mut self) -> Option<u8> {
        self.rx.read()
    }

    /// [`read`](Self::read) with `-1` meaning "no data"
    pub fn read_raw(&mut self) -> i16 {
        self.rx.read_raw()
    }

    /// Look at the oldest received byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// Discard every received byte not yet read
    pub fn flush(&mut self) {
        self.rx.flush();
    }

    /// Received bytes dropped because the receive buffer was full
    pub fn overruns(&self) -> u32 {
        self.rx.overruns()
    }

    /// Queue a byte for transmission, waiting while the buffer is full
    pub fn write(&mut self, byte: u8) {
        self.tx.write(byte, self.hw);
    }

    /// Queue a byte only if there is room right now
    pub fn try_write(&mut self, byte: u8) -> Result<(), WouldBlock> {
        self.tx.try_write(byte, self.hw)
    }

    /// Wait until every queued byte has been handed to the hardware
    pub fn drain(&self) {
        self.tx.drain();
    }

    /// Bytes queued for transmission
    pub fn pending(&self) -> usize {
        self.tx.pending()
    }
}

impl<'a, H, const RX: usize, const TX: usize> Serial<'a, H, SignalWait, RX, TX>
where
    H: SerialHardware,
{
    /// Queue a byte, suspending the task while the buffer is full
    pub async fn write_async(&mut self, byte: u8) {
        let mut byte = byte;
        while let Err(WouldBlock(rejected)) = self.tx.try_write(byte, self.hw) {
            byte = rejected;
            let tx = &self.tx;
            tx.wait_strategy().until(|| !tx.is_full()).await;
        }
    }

    /// Suspend the task until the transmit buffer is empty
    pub async fn drain_async(&self) {
        let tx = &self.tx;
        tx.wait_strategy().until(|| tx.pending() == 0).await;
    }
}

impl<'a, H, W, const RX: usize, const TX: usize> SerialIsr<'a, H, W, RX, TX>
where
    H: SerialHardware,
    W: TxWait,
{
    /// Receive-complete interrupt body
    ///
    /// Reads the data register and queues the byte. When the receive buffer
    /// is full the byte is dropped and counted.
    pub fn on_rx_complete(&mut self) {
        let byte = self.hw.read_data();
        if !self.rx.push(byte) {
            #[cfg(feature = "defmt")]
            defmt::warn!("serial: rx overrun, dropped {=u8:#x}", byte);
        }
    }

    /// Transmit-ready interrupt body
    pub fn on_tx_ready(&mut self) {
        self.tx.on_tx_ready(self.hw);
    }
}

impl<'a, H, W, const RX: usize, const TX: usize> ByteSink for Serial<'a, H, W, RX, TX>
where
    H: SerialHardware,
    W: TxWait,
{
    fn write_byte(&mut self, byte: u8) {
        Serial::write(self, byte);
    }
}

impl<'a, H, W, const RX: usize, const TX: usize> fmt::Write for Serial<'a, H, W, RX, TX>
where
    H: SerialHardware,
    W: TxWait,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            Serial::write(self, byte);
        }
        Ok(())
    }
}

impl<'a, H, W, const RX: usize, const TX: usize> embedded_io::ErrorType
    for Serial<'a, H, W, RX, TX>
{
    type Error = Infallible;
}

impl<'a, H, W, const RX: usize, const TX: usize> embedded_io::Write for Serial<'a, H, W, RX, TX>
where
    H: SerialHardware,
    W: TxWait,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            Serial::write(self, byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.drain();
        Ok(())
    }
}

impl<'a, H, W, const RX: usize, const TX: usize> embedded_io::WriteReady
    for Serial<'a, H, W, RX, TX>
where
    H: SerialHardware,
    W: TxWait,
{
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.tx.is_full())
    }
}

impl<'a, H, W, const RX: usize, const TX: usize> embedded_io::ReadReady
    for Serial<'a, H, W, RX, TX>
where
    H: SerialHardware,
    W: TxWait,
{
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.available() > 0)
    }
}

impl<'a, H, const RX: usize, const TX: usize> embedded_io_async::Write
    for Serial<'a, H, SignalWait, RX, TX>
where
    H: SerialHardware,
{
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let Some((&first, rest)) = buf.split_first() else {
            return Ok(0);
        };

        self.write_async(first).await;
        let mut written = 1;
        for &byte in rest {
            if self.try_write(byte).is_err() {
                break;
            }
            written += 1;
        }
        Ok(written)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.drain_async().await;
        Ok(())
    }
}
