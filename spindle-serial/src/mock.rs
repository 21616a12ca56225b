//! Recording UART for host tests

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, AtomicUsize, Ordering};
use std::sync::Mutex;

use spindle_hal::{SerialHardware, UartConfig};

pub struct MockUart {
    divisor: AtomicU16,
    frame: Mutex<Option<UartConfig>>,
    rx_enabled: AtomicBool,
    tx_enabled: AtomicBool,
    rx_interrupt: AtomicBool,
    tx_ready: AtomicBool,
    tx_ready_enables: AtomicUsize,
    incoming: AtomicU8,
    sent: Mutex<Vec<u8>>,
}

impl MockUart {
    pub fn new() -> Self {
        Self {
            divisor: AtomicU16::new(0),
            frame: Mutex::new(None),
            rx_enabled: AtomicBool::new(false),
            tx_enabled: AtomicBool::new(false),
            rx_interrupt: AtomicBool::new(false),
            tx_ready: AtomicBool::new(false),
            tx_ready_enables: AtomicUsize::new(0),
            incoming: AtomicU8::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Latch a byte into the receive data register
    pub fn receive(&self, byte: u8) {
        self.incoming.store(byte, Ordering::SeqCst);
    }

    pub fn divisor(&self) -> u16 {
        self.divisor.load(Ordering::SeqCst)
    }

    pub fn frame(&self) -> Option<UartConfig> {
        *self.frame.lock().unwrap()
    }

    pub fn enabled(&self) -> (bool, bool) {
        (
            self.rx_enabled.load(Ordering::SeqCst),
            self.tx_enabled.load(Ordering::SeqCst),
        )
    }

    pub fn rx_interrupt_enabled(&self) -> bool {
        self.rx_interrupt.load(Ordering::SeqCst)
    }

    pub fn tx_ready_enabled(&self) -> bool {
        self.tx_ready.load(Ordering::SeqCst)
    }

    pub fn tx_ready_enables(&self) -> usize {
        self.tx_ready_enables.load(Ordering::SeqCst)
    }

    pub fn transmitted(&self) -> Vec<u8> {
        self.sent.lock().unwrap().clone()
    }

    pub fn transmitted_len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl SerialHardware for MockUart {
    fn configure(&self, divisor: u16, config: &UartConfig) {
        self.divisor.store(divisor, Ordering::SeqCst);
        *self.frame.lock().unwrap() = Some(*config);
    }

    fn set_enabled(&self, rx: bool, tx: bool) {
        self.rx_enabled.store(rx, Ordering::SeqCst);
        self.tx_enabled.store(tx, Ordering::SeqCst);
    }

    fn set_rx_interrupt(&self, enabled: bool) {
        self.rx_interrupt.store(enabled, Ordering::SeqCst);
    }

    fn set_tx_ready_interrupt(&self, enabled: bool) {
        if enabled {
            self.tx_ready_enables.fetch_add(1, Ordering::SeqCst);
        }
        self.tx_ready.store(enabled, Ordering::SeqCst);
    }

    fn read_data(&self) -> u8 {
        self.incoming.load(Ordering::SeqCst)
    }

    fn write_data(&self, byte: u8) {
        self.sent.lock().unwrap().push(byte);
    }
}
