//! Spindle Hardware Abstraction Layer
//!
//! This crate defines the register-level contract between the serial
//! transport and a chip-specific UART. A board crate implements
//! [`SerialHardware`] for its peripheral and routes the receive-complete
//! and transmit-ready vectors into `spindle-serial`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Firmware (planner, g-code, settings)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spindle-serial (ring buffers, print)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spindle-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Board crate (UART registers, vectors)  │
//! └─────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{DataBits, Parity, SerialHardware, StopBits, UartConfig};
