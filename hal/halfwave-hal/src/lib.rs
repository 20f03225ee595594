//! Halfwave Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the halfwave drivers are written
//! against. A chip-specific crate implements them on top of the real
//! registers; tests implement them with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  halfwave-firmware (board wiring)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  halfwave-drivers (streamer, transport) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  halfwave-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  halfwave-hal-rp2040                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::FunctionSelect`] - Pin function multiplexing
//! - [`pwm::PwmSlice`] - PWM counter, compare level and wrap interrupt
//! - [`uart::UartControl`], [`uart::UartTx`], [`uart::UartRx`] - Serial peripheral
//! - [`dma::DmaChannel`] - One DMA channel paced by a peripheral request line

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod gpio;
pub mod pwm;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use dma::DmaChannel;
pub use gpio::{FunctionSelect, PinFunction};
pub use pwm::{ClockDivider, PwmSlice};
pub use uart::{UartConfig, UartControl, UartInterrupts, UartRx, UartTx};
