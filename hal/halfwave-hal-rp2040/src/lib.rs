//! RP2040 implementation of the halfwave hardware traits
//!
//! Registers are programmed through the PAC re-exported by `embassy-rp`;
//! ownership of pins and channels is still tracked with embassy's
//! peripheral tokens.
//!
//! - Runtime pin bank for config-driven pin assignment
//! - GPIO function select and pull-ups
//! - PWM slice with wrap interrupt
//! - UART1 control plus blocking TX/RX halves
//! - DMA channels paced by UART1 requests, completing on `DMA_IRQ_1`
//!
//! Interrupt vectors are left to the firmware, which knows the concrete
//! driver types behind each one. The helpers here read and acknowledge
//! the hardware status for those handlers.

#![no_std]

pub mod dma;
pub mod gpio;
pub mod pins;
pub mod pwm;
pub mod uart;

pub use dma::{Pacing, RpDmaChannel};
pub use gpio::LinePins;
pub use pins::{PinBank, PinError, RemainingPeripherals};
pub use pwm::RpPwmSlice;
pub use uart::{gpio_to_uart, Uart1Control, Uart1Rx, Uart1Tx, UartError, UartId};
