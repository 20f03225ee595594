//! Runtime pin assignment
//!
//! Pin numbers come from `board.toml`, so pins are handed out by number
//! instead of by peripheral type.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{DMA_CH2, DMA_CH3, UART1};
use embassy_rp::Peri;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
}

/// All GPIO pins, taken one at a time by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

/// Non-GPIO peripherals the drivers need
pub struct RemainingPeripherals {
    pub uart1: Peri<'static, UART1>,
    pub dma_ch2: Peri<'static, DMA_CH2>,
    pub dma_ch3: Peri<'static, DMA_CH3>,
}

macro_rules! any_pins {
    ($p:ident, $($pin:ident),* $(,)?) => {
        [$(Some(Peri::<'static, AnyPin>::from($p.$pin))),*]
    };
}

impl PinBank {
    /// Split embassy's peripherals into the pin bank and what remains
    ///
    /// DMA channels 0 and 1 are left to embassy-rp drivers.
    pub fn from_peripherals(p: embassy_rp::Peripherals) -> (Self, RemainingPeripherals) {
        let pins = any_pins!(
            p, PIN_0, PIN_1, PIN_2, PIN_3, PIN_4, PIN_5, PIN_6, PIN_7, PIN_8, PIN_9, PIN_10,
            PIN_11, PIN_12, PIN_13, PIN_14, PIN_15, PIN_16, PIN_17, PIN_18, PIN_19, PIN_20,
            PIN_21, PIN_22, PIN_23, PIN_24, PIN_25, PIN_26, PIN_27, PIN_28, PIN_29,
        );
        let remaining = RemainingPeripherals {
            uart1: p.UART1,
            dma_ch2: p.DMA_CH2,
            dma_ch3: p.DMA_CH3,
        };
        (Self { pins }, remaining)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}
