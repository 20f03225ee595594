//! GPIO function select
//!
//! The IO bank function select field decides which peripheral drives a pin.
//! Switching it is how the single-wire transport hands the line between the
//! UART and plain SIO.

use embassy_rp::gpio::{AnyPin, Pin};
use embassy_rp::{pac, Peri};

use halfwave_hal::{FunctionSelect, PinFunction};

// IO_BANK0 GPIOx_CTRL.FUNCSEL values
const FUNCSEL_UART: u8 = 2;
const FUNCSEL_PWM: u8 = 4;
const FUNCSEL_SIO: u8 = 5;

/// Raw function select value for `function`
pub(crate) fn funcsel(function: PinFunction) -> u8 {
    match function {
        PinFunction::Sio => FUNCSEL_SIO,
        PinFunction::Uart => FUNCSEL_UART,
        PinFunction::Pwm => FUNCSEL_PWM,
    }
}

/// Bind `pin` to `function`
pub(crate) fn select(pin: u8, function: PinFunction) {
    pac::IO_BANK0
        .gpio(pin as usize)
        .ctrl()
        .write(|w| w.set_funcsel(funcsel(function)));
}

/// The TX/RX pin pair of a single-wire line
///
/// Only the two owned pins can be switched; requests for any other pin are
/// ignored.
pub struct LinePins {
    tx: Peri<'static, AnyPin>,
    rx: Peri<'static, AnyPin>,
}

impl LinePins {
    /// Take ownership of the pair
    pub fn new(tx: Peri<'static, AnyPin>, rx: Peri<'static, AnyPin>) -> Self {
        Self { tx, rx }
    }

    fn owns(&self, pin: u8) -> bool {
        pin == self.tx.pin() || pin == self.rx.pin()
    }
}

impl FunctionSelect for LinePins {
    fn set_function(&mut self, pin: u8, function: PinFunction) {
        if !self.owns(pin) {
            #[cfg(feature = "defmt")]
            defmt::warn!("GPIO{} is not part of this line", pin);
            return;
        }
        select(pin, function);
    }

    fn set_pull_up(&mut self, pin: u8) {
        if !self.owns(pin) {
            return;
        }
        pac::PADS_BANK0.gpio(pin as usize).modify(|w| {
            w.set_ie(true);
            w.set_pue(true);
            w.set_pde(false);
        });
    }
}
