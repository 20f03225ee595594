//! PWM slice with wrap interrupt
//!
//! GPIO n is driven by slice `(n / 2) % 8`, channel A for even pins and
//! channel B for odd pins. All slices share the `PWM_IRQ_WRAP` vector.

use embassy_rp::gpio::{AnyPin, Pin};
use embassy_rp::pac;
use embassy_rp::pac::pwm::regs::Intr;
use embassy_rp::Peri;

use halfwave_hal::{ClockDivider, PinFunction, PwmSlice};

use crate::gpio;

/// One PWM slice driving one output pin
pub struct RpPwmSlice {
    _pin: Peri<'static, AnyPin>,
    slice: usize,
    channel_b: bool,
}

impl RpPwmSlice {
    /// Bind `pin` to its PWM slice
    ///
    /// The slice is left stopped with its wrap interrupt masked.
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        let number = pin.pin();
        let slice = ((number >> 1) & 0x07) as usize;

        let mut pwm = Self {
            _pin: pin,
            slice,
            channel_b: number & 1 == 1,
        };
        pwm.set_enabled(false);
        pwm.set_irq_enabled(false);
        pac::PWM.ch(slice).csr().modify(|w| w.set_ph_correct(false));
        gpio::select(number, PinFunction::Pwm);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PWM slice {} channel {} on GPIO{}",
            slice,
            if pwm.channel_b { "B" } else { "A" },
            number
        );

        pwm
    }

    /// Slice number
    pub fn slice(&self) -> usize {
        self.slice
    }

    fn bit(&self) -> u32 {
        1 << self.slice
    }
}

impl PwmSlice for RpPwmSlice {
    fn configure(&mut self, divider: ClockDivider, top: u16) {
        let ch = pac::PWM.ch(self.slice);
        ch.div().write(|w| {
            w.set_int(divider.integer);
            w.set_frac(divider.fraction);
        });
        ch.top().write(|w| w.set_top(top));
    }

    fn set_level(&mut self, level: u16) {
        let channel_b = self.channel_b;
        pac::PWM.ch(self.slice).cc().modify(|w| {
            if channel_b {
                w.set_b(level);
            } else {
                w.set_a(level);
            }
        });
    }

    fn set_enabled(&mut self, enabled: bool) {
        pac::PWM.ch(self.slice).csr().modify(|w| w.set_en(enabled));
    }

    fn set_irq_enabled(&mut self, enabled: bool) {
        let bit = self.bit();
        pac::PWM.inte().modify(|w| {
            if enabled {
                w.0 |= bit;
            } else {
                w.0 &= !bit;
            }
        });
    }

    fn clear_irq(&mut self) {
        pac::PWM.intr().write_value(Intr(self.bit()));
    }
}

/// Read and acknowledge every pending wrap interrupt
///
/// Returns the mask of slices that wrapped. Call from `PWM_IRQ_WRAP`.
pub fn take_wrap_flags() -> u32 {
    let flags = pac::PWM.ints().read().0;
    pac::PWM.intr().write_value(Intr(flags));
    flags
}
