//! PWM slice abstraction
//!
//! One slice drives one output channel. The slice counter wraps at `top`
//! and raises the wrap interrupt, which the audio streamer uses as its
//! sample clock.

/// Fractional clock divider (8 integer bits, 4 fractional bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivider {
    /// Integer part (1-255)
    pub integer: u8,
    /// Fractional part in sixteenths (0-15)
    pub fraction: u8,
}

impl ClockDivider {
    /// Slowest divider the hardware supports
    pub const MAX: Self = Self {
        integer: 0xFF,
        fraction: 0x0F,
    };

    /// Divide by exactly one
    pub const ONE: Self = Self {
        integer: 1,
        fraction: 0,
    };

    /// Raw 8.4 fixed-point bits
    pub const fn to_bits(self) -> u16 {
        ((self.integer as u16) << 4) | (self.fraction as u16 & 0x0F)
    }
}

/// PWM slice
pub trait PwmSlice {
    /// Program divider and wrap value; the enable state is left unchanged
    fn configure(&mut self, divider: ClockDivider, top: u16);

    /// Set the compare level (duty cycle) of this slice's output channel
    fn set_level(&mut self, level: u16);

    /// Start or stop the counter
    fn set_enabled(&mut self, enabled: bool);

    /// Enable or disable the wrap interrupt for this slice
    fn set_irq_enabled(&mut self, enabled: bool);

    /// Acknowledge a pending wrap interrupt
    fn clear_irq(&mut self);
}
