//! GPIO function multiplexing
//!
//! The drivers never drive pins directly. They only decide which peripheral
//! owns a pin at a given moment.

/// Function a GPIO can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// Plain software-controlled I/O (released from any peripheral)
    Sio,
    /// Bound to the UART peripheral
    Uart,
    /// Bound to a PWM slice output
    Pwm,
}

/// Pin function selector
///
/// Implementations should handle the actual IO bank register writes
/// for the specific chip.
pub trait FunctionSelect {
    /// Bind `pin` to `function`
    fn set_function(&mut self, pin: u8, function: PinFunction);

    /// Enable the internal pull-up on `pin`
    fn set_pull_up(&mut self, pin: u8);
}
