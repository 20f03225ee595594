//! UART serial communication abstractions
//!
//! Provides traits for serial communication that can be
//! implemented by chip-specific HALs.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Write a single byte to the UART
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write_blocking(&[byte])
    }

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read data from the UART
    ///
    /// Blocks until the buffer is filled or an error occurs.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Peripheral-level UART control
///
/// Setup and interrupt status handling, independent of how bytes move.
pub trait UartControl {
    /// Initialize the peripheral with `config`
    fn init(&mut self, config: &UartConfig);

    /// Reprogram the baud rate generator
    fn set_baudrate(&mut self, baudrate: u32);

    /// Enable the break-detect interrupt
    fn enable_break_interrupt(&mut self);

    /// Read and clear the masked interrupt status
    fn take_interrupts(&mut self) -> UartInterrupts;

    /// Block until the last character has left the shift register
    fn wait_idle(&mut self);
}

/// Masked UART interrupt status, as read from the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartInterrupts {
    /// A break condition (line held low for a whole frame) was detected
    pub break_detected: bool,
    /// Any other interrupt source
    pub other: bool,
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// RTS/CTS hardware flow control
    pub flow_control: bool,
    /// Hardware FIFO; single-wire break detection needs it off
    pub fifo: bool,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 1_000_000,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: false,
            fifo: false,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
