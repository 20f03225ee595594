//! Board configuration types
//!
//! These types describe which pins and rates the drivers are brought up
//! with. They are filled from `board.toml` at boot.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::timing::{DEFAULT_RESOLUTION_BITS, SYS_CLK_HZ};

/// Maximum board name length
pub const MAX_NAME_LEN: usize = 16;

/// Highest GPIO number on the target (RP2040 has GPIO 0-29)
pub const MAX_GPIO: u8 = 29;

/// How the single-wire transport moves bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransferMode {
    /// Asynchronous DMA transfers with interrupt completion
    #[default]
    Dma,
    /// Synchronous byte-at-a-time UART access
    Blocking,
}

/// PWM audio output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioConfig {
    /// Output GPIO
    pub pin: u8,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// PWM resolution in bits
    pub resolution_bits: u8,
    /// System clock feeding the PWM block
    pub sys_clk_hz: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            pin: 2,
            sample_rate: 22_050,
            resolution_bits: DEFAULT_RESOLUTION_BITS,
            sys_clk_hz: SYS_CLK_HZ,
        }
    }
}

/// Single-wire serial configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Base GPIO; the even/odd pair around it carries TX/RX
    pub pin: u8,
    /// Baud rate
    pub baud_rate: u32,
    /// Transfer engine
    pub transfer: TransferMode,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            pin: 4,
            baud_rate: 1_000_000,
            transfer: TransferMode::Dma,
        }
    }
}

impl SerialConfig {
    /// Transmit GPIO (even member of the pair)
    pub fn tx_pin(&self) -> u8 {
        self.pin & 0xFE
    }

    /// Receive GPIO (odd member of the pair)
    pub fn rx_pin(&self) -> u8 {
        (self.pin & 0xFE) + 1
    }
}

/// Complete board configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Board name for logs
    pub name: String<MAX_NAME_LEN>,
    /// Audio output
    pub audio: AudioConfig,
    /// Serial transport
    pub serial: SerialConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// GPIO number out of range
    InvalidPin(u8),
    /// Audio and serial share a GPIO
    PinConflict(u8),
    /// PWM resolution outside 1-16 bits
    InvalidResolution,
    /// Sample rate is zero
    InvalidSampleRate,
    /// Baud rate is zero
    InvalidBaudRate,
}

impl BoardConfig {
    /// Check pin ranges, pin conflicts and rates
    pub fn validate(&self) -> Result<(), ValidationError> {
        let audio = &self.audio;
        let serial = &self.serial;

        if audio.pin > MAX_GPIO {
            return Err(ValidationError::InvalidPin(audio.pin));
        }
        if serial.rx_pin() > MAX_GPIO {
            return Err(ValidationError::InvalidPin(serial.pin));
        }
        if audio.pin == serial.tx_pin() || audio.pin == serial.rx_pin() {
            return Err(ValidationError::PinConflict(audio.pin));
        }
        if audio.resolution_bits == 0 || audio.resolution_bits > 16 {
            return Err(ValidationError::InvalidResolution);
        }
        if audio.sample_rate == 0 {
            return Err(ValidationError::InvalidSampleRate);
        }
        if serial.baud_rate == 0 {
            return Err(ValidationError::InvalidBaudRate);
        }
        Ok(())
    }
}
